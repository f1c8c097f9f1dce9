//! Raster tile provider abstraction
//!
//! A [`TileProvider`] is a plain descriptor of a remote tile service: URL
//! template, shard labels, tile size and attribution. The registry exposes the
//! built-in services by name, and [`AsyncHttpClient`] is the seam through which
//! tiles are actually downloaded.
//!
//! ```ignore
//! use staticmaps::provider::{AsyncReqwestClient, TileProvider};
//!
//! let provider = TileProvider::lookup("opentopomap").unwrap_or_default();
//! let client = AsyncReqwestClient::new("my-app/1.0")?;
//! ```

mod http;
mod registry;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::{png_tile, MockAsyncHttpClient};
