//! staticmaps - static map images from web map tiles
//!
//! Renders a PNG-ready RGBA image of a geographic region: raster tiles from
//! a tile server are stitched together and markers, paths, areas, circles
//! and image markers are drawn on top, followed by an attribution caption.
//!
//! # High-Level API
//!
//! The [`context`] module provides the render entry point:
//!
//! ```no_run
//! use staticmaps::color::Color;
//! use staticmaps::context::Context;
//! use staticmaps::coord::LatLng;
//! use staticmaps::objects::Path;
//!
//! # async fn run() -> Result<(), staticmaps::context::RenderError> {
//! let mut ctx = Context::new();
//! ctx.set_size(800, 600).add_object(Path::new(
//!     vec![LatLng::new(48.0, 7.8), LatLng::new(48.5, 8.2)],
//!     Color::BLUE,
//!     3.0,
//! ));
//! let _map = ctx.render().await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod color;
pub mod config;
pub mod context;
pub mod coord;
pub mod fetcher;
pub mod logging;
pub mod objects;
pub mod orchestrator;
pub mod parse;
pub mod provider;
pub mod render;
pub mod transform;

pub use context::{Context, RenderError};

/// Version of the library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
