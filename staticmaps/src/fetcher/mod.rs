//! Tile fetcher: cache first, network second.
//!
//! [`TileFetcher::fetch`] resolves one tile to a decoded RGBA image:
//!
//! 1. If a cache is configured and holds the tile, decode and return it.
//! 2. If offline, report [`FetchError::NotFound`] without touching the network.
//! 3. Otherwise download from the provider, decode, and store the raw bytes in
//!    the cache. Store failures are logged and ignored.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::cache::{self, SharedTileCache};
use crate::coord::TileCoord;
use crate::provider::{AsyncHttpClient, ProviderError, TileProvider};

/// Why a tile could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The tile does not exist (HTTP 404, or offline cache miss)
    #[error("Tile not found: {0}")]
    NotFound(String),
    /// Download failed
    #[error(transparent)]
    Provider(ProviderError),
    /// Downloaded bytes are not an image
    #[error("Failed to decode tile {tile}: {reason}")]
    Decode { tile: TileCoord, reason: String },
    /// Cached tile is unreadable and the network is not available
    #[error("Unusable cached tile {0}")]
    Cache(String),
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(url) => FetchError::NotFound(url),
            other => FetchError::Provider(other),
        }
    }
}

/// Fetches tiles of one provider.
///
/// Cloning is cheap; every clone shares the provider, cache policy and HTTP
/// client.
pub struct TileFetcher<C> {
    provider: Arc<TileProvider>,
    cache: Option<SharedTileCache>,
    client: Arc<C>,
    online: bool,
}

impl<C> Clone for TileFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cache: self.cache.clone(),
            client: Arc::clone(&self.client),
            online: self.online,
        }
    }
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    /// Creates an online fetcher without cache.
    pub fn new(provider: Arc<TileProvider>, client: Arc<C>) -> Self {
        Self {
            provider,
            cache: None,
            client,
            online: true,
        }
    }

    /// Sets the cache policy; `None` disables caching.
    pub fn with_cache(mut self, cache: Option<SharedTileCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Enables or disables network access.
    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// The provider this fetcher downloads from.
    pub fn provider(&self) -> &TileProvider {
        &self.provider
    }

    /// Download URL for a tile.
    pub fn url(&self, tile: &TileCoord) -> String {
        self.provider.tile_url(tile)
    }

    /// Fetches and decodes one tile.
    pub async fn fetch(&self, tile: TileCoord) -> Result<RgbaImage, FetchError> {
        let cache_path = self
            .cache
            .as_deref()
            .map(|c| cache::tile_path(c, &self.provider.name, &tile));

        if let Some(path) = &cache_path {
            if let Some(bytes) = cache::read_tile(path.clone()).await {
                match decode(&bytes, tile) {
                    Ok(img) => {
                        trace!(tile = %tile, "Tile cache hit");
                        return Ok(img);
                    }
                    Err(e) if !self.online => {
                        return Err(FetchError::Cache(format!("{}: {}", path.display(), e)));
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Ignoring unreadable cached tile");
                    }
                }
            }
        }

        if !self.online {
            return Err(FetchError::NotFound(tile.to_string()));
        }

        let url = self.url(&tile);
        let bytes = self.client.get(&url).await?;
        let img = decode(&bytes, tile)?;

        if let (Some(path), Some(cache)) = (cache_path, &self.cache) {
            if let Err(e) = cache::write_tile(path.clone(), cache.perm(), bytes).await {
                warn!(path = %path.display(), error = %e, "Failed to store map tile");
            }
        }

        Ok(img)
    }
}

fn decode(bytes: &[u8], tile: TileCoord) -> Result<RgbaImage, FetchError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| FetchError::Decode {
            tile,
            reason: e.to_string(),
        })
}
