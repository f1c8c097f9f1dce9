//! Tile provider descriptor and error types

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors that can occur while talking to a tile server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Server answered 404 for the URL
    #[error("Tile not found: {0}")]
    NotFound(String),
    /// Server answered with an unexpected status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// Transport failure or client construction failure
    #[error("HTTP error: {0}")]
    HttpError(String),
}

/// Immutable description of a raster tile service.
///
/// URL templates use `{s}` for the shard label, `{z}`, `{x}`, `{y}` for the
/// tile index and `{k}` for the API key. A provider whose template is empty
/// produces no tiles at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileProvider {
    /// Registry name, also the cache subdirectory
    pub name: String,
    /// Caption drawn at the bottom of the map
    pub attribution: String,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// URL template
    pub url_pattern: String,
    /// Shard labels substituted for `{s}`
    pub shards: Vec<String>,
    /// Whether 404 responses are expected (sparse coverage)
    pub ignore_not_found: bool,
    /// API key substituted for `{k}`
    pub api_key: Option<String>,
}

impl TileProvider {
    /// Creates a provider with 256 px tiles and no shards.
    pub fn new(
        name: impl Into<String>,
        attribution: impl Into<String>,
        url_pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attribution: attribution.into(),
            tile_size: 256,
            url_pattern: url_pattern.into(),
            shards: Vec::new(),
            ignore_not_found: false,
            api_key: None,
        }
    }

    /// The sentinel provider that never fetches anything.
    pub fn none() -> Self {
        Self::new("none", "", "").with_ignore_not_found(true)
    }

    /// Sets the shard labels.
    pub fn with_shards<I, S>(mut self, shards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shards = shards.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the tile edge length.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Marks 404 responses as expected.
    pub fn with_ignore_not_found(mut self, ignore: bool) -> Self {
        self.ignore_not_found = ignore;
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// True for the sentinel provider.
    pub fn is_none(&self) -> bool {
        self.url_pattern.is_empty()
    }

    /// Shard label for a tile, `shards[(x + y) % len]`.
    pub fn shard_for(&self, tile: &TileCoord) -> Option<&str> {
        if self.shards.is_empty() {
            return None;
        }
        let idx = (u64::from(tile.x) + u64::from(tile.y)) % self.shards.len() as u64;
        Some(self.shards[idx as usize].as_str())
    }

    /// Expands the URL template for a tile.
    pub fn tile_url(&self, tile: &TileCoord) -> String {
        self.url_pattern
            .replace("{s}", self.shard_for(tile).unwrap_or(""))
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{k}", self.api_key.as_deref().unwrap_or(""))
    }
}

impl Default for TileProvider {
    fn default() -> Self {
        super::registry::open_street_maps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_selection_is_x_plus_y() {
        let p = TileProvider::new("t", "", "https://{s}.example.com/{z}/{x}/{y}.png")
            .with_shards(["a", "b", "c"]);
        assert_eq!(p.shard_for(&TileCoord::new(5, 0, 0)), Some("a"));
        assert_eq!(p.shard_for(&TileCoord::new(5, 1, 0)), Some("b"));
        assert_eq!(p.shard_for(&TileCoord::new(5, 1, 1)), Some("c"));
        assert_eq!(p.shard_for(&TileCoord::new(5, 2, 2)), Some("b"));
    }

    #[test]
    fn test_tile_url_expansion() {
        let p = TileProvider::new("t", "", "https://{s}.example.com/{z}/{x}/{y}.png?key={k}")
            .with_shards(["a", "b"])
            .with_api_key("secret");
        assert_eq!(
            p.tile_url(&TileCoord::new(10, 3, 4)),
            "https://b.example.com/10/3/4.png?key=secret"
        );
    }

    #[test]
    fn test_tile_url_without_shards() {
        let p = TileProvider::new("t", "", "https://example.com/{z}/{y}/{x}");
        assert_eq!(p.shard_for(&TileCoord::new(1, 1, 0)), None);
        assert_eq!(
            p.tile_url(&TileCoord::new(1, 1, 0)),
            "https://example.com/1/0/1"
        );
    }

    #[test]
    fn test_none_provider() {
        let p = TileProvider::none();
        assert!(p.is_none());
        assert!(p.ignore_not_found);
        assert!(p.attribution.is_empty());
        assert_eq!(p.tile_size, 256);
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::HttpStatus {
            status: 503,
            url: "https://x/1/2/3".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://x/1/2/3");
    }
}
