//! Settings structs for the configuration file sections.
//!
//! Each struct mirrors one `[section]` of `config.ini`.

use std::path::PathBuf;

use crate::cache::DEFAULT_CACHE_PERM;

/// Default output width and height in pixels.
pub const DEFAULT_SIZE: u32 = 512;

/// Highest zoom level automatic fitting may choose.
pub const DEFAULT_MAX_ZOOM: u32 = 30;

/// Default `User-Agent` for tile requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0+(compatible; staticmaps/0.1; https://github.com/staticmaps-rs/staticmaps)";

/// Registry name of the default tile provider.
pub const DEFAULT_PROVIDER: &str = "osm";

/// Complete configuration loaded from `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub render: RenderSettings,
}

/// `[provider]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Registry name, see [`TileProvider::builtin`](crate::provider::TileProvider::builtin)
    pub provider_type: String,
    /// Substituted for `{k}` in the URL template
    pub api_key: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_type: DEFAULT_PROVIDER.to_string(),
            api_key: None,
        }
    }
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Root directory; `None` means the platform user cache directory
    pub directory: Option<PathBuf>,
    /// Directory creation mode
    pub permissions: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            permissions: DEFAULT_CACHE_PERM,
        }
    }
}

/// `[render]`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub max_zoom: u32,
    pub user_agent: String,
    pub online: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            max_zoom: DEFAULT_MAX_ZOOM,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            online: true,
        }
    }
}
