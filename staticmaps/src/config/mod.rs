//! Persistent defaults from `config.ini`.
//!
//! The file lives in the platform config directory
//! (`~/.config/staticmaps/config.ini` on Linux). Every key is optional:
//!
//! ```ini
//! [provider]
//! type = osm
//! api_key =
//!
//! [cache]
//! enabled = true
//! directory = ~/.cache/staticmaps/tiles
//! permissions = 0755
//!
//! [render]
//! width = 512
//! height = 512
//! max_zoom = 30
//! online = true
//! ```
//!
//! A [`ConfigFile`] feeds [`Context::from_config`](crate::context::Context::from_config).

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, ProviderSettings, RenderSettings, DEFAULT_MAX_ZOOM,
    DEFAULT_PROVIDER, DEFAULT_SIZE, DEFAULT_USER_AGENT,
};
