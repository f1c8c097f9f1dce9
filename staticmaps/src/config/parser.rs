//! Mapping of INI keys onto [`ConfigFile`] fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::provider::TileProvider;

/// Parses an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays the values present.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("type") {
            let v = v.trim().to_lowercase();
            if TileProvider::lookup(&v).is_none() {
                let names: Vec<String> = TileProvider::builtin().into_keys().collect();
                return Err(invalid(
                    "provider",
                    "type",
                    &v,
                    format!("must be one of: {}", names.join(", ")),
                ));
            }
            config.provider.provider_type = v;
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.provider.api_key = Some(v.to_string());
            }
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool(v)
                .ok_or_else(|| invalid("cache", "enabled", v, "must be true or false"))?;
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("permissions") {
            let digits = v.trim().trim_start_matches("0o");
            config.cache.permissions = u32::from_str_radix(digits, 8)
                .ok()
                .filter(|p| *p <= 0o7777)
                .ok_or_else(|| {
                    invalid("cache", "permissions", v, "must be an octal mode like 0755")
                })?;
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("width") {
            config.render.width = parse_positive(v)
                .ok_or_else(|| invalid("render", "width", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("height") {
            config.render.height = parse_positive(v)
                .ok_or_else(|| invalid("render", "height", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("max_zoom") {
            config.render.max_zoom = v
                .trim()
                .parse()
                .ok()
                .filter(|z| *z <= 30)
                .ok_or_else(|| invalid("render", "max_zoom", v, "must be between 0 and 30"))?;
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.render.user_agent = v.to_string();
            }
        }
        if let Some(v) = section.get("online") {
            config.render.online = parse_bool(v)
                .ok_or_else(|| invalid("render", "online", v, "must be true or false"))?;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse().ok().filter(|v| *v > 0)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expands a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, content).unwrap();
        ConfigFile::load_from(&path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[provider]
type = Carto-Dark
api_key = secret

[cache]
enabled = false
directory = /var/cache/maps
permissions = 0750

[render]
width = 800
height = 600
max_zoom = 18
user_agent = test-agent
online = no
"#,
        )
        .unwrap();

        assert_eq!(config.provider.provider_type, "carto-dark");
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.directory, Some(PathBuf::from("/var/cache/maps")));
        assert_eq!(config.cache.permissions, 0o750);
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.max_zoom, 18);
        assert_eq!(config.render.user_agent, "test-agent");
        assert!(!config.render.online);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = load("[render]\nwidth = 300\n").unwrap();
        let default = ConfigFile::default();
        assert_eq!(config.render.width, 300);
        assert_eq!(config.render.height, default.render.height);
        assert_eq!(config.provider, default.provider);
        assert_eq!(config.cache, default.cache);
    }

    #[test]
    fn test_invalid_provider_type() {
        let err = load("[provider]\ntype = nowhere\n").unwrap_err();
        assert!(err.to_string().contains("must be one of:"));
        assert!(err.to_string().contains("osm"));
    }

    #[test]
    fn test_invalid_values() {
        for (content, key) in [
            ("[render]\nwidth = 0\n", "width"),
            ("[render]\nheight = tall\n", "height"),
            ("[render]\nmax_zoom = 31\n", "max_zoom"),
            ("[render]\nonline = maybe\n", "online"),
            ("[cache]\npermissions = 0999\n", "permissions"),
            ("[cache]\nenabled = sometimes\n", "enabled"),
        ] {
            match load(content) {
                Err(ConfigFileError::InvalidValue { key: k, .. }) => assert_eq!(k, key),
                other => panic!("{:?} for {}", other, content),
            }
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/maps/tiles");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("maps/tiles"));
        }
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
