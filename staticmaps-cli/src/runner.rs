//! Builds a render context from config and flags, renders it and writes the PNG.

use std::str::FromStr;

use image::ImageFormat;
use staticmaps::color::Color;
use staticmaps::config::ConfigFile;
use staticmaps::parse::{self, ParseError};
use staticmaps::provider::TileProvider;
use staticmaps::Context;
use tracing::info;

use crate::args::Args;
use crate::error::CliError;

/// Loads the configuration named by `--config`, or the default one.
pub fn load_config(args: &Args) -> Result<ConfigFile, CliError> {
    let config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

fn invalid(flag: &'static str) -> impl FnOnce(ParseError) -> CliError {
    move |source| CliError::InvalidArgument { flag, source }
}

fn lookup_provider(name: &str) -> Result<TileProvider, CliError> {
    TileProvider::lookup(name).ok_or_else(|| CliError::UnknownProvider(name.to_string()))
}

/// Builds the context: config values first, flags on top.
pub fn build_context(args: &Args, config: &ConfigFile) -> Result<Context, CliError> {
    let mut ctx = Context::from_config(config)?;

    // CLI takes precedence, then config
    let api_key = args
        .api_key
        .clone()
        .or_else(|| config.provider.api_key.clone());
    if let Some(name) = &args.map_type {
        let mut provider = lookup_provider(name)?;
        if let Some(key) = &api_key {
            provider = provider.with_api_key(key.clone());
        }
        ctx.set_tile_provider(provider);
    } else if let Some(key) = &args.api_key {
        let provider = ctx.tile_provider().clone().with_api_key(key.clone());
        ctx.set_tile_provider(provider);
    }
    for name in &args.overlay {
        let mut provider = lookup_provider(name)?;
        if let Some(key) = &api_key {
            provider = provider.with_api_key(key.clone());
        }
        ctx.add_overlay(provider);
    }

    let (width, height) = ctx.size();
    ctx.set_size(args.width.unwrap_or(width), args.height.unwrap_or(height));

    if let Some(zoom) = args.zoom {
        ctx.set_zoom(zoom);
    }
    if let Some(center) = &args.center {
        ctx.set_center(parse::parse_lat_lng(center).map_err(invalid("--center"))?);
    }
    if let Some(bbox) = &args.bbox {
        ctx.set_bounding_box(parse::parse_bounding_box(bbox).map_err(invalid("--bbox"))?);
    }
    if let Some(background) = &args.background {
        let color = Color::from_str(background).map_err(|source| CliError::InvalidArgument {
            flag: "--background",
            source: ParseError::InvalidColor {
                key: "background".to_string(),
                source,
            },
        })?;
        ctx.set_background(color);
    }
    if let Some(user_agent) = &args.user_agent {
        ctx.set_user_agent(user_agent.clone());
    }
    if let Some(attribution) = &args.attribution {
        ctx.override_attribution(attribution.clone());
    }
    if args.no_cache {
        ctx.set_cache(None);
    }
    if args.offline {
        ctx.set_online(false);
    }

    // areas and paths below markers, markers on top
    for s in &args.area {
        ctx.add_object(parse::parse_area_string(s).map_err(invalid("--area"))?);
    }
    for s in &args.path {
        ctx.add_object(parse::parse_path_string(s).map_err(invalid("--path"))?);
    }
    for s in &args.circle {
        for circle in parse::parse_circle_string(s).map_err(invalid("--circle"))? {
            ctx.add_object(circle);
        }
    }
    for s in &args.marker {
        for marker in parse::parse_marker_string(s).map_err(invalid("--marker"))? {
            ctx.add_object(marker);
        }
    }
    for s in &args.image_marker {
        for marker in parse::parse_image_marker_string(s).map_err(invalid("--imagemarker"))? {
            ctx.add_object(marker);
        }
    }

    Ok(ctx)
}

/// Renders the map described by `args` and writes it to `args.output`.
pub async fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let ctx = build_context(&args, &config)?;

    info!(
        provider = %ctx.tile_provider().name,
        objects = ctx.object_count(),
        "Rendering map"
    );
    let image = ctx.render().await?;

    image
        .save_with_format(&args.output, ImageFormat::Png)
        .map_err(|error| CliError::FileWrite {
            path: args.output.clone(),
            error,
        })?;
    info!(path = %args.output.display(), "Map written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(flags: &[&str]) -> Args {
        let mut argv = vec!["create-static-map"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv).unwrap()
    }

    fn config() -> ConfigFile {
        let mut config = ConfigFile::default();
        config.cache.enabled = false;
        config
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = config();
        config.render.width = 300;
        config.render.height = 200;

        let ctx = build_context(&args(&["--height", "100"]), &config).unwrap();
        assert_eq!(ctx.size(), (300, 100));

        let ctx = build_context(
            &args(&["-t", "opentopomap", "--useragent", "tester/1.0", "--offline"]),
            &config,
        )
        .unwrap();
        assert_eq!(ctx.tile_provider().name, "opentopomap");
        assert_eq!(ctx.user_agent(), "tester/1.0");
        assert!(!ctx.is_online());
    }

    #[test]
    fn test_api_key_from_flag_or_config() {
        let mut config = config();
        config.provider.api_key = Some("from-config".to_string());

        let ctx = build_context(&args(&["-t", "thunderforest-landscape"]), &config).unwrap();
        assert_eq!(ctx.tile_provider().api_key.as_deref(), Some("from-config"));

        let ctx = build_context(&args(&["--api-key", "from-flag"]), &config).unwrap();
        assert_eq!(ctx.tile_provider().api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = build_context(&args(&["-t", "nowhere"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::UnknownProvider(ref n) if n == "nowhere"));

        let err = build_context(&args(&["--overlay", "nowhere"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::UnknownProvider(_)));
    }

    #[test]
    fn test_objects_from_flags() {
        let ctx = build_context(
            &args(&[
                "-m",
                "color:blue|48.1,7.8|48.2,7.9",
                "-p",
                "48.1,7.8|48.2,7.9",
                "-a",
                "48.1,7.8|48.2,7.9|48.0,8.0",
                "-C",
                "radius:200|48.1,7.8",
            ]),
            &config(),
        )
        .unwrap();
        assert_eq!(ctx.object_count(), 5);
    }

    #[test]
    fn test_invalid_flag_values() {
        let err = build_context(&args(&["-c", "somewhere"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { flag: "--center", .. }));

        let err = build_context(&args(&["-b", "1,2"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { flag: "--bbox", .. }));

        let err = build_context(&args(&["--background", "plaid"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { flag: "--background", .. }));

        let err = build_context(&args(&["-m", "size:huge|1,2"]), &config()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { flag: "--marker", .. }));
    }

    #[test]
    fn test_no_cache_flag() {
        let temp = TempDir::new().unwrap();
        let mut config = ConfigFile::default();
        config.cache.directory = Some(temp.path().to_path_buf());

        let ctx = build_context(&args(&[]), &config).unwrap();
        assert!(ctx.cache().is_some());
        let ctx = build_context(&args(&["--no-cache"]), &config).unwrap();
        assert!(ctx.cache().is_none());
    }

    #[test]
    fn test_load_config_from_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[render]\nwidth = 640\n").unwrap();

        let config = load_config(&args(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.render.width, 640);
    }

    #[tokio::test]
    async fn test_run_writes_png() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.ini");
        std::fs::write(&config_path, "[cache]\nenabled = false\n").unwrap();
        let output = temp.path().join("out.png");

        run(args(&[
            "--config",
            config_path.to_str().unwrap(),
            "-t",
            "none",
            "--width",
            "120",
            "--height",
            "80",
            "--background",
            "#336699",
            "-c",
            "48.0,8.0",
            "-z",
            "10",
            "-o",
            output.to_str().unwrap(),
        ]))
        .await
        .unwrap();

        let img = image::open(&output).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (120, 80));
        assert_eq!(img.get_pixel(60, 40).0, [0x33, 0x66, 0x99, 255]);
    }

    #[tokio::test]
    async fn test_run_without_center_fails() {
        let err = build_context(&args(&["-t", "none"]), &config())
            .unwrap()
            .render()
            .await
            .unwrap_err();
        assert!(matches!(err, staticmaps::RenderError::NoCenter));
    }
}
