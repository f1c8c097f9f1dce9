//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Value of `--type` that lists the built-in providers.
pub const LIST_PROVIDERS: &str = "list";

#[derive(Debug, Parser)]
#[command(name = "create-static-map", version)]
#[command(about = "Create a static map image from web map tiles", long_about = None)]
pub struct Args {
    /// Image width in pixels (default from config, else 512)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (default from config, else 512)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output PNG file
    #[arg(short, long, default_value = "map.png")]
    pub output: PathBuf,

    /// Tile provider name, or `list` to show all providers
    #[arg(short = 't', long = "type")]
    pub map_type: Option<String>,

    /// Map center as `lat,lng`
    #[arg(short, long, allow_hyphen_values = true)]
    pub center: Option<String>,

    /// Zoom level
    #[arg(short, long)]
    pub zoom: Option<u32>,

    /// Bounding box as `nwlat,nwlng|selat,selng`
    #[arg(short, long, allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// Background color shown where no tile is drawn
    #[arg(long)]
    pub background: Option<String>,

    /// User agent sent to the tile server
    #[arg(short = 'u', long = "useragent")]
    pub user_agent: Option<String>,

    /// Marker: `color:red|size:small|label:A|lat,lng|...`
    #[arg(short, long, allow_hyphen_values = true)]
    pub marker: Vec<String>,

    /// Image marker: `image:pin.png|offsetx:8|offsety:24|lat,lng|...`
    #[arg(short = 'i', long = "imagemarker", allow_hyphen_values = true)]
    pub image_marker: Vec<String>,

    /// Path: `color:blue|weight:3|lat,lng|lat,lng|...`
    #[arg(short, long, allow_hyphen_values = true)]
    pub path: Vec<String>,

    /// Area: `color:red|fill:#ff000040|weight:2|lat,lng|...`
    #[arg(short, long, allow_hyphen_values = true)]
    pub area: Vec<String>,

    /// Circle: `color:green|fill:#00ff0040|radius:500|lat,lng|...`
    #[arg(short = 'C', long, allow_hyphen_values = true)]
    pub circle: Vec<String>,

    /// Overlay tile provider, drawn above the base layer
    #[arg(long)]
    pub overlay: Vec<String>,

    /// API key for providers that need one
    #[arg(long)]
    pub api_key: Option<String>,

    /// Replace the provider's attribution caption
    #[arg(long)]
    pub attribution: Option<String>,

    /// Do not read or write the tile cache
    #[arg(long)]
    pub no_cache: bool,

    /// Never contact the tile server
    #[arg(long)]
    pub offline: bool,

    /// Configuration file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// True when `--type list` was given.
    pub fn lists_providers(&self) -> bool {
        self.map_type.as_deref() == Some(LIST_PROVIDERS)
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
