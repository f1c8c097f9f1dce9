//! Orchestrator types

use image::RgbaImage;

use crate::coord::TileCoord;

/// A tile to fetch and where it goes on the working canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileJob {
    /// Normalized tile index
    pub tile: TileCoord,
    /// Left edge on the canvas in pixels
    pub offset_x: i32,
    /// Top edge on the canvas in pixels
    pub offset_y: i32,
}

/// A decoded tile on its way back to the drawing task.
#[derive(Debug, Clone)]
pub struct FetchedTile {
    /// Left edge on the canvas in pixels
    pub offset_x: i32,
    /// Top edge on the canvas in pixels
    pub offset_y: i32,
    /// Decoded tile image
    pub image: RgbaImage,
}

/// Outcome counters for one rendered layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Fetch tasks started
    pub dispatched: usize,
    /// Tiles drawn onto the canvas
    pub drawn: usize,
    /// Tiles the server (or offline cache) did not have
    pub not_found: usize,
    /// Tiles that failed for any other reason
    pub failed: usize,
    /// Grid cells without a valid tile index
    pub skipped: usize,
}

/// How a single fetch task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TileOutcome {
    Delivered,
    NotFound,
    Failed,
}
