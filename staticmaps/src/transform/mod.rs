//! Geodetic to pixel coordinate engine.
//!
//! A [`Transformer`] is built once per render from the viewport size, zoom,
//! center and provider tile size. It describes the grid of whole tiles that
//! covers the viewport (the "working canvas") and maps points between
//! latitude/longitude and pixel positions on that grid.
//!
//! # Example
//!
//! ```
//! use staticmaps::coord::LatLng;
//! use staticmaps::transform::Transformer;
//!
//! let t = Transformer::new(640, 480, 10, LatLng::new(48.0, 7.8), 256);
//! let (x, y) = t.lat_lng_to_xy(LatLng::new(48.0, 7.8));
//! assert_eq!(x.round() as i32, t.pixel_center().0);
//! assert_eq!(y.round() as i32, t.pixel_center().1);
//! ```

use crate::coord::{self, GeoRect, LatLng};

/// Immutable viewport description for one render.
///
/// Tile-space quantities are prefixed `t_`, pixel-space ones `p_`. Pixel
/// coordinates are relative to the top-left corner of the tile grid, not of
/// the cropped output.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    zoom: u32,
    tile_size: u32,
    num_tiles: f64,
    width: u32,
    height: u32,

    t_center_x: f64,
    t_center_y: f64,
    t_origin_x: i64,
    t_origin_y: i64,
    t_count_x: u32,
    t_count_y: u32,

    p_width: u32,
    p_height: u32,
    p_center_x: i32,
    p_center_y: i32,
    p_min_x: i32,
    p_max_x: i32,
}

impl Transformer {
    /// Builds the transformer for a viewport.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Requested output size in pixels
    /// * `zoom` - Zoom level
    /// * `center` - Geographic center of the output
    /// * `tile_size` - Edge length of one provider tile in pixels
    pub fn new(width: u32, height: u32, zoom: u32, center: LatLng, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        let ts = f64::from(tile_size);
        let (t_center_x, t_center_y) = coord::to_fractional_tile(center, zoom);

        let ww = f64::from(width) / ts;
        let hh = f64::from(height) / ts;

        let t_origin_x = (t_center_x - 0.5 * ww).floor() as i64;
        let t_origin_y = (t_center_y - 0.5 * hh).floor() as i64;

        let t_count_x = (1 + (t_center_x + 0.5 * ww).floor() as i64 - t_origin_x) as u32;
        let t_count_y = (1 + (t_center_y + 0.5 * hh).floor() as i64 - t_origin_y) as u32;

        let p_center_x = ((t_center_x - t_origin_x as f64) * ts) as i32;
        let p_center_y = ((t_center_y - t_origin_y as f64) * ts) as i32;

        let p_min_x = p_center_x - (width / 2) as i32;
        let p_max_x = p_min_x + width as i32;

        Self {
            zoom,
            tile_size,
            num_tiles: coord::tiles_per_axis(zoom),
            width,
            height,
            t_center_x,
            t_center_y,
            t_origin_x,
            t_origin_y,
            t_count_x,
            t_count_y,
            p_width: t_count_x * tile_size,
            p_height: t_count_y * tile_size,
            p_center_x,
            p_center_y,
            p_min_x,
            p_max_x,
        }
    }

    /// Projects a point onto the tile grid.
    ///
    /// Horizontal positions outside the output window are shifted by whole
    /// world widths until they land inside it, so geometry crossing the
    /// antimeridian stays contiguous.
    pub fn lat_lng_to_xy(&self, point: LatLng) -> (f64, f64) {
        let (tx, ty) = coord::to_fractional_tile(point, self.zoom);
        let ts = f64::from(self.tile_size);

        let mut x = f64::from(self.p_center_x) + (tx - self.t_center_x) * ts;
        let y = f64::from(self.p_center_y) + (ty - self.t_center_y) * ts;

        let world = self.world_width();
        let min = f64::from(self.p_min_x);
        let max = f64::from(self.p_max_x);
        if x < min {
            // first representative at or right of min
            x = min + (x - min).rem_euclid(world);
        } else if x >= max {
            // last representative left of max
            x = max - world + (x - max).rem_euclid(world);
        }

        (x, y)
    }

    /// Inverse of [`lat_lng_to_xy`](Self::lat_lng_to_xy), without undoing the
    /// wraparound shift.
    ///
    /// A pixel that was shifted by one world width comes back with its
    /// longitude offset by 360°.
    pub fn xy_to_lat_lng(&self, x: f64, y: f64) -> LatLng {
        let ts = f64::from(self.tile_size);
        let tx = (x - f64::from(self.p_center_x)) / ts + self.t_center_x;
        let ty = (y - f64::from(self.p_center_y)) / ts + self.t_center_y;
        coord::fractional_tile_to_lat_lng(tx, ty, self.zoom)
    }

    /// Geographic area covered by the full, uncropped tile grid.
    pub fn rect(&self) -> GeoRect {
        let nw = coord::fractional_tile_to_lat_lng(
            self.t_origin_x as f64,
            self.t_origin_y as f64,
            self.zoom,
        );
        let se = coord::fractional_tile_to_lat_lng(
            (self.t_origin_x + i64::from(self.t_count_x)) as f64,
            (self.t_origin_y + i64::from(self.t_count_y)) as f64,
            self.zoom,
        );
        GeoRect::from_corners(nw, se)
    }

    /// Zoom level.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles per axis at this zoom (`2^zoom`).
    pub fn tiles_per_axis(&self) -> f64 {
        self.num_tiles
    }

    /// Pixel width of one copy of the world at this zoom.
    pub fn world_width(&self) -> f64 {
        self.num_tiles * f64::from(self.tile_size)
    }

    /// Requested output size.
    pub fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the working canvas (tile count times tile size).
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.p_width, self.p_height)
    }

    /// Pixel position of the viewport center on the tile grid.
    pub fn pixel_center(&self) -> (i32, i32) {
        (self.p_center_x, self.p_center_y)
    }

    /// Fractional tile-space position of the viewport center.
    pub fn tile_center(&self) -> (f64, f64) {
        (self.t_center_x, self.t_center_y)
    }

    /// Index of the top-left tile of the grid (not normalized).
    pub fn tile_origin(&self) -> (i64, i64) {
        (self.t_origin_x, self.t_origin_y)
    }

    /// Number of tiles in each axis of the grid.
    pub fn tile_count(&self) -> (u32, u32) {
        (self.t_count_x, self.t_count_y)
    }

    /// Horizontal pixel window `[min, max)` used for wraparound correction.
    pub fn pixel_x_bounds(&self) -> (i32, i32) {
        (self.p_min_x, self.p_max_x)
    }

    /// Top-left pixel of the output window inside the working canvas.
    pub fn crop_origin(&self) -> (i32, i32) {
        (
            self.p_center_x - (self.width / 2) as i32,
            self.p_center_y - (self.height / 2) as i32,
        )
    }
}
