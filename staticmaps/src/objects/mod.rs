//! Vector overlays drawn on top of the map tiles.
//!
//! Every overlay implements [`MapObject`]: a geographic bounding box used for
//! automatic framing, an extra pixel margin for parts that stick out of that
//! box (pin heads, labels, stroke width), and a draw operation.
//!
//! The trait is open: applications can register their own object kinds with
//! [`Context::add_object`](crate::context::Context::add_object).
//!
//! ```ignore
//! use staticmaps::objects::{MapObject, Margin};
//!
//! struct Cross { at: LatLng }
//!
//! impl MapObject for Cross {
//!     fn bounds(&self) -> GeoRect { GeoRect::from_point(self.at) }
//!     fn extra_margin_pixels(&self) -> Margin { Margin::uniform(5.0) }
//!     fn draw(&self, canvas: &mut Canvas, t: &Transformer) { /* ... */ }
//! }
//! ```

mod area;
mod circle;
mod image_marker;
mod marker;
mod path;

pub use area::Area;
pub use circle::{Circle, EARTH_RADIUS_M};
pub use image_marker::ImageMarker;
pub use marker::{Marker, DEFAULT_MARKER_SIZE};
pub use path::Path;

use tiny_skia::PathBuilder;

use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Pixel space an object needs beyond its geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    /// Creates a margin from its four sides.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same margin on every side.
    pub const fn uniform(m: f64) -> Self {
        Self::new(m, m, m, m)
    }

    /// Side-wise maximum.
    #[must_use]
    pub fn max(&self, other: &Margin) -> Margin {
        Margin::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// A drawable overlay.
pub trait MapObject: Send + Sync {
    /// Geographic extent, excluding pixel decorations.
    fn bounds(&self) -> GeoRect;

    /// Pixel space needed around [`bounds`](Self::bounds).
    fn extra_margin_pixels(&self) -> Margin;

    /// Draws the object onto the working canvas.
    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer);
}

/// Appends a circular arc to `pb` as a polyline, angles in radians measured
/// clockwise from the positive x axis (pixel space, y down).
pub(crate) fn arc_to(pb: &mut PathBuilder, cx: f32, cy: f32, r: f32, start: f32, end: f32) {
    let steps = ((end - start).abs() * r.max(1.0) / 2.0).ceil().clamp(8.0, 256.0) as usize;
    for i in 0..=steps {
        let a = start + (end - start) * i as f32 / steps as f32;
        let (x, y) = (cx + r * a.cos(), cy + r * a.sin());
        if i == 0 && pb.is_empty() {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
}

/// Projects positions and builds a polyline, `None` for fewer than two
/// points.
pub(crate) fn polyline(
    positions: &[LatLng],
    transformer: &Transformer,
    close: bool,
) -> Option<tiny_skia::Path> {
    if positions.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    for (i, pos) in positions.iter().enumerate() {
        let (x, y) = transformer.lat_lng_to_xy(*pos);
        if i == 0 {
            pb.move_to(x as f32, y as f32);
        } else {
            pb.line_to(x as f32, y as f32);
        }
    }
    if close {
        pb.close();
    }
    pb.finish()
}
