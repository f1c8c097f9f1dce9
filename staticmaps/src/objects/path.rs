use tracing::{debug, warn};

use super::{polyline, MapObject, Margin};
use crate::color::Color;
use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Open polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub positions: Vec<LatLng>,
    pub color: Color,
    /// Line width in pixels
    pub weight: f64,
}

impl Path {
    pub fn new(positions: Vec<LatLng>, color: Color, weight: f64) -> Self {
        Self {
            positions,
            color,
            weight,
        }
    }
}

impl MapObject for Path {
    fn bounds(&self) -> GeoRect {
        GeoRect::from_points(&self.positions)
    }

    fn extra_margin_pixels(&self) -> Margin {
        Margin::uniform(self.weight * 0.5)
    }

    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer) {
        if let Some(bad) = self.positions.iter().find(|p| !p.is_displayable()) {
            warn!(position = %bad, "Path coordinates not displayable");
            return;
        }
        let Some(line) = polyline(&self.positions, transformer, false) else {
            debug!(points = self.positions.len(), "Skipping path with fewer than two points");
            return;
        };
        canvas.stroke_path(&line, self.color, self.weight as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextRenderer;
    use std::sync::Arc;

    fn canvas_for(t: &Transformer) -> Canvas {
        let (w, h) = t.pixel_size();
        Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap()
    }

    #[test]
    fn test_margin_is_half_weight() {
        let p = Path::new(vec![], Color::RED, 6.0);
        assert_eq!(p.extra_margin_pixels(), Margin::uniform(3.0));
    }

    #[test]
    fn test_bounds_cover_all_positions() {
        let p = Path::new(
            vec![LatLng::new(48.1, 7.0), LatLng::new(48.9, 8.0), LatLng::new(47.9, 7.5)],
            Color::BLUE,
            4.0,
        );
        let b = p.bounds();
        assert_eq!(b.north_west(), LatLng::new(48.9, 7.0));
        assert_eq!(b.south_east(), LatLng::new(47.9, 8.0));
    }

    #[test]
    fn test_draw_strokes_midpoint() {
        let a = LatLng::new(0.0, -0.1);
        let b = LatLng::new(0.0, 0.1);
        let t = Transformer::new(256, 256, 10, LatLng::new(0.0, 0.0), 256);
        let mut c = canvas_for(&t);
        Path::new(vec![a, b], Color::BLUE, 4.0).draw(&mut c, &t);

        let (x, y) = t.lat_lng_to_xy(LatLng::new(0.0, 0.0));
        assert_eq!(c.pixel(x as u32, y as u32), Some(Color::BLUE));
    }

    #[test]
    fn test_path_across_antimeridian_has_no_long_jump() {
        let t = Transformer::new(256, 256, 6, LatLng::new(0.0, 180.0), 256);
        let mut c = canvas_for(&t);
        Path::new(
            vec![LatLng::new(0.0, 179.5), LatLng::new(0.0, -179.5)],
            Color::BLUE,
            2.0,
        )
        .draw(&mut c, &t);

        let (cx, cy) = t.pixel_center();
        assert_eq!(c.pixel(cx as u32, cy as u32), Some(Color::BLUE));
        let (min, max) = t.pixel_x_bounds();
        let painted = (min.max(0)..max)
            .filter(|x| c.pixel(*x as u32, cy as u32).map_or(false, |p| p.a > 0))
            .count();
        // 1 degree at zoom 6 is about 45 px
        assert!(painted < 60, "{} px painted", painted);
    }

    #[test]
    fn test_single_point_path_draws_nothing() {
        let t = Transformer::new(64, 64, 4, LatLng::new(0.0, 0.0), 256);
        let mut c = canvas_for(&t);
        Path::new(vec![LatLng::new(0.0, 0.0)], Color::BLUE, 4.0).draw(&mut c, &t);
        assert!(c.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }
}
