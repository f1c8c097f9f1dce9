use tracing::{debug, warn};

use super::{polyline, MapObject, Margin};
use crate::color::Color;
use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Closed polygon, filled then outlined.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub positions: Vec<LatLng>,
    pub color: Color,
    pub fill: Color,
    /// Outline width in pixels
    pub weight: f64,
}

impl Area {
    pub fn new(positions: Vec<LatLng>, color: Color, fill: Color, weight: f64) -> Self {
        Self {
            positions,
            color,
            fill,
            weight,
        }
    }
}

impl MapObject for Area {
    fn bounds(&self) -> GeoRect {
        GeoRect::from_points(&self.positions)
    }

    fn extra_margin_pixels(&self) -> Margin {
        Margin::uniform(self.weight)
    }

    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer) {
        if let Some(bad) = self.positions.iter().find(|p| !p.is_displayable()) {
            warn!(position = %bad, "Area coordinates not displayable");
            return;
        }
        let Some(outline) = polyline(&self.positions, transformer, true) else {
            debug!(points = self.positions.len(), "Skipping area with fewer than two points");
            return;
        };
        canvas.fill_path(&outline, self.fill);
        if self.weight > 0.0 {
            canvas.stroke_path(&outline, self.color, self.weight as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextRenderer;
    use std::sync::Arc;

    fn triangle() -> Vec<LatLng> {
        vec![
            LatLng::new(1.0, -1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(-1.0, 0.0),
        ]
    }

    #[test]
    fn test_margin_is_weight() {
        let a = Area::new(triangle(), Color::RED, Color::TRANSPARENT, 3.0);
        assert_eq!(a.extra_margin_pixels(), Margin::uniform(3.0));
    }

    #[test]
    fn test_draw_fills_interior_and_strokes_edge() {
        let t = Transformer::new(256, 256, 6, LatLng::new(0.3, 0.0), 256);
        let (w, h) = t.pixel_size();
        let mut c =
            Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap();
        Area::new(triangle(), Color::RED, Color::rgb(255, 255, 0), 3.0).draw(&mut c, &t);

        let (x, y) = t.lat_lng_to_xy(LatLng::new(0.3, 0.0));
        assert_eq!(c.pixel(x as u32, y as u32), Some(Color::rgb(255, 255, 0)));

        let (ex, ey) = t.lat_lng_to_xy(LatLng::new(1.0, 0.0));
        assert_eq!(c.pixel(ex as u32, ey as u32), Some(Color::RED));
    }
}
