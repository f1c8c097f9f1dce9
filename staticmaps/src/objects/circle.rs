use tiny_skia::PathBuilder;
use tracing::warn;

use super::{MapObject, Margin};
use crate::color::Color;
use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Mean earth radius used for geodesic offsets.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Circle with a radius on the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub position: LatLng,
    pub color: Color,
    pub fill: Color,
    /// Stroke width in pixels
    pub weight: f64,
    /// Radius in metres
    pub radius: f64,
}

impl Circle {
    pub fn new(position: LatLng, color: Color, fill: Color, radius: f64, weight: f64) -> Self {
        Self {
            position,
            color,
            fill,
            weight,
            radius,
        }
    }

    /// Point at `radius` metres from the center along `bearing` degrees.
    pub fn destination(&self, bearing: f64) -> LatLng {
        let delta = self.radius / EARTH_RADIUS_M;
        let theta = bearing.to_radians();
        let phi1 = self.position.lat_radians();
        let lambda1 = self.position.lng_radians();

        let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
        let lambda2 = lambda1
            + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

        LatLng::new(phi2.to_degrees(), lambda2.to_degrees())
    }
}

impl MapObject for Circle {
    fn bounds(&self) -> GeoRect {
        [0.0, 90.0, 180.0, 270.0]
            .iter()
            .fold(GeoRect::empty(), |r, b| r.add_point(self.destination(*b)))
    }

    fn extra_margin_pixels(&self) -> Margin {
        Margin::uniform(self.weight * 0.5)
    }

    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer) {
        if !self.position.is_displayable() {
            warn!(position = %self.position, "Circle coordinates not displayable");
            return;
        }

        let (x, y) = transformer.lat_lng_to_xy(self.position);
        let (_, north_y) = transformer.lat_lng_to_xy(self.destination(0.0));
        let radius = (y - north_y).abs() as f32;

        let Some(path) = PathBuilder::from_circle(x as f32, y as f32, radius.max(0.5)) else {
            return;
        };
        canvas.fill_path(&path, self.fill);
        if self.weight > 0.0 {
            canvas.stroke_path(&path, self.color, self.weight as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextRenderer;
    use std::sync::Arc;

    #[test]
    fn test_destination_north_one_degree() {
        // One degree of arc is ~111.195 km on the mean sphere.
        let c = Circle::new(LatLng::new(0.0, 0.0), Color::RED, Color::TRANSPARENT, 111_195.0, 1.0);
        let north = c.destination(0.0);
        assert!((north.lat - 1.0).abs() < 1e-3);
        assert!(north.lng.abs() < 1e-9);
    }

    #[test]
    fn test_bounds_symmetric_around_center() {
        let c = Circle::new(LatLng::new(48.0, 8.0), Color::RED, Color::TRANSPARENT, 10_000.0, 2.0);
        let b = c.bounds();
        assert!(b.contains(LatLng::new(48.0, 8.0)));
        let center = b.center();
        assert!((center.lng - 8.0).abs() < 1e-9);
        assert!((center.lat - 48.0).abs() < 1e-3);
        assert!(b.lat_span() > 0.17 && b.lat_span() < 0.19);
    }

    #[test]
    fn test_draw_fills_interior() {
        let center = LatLng::new(48.0, 8.0);
        let t = Transformer::new(200, 200, 12, center, 256);
        let (w, h) = t.pixel_size();
        let mut canvas =
            Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap();
        Circle::new(center, Color::BLUE, Color::RED, 1_000.0, 2.0).draw(&mut canvas, &t);

        let (x, y) = t.lat_lng_to_xy(center);
        assert_eq!(canvas.pixel(x as u32, y as u32), Some(Color::RED));
        assert_eq!(canvas.pixel(0, 0).map(|p| p.a), Some(0));
    }
}
