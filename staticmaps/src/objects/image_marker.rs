use std::sync::Arc;

use image::RgbaImage;
use tracing::warn;

use super::{MapObject, Margin};
use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Raster image pinned to a position.
///
/// `(offset_x, offset_y)` is the pixel inside the image that sits on the
/// position, e.g. the tip of a pin icon.
#[derive(Debug, Clone)]
pub struct ImageMarker {
    pub position: LatLng,
    pub image: Arc<RgbaImage>,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ImageMarker {
    pub fn new(position: LatLng, image: Arc<RgbaImage>, offset_x: f64, offset_y: f64) -> Self {
        Self {
            position,
            image,
            offset_x,
            offset_y,
        }
    }
}

impl MapObject for ImageMarker {
    fn bounds(&self) -> GeoRect {
        GeoRect::from_point(self.position)
    }

    fn extra_margin_pixels(&self) -> Margin {
        let (w, h) = self.image.dimensions();
        Margin::new(
            self.offset_x,
            self.offset_y,
            f64::from(w) - self.offset_x,
            f64::from(h) - self.offset_y,
        )
    }

    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer) {
        if !self.position.is_displayable() {
            warn!(position = %self.position, "ImageMarker coordinates not displayable");
            return;
        }
        let (x, y) = transformer.lat_lng_to_xy(self.position);
        canvas.draw_image(
            &self.image,
            (x - self.offset_x).floor() as i32,
            (y - self.offset_y).floor() as i32,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::render::TextRenderer;

    fn icon() -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(10, 20, image::Rgba([0, 255, 0, 255])))
    }

    #[test]
    fn test_margin_from_offsets() {
        let m = ImageMarker::new(LatLng::new(1.0, 2.0), icon(), 5.0, 20.0);
        assert_eq!(m.extra_margin_pixels(), Margin::new(5.0, 20.0, 5.0, 0.0));
    }

    #[test]
    fn test_draw_places_anchor_on_position() {
        let t = Transformer::new(100, 100, 8, LatLng::new(10.0, 10.0), 256);
        let (w, h) = t.pixel_size();
        let mut c =
            Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap();
        let pos = LatLng::new(10.0, 10.0);
        ImageMarker::new(pos, icon(), 5.0, 20.0).draw(&mut c, &t);

        let (x, y) = t.lat_lng_to_xy(pos);
        let (x, y) = (x as u32, y as u32);
        assert_eq!(c.pixel(x, y - 5), Some(Color::rgb(0, 255, 0)));
        assert_eq!(c.pixel(x, y + 2).map(|p| p.a), Some(0));
    }

    #[test]
    fn test_draw_floors_fractional_origin() {
        let t = Transformer::new(100, 100, 8, LatLng::new(10.0, 10.0), 256);
        let (w, h) = t.pixel_size();
        let mut c =
            Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap();
        let pos = LatLng::new(10.0, 10.0);
        let (x, y) = t.lat_lng_to_xy(pos);

        // left edge lands at x = -0.5, so the image starts in column -1
        ImageMarker::new(pos, icon(), x + 0.5, 0.0).draw(&mut c, &t);

        let row = y as u32 + 1;
        assert_eq!(c.pixel(8, row), Some(Color::rgb(0, 255, 0)));
        assert_eq!(c.pixel(9, row).map(|p| p.a), Some(0));
    }
}
