//! The drawing surface shared by tile layers and map objects.

use std::sync::Arc;

use image::RgbaImage;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, Path, Pixmap, PixmapPaint,
    Rect, Stroke, Transform,
};

use super::text::TextRenderer;
use crate::color::Color;
use crate::context::RenderError;

/// Premultiplied RGBA pixel buffer with drawing helpers.
pub struct Canvas {
    pixmap: Pixmap,
    text: Arc<TextRenderer>,
}

impl Canvas {
    /// Allocates a transparent canvas using the system font for text.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_text_renderer(width, height, TextRenderer::system())
    }

    /// Allocates a transparent canvas with a specific text renderer.
    pub fn with_text_renderer(
        width: u32,
        height: u32,
        text: Arc<TextRenderer>,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Canvas(format!("cannot allocate {}x{} pixmap", width, height)))?;
        Ok(Self { pixmap, text })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Direct access to the backing pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Mutable access to the backing pixmap, for custom drawing.
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Replaces every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Blends a solid rectangle over the canvas.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint(color), Transform::identity(), None);
    }

    /// Blends an RGBA image over the canvas with its top-left corner at
    /// `(x, y)`. Parts outside the canvas are clipped.
    pub fn draw_image(&mut self, img: &RgbaImage, x: i32, y: i32) {
        let Some(src) = pixmap_from_rgba(img) else {
            return;
        };
        self.pixmap.draw_pixmap(
            x,
            y,
            src.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Fills a closed path (non-zero winding).
    pub fn fill_path(&mut self, path: &Path, color: Color) {
        self.pixmap.fill_path(
            path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Strokes a path with round caps and joins.
    pub fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Width and height of one line of text.
    pub fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        self.text.measure(text, size)
    }

    /// Draws text with its baseline starting at `(x, y)`.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.text.draw(&mut self.pixmap, text, x, y, size, color);
    }

    /// Draws text positioned relative to an anchor point.
    ///
    /// `ax`/`ay` are fractions of the measured text size: `(0.5, 0.5)` centers
    /// the text on `(x, y)`, `(0, 0)` puts the baseline start there.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_anchored(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        ax: f32,
        ay: f32,
        size: f32,
        color: Color,
    ) {
        let (w, h) = self.measure_text(text, size);
        self.draw_text(text, x - ax * w, y + ay * h, size, color);
    }

    /// Copies a `width` x `height` window starting at `(x, y)` into a new
    /// canvas. Areas outside this canvas come out transparent.
    pub fn crop(&self, x: i32, y: i32, width: u32, height: u32) -> Result<Canvas, RenderError> {
        let mut out = Canvas::with_text_renderer(width, height, Arc::clone(&self.text))?;
        let copy = PixmapPaint {
            blend_mode: BlendMode::Source,
            ..PixmapPaint::default()
        };
        out.pixmap.draw_pixmap(
            -x,
            -y,
            self.pixmap.as_ref(),
            &copy,
            Transform::identity(),
            None,
        );
        Ok(out)
    }

    /// Demultiplied RGBA pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // Pixmap::pixel only checks the linear index
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Converts to a straight-alpha image.
    pub fn into_rgba_image(self) -> Result<RgbaImage, RenderError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut data = self.pixmap.take();
        for px in data.chunks_exact_mut(4) {
            let c = tiny_skia::PremultipliedColorU8::from_rgba(px[0], px[1], px[2], px[3])
                .map(|p| p.demultiply());
            if let Some(c) = c {
                px.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| RenderError::Canvas("pixel buffer size mismatch".to_string()))
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Converts a straight-alpha image into a premultiplied pixmap.
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for px in img.pixels() {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap()
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(RenderError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_and_read_back() {
        let mut c = canvas(4, 4);
        c.fill(Color::WHITE);
        assert_eq!(c.pixel(3, 3), Some(Color::WHITE));
        assert_eq!(c.pixel(4, 0), None);
    }

    #[test]
    fn test_pixel_past_row_end_does_not_wrap() {
        let mut c = canvas(4, 3);
        c.fill_rect(0.0, 1.0, 4.0, 1.0, Color::RED);
        assert_eq!(c.pixel(0, 1), Some(Color::RED));
        // (4, 0) would alias (0, 1) through the linear index
        assert_eq!(c.pixel(4, 0), None);
        assert_eq!(c.pixel(7, 0), None);
        assert_eq!(c.pixel(0, 3), None);
    }

    #[test]
    fn test_draw_image_at_offset() {
        let mut c = canvas(8, 8);
        let tile = RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
        c.draw_image(&tile, 4, 4);
        assert_eq!(c.pixel(5, 5), Some(Color::RED));
        assert_eq!(c.pixel(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_draw_image_clips_negative_offset() {
        let mut c = canvas(4, 4);
        let tile = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
        c.draw_image(&tile, -2, -2);
        assert_eq!(c.pixel(1, 1), Some(Color::BLUE));
        assert_eq!(c.pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_crop_window() {
        let mut c = canvas(10, 10);
        c.fill(Color::WHITE);
        c.fill_rect(5.0, 5.0, 5.0, 5.0, Color::BLACK);
        let cropped = c.crop(4, 4, 3, 3).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (3, 3));
        assert_eq!(cropped.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(cropped.pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_into_rgba_image_demultiplies() {
        let mut c = canvas(2, 2);
        c.fill(Color::rgba(255, 0, 0, 128));
        let img = c.into_rgba_image().unwrap();
        let px = img.get_pixel(0, 0).0;
        assert_eq!(px[3], 128);
        assert!(px[0] >= 254);
        assert_eq!(px[1], 0);
    }

    #[test]
    fn test_semi_transparent_rect_blends() {
        let mut c = canvas(2, 2);
        c.fill(Color::WHITE);
        c.fill_rect(0.0, 0.0, 2.0, 2.0, Color::rgba(0, 0, 0, 128));
        let p = c.pixel(0, 0).unwrap();
        assert_eq!(p.a, 255);
        assert!(p.r > 120 && p.r < 135);
    }
}
