//! Text shaping and rasterization.
//!
//! A sans-serif system font is located once per process with `fontdb`, text
//! is shaped with `rustybuzz`, and the glyph outlines are filled as
//! `tiny-skia` paths. Hosts without any usable font still get sensible text
//! metrics, but nothing is drawn.

use std::sync::{Arc, OnceLock};

use rustybuzz::ttf_parser::{GlyphId, OutlineBuilder};
use rustybuzz::UnicodeBuffer;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

use crate::color::Color;

/// Advance width per character, relative to the font size, when no font is
/// available.
const FALLBACK_ADVANCE: f32 = 0.6;

struct FontFace {
    data: Vec<u8>,
    index: u32,
}

/// Shapes and draws single lines of text.
pub struct TextRenderer {
    face: Option<FontFace>,
}

static SYSTEM: OnceLock<Arc<TextRenderer>> = OnceLock::new();

impl TextRenderer {
    /// Process-wide renderer backed by the system sans-serif font.
    pub fn system() -> Arc<TextRenderer> {
        Arc::clone(SYSTEM.get_or_init(|| Arc::new(Self::load_system())))
    }

    /// Renderer backed by font file bytes, `None` if they are not a font.
    pub fn from_font_data(data: Vec<u8>, index: u32) -> Option<Self> {
        rustybuzz::Face::from_slice(&data, index)?;
        Some(Self {
            face: Some(FontFace { data, index }),
        })
    }

    /// Renderer that only estimates metrics.
    pub fn without_font() -> Self {
        Self { face: None }
    }

    /// Whether a real font is loaded.
    pub fn has_font(&self) -> bool {
        self.face.is_some()
    }

    fn load_system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let face = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))
            .and_then(|id| db.with_face_data(id, |data, index| (data.to_vec(), index)));

        match face.and_then(|(data, index)| Self::from_font_data(data, index)) {
            Some(renderer) => {
                debug!(faces = db.len(), "Loaded system font");
                renderer
            }
            None => {
                warn!("No usable system font found, text will not be drawn");
                Self::without_font()
            }
        }
    }

    /// Width and height of a single line of text at `size` pixels.
    ///
    /// Height is the font size; width is the sum of shaped advances.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let Some(face) = self.face.as_ref().and_then(FontFace::parse) else {
            return (text.chars().count() as f32 * size * FALLBACK_ADVANCE, size);
        };
        let scale = size / face.units_per_em() as f32;
        let glyphs = shape(&face, text);
        let advance: i32 = glyphs.glyph_positions().iter().map(|p| p.x_advance).sum();
        (advance as f32 * scale, size)
    }

    /// Fills `text` with its baseline starting at `(x, y)`.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, size: f32, color: Color) {
        if text.is_empty() {
            return;
        }
        let Some(face) = self.face.as_ref().and_then(FontFace::parse) else {
            debug!(text = text, "Skipping text, no font loaded");
            return;
        };

        let scale = size / face.units_per_em() as f32;
        let glyphs = shape(&face, text);
        let mut outline = GlyphOutline {
            builder: PathBuilder::new(),
            scale,
            x,
            y,
        };
        for (info, pos) in glyphs.glyph_infos().iter().zip(glyphs.glyph_positions()) {
            let origin_x = outline.x;
            outline.x += pos.x_offset as f32 * scale;
            outline.y = y - pos.y_offset as f32 * scale;
            face.outline_glyph(GlyphId(info.glyph_id as u16), &mut outline);
            outline.x = origin_x + pos.x_advance as f32 * scale;
        }

        let Some(path) = outline.builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

impl FontFace {
    fn parse(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }
}

fn shape(face: &rustybuzz::Face<'_>, text: &str) -> rustybuzz::GlyphBuffer {
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();
    rustybuzz::shape(face, &[], buffer)
}

/// Collects glyph outlines in pixel space (y down).
struct GlyphOutline {
    builder: PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl GlyphOutline {
    fn map(&self, gx: f32, gy: f32) -> (f32, f32) {
        (self.x + gx * self.scale, self.y - gy * self.scale)
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_metrics() {
        let r = TextRenderer::without_font();
        assert!(!r.has_font());
        let (w, h) = r.measure("abcd", 10.0);
        assert!((w - 24.0).abs() < 1e-4);
        assert_eq!(h, 10.0);
    }

    #[test]
    fn test_fallback_draw_is_noop() {
        let r = TextRenderer::without_font();
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        r.draw(&mut pixmap, "x", 2.0, 15.0, 12.0, Color::BLACK);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_invalid_font_data_rejected() {
        assert!(TextRenderer::from_font_data(vec![0, 1, 2, 3], 0).is_none());
    }

    #[test]
    fn test_system_renderer_measures_wider_text_wider() {
        let r = TextRenderer::system();
        let (short, _) = r.measure("ab", 12.0);
        let (long, _) = r.measure("abcdefgh", 12.0);
        assert!(long > short);
    }

    #[test]
    fn test_system_renderer_draws_when_font_present() {
        let r = TextRenderer::system();
        if !r.has_font() {
            return;
        }
        let mut pixmap = Pixmap::new(80, 30).unwrap();
        r.draw(&mut pixmap, "Map", 4.0, 22.0, 18.0, Color::BLACK);
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
