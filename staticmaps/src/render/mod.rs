//! Raster drawing: the working canvas, text, and the attribution caption.

mod canvas;
mod text;

pub use canvas::{pixmap_from_rgba, Canvas};
pub use text::TextRenderer;

use crate::color::Color;

/// Font size of the attribution caption in pixels.
pub const ATTRIBUTION_FONT_SIZE: f32 = 12.0;

/// Distance between consecutive caption baselines, relative to the font
/// height.
pub const ATTRIBUTION_LINE_SPACING: f32 = 1.25;

/// Padding between the caption text and the image edges.
const ATTRIBUTION_PADDING: f32 = 4.0;

/// Height of a block of `lines` text lines of height `line_height`.
pub fn multiline_height(lines: usize, line_height: f32, spacing: f32) -> f32 {
    if lines == 0 {
        return 0.0;
    }
    lines as f32 * line_height * spacing - (spacing - 1.0) * line_height
}

/// Height of the caption band drawn for `text`, zero when nothing is drawn.
pub fn attribution_height(text: &str) -> f32 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let lines = text.lines().count();
    multiline_height(lines, ATTRIBUTION_FONT_SIZE, ATTRIBUTION_LINE_SPACING) + ATTRIBUTION_PADDING
}

/// Draws the attribution caption along the bottom of the canvas.
///
/// A half-transparent black band spans the full width; each line of `text`
/// is drawn left-aligned in translucent white. Empty text draws nothing.
pub fn draw_attribution(canvas: &mut Canvas, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let lines: Vec<&str> = text.lines().collect();
    let (_, line_height) = canvas.measure_text("", ATTRIBUTION_FONT_SIZE);
    let text_height = multiline_height(lines.len(), line_height, ATTRIBUTION_LINE_SPACING);
    let box_height = text_height + ATTRIBUTION_PADDING;

    let width = canvas.width() as f32;
    let height = canvas.height() as f32;
    canvas.fill_rect(
        0.0,
        height - box_height,
        width,
        box_height,
        Color::rgba(0, 0, 0, 128),
    );

    let fg = Color::rgba(255, 255, 255, 191);
    let last_baseline = height - ATTRIBUTION_PADDING;
    for (i, line) in lines.iter().enumerate() {
        let lines_below = (lines.len() - 1 - i) as f32;
        let baseline = last_baseline - lines_below * line_height * ATTRIBUTION_LINE_SPACING;
        canvas.draw_text(line, ATTRIBUTION_PADDING, baseline, ATTRIBUTION_FONT_SIZE, fg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn white_canvas(w: u32, h: u32) -> Canvas {
        let mut c =
            Canvas::with_text_renderer(w, h, Arc::new(TextRenderer::without_font())).unwrap();
        c.fill(Color::WHITE);
        c
    }

    #[test]
    fn test_multiline_height() {
        assert_eq!(multiline_height(0, 12.0, 1.25), 0.0);
        assert_eq!(multiline_height(1, 12.0, 1.25), 12.0);
        assert_eq!(multiline_height(2, 12.0, 1.25), 27.0);
    }

    #[test]
    fn test_attribution_height() {
        assert_eq!(attribution_height(""), 0.0);
        assert_eq!(attribution_height("(c) someone"), 16.0);
        assert_eq!(attribution_height("a\nb"), 31.0);
    }

    #[test]
    fn test_attribution_band_single_line() {
        let mut c = white_canvas(100, 50);
        draw_attribution(&mut c, "(c) someone");

        // band is 12 + 4 px tall
        let inside = c.pixel(50, 49).unwrap();
        let above = c.pixel(50, 50 - 17).unwrap();
        assert!(inside.r < 140);
        assert_eq!(above, Color::WHITE);
    }

    #[test]
    fn test_attribution_band_grows_with_lines() {
        let mut c = white_canvas(100, 60);
        draw_attribution(&mut c, "line one\nline two");

        // 27 + 4 px tall
        assert!(c.pixel(0, 60 - 31).unwrap().r < 140);
        assert_eq!(c.pixel(0, 60 - 33).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_empty_attribution_draws_nothing() {
        let mut c = white_canvas(10, 10);
        draw_attribution(&mut c, "");
        assert_eq!(c.pixel(5, 9), Some(Color::WHITE));
    }
}
