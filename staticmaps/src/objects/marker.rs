use tiny_skia::PathBuilder;
use tracing::warn;

use super::{arc_to, MapObject, Margin};
use crate::color::Color;
use crate::coord::{GeoRect, LatLng};
use crate::render::Canvas;
use crate::transform::Transformer;

/// Pin height of a `mid` marker.
pub const DEFAULT_MARKER_SIZE: f64 = 16.0;

const LABEL_FONT_SIZE: f32 = 12.0;

/// Teardrop pin with its tip on a position and an optional text label in
/// the head.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub color: Color,
    /// Pin height in pixels
    pub size: f64,
    pub label: Option<String>,
    pub label_color: Color,
    /// Horizontal label anchor as a fraction of the label width
    pub label_x_offset: f32,
    /// Vertical label anchor as a fraction of the label height
    pub label_y_offset: f32,
}

impl Marker {
    /// Creates an unlabelled marker. The label color follows the fill.
    pub fn new(position: LatLng, color: Color, size: f64) -> Self {
        Self {
            position,
            color,
            size,
            label: None,
            label_color: color.contrasting(),
            label_x_offset: 0.5,
            label_y_offset: 0.5,
        }
    }

    /// Sets the label text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overrides the label color.
    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    /// Sets the label anchor fractions.
    pub fn with_label_offsets(mut self, x: f32, y: f32) -> Self {
        self.label_x_offset = x;
        self.label_y_offset = y;
        self
    }
}

impl MapObject for Marker {
    fn bounds(&self) -> GeoRect {
        GeoRect::from_point(self.position)
    }

    fn extra_margin_pixels(&self) -> Margin {
        let half = self.size * 0.5 + 1.0;
        Margin::new(half, 1.5 * self.size + 1.0, half, 1.0)
    }

    fn draw(&self, canvas: &mut Canvas, transformer: &Transformer) {
        if !self.position.is_displayable() {
            warn!(position = %self.position, "Marker coordinates not displayable");
            return;
        }

        let (x, y) = transformer.lat_lng_to_xy(self.position);
        let (x, y) = (x as f32, y as f32);
        let size = self.size as f32;
        let head_y = y - size;

        let mut pb = PathBuilder::new();
        arc_to(
            &mut pb,
            x,
            head_y,
            size * 0.5,
            150f32.to_radians(),
            390f32.to_radians(),
        );
        pb.line_to(x, y);
        pb.close();
        let Some(pin) = pb.finish() else {
            return;
        };

        canvas.fill_path(&pin, self.color);
        canvas.stroke_path(&pin, Color::BLACK, 1.0);

        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            canvas.draw_text_anchored(
                label,
                x,
                head_y,
                self.label_x_offset,
                self.label_y_offset,
                LABEL_FONT_SIZE,
                self.label_color,
            );
        }
    }
}
