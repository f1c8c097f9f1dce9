//! Object strings: markers, image markers, paths, areas and circles.

use std::str::FromStr;
use std::sync::Arc;

use super::{parse_lat_lng, ParseError};
use crate::color::Color;
use crate::objects::{Area, Circle, ImageMarker, Marker, Path, DEFAULT_MARKER_SIZE};

const DEFAULT_WEIGHT: f64 = 5.0;
const DEFAULT_CIRCLE_RADIUS: f64 = 100.0;

fn tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split('|').map(str::trim).filter(|t| !t.is_empty())
}

fn color(key: &str, value: &str) -> Result<Color, ParseError> {
    Color::from_str(value).map_err(|source| ParseError::InvalidColor {
        key: key.to_string(),
        source,
    })
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn marker_size(value: &str) -> Result<f64, ParseError> {
    match value.trim() {
        "mid" => Ok(DEFAULT_MARKER_SIZE),
        "small" => Ok(12.0),
        "tiny" => Ok(8.0),
        other => number::<f64>("size", other)
            .ok()
            .filter(|s| *s > 0.0)
            .ok_or_else(|| ParseError::InvalidNumber {
                key: "size".to_string(),
                value: value.to_string(),
            }),
    }
}

/// Parses a marker string; every coordinate yields one marker.
///
/// Keys: `color:`, `label:`, `size:` (`mid`, `small`, `tiny` or pixels),
/// `labelcolor:`, `labelxoffset:`, `labelyoffset:`.
pub fn parse_marker_string(s: &str) -> Result<Vec<Marker>, ParseError> {
    let mut markers = Vec::new();
    let mut fill = Color::RED;
    let mut size = DEFAULT_MARKER_SIZE;
    let mut label: Option<String> = None;
    let mut label_color: Option<Color> = None;
    let mut label_x = 0.5_f32;
    let mut label_y = 0.5_f32;

    for token in tokens(s) {
        if let Some(v) = token.strip_prefix("color:") {
            fill = color("color", v)?;
        } else if let Some(v) = token.strip_prefix("labelcolor:") {
            label_color = Some(color("labelcolor", v)?);
        } else if let Some(v) = token.strip_prefix("labelxoffset:") {
            label_x = number("labelxoffset", v)?;
        } else if let Some(v) = token.strip_prefix("labelyoffset:") {
            label_y = number("labelyoffset", v)?;
        } else if let Some(v) = token.strip_prefix("label:") {
            label = Some(v.to_string()).filter(|l| !l.is_empty());
        } else if let Some(v) = token.strip_prefix("size:") {
            size = marker_size(v)?;
        } else {
            let mut marker =
                Marker::new(parse_lat_lng(token)?, fill, size).with_label_offsets(label_x, label_y);
            if let Some(l) = &label {
                marker = marker.with_label(l.clone());
            }
            if let Some(c) = label_color {
                marker = marker.with_label_color(c);
            }
            markers.push(marker);
        }
    }
    Ok(markers)
}

/// Parses an image marker string; every coordinate yields one marker.
///
/// Keys: `image:<file>`, `offsetx:`, `offsety:`. A coordinate before the
/// first `image:` is an error.
pub fn parse_image_marker_string(s: &str) -> Result<Vec<ImageMarker>, ParseError> {
    let mut markers = Vec::new();
    let mut image = None;
    let mut offset_x = 0.0;
    let mut offset_y = 0.0;

    for token in tokens(s) {
        if let Some(v) = token.strip_prefix("image:") {
            let img = image::open(v).map_err(|e| ParseError::Image {
                path: v.to_string(),
                reason: e.to_string(),
            })?;
            image = Some(Arc::new(img.to_rgba8()));
        } else if let Some(v) = token.strip_prefix("offsetx:") {
            offset_x = number("offsetx", v)?;
        } else if let Some(v) = token.strip_prefix("offsety:") {
            offset_y = number("offsety", v)?;
        } else {
            let pos = parse_lat_lng(token)?;
            let img = image
                .as_ref()
                .ok_or_else(|| ParseError::MissingImage(s.to_string()))?;
            markers.push(ImageMarker::new(pos, Arc::clone(img), offset_x, offset_y));
        }
    }
    Ok(markers)
}

/// Parses a path string into one path. Keys: `color:`, `weight:`.
pub fn parse_path_string(s: &str) -> Result<Path, ParseError> {
    let mut path = Path::new(Vec::new(), Color::RED, DEFAULT_WEIGHT);
    for token in tokens(s) {
        if let Some(v) = token.strip_prefix("color:") {
            path.color = color("color", v)?;
        } else if let Some(v) = token.strip_prefix("weight:") {
            path.weight = number("weight", v)?;
        } else {
            path.positions.push(parse_lat_lng(token)?);
        }
    }
    Ok(path)
}

/// Parses an area string into one area. Keys: `color:`, `fill:`, `weight:`.
pub fn parse_area_string(s: &str) -> Result<Area, ParseError> {
    let mut area = Area::new(Vec::new(), Color::RED, Color::TRANSPARENT, DEFAULT_WEIGHT);
    for token in tokens(s) {
        if let Some(v) = token.strip_prefix("color:") {
            area.color = color("color", v)?;
        } else if let Some(v) = token.strip_prefix("fill:") {
            area.fill = color("fill", v)?;
        } else if let Some(v) = token.strip_prefix("weight:") {
            area.weight = number("weight", v)?;
        } else {
            area.positions.push(parse_lat_lng(token)?);
        }
    }
    Ok(area)
}

/// Parses a circle string; every coordinate yields one circle.
///
/// Keys: `color:`, `fill:`, `radius:` (metres), `weight:` (`width:` is
/// accepted as well).
pub fn parse_circle_string(s: &str) -> Result<Vec<Circle>, ParseError> {
    let mut circles = Vec::new();
    let mut stroke = Color::RED;
    let mut fill = Color::TRANSPARENT;
    let mut radius = DEFAULT_CIRCLE_RADIUS;
    let mut weight = DEFAULT_WEIGHT;

    for token in tokens(s) {
        if let Some(v) = token.strip_prefix("color:") {
            stroke = color("color", v)?;
        } else if let Some(v) = token.strip_prefix("fill:") {
            fill = color("fill", v)?;
        } else if let Some(v) = token.strip_prefix("radius:") {
            radius = number("radius", v)?;
        } else if let Some(v) = token
            .strip_prefix("weight:")
            .or_else(|| token.strip_prefix("width:"))
        {
            weight = number("weight", v)?;
        } else {
            circles.push(Circle::new(parse_lat_lng(token)?, stroke, fill, radius, weight));
        }
    }
    Ok(circles)
}
