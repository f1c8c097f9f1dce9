//! Parsers for the pipe-delimited object strings used on the command line.
//!
//! A string is a list of `|`-separated tokens. `key:value` tokens change the
//! settings for everything that follows; bare `lat,lng` tokens place
//! geometry:
//!
//! ```text
//! color:blue|size:small|label:A|48.1,7.8|label:B|48.2,7.9
//! ```
//!
//! [`parse_marker_string`] above yields two small blue markers labelled `A`
//! and `B`.

mod objects;

pub use objects::{
    parse_area_string, parse_circle_string, parse_image_marker_string, parse_marker_string,
    parse_path_string,
};

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::color::ColorError;
use crate::coord::{GeoRect, LatLng};

/// Errors from the object string parsers.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Token is neither a known key nor a `lat,lng` pair
    #[error("Invalid coordinates: '{0}'")]
    InvalidCoordinates(String),

    /// Bounding box is not `nwlat,nwlng|selat,selng`
    #[error("Invalid bounding box: '{0}'")]
    InvalidBoundingBox(String),

    /// Value of a color key does not parse
    #[error("Invalid color for '{key}': {source}")]
    InvalidColor {
        key: String,
        #[source]
        source: ColorError,
    },

    /// Value of a numeric key does not parse
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidNumber { key: String, value: String },

    /// Coordinates given before any `image:` key
    #[error("Cannot create an image marker without an image: '{0}'")]
    MissingImage(String),

    /// The image file could not be loaded
    #[error("Failed to load image '{path}': {reason}")]
    Image { path: String, reason: String },
}

fn lat_lng_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // signed decimal, comma, signed decimal; whitespace around each part
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))\s*,\s*([+-]?(?:\d+\.?\d*|\.\d+))\s*$")
            .expect("valid coordinate pattern")
    })
}

/// Parses `"lat,lng"` in decimal degrees.
///
/// Latitude must be within ±90° and longitude within ±180°.
pub fn parse_lat_lng(s: &str) -> Result<LatLng, ParseError> {
    let invalid = || ParseError::InvalidCoordinates(s.to_string());
    let caps = lat_lng_pattern().captures(s).ok_or_else(invalid)?;
    let lat: f64 = caps[1].parse().map_err(|_| invalid())?;
    let lng: f64 = caps[2].parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }
    Ok(LatLng::new(lat, lng))
}

/// Parses `"nwlat,nwlng|selat,selng"`.
pub fn parse_bounding_box(s: &str) -> Result<GeoRect, ParseError> {
    let invalid = || ParseError::InvalidBoundingBox(s.to_string());
    let (nw, se) = s.split_once('|').ok_or_else(invalid)?;
    let nw = parse_lat_lng(nw).map_err(|_| invalid())?;
    let se = parse_lat_lng(se).map_err(|_| invalid())?;
    Ok(GeoRect::from_corners(nw, se))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lat_lng() {
        assert_eq!(parse_lat_lng("48.1,7.8").unwrap(), LatLng::new(48.1, 7.8));
        assert_eq!(
            parse_lat_lng("  -33.9 ,  +18.4 ").unwrap(),
            LatLng::new(-33.9, 18.4)
        );
        assert_eq!(parse_lat_lng("0,.5").unwrap(), LatLng::new(0.0, 0.5));
        assert_eq!(parse_lat_lng("10.,-20").unwrap(), LatLng::new(10.0, -20.0));
    }

    #[test]
    fn test_parse_lat_lng_rejects_garbage() {
        for s in ["", "48.1", "48.1;7.8", "a,b", "48.1,7.8,3", "91,0", "0,181", "1e3,2"] {
            assert!(
                matches!(parse_lat_lng(s), Err(ParseError::InvalidCoordinates(_))),
                "{}",
                s
            );
        }
    }

    #[test]
    fn test_parse_bounding_box() {
        let b = parse_bounding_box("53.6,9.8|53.4,10.2").unwrap();
        assert_eq!(b.north_west(), LatLng::new(53.6, 9.8));
        assert_eq!(b.south_east(), LatLng::new(53.4, 10.2));
    }

    #[test]
    fn test_parse_bounding_box_needs_two_corners() {
        assert!(matches!(
            parse_bounding_box("53.6,9.8"),
            Err(ParseError::InvalidBoundingBox(_))
        ));
        assert!(matches!(
            parse_bounding_box("53.6,9.8|x"),
            Err(ParseError::InvalidBoundingBox(_))
        ));
    }
}
