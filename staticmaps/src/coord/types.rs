//! Geographic value types: points, bounding boxes and tile indices.

use std::fmt;

/// Southernmost latitude that is drawn on a map.
pub const MIN_DISPLAY_LAT: f64 = -85.0;

/// Northernmost latitude that is drawn on a map.
pub const MAX_DISPLAY_LAT: f64 = 85.0;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLng {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lng: f64,
}

impl LatLng {
    /// Creates a point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in radians.
    #[inline]
    pub fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    #[inline]
    pub fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }

    /// Whether the point can be drawn on a Web Mercator map.
    ///
    /// Mercator is undefined at the poles, so anything beyond ±85° is
    /// rejected.
    pub fn is_displayable(&self) -> bool {
        (MIN_DISPLAY_LAT..=MAX_DISPLAY_LAT).contains(&self.lat)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Axis-aligned latitude/longitude bounding box.
///
/// The rect is closed under union and has an empty identity element. The
/// longitude interval never wraps: callers that care about the antimeridian
/// normalize positions themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRect {
    lat_lo: f64,
    lat_hi: f64,
    lng_lo: f64,
    lng_hi: f64,
}

impl GeoRect {
    /// The empty rect. Adding a point to it yields a point rect.
    pub const EMPTY: GeoRect = GeoRect {
        lat_lo: f64::INFINITY,
        lat_hi: f64::NEG_INFINITY,
        lng_lo: f64::INFINITY,
        lng_hi: f64::NEG_INFINITY,
    };

    /// Creates an empty rect.
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates a rect covering a single point.
    pub fn from_point(p: LatLng) -> Self {
        Self::EMPTY.add_point(p)
    }

    /// Creates the smallest rect containing both corners.
    ///
    /// Corner order does not matter; the usual call passes the north-west and
    /// south-east corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self::from_point(a).add_point(b)
    }

    /// Creates the smallest rect containing every point.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        points
            .into_iter()
            .fold(Self::EMPTY, |rect, p| rect.add_point(*p))
    }

    /// Returns a copy of the rect expanded to contain `p`.
    #[must_use]
    pub fn add_point(&self, p: LatLng) -> Self {
        Self {
            lat_lo: self.lat_lo.min(p.lat),
            lat_hi: self.lat_hi.max(p.lat),
            lng_lo: self.lng_lo.min(p.lng),
            lng_hi: self.lng_hi.max(p.lng),
        }
    }

    /// Returns the smallest rect containing both rects.
    #[must_use]
    pub fn union(&self, other: &GeoRect) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self {
            lat_lo: self.lat_lo.min(other.lat_lo),
            lat_hi: self.lat_hi.max(other.lat_hi),
            lng_lo: self.lng_lo.min(other.lng_lo),
            lng_hi: self.lng_hi.max(other.lng_hi),
        }
    }

    /// True if the rect contains no points.
    pub fn is_empty(&self) -> bool {
        self.lat_lo > self.lat_hi || self.lng_lo > self.lng_hi
    }

    /// True if the rect covers exactly one point.
    pub fn is_point(&self) -> bool {
        !self.is_empty() && self.lat_lo == self.lat_hi && self.lng_lo == self.lng_hi
    }

    /// Whether `p` lies inside the rect (edges included).
    pub fn contains(&self, p: LatLng) -> bool {
        !self.is_empty()
            && (self.lat_lo..=self.lat_hi).contains(&p.lat)
            && (self.lng_lo..=self.lng_hi).contains(&p.lng)
    }

    /// Midpoint of the latitude and longitude intervals.
    ///
    /// This is the naive center; see `context` for the Mercator-correct
    /// center used when framing a map.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.lat_lo + self.lat_hi),
            0.5 * (self.lng_lo + self.lng_hi),
        )
    }

    /// South-west corner.
    pub fn lo(&self) -> LatLng {
        LatLng::new(self.lat_lo, self.lng_lo)
    }

    /// North-east corner.
    pub fn hi(&self) -> LatLng {
        LatLng::new(self.lat_hi, self.lng_hi)
    }

    /// North-west corner (top left on the map).
    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.lat_hi, self.lng_lo)
    }

    /// South-east corner (bottom right on the map).
    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.lat_lo, self.lng_hi)
    }

    /// Latitude span in degrees (zero for empty rects).
    pub fn lat_span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.lat_hi - self.lat_lo
        }
    }

    /// Longitude span in degrees (zero for empty rects).
    pub fn lng_span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.lng_hi - self.lng_lo
        }
    }
}

impl Default for GeoRect {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Slippy-map tile index.
///
/// `x` and `y` are already normalized into `[0, 2^zoom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u32,
    /// Column, west to east
    pub x: u32,
    /// Row, north to south
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile coordinate.
    pub const fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
