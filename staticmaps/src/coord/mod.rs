//! Coordinate conversion module
//!
//! Provides the geographic value types used across the crate and the
//! spherical Web Mercator math that maps them to fractional "slippy map"
//! tile space.
//!
//! Tile space at zoom `z` spans `[0, 2^z)` on both axes, with `x` growing
//! east from the antimeridian and `y` growing south from the top of the
//! projection (about 85.0511°N).

mod types;

pub use types::{GeoRect, LatLng, TileCoord, MAX_DISPLAY_LAT, MIN_DISPLAY_LAT};

use std::f64::consts::PI;

/// Number of tiles along one axis at the given zoom level.
#[inline]
pub fn tiles_per_axis(zoom: u32) -> f64 {
    2.0_f64.powi(zoom as i32)
}

/// Projects a latitude onto the Mercator y axis.
///
/// The result is `ln(tan(φ) + sec(φ))`, zero at the equator and growing
/// towards the north pole.
#[inline]
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let phi = lat.to_radians();
    (phi.tan() + 1.0 / phi.cos()).ln()
}

/// Inverse of [`lat_to_mercator_y`].
#[inline]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}

/// Converts a point to fractional tile coordinates at `zoom`.
///
/// # Arguments
///
/// * `point` - Geographic position in degrees
/// * `zoom` - Zoom level
///
/// # Returns
///
/// `(x, y)` in tile units. The integer part is the tile index, the fraction
/// is the position inside that tile.
#[inline]
pub fn to_fractional_tile(point: LatLng, zoom: u32) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let x = n * (point.lng + 180.0) / 360.0;
    let y = n * (1.0 - point.lat_radians().tan().asinh() / PI) / 2.0;
    (x, y)
}

/// Converts fractional tile coordinates back to a geographic point.
#[inline]
pub fn fractional_tile_to_lat_lng(x: f64, y: f64, zoom: u32) -> LatLng {
    let n = tiles_per_axis(zoom);
    let lng = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Returns the tile that contains `point` at `zoom`.
///
/// Points on the far east or south edge are clamped into the last tile.
pub fn tile_containing(point: LatLng, zoom: u32) -> TileCoord {
    let (x, y) = to_fractional_tile(point, zoom);
    let max = tiles_per_axis(zoom) - 1.0;
    TileCoord::new(zoom, x.floor().clamp(0.0, max) as u32, y.floor().clamp(0.0, max) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        let tile = tile_containing(LatLng::new(40.7128, -74.0060), 16);
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        assert_eq!(tiles_per_axis(0), 1.0);
        let (x, y) = to_fractional_tile(LatLng::new(0.0, 0.0), 0);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_antimeridian_maps_to_tile_edges() {
        let (west, _) = to_fractional_tile(LatLng::new(0.0, -180.0), 4);
        let (east, _) = to_fractional_tile(LatLng::new(0.0, 180.0), 4);
        assert_eq!(west, 0.0);
        assert_eq!(east, 16.0);
    }

    #[test]
    fn test_tile_northwest_corner_round_trip() {
        let p = fractional_tile_to_lat_lng(19295.0, 24640.0, 16);
        assert!(p.lat > 40.7128 && p.lat < 40.72);
        assert!(p.lng < -74.0060 && p.lng > -74.01);
    }

    #[test]
    fn test_mercator_y_equator_and_symmetry() {
        assert!(lat_to_mercator_y(0.0).abs() < 1e-12);
        let north = lat_to_mercator_y(60.0);
        let south = lat_to_mercator_y(-60.0);
        assert!((north + south).abs() < 1e-9);
        assert!((mercator_y_to_lat(north) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_georect_union_identity() {
        let r = GeoRect::from_corners(LatLng::new(48.0, 7.0), LatLng::new(47.0, 8.0));
        assert_eq!(GeoRect::empty().union(&r), r);
        assert_eq!(r.union(&GeoRect::empty()), r);
        assert!(GeoRect::empty().is_empty());
        assert!(!r.is_empty());
    }

    #[test]
    fn test_georect_point_and_contains() {
        let p = LatLng::new(48.5, 7.5);
        let r = GeoRect::from_point(p);
        assert!(r.is_point());
        assert!(r.contains(p));

        let wider = r.add_point(LatLng::new(47.0, 9.0));
        assert!(!wider.is_point());
        assert!(wider.contains(LatLng::new(48.0, 8.0)));
        assert!(!wider.contains(LatLng::new(49.0, 8.0)));
        assert_eq!(wider.north_west(), LatLng::new(48.5, 7.5));
        assert_eq!(wider.south_east(), LatLng::new(47.0, 9.0));
    }

    #[test]
    fn test_displayable_range() {
        assert!(LatLng::new(85.0, 0.0).is_displayable());
        assert!(LatLng::new(-85.0, 179.0).is_displayable());
        assert!(!LatLng::new(85.1, 0.0).is_displayable());
        assert!(!LatLng::new(-89.0, 0.0).is_displayable());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fractional_tile_round_trip(
                lat in -85.0..85.0_f64,
                lng in -180.0..180.0_f64,
                zoom in 0u32..=20
            ) {
                let (x, y) = to_fractional_tile(LatLng::new(lat, lng), zoom);
                let back = fractional_tile_to_lat_lng(x, y, zoom);
                prop_assert!((back.lat - lat).abs() < 1e-9);
                prop_assert!((back.lng - lng).abs() < 1e-9);
            }

            #[test]
            fn prop_tile_in_range(
                lat in -85.0..85.0_f64,
                lng in -180.0..=180.0_f64,
                zoom in 0u32..=18
            ) {
                let tile = tile_containing(LatLng::new(lat, lng), zoom);
                let n = tiles_per_axis(zoom) as u32;
                prop_assert!(tile.x < n);
                prop_assert!(tile.y < n);
            }

            #[test]
            fn prop_union_contains_both(
                a_lat in -85.0..85.0_f64, a_lng in -180.0..180.0_f64,
                b_lat in -85.0..85.0_f64, b_lng in -180.0..180.0_f64
            ) {
                let a = LatLng::new(a_lat, a_lng);
                let b = LatLng::new(b_lat, b_lng);
                let r = GeoRect::from_point(a).union(&GeoRect::from_point(b));
                prop_assert!(r.contains(a));
                prop_assert!(r.contains(b));
            }
        }
    }
}
