//! Zoom and center resolution.
//!
//! Turns whatever the caller constrained (bounding box, center, zoom, the
//! registered objects) into a concrete `(zoom, center)` pair. Everything here
//! is pure; the render context only gathers the inputs.

use std::sync::Arc;

use tracing::warn;

use super::RenderError;
use crate::coord::{self, GeoRect, LatLng};
use crate::objects::{MapObject, Margin};
use crate::transform::Transformer;

/// Zoom used when the bounds collapse to a single point.
pub(crate) const POINT_ZOOM: u32 = 15;

/// Everything viewport resolution looks at.
#[derive(Clone, Copy)]
pub(crate) struct ViewportRequest<'a> {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub max_zoom: u32,
    pub zoom: Option<u32>,
    pub center: Option<LatLng>,
    pub bounding_box: Option<GeoRect>,
    /// Height of the attribution band, reserved at the bottom.
    pub caption_height: f64,
    pub objects: &'a [Arc<dyn MapObject>],
}

impl ViewportRequest<'_> {
    /// Resolves the viewport.
    ///
    /// Priority: a non-empty bounding box, then an explicit center, then the
    /// union of the object bounds.
    pub fn resolve(&self) -> Result<(u32, LatLng), RenderError> {
        if let Some(bbox) = self.bounding_box.filter(|b| !b.is_empty()) {
            let center = determine_center(&bbox);
            let zoom = self.fit_zoom(&bbox, Some(center), &Margin::default());
            return Ok((zoom, center));
        }

        let bounds = determine_bounds(self.objects);

        if let Some(center) = self.center {
            let zoom = match self.zoom {
                Some(zoom) => zoom,
                None => self.fit_zoom(&bounds, Some(center), &self.margins()),
            };
            return Ok((zoom, center));
        }

        if !bounds.is_empty() {
            let center = determine_center(&bounds);
            let zoom = match self.zoom {
                Some(zoom) => zoom,
                None => self.fit_zoom(&bounds, Some(center), &self.margins()),
            };
            let center = adjust_center(
                self.objects,
                center,
                zoom,
                self.width,
                self.height,
                self.tile_size,
            );
            return Ok((zoom, center));
        }

        Err(RenderError::NoCenter)
    }

    fn margins(&self) -> Margin {
        determine_margins(self.objects, self.caption_height)
    }

    fn fit_zoom(&self, bounds: &GeoRect, center: Option<LatLng>, margin: &Margin) -> u32 {
        determine_zoom(
            bounds,
            center,
            self.width,
            self.height,
            self.tile_size,
            margin,
            self.max_zoom,
        )
    }
}

/// Union of all object bounds.
pub(crate) fn determine_bounds(objects: &[Arc<dyn MapObject>]) -> GeoRect {
    objects
        .iter()
        .fold(GeoRect::empty(), |r, o| r.union(&o.bounds()))
}

/// Side-wise maximum of the object margins, with the caption band added at
/// the bottom.
pub(crate) fn determine_margins(objects: &[Arc<dyn MapObject>], caption_height: f64) -> Margin {
    let mut m = objects
        .iter()
        .fold(Margin::default(), |m, o| m.max(&o.extra_margin_pixels()));
    m.bottom += caption_height;
    m
}

/// Largest zoom at which `bounds` (plus `center`) fits into the output.
///
/// Falls back to ignoring `margin` when it leaves no room at all. The result
/// never exceeds `max_zoom`.
pub(crate) fn determine_zoom(
    bounds: &GeoRect,
    center: Option<LatLng>,
    width: u32,
    height: u32,
    tile_size: u32,
    margin: &Margin,
    max_zoom: u32,
) -> u32 {
    let b = match center {
        Some(c) => bounds.add_point(c),
        None => *bounds,
    };
    if b.is_empty() || b.is_point() {
        return POINT_ZOOM.min(max_zoom);
    }

    let ts = f64::from(tile_size.max(1));
    let mut w = (f64::from(width) - margin.left - margin.right) / ts;
    let mut h = (f64::from(height) - margin.top - margin.bottom) / ts;
    if w <= 0.0 || h <= 0.0 {
        warn!(
            width = width,
            height = height,
            "Object margins exceed the image size, ignoring them for zoom calculation"
        );
        w = f64::from(width) / ts;
        h = f64::from(height) / ts;
    }

    // world fractions at zoom 0
    let (min_x, min_y) = coord::to_fractional_tile(b.lo(), 0);
    let (max_x, max_y) = coord::to_fractional_tile(b.hi(), 0);
    let mut dx = max_x - min_x;
    while dx < 0.0 {
        dx += 1.0;
    }
    while dx > 1.0 {
        dx -= 1.0;
    }
    let dy = (max_y - min_y).abs();

    for zoom in 1..=max_zoom {
        let tiles = coord::tiles_per_axis(zoom);
        if dx * tiles > w || dy * tiles > h {
            return zoom - 1;
        }
    }
    max_zoom
}

/// Center of `bounds` with the latitude averaged in Mercator space.
pub(crate) fn determine_center(bounds: &GeoRect) -> LatLng {
    let y_lo = coord::lat_to_mercator_y(bounds.lo().lat);
    let y_hi = coord::lat_to_mercator_y(bounds.hi().lat);
    let lat = coord::mercator_y_to_lat((y_lo + y_hi) / 2.0);
    let lng = (bounds.lo().lng + bounds.hi().lng) / 2.0;
    LatLng::new(lat, lng)
}

/// Shifts `center` so the object margins are balanced inside the output.
///
/// Leaves `center` unchanged when the objects plus margins do not fit.
pub(crate) fn adjust_center(
    objects: &[Arc<dyn MapObject>],
    center: LatLng,
    zoom: u32,
    width: u32,
    height: u32,
    tile_size: u32,
) -> LatLng {
    if objects.is_empty() {
        return center;
    }

    let t = Transformer::new(width, height, zoom, center, tile_size);
    let mut frame: Option<(f64, f64, f64, f64)> = None;
    for object in objects {
        let bounds = object.bounds();
        if bounds.is_empty() {
            continue;
        }
        let (nw_x, nw_y) = t.lat_lng_to_xy(bounds.north_west());
        let (se_x, se_y) = t.lat_lng_to_xy(bounds.south_east());
        let m = object.extra_margin_pixels();
        let (l, top, r, bot) = (nw_x - m.left, nw_y - m.top, se_x + m.right, se_y + m.bottom);
        frame = Some(match frame {
            None => (l, top, r, bot),
            Some((fl, ft, fr, fb)) => (fl.min(l), ft.min(top), fr.max(r), fb.max(bot)),
        });
    }

    let Some((min_x, min_y, max_x, max_y)) = frame else {
        return center;
    };
    if max_x - min_x > f64::from(width) || max_y - min_y > f64::from(height) {
        warn!(
            zoom = zoom,
            "Object margins exceed the image size, not adjusting the center"
        );
        return center;
    }

    t.xy_to_lat_lng((min_x + max_x) * 0.5, (min_y + max_y) * 0.5)
}
