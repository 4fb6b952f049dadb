//! Map focus derivation
//!
//! Computes the points the map cares about: the derived map center
//! (first renderable vehicle, else a fixed default) and the stop
//! marker target with its fallback chain. The one-shot gate for the
//! automatic focus move lives on the ETA session.

use crate::models::Stop;
use crate::services::view::VehicleMarker;

/// Default map center before any vehicle has a position
pub const DEFAULT_CENTER: (f64, f64) = (42.36, -71.05);

/// Initial map zoom level
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom level applied by the automatic focus move
pub const FOCUS_ZOOM: u8 = 15;

/// Derived map center: the first renderable vehicle's position, or
/// the fixed default when none has valid coordinates.
pub fn map_center(markers: &[VehicleMarker]) -> (f64, f64) {
    markers
        .iter()
        .find_map(|marker| marker.position)
        .unwrap_or(DEFAULT_CENTER)
}

/// Position for the stop marker: the stop's own coordinates when
/// valid, otherwise the current map center. `None` only while no stop
/// is selected at all.
pub fn stop_target(stop: Option<&Stop>, center: (f64, f64)) -> Option<(f64, f64)> {
    stop.map(|s| s.position_or(center))
}
