//! Thin presentation surface.
//!
//! Renders whatever the engine produced; no decisions live here. The
//! `Viewport` stands in for the map widget: it remembers the center
//! and zoom the focus controller last applied.

use std::fmt::Write;

use crate::services::focus::{DEFAULT_CENTER, DEFAULT_ZOOM, FOCUS_ZOOM};
use crate::services::view::VehicleMarker;
use crate::state::{EtaSession, FeedState};

pub const HELP: &str = "Enter a stop ID for arrival countdowns. Commands: /vehicles (reload feed), /quit";

/// Map viewport state: where the map is centered and how far in
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: u8,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// Apply an automatic focus move: center on the point, zoom in.
    pub fn focus_on(&mut self, point: (f64, f64)) {
        self.center = point;
        self.zoom = FOCUS_ZOOM;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the full dashboard view to text.
pub fn render(
    feed: &FeedState,
    session: &EtaSession,
    markers: &[VehicleMarker],
    stop_marker: Option<(f64, f64)>,
    viewport: &Viewport,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "map: center {:.4},{:.4} zoom {}",
        viewport.center.0, viewport.center.1, viewport.zoom
    );
    if let Some((lat, lon)) = stop_marker {
        let stop_id = session
            .stop
            .as_ref()
            .and_then(|s| s.id.as_deref())
            .unwrap_or("?");
        let _ = writeln!(out, "stop marker: {:.4},{:.4} (stop {})", lat, lon, stop_id);
    }

    if feed.loading {
        let _ = writeln!(out, "vehicles: loading...");
    } else if let Some(error) = &feed.error {
        let _ = writeln!(out, "vehicles: {}", error);
    } else {
        let _ = writeln!(out, "vehicles: {} shown", markers.len());
    }
    for marker in markers {
        let position = match marker.position {
            Some((lat, lon)) => format!("{:.4},{:.4}", lat, lon),
            None => "(no position)".to_string(),
        };
        let countdown = match marker.countdown {
            Some(seconds) => format!("  eta {}s", seconds),
            None => String::new(),
        };
        let _ = writeln!(out, "  bus {:<10} {}{}", marker.vehicle.bus_id, position, countdown);
    }

    if session.in_flight {
        let _ = writeln!(out, "eta: loading...");
    } else if let Some(error) = &session.error {
        let _ = writeln!(out, "eta: {}", error);
    } else if !session.estimates.is_empty() {
        let _ = writeln!(out, "eta: {} arrivals", session.estimates.len());
        for estimate in &session.estimates {
            let remaining = session
                .countdown_for(&estimate.bus_id)
                .unwrap_or_else(|| estimate.seed_seconds());
            let _ = writeln!(out, "  bus {} - {} sec", estimate.bus_id, remaining);
        }
    }

    let _ = write!(out, "> ");
    out
}
