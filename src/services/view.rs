//! Vehicle filter & join
//!
//! Derives the rendering set from the raw vehicle feed and the active
//! ETA session: restrict to the session's filter set when one exists,
//! annotate each vehicle with its validated position and its live
//! countdown. Identifiers are already canonical at this point, so the
//! join is plain set membership.

use crate::models::Vehicle;
use crate::state::EtaSession;

/// One renderable entry of the dashboard's vehicle list.
#[derive(Debug, Clone)]
pub struct VehicleMarker {
    pub vehicle: Vehicle,
    /// Validated map position; `None` = non-renderable, the vehicle
    /// is excluded from map placement but still listed.
    pub position: Option<(f64, f64)>,
    /// Remaining seconds for this vehicle, when the session tracks it
    pub countdown: Option<u32>,
}

/// Build the rendering set. A `None` filter means "show all"; a
/// concrete (possibly empty) filter restricts to matching identifiers.
pub fn build_markers(vehicles: &[Vehicle], session: &EtaSession) -> Vec<VehicleMarker> {
    vehicles
        .iter()
        .filter(|vehicle| {
            session
                .filter()
                .map_or(true, |filter| filter.contains(&vehicle.bus_id))
        })
        .map(|vehicle| VehicleMarker {
            position: vehicle.position(),
            countdown: session.countdown_for(&vehicle.bus_id),
            vehicle: vehicle.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArrivalEstimate, Stop, VehicleId};

    fn vehicles_from_json(json: &str) -> Vec<Vehicle> {
        serde_json::from_str(json).expect("vehicle fixture should parse")
    }

    fn session_with_filter(ids: &[&str]) -> EtaSession {
        let mut session = EtaSession::new();
        let token = session.begin_query();
        let arrivals = ids
            .iter()
            .map(|id| ArrivalEstimate {
                bus_id: VehicleId::from(*id),
                estimated_arrival_seconds: Some(120),
            })
            .collect();
        let stop = Stop {
            id: None,
            latitude: Some(42.0),
            stop_latitude: None,
            longitude: Some(-71.0),
            stop_longitude: None,
        };
        session.apply_success(token, arrivals, stop, 10);
        session
    }

    #[test]
    fn no_filter_shows_the_full_raw_set() {
        let vehicles = vehicles_from_json(
            r#"[
                {"busId": "1", "latitude": 42.0, "longitude": -71.0},
                {"busId": "2", "latitude": 42.1, "longitude": -71.1}
            ]"#,
        );

        let markers = build_markers(&vehicles, &EtaSession::new());
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn filter_matches_across_numeric_and_string_representation() {
        // The feed mixes numeric and textual identifiers; the filter
        // was seeded from arrivals using the other representation.
        let vehicles = vehicles_from_json(
            r#"[
                {"busId": 1, "latitude": 42.0, "longitude": -71.0},
                {"busId": "2", "latitude": 42.1, "longitude": -71.1},
                {"busId": "3", "latitude": 42.2, "longitude": -71.2}
            ]"#,
        );
        let session = session_with_filter(&["1", "2"]);

        let markers = build_markers(&vehicles, &session);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].vehicle.bus_id, VehicleId::from("1"));
        assert_eq!(markers[1].vehicle.bus_id, VehicleId::from("2"));
    }

    #[test]
    fn an_empty_filter_hides_every_vehicle() {
        let vehicles = vehicles_from_json(
            r#"[{"busId": "1", "latitude": 42.0, "longitude": -71.0}]"#,
        );
        let session = session_with_filter(&[]);

        assert!(build_markers(&vehicles, &session).is_empty());
    }

    #[test]
    fn non_renderable_vehicles_stay_listed_without_a_position() {
        let vehicles = vehicles_from_json(
            r#"[
                {"busId": "1", "latitude": "bogus", "longitude": -71.0},
                {"busId": "2", "latitude": 42.1, "longitude": -71.1}
            ]"#,
        );

        let markers = build_markers(&vehicles, &EtaSession::new());

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].position, None);
        assert_eq!(markers[1].position, Some((42.1, -71.1)));
    }

    #[test]
    fn markers_carry_the_live_countdown() {
        let vehicles = vehicles_from_json(
            r#"[
                {"busId": "1", "latitude": 42.0, "longitude": -71.0},
                {"busId": "2", "latitude": 42.1, "longitude": -71.1}
            ]"#,
        );
        let mut session = session_with_filter(&["1"]);
        session.tick();

        let markers = build_markers(&vehicles, &session);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].countdown, Some(119));
    }
}
