use serde::{Deserialize, Serialize};

use super::vehicle::VehicleId;

/// Stop metadata returned by the stop-detail endpoint.
///
/// The backend is inconsistent about coordinate field names: some
/// records carry `latitude`/`longitude`, others
/// `stopLatitude`/`stopLongitude`. Both are parsed; the first valid
/// value wins per axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub stop_latitude: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub stop_longitude: Option<f64>,
}

impl Stop {
    /// Stop coordinates, `None` when neither field name carried a
    /// valid value for an axis.
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.or(self.stop_latitude)?;
        let lon = self.longitude.or(self.stop_longitude)?;
        Some((lat, lon))
    }

    /// Stop coordinates with a fallback point, so a bad stop record
    /// never yields an undefined focus target.
    pub fn position_or(&self, fallback: (f64, f64)) -> (f64, f64) {
        self.position().unwrap_or(fallback)
    }
}

/// One arrival record for the queried stop, in server order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalEstimate {
    /// Identifier of the arriving vehicle
    pub bus_id: VehicleId,
    /// Estimated seconds until arrival as reported by the server
    #[serde(default, deserialize_with = "super::lenient_i64")]
    pub estimated_arrival_seconds: Option<i64>,
}

impl ArrivalEstimate {
    /// Countdown seed value: clamped to zero or above, missing or
    /// non-numeric seconds seed to zero.
    pub fn seed_seconds(&self) -> u32 {
        self.estimated_arrival_seconds
            .unwrap_or(0)
            .clamp(0, u32::MAX as i64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_field_names_win() {
        let stop: Stop = serde_json::from_str(
            r#"{"id": "123", "latitude": 1.0, "longitude": 2.0, "stopLatitude": 9.0, "stopLongitude": 9.0}"#,
        )
        .unwrap();

        assert_eq!(stop.position(), Some((1.0, 2.0)));
    }

    #[test]
    fn alternate_field_names_are_accepted() {
        let stop: Stop =
            serde_json::from_str(r#"{"id": 123, "stopLatitude": 1.5, "stopLongitude": 2.5}"#)
                .unwrap();

        assert_eq!(stop.id.as_deref(), Some("123"));
        assert_eq!(stop.position(), Some((1.5, 2.5)));
    }

    #[test]
    fn invalid_primary_falls_through_to_alternate() {
        let stop: Stop = serde_json::from_str(
            r#"{"latitude": "n/a", "stopLatitude": 1.5, "longitude": 2.5}"#,
        )
        .unwrap();

        assert_eq!(stop.position(), Some((1.5, 2.5)));
    }

    #[test]
    fn missing_coordinates_fall_back() {
        let stop: Stop = serde_json::from_str(r#"{"id": "123"}"#).unwrap();

        assert_eq!(stop.position(), None);
        assert_eq!(stop.position_or((42.36, -71.05)), (42.36, -71.05));
    }

    #[test]
    fn seconds_clamp_to_zero_or_above() {
        let arrival: ArrivalEstimate =
            serde_json::from_str(r#"{"busId": "A1", "estimatedArrivalSeconds": -30}"#).unwrap();
        assert_eq!(arrival.seed_seconds(), 0);

        let arrival: ArrivalEstimate =
            serde_json::from_str(r#"{"busId": "A1", "estimatedArrivalSeconds": 125}"#).unwrap();
        assert_eq!(arrival.seed_seconds(), 125);
    }

    #[test]
    fn missing_or_garbage_seconds_seed_to_zero() {
        let arrival: ArrivalEstimate = serde_json::from_str(r#"{"busId": "A1"}"#).unwrap();
        assert_eq!(arrival.seed_seconds(), 0);

        let arrival: ArrivalEstimate =
            serde_json::from_str(r#"{"busId": "A1", "estimatedArrivalSeconds": "soon"}"#).unwrap();
        assert_eq!(arrival.seed_seconds(), 0);
    }
}
