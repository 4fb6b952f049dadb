use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical vehicle identifier.
///
/// The feed is inconsistent about representation: the same vehicle may
/// appear as `"busId": 12` in one payload and `"busId": "12"` in
/// another. Both forms normalize to the same textual identifier at the
/// deserialization boundary, so joins further in are plain equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(VehicleId(s)),
            serde_json::Value::Number(n) => Ok(VehicleId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "vehicle identifier must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// A tracked vehicle position from the feed.
///
/// Coordinates are kept as options: a vehicle with a non-numeric
/// latitude or longitude stays in the raw set (it still shows up in
/// list views) but never gets a map placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Unique vehicle identifier
    pub bus_id: VehicleId,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub longitude: Option<f64>,
}

impl Vehicle {
    /// Validated map position; `None` means non-renderable.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize_to_the_same_value() {
        let numeric: VehicleId = serde_json::from_str("12").unwrap();
        let textual: VehicleId = serde_json::from_str("\"12\"").unwrap();

        assert_eq!(numeric, textual);
        assert_eq!(numeric.as_str(), "12");
    }

    #[test]
    fn non_scalar_id_is_rejected() {
        let result: Result<VehicleId, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }

    #[test]
    fn valid_coordinates_give_a_position() {
        let vehicle: Vehicle =
            serde_json::from_str(r#"{"busId": "A1", "latitude": 42.36, "longitude": -71.05}"#)
                .unwrap();

        assert_eq!(vehicle.position(), Some((42.36, -71.05)));
    }

    #[test]
    fn numeric_string_coordinates_are_accepted() {
        let vehicle: Vehicle =
            serde_json::from_str(r#"{"busId": 7, "latitude": "42.36", "longitude": "-71.05"}"#)
                .unwrap();

        assert_eq!(vehicle.position(), Some((42.36, -71.05)));
    }

    #[test]
    fn non_numeric_coordinates_make_the_vehicle_non_renderable() {
        let vehicle: Vehicle =
            serde_json::from_str(r#"{"busId": "A1", "latitude": "garbage", "longitude": -71.05}"#)
                .unwrap();

        assert_eq!(vehicle.latitude, None);
        assert_eq!(vehicle.position(), None);
    }

    #[test]
    fn missing_coordinates_make_the_vehicle_non_renderable() {
        let vehicle: Vehicle = serde_json::from_str(r#"{"busId": "A1"}"#).unwrap();
        assert_eq!(vehicle.position(), None);
    }
}
