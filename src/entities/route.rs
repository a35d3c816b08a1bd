use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Raw directions result for a pickup/dropoff pair, as returned by `POST /api/route`.
///
/// `distance` and `duration` are the provider's display strings, e.g. `"12,4 km"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance: String,
    pub duration: String,
    pub pickup_coords: [f64; 2],
    pub dropoff_coords: [f64; 2],
}

impl RouteSummary {
    pub fn new(pickup: Coordinates, dropoff: Coordinates, leg: Leg) -> Self {
        Self {
            distance: leg.distance_text,
            duration: leg.duration_text,
            pickup_coords: pickup.to_lng_lat(),
            dropoff_coords: dropoff.to_lng_lat(),
        }
    }
}

/// First leg of the first driving route between two coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    pub distance_text: String,
    pub duration_text: String,
}
