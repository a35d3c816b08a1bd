use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A resolved geographic position. Only geocoding produces these.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// `[longitude, latitude]`, the order used on the wire.
    pub fn to_lng_lat(self) -> [f64; 2] {
        let point: Point<f64> = self.into();
        [point.x(), point.y()]
    }

    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Point::new(lng, lat).into()
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Self {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.latitude, coordinates.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_order_is_longitude_first() {
        let paris = Coordinates {
            latitude: 48.8566,
            longitude: 2.3522,
        };

        assert_eq!(paris.to_lng_lat(), [2.3522, 48.8566]);
        assert_eq!(Coordinates::from_lng_lat(paris.to_lng_lat()), paris);
    }

    #[test]
    fn query_string_is_latitude_first() {
        let coordinates = Coordinates {
            latitude: 1.5,
            longitude: -2.25,
        };

        assert_eq!(String::from(coordinates), "1.5,-2.25");
    }
}
