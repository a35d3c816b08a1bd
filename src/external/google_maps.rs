use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::GoogleMapsConfig,
    entities::{Coordinates, Leg},
    error::{address_not_found_error, route_not_found_error, upstream_error, Error},
};

/// Resolves free-text addresses to coordinates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, Error>;
}

/// Computes driving distance and duration between two coordinates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Directions: Send + Sync {
    async fn find_leg(&self, origin: Coordinates, destination: Coordinates) -> Result<Leg, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<Vec<T>>,
    routes: Option<Vec<T>>,
}

/// Google Maps Geocoding and Directions client.
///
/// Single round trip per call, no retries and no request deadline.
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    config: GoogleMapsConfig,
}

impl std::fmt::Debug for GoogleMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMaps")
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl GoogleMaps {
    pub fn new(config: GoogleMapsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Geocoder for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinates, Error> {
        let url = self.url("/maps/api/geocode/json");

        // the key is attached separately so it never reaches the logs
        tracing::info!(%url, "geocoding address");

        let res = self
            .client
            .get(url)
            .query(&[("address", address)])
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(address_not_found_error(address));
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<GeocodeResult> = res.json().await?;

        if data.status != "OK" {
            tracing::warn!(status = %data.status, "geocoding returned no match");
            return Err(address_not_found_error(address));
        }

        let location = data
            .results
            .and_then(|results| results.into_iter().next())
            .map(|result| result.geometry.location)
            .ok_or_else(|| address_not_found_error(address))?;

        Ok(Coordinates {
            latitude: location.lat,
            longitude: location.lng,
        })
    }
}

#[async_trait]
impl Directions for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_leg(&self, origin: Coordinates, destination: Coordinates) -> Result<Leg, Error> {
        let url = self.url("/maps/api/directions/json");
        let origin: String = origin.into();
        let destination: String = destination.into();

        tracing::info!(%url, %origin, %destination, "requesting driving directions");

        let res = self
            .client
            .get(url)
            .query(&[("origin", origin)])
            .query(&[("destination", destination)])
            .query(&[("mode", "driving")])
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(route_not_found_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<DirectionsRoute> = res.json().await?;

        if data.status != "OK" {
            tracing::warn!(status = %data.status, "directions request failed");
            return Err(route_not_found_error());
        }

        // first route, first leg; alternatives are ignored
        let leg = data
            .routes
            .and_then(|routes| routes.into_iter().next())
            .and_then(|route| route.legs.into_iter().next())
            .ok_or_else(route_not_found_error)?;

        Ok(Leg {
            distance_text: leg.distance.text,
            duration_text: leg.duration.text,
        })
    }
}
