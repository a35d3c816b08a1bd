use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{QuoteAPI, RouteAPI},
    entities::Quote,
    error::Error,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_quote(&self, pickup: &str, dropoff: &str) -> Result<Quote, Error> {
        let route = self.find_route(pickup, dropoff).await?;
        let quote = Quote::from_route(&route)?;

        tracing::info!(token = %quote.token, distance_km = quote.distance_km, "quote created");

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{engine, geocoder_for, paris_leg};
    use super::*;
    use crate::entities::Leg;
    use crate::error::{route_not_found_error, INVALID_DISTANCE, MISSING_INPUT, ROUTE_NOT_FOUND};
    use crate::external::google_maps::{MockDirections, MockGeocoder};

    #[tokio::test]
    async fn quote_for_resolvable_addresses() {
        let mut directions = MockDirections::new();
        directions
            .expect_find_leg()
            .times(1)
            .returning(|_, _| Ok(paris_leg()));

        let quote = engine(geocoder_for(2), directions)
            .create_quote("Louvre", "CDG")
            .await
            .unwrap();

        assert_eq!(quote.distance_km, 12.4);
        assert!(quote.distance_km >= 0.0);
        assert_eq!(quote.duration_text, "18 min");
        assert_eq!(quote.pickup.latitude, 48.8606);
    }

    #[tokio::test]
    async fn empty_address_fails_before_any_provider_call() {
        for (pickup, dropoff) in [("", "x"), ("x", ""), ("  ", "x")] {
            let mut geocoder = MockGeocoder::new();
            geocoder.expect_geocode().never();
            let mut directions = MockDirections::new();
            directions.expect_find_leg().never();

            let err = engine(geocoder, directions)
                .create_quote(pickup, dropoff)
                .await
                .unwrap_err();

            assert_eq!(err.code, MISSING_INPUT);
        }
    }

    #[tokio::test]
    async fn route_not_found_is_propagated() {
        let mut directions = MockDirections::new();
        directions
            .expect_find_leg()
            .returning(|_, _| Err(route_not_found_error()));

        let err = engine(geocoder_for(2), directions)
            .create_quote("Louvre", "CDG")
            .await
            .unwrap_err();

        assert_eq!(err.code, ROUTE_NOT_FOUND);
    }

    #[tokio::test]
    async fn unparseable_distance_is_not_a_quote() {
        let mut directions = MockDirections::new();
        directions.expect_find_leg().returning(|_, _| {
            Ok(Leg {
                distance_text: "n/a".into(),
                duration_text: "18 min".into(),
            })
        });

        let err = engine(geocoder_for(2), directions)
            .create_quote("Louvre", "CDG")
            .await
            .unwrap_err();

        assert_eq!(err.code, INVALID_DISTANCE);
    }

    #[tokio::test]
    async fn identical_requests_are_not_cached() {
        let mut directions = MockDirections::new();
        directions
            .expect_find_leg()
            .times(2)
            .returning(|_, _| Ok(paris_leg()));

        let engine = engine(geocoder_for(4), directions);

        let first = engine.create_quote("Louvre", "CDG").await.unwrap();
        let second = engine.create_quote("Louvre", "CDG").await.unwrap();

        assert_ne!(first.token, second.token);
    }
}
