use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::RouteSummary,
    error::{missing_input_error, Error},
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_route(&self, pickup: &str, dropoff: &str) -> Result<RouteSummary, Error> {
        if pickup.trim().is_empty() || dropoff.trim().is_empty() {
            return Err(missing_input_error("pickup and dropoff addresses"));
        }

        // the two lookups are independent
        let (origin, destination) = futures::try_join!(
            self.geocoder.geocode(pickup),
            self.geocoder.geocode(dropoff)
        )?;

        let leg = self.directions.find_leg(origin, destination).await?;

        tracing::info!(distance = %leg.distance_text, duration = %leg.duration_text, "route found");

        Ok(RouteSummary::new(origin, destination, leg))
    }
}
