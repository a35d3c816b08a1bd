mod payment_api;
mod payment_method_api;
mod quote_api;
mod route_api;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    db::{CustomerStore, MemoryStore, PaymentHistoryStore, PgStore},
    error::Error,
    external::{
        google_maps::{Directions, Geocoder, GoogleMaps},
        stripe::{PaymentProcessor, Stripe},
    },
};

/// Server-side implementation of every API trait. Holds no state of its own;
/// providers and stores are injected.
pub struct Engine {
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn Directions>,
    processor: Arc<dyn PaymentProcessor>,
    history: Arc<dyn PaymentHistoryStore>,
    customers: Arc<dyn CustomerStore>,
}

impl Engine {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn Directions>,
        processor: Arc<dyn PaymentProcessor>,
        history: Arc<dyn PaymentHistoryStore>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            geocoder,
            directions,
            processor,
            history,
            customers,
        }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let maps = Arc::new(GoogleMaps::new(config.google_maps.clone()));
        let processor = Arc::new(Stripe::new(config.stripe.clone()));

        let engine = match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::new(url, config.database_max_connections).await?);
                Self::new(maps.clone(), maps, processor, store.clone(), store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, payment history will not survive a restart");
                let store = Arc::new(MemoryStore::new());
                Self::new(maps.clone(), maps, processor, store.clone(), store)
            }
        };

        Ok(engine)
    }
}

impl API for Engine {}
