//! Test doubles shared by the engine tests.

use std::sync::Arc;

use super::Engine;
use crate::{
    db::MemoryStore,
    entities::{Coordinates, Leg, ProcessorIntent},
    error::address_not_found_error,
    external::{
        google_maps::{MockDirections, MockGeocoder},
        stripe::MockPaymentProcessor,
    },
};

pub fn engine(geocoder: MockGeocoder, directions: MockDirections) -> Engine {
    Engine::new(
        Arc::new(geocoder),
        Arc::new(directions),
        Arc::new(MockPaymentProcessor::new()),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
}

pub fn payment_engine(processor: MockPaymentProcessor, store: Arc<MemoryStore>) -> Engine {
    Engine::new(
        Arc::new(MockGeocoder::new()),
        Arc::new(MockDirections::new()),
        Arc::new(processor),
        store.clone(),
        store,
    )
}

/// Geocoder that knows "Louvre" and "CDG" and expects exactly `calls` lookups.
pub fn geocoder_for(calls: usize) -> MockGeocoder {
    let mut geocoder = MockGeocoder::new();
    geocoder
        .expect_geocode()
        .times(calls)
        .returning(|address| match address {
            "Louvre" => Ok(Coordinates {
                latitude: 48.8606,
                longitude: 2.3376,
            }),
            "CDG" => Ok(Coordinates {
                latitude: 49.0097,
                longitude: 2.5479,
            }),
            other => Err(address_not_found_error(other)),
        });
    geocoder
}

pub fn paris_leg() -> Leg {
    Leg {
        distance_text: "12,4 km".into(),
        duration_text: "18 min".into(),
    }
}

/// Processor handing out sequential intent ids.
pub fn counting_processor() -> MockPaymentProcessor {
    let mut processor = MockPaymentProcessor::new();
    let mut next = 0;
    processor
        .expect_create_payment_intent()
        .returning(move |_, _| {
            next += 1;
            Ok(ProcessorIntent {
                id: format!("pi_{}", next),
                client_secret: format!("pi_{}_secret_abc", next),
                status: "requires_payment_method".into(),
            })
        });
    processor
}
