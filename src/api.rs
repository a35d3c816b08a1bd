use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{
    PaymentIntent, PaymentIntentRecord, PaymentMethod, PaymentSheetSetup, Quote, RouteSummary,
};
use crate::error::Error;

#[async_trait]
pub trait RouteAPI {
    /// Geocodes both addresses and fetches the driving route between them.
    async fn find_route(&self, pickup: &str, dropoff: &str) -> Result<RouteSummary, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    /// Quotes a pickup/dropoff pair. Never cached: every call hits the providers.
    async fn create_quote(&self, pickup: &str, dropoff: &str) -> Result<Quote, Error>;
}

#[async_trait]
pub trait PaymentAPI {
    /// Creates a payment intent and records it in the payment history.
    ///
    /// Not idempotent: two calls with the same arguments create two intents
    /// and two history records.
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, Error>;

    async fn list_payment_history(&self) -> Result<Vec<PaymentIntentRecord>, Error>;
}

#[async_trait]
pub trait PaymentMethodAPI {
    async fn init_payment_sheet(&self, user_id: &str) -> Result<PaymentSheetSetup, Error>;
    async fn list_payment_methods(&self, user_id: &str) -> Result<Vec<PaymentMethod>, Error>;
    async fn remove_payment_method(&self, payment_method_id: &str) -> Result<PaymentMethod, Error>;
}

pub trait API: RouteAPI + QuoteAPI + PaymentAPI + PaymentMethodAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;

/// What the booking flow needs from a backend, in-process or remote.
pub trait BookingAPI: QuoteAPI + PaymentAPI {}

impl<T: QuoteAPI + PaymentAPI> BookingAPI for T {}

pub type DynBookingAPI = Arc<dyn BookingAPI + Send + Sync>;
