use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    api::{PaymentAPI, QuoteAPI, RouteAPI},
    entities::{PaymentIntent, PaymentIntentRecord, Quote, RouteSummary},
    error::{missing_input_error, upstream_error, Error},
};

/// Talks to a running TaxiLuxe server over HTTP.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Decodes a success body, or turns the server's `{code, error}` body back
/// into the error it was rendered from.
async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, Error> {
    let status = res.status();

    if status.is_success() {
        return Ok(res.json().await?);
    }

    match res.json::<Error>().await {
        Ok(err) => Err(err),
        Err(_) => {
            tracing::warn!(%status, "server returned an unreadable error body");
            Err(upstream_error())
        }
    }
}

#[async_trait]
impl RouteAPI for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn find_route(&self, pickup: &str, dropoff: &str) -> Result<RouteSummary, Error> {
        let res = self
            .client
            .post(self.url("/api/route"))
            .json(&json!({ "pickup": pickup, "dropoff": dropoff }))
            .send()
            .await?;

        decode(res).await
    }
}

#[async_trait]
impl QuoteAPI for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn create_quote(&self, pickup: &str, dropoff: &str) -> Result<Quote, Error> {
        // checked locally so an incomplete form never reaches the network
        if pickup.trim().is_empty() || dropoff.trim().is_empty() {
            return Err(missing_input_error("pickup and dropoff addresses"));
        }

        let route = self.find_route(pickup, dropoff).await?;

        Quote::from_route(&route)
    }
}

#[async_trait]
impl PaymentAPI for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, Error> {
        let res = self
            .client
            .post(self.url("/api/payment/create-payment-intent"))
            .json(&json!({ "amount": amount, "currency": currency }))
            .send()
            .await?;

        decode(res).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_payment_history(&self) -> Result<Vec<PaymentIntentRecord>, Error> {
        let res = self
            .client
            .get(self.url("/api/payment/history"))
            .send()
            .await?;

        decode(res).await
    }
}
