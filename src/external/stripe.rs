use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    booking::{PaymentSheet, SheetOutcome},
    config::StripeConfig,
    entities::{PaymentMethod, ProcessorIntent},
    error::{processor_error, unexpected_error, Error},
};

pub const API_VERSION: &str = "2024-06-20";

/// Server-side operations against the payment processor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Creates an intent with automatic payment method selection enabled.
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ProcessorIntent, Error>;

    async fn create_customer(&self, user_id: &str) -> Result<String, Error>;

    async fn create_ephemeral_key(&self, customer_id: &str) -> Result<String, Error>;

    /// Returns the setup intent's client secret.
    async fn create_setup_intent(&self, customer_id: &str) -> Result<String, Error>;

    async fn list_card_payment_methods(&self, customer_id: &str)
        -> Result<Vec<PaymentMethod>, Error>;

    async fn detach_payment_method(&self, payment_method_id: &str) -> Result<PaymentMethod, Error>;
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    status: String,
    client_secret: Option<String>,
    amount: Option<i64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    secret: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Card {
    brand: Option<String>,
    last4: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentMethodResponse {
    id: String,
    card: Option<Card>,
}

impl From<PaymentMethodResponse> for PaymentMethod {
    fn from(res: PaymentMethodResponse) -> Self {
        let (card_brand, card_last4) = match res.card {
            Some(card) => (card.brand, card.last4),
            None => (None, None),
        };

        Self {
            id: res.id,
            card_brand,
            card_last4,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

/// Joins `segments` onto the api base, percent-encoding each one so an id
/// can never escape its own path segment.
fn endpoint(api_base: &str, segments: &[&str]) -> Result<reqwest::Url, Error> {
    let mut url = reqwest::Url::parse(api_base).map_err(|err| {
        tracing::error!(%err, api_base, "invalid stripe api base");
        unexpected_error()
    })?;

    url.path_segments_mut()
        .map_err(|_| unexpected_error())?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Sends a Stripe request and decodes the body, turning any non-2xx
/// response into a processor error carrying Stripe's own message.
async fn send<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, Error> {
    let res = req.header("Stripe-Version", API_VERSION).send().await?;
    let status = res.status();

    if !status.is_success() {
        let message = match res.json::<StripeErrorBody>().await {
            Ok(StripeErrorBody {
                error: StripeErrorDetail {
                    message: Some(message),
                },
            }) => message,
            _ => format!("payment processor responded with {}", status),
        };

        tracing::warn!(%status, %message, "stripe request failed");

        return Err(processor_error(message));
    }

    Ok(res.json().await?)
}

/// Stripe REST client authenticated with the account's secret key.
#[derive(Clone)]
pub struct Stripe {
    client: reqwest::Client,
    config: StripeConfig,
}

impl std::fmt::Debug for Stripe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stripe")
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

impl Stripe {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn post(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, Error> {
        let url = endpoint(&self.config.api_base, segments)?;

        Ok(self.client.post(url).bearer_auth(&self.config.secret_key))
    }

    fn get(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, Error> {
        let url = endpoint(&self.config.api_base, segments)?;

        Ok(self.client.get(url).bearer_auth(&self.config.secret_key))
    }
}

#[async_trait]
impl PaymentProcessor for Stripe {
    #[tracing::instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ProcessorIntent, Error> {
        let amount = amount.to_string();

        let intent: IntentResponse = send(self.post(&["v1", "payment_intents"])?.form(&[
            ("amount", amount.as_str()),
            ("currency", currency),
            ("automatic_payment_methods[enabled]", "true"),
        ]))
        .await?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| processor_error("payment intent has no client secret"))?;

        tracing::info!(id = %intent.id, status = %intent.status, "payment intent created");

        Ok(ProcessorIntent {
            id: intent.id,
            client_secret,
            status: intent.status,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn create_customer(&self, user_id: &str) -> Result<String, Error> {
        let customer: IdResponse =
            send(self.post(&["v1", "customers"])?.form(&[("metadata[userId]", user_id)])).await?;

        Ok(customer.id)
    }

    #[tracing::instrument(skip(self))]
    async fn create_ephemeral_key(&self, customer_id: &str) -> Result<String, Error> {
        let key: SecretResponse =
            send(self.post(&["v1", "ephemeral_keys"])?.form(&[("customer", customer_id)])).await?;

        key.secret
            .ok_or_else(|| processor_error("ephemeral key has no secret"))
    }

    #[tracing::instrument(skip(self))]
    async fn create_setup_intent(&self, customer_id: &str) -> Result<String, Error> {
        let intent: SecretResponse = send(self.post(&["v1", "setup_intents"])?.form(&[
            ("customer", customer_id),
            ("payment_method_types[]", "card"),
            ("payment_method_types[]", "sepa_debit"),
        ]))
        .await?;

        intent
            .client_secret
            .ok_or_else(|| processor_error("setup intent has no client secret"))
    }

    #[tracing::instrument(skip(self))]
    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, Error> {
        let list: ListResponse<PaymentMethodResponse> = send(
            self.get(&["v1", "payment_methods"])?
                .query(&[("customer", customer_id), ("type", "card")]),
        )
        .await?;

        Ok(list.data.into_iter().map(PaymentMethod::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn detach_payment_method(&self, payment_method_id: &str) -> Result<PaymentMethod, Error> {
        let req = self.post(&["v1", "payment_methods", payment_method_id, "detach"])?;
        let detached: PaymentMethodResponse = send(req).await?;

        Ok(detached.into())
    }
}

#[derive(Clone, Debug)]
struct SheetSession {
    intent_id: String,
    client_secret: String,
    summary: String,
}

/// Prompt shown before confirming; returns `false` when the user dismisses.
///
/// Called synchronously from `present`. A prompt that waits on the user
/// must not block the runtime thread: wrap it in
/// `tokio::task::block_in_place` on a multi-threaded runtime.
pub type Confirmation = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Test-mode stand-in for the processor's on-device payment sheet.
///
/// Uses only the publishable key and the intent's client secret, the same
/// credentials a mobile client holds, and confirms with a fixed test
/// payment method such as `pm_card_visa`.
pub struct StripePaymentSheet {
    client: reqwest::Client,
    api_base: String,
    publishable_key: String,
    payment_method: String,
    confirmation: Confirmation,
    session: Mutex<Option<SheetSession>>,
}

impl StripePaymentSheet {
    pub fn new(
        api_base: impl Into<String>,
        publishable_key: impl Into<String>,
        payment_method: impl Into<String>,
        confirmation: Confirmation,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            publishable_key: publishable_key.into(),
            payment_method: payment_method.into(),
            confirmation,
            session: Mutex::new(None),
        }
    }
}

/// `pi_123_secret_456` belongs to intent `pi_123`.
fn intent_id_from_secret(client_secret: &str) -> Option<&str> {
    client_secret
        .split_once("_secret_")
        .map(|(id, _)| id)
        .filter(|id| !id.is_empty())
}

#[async_trait]
impl PaymentSheet for StripePaymentSheet {
    #[tracing::instrument(skip(self, client_secret))]
    async fn initialize(
        &self,
        client_secret: &str,
        merchant_display_name: &str,
    ) -> Result<(), String> {
        let intent_id = intent_id_from_secret(client_secret)
            .ok_or_else(|| "malformed payment intent client secret".to_string())?;

        let url = endpoint(&self.api_base, &["v1", "payment_intents", intent_id])
            .map_err(|err| err.message)?;

        let req = self
            .client
            .get(url)
            .bearer_auth(&self.publishable_key)
            .query(&[("client_secret", client_secret)]);

        let intent: IntentResponse = send(req).await.map_err(|err| err.message)?;

        let summary = match (intent.amount, intent.currency) {
            (Some(amount), Some(currency)) => format!(
                "Pay {:.2} {} to {}",
                amount as f64 / 100.0,
                currency.to_uppercase(),
                merchant_display_name
            ),
            _ => format!("Pay {}", merchant_display_name),
        };

        *self.session.lock().await = Some(SheetSession {
            intent_id: intent.id,
            client_secret: client_secret.into(),
            summary,
        });

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn present(&self) -> SheetOutcome {
        let session = match self.session.lock().await.take() {
            Some(session) => session,
            None => return SheetOutcome::Failed("payment sheet is not initialized".into()),
        };

        if !(self.confirmation)(session.summary.as_str()) {
            return SheetOutcome::Canceled;
        }

        let url = match endpoint(
            &self.api_base,
            &["v1", "payment_intents", session.intent_id.as_str(), "confirm"],
        ) {
            Ok(url) => url,
            Err(err) => return SheetOutcome::Failed(err.message),
        };

        let req = self
            .client
            .post(url)
            .bearer_auth(&self.publishable_key)
            .form(&[
                ("client_secret", session.client_secret.as_str()),
                ("payment_method", self.payment_method.as_str()),
            ]);

        match send::<IntentResponse>(req).await {
            Ok(intent) => match intent.status.as_str() {
                "succeeded" | "processing" | "requires_capture" => SheetOutcome::Confirmed,
                other => SheetOutcome::Failed(format!("payment not completed ({})", other)),
            },
            Err(err) => SheetOutcome::Failed(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_id_is_prefix_of_client_secret() {
        assert_eq!(intent_id_from_secret("pi_3Abc_secret_xyz"), Some("pi_3Abc"));
        assert_eq!(intent_id_from_secret("garbage"), None);
        assert_eq!(intent_id_from_secret("_secret_xyz"), None);
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let url = endpoint(
            "http://localhost:12111/",
            &["v1", "payment_methods", "../payment_intents/pi_1/cancel?x=#", "detach"],
        )
        .unwrap();

        assert_eq!(
            url.path(),
            "/v1/payment_methods/..%2Fpayment_intents%2Fpi_1%2Fcancel%3Fx=%23/detach"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn payment_method_without_card() {
        let method: PaymentMethod = PaymentMethodResponse {
            id: "pm_1".into(),
            card: None,
        }
        .into();

        assert_eq!(method.card_brand, None);
        assert_eq!(method.card_last4, None);
    }
}
