use super::Engine;

use async_trait::async_trait;

use crate::{
    api::PaymentAPI,
    entities::{PaymentIntent, PaymentIntentRecord},
    error::{invalid_amount_error, invalid_currency_error, Error},
};

#[async_trait]
impl PaymentAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, Error> {
        if amount <= 0 {
            return Err(invalid_amount_error());
        }

        let currency = currency.trim();
        if currency.is_empty() {
            return Err(invalid_currency_error());
        }

        let intent = self
            .processor
            .create_payment_intent(amount, currency)
            .await?;

        // the intent exists at the processor from here on; a lost history
        // entry only affects what the client displays
        let record = PaymentIntentRecord::new(&intent, amount, currency);
        if let Err(err) = self.history.append(&record).await {
            tracing::error!(id = %record.id, %err, "failed to record payment intent");
        }

        Ok(PaymentIntent {
            client_secret: intent.client_secret,
            intent_id: intent.id,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn list_payment_history(&self) -> Result<Vec<PaymentIntentRecord>, Error> {
        self.history.list().await
    }
}
