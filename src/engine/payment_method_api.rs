use super::Engine;

use async_trait::async_trait;

use crate::{
    api::PaymentMethodAPI,
    entities::{PaymentMethod, PaymentSheetSetup},
    error::{invalid_identifier_error, missing_input_error, Error},
};

/// Processor object ids look like `pm_1Nq2Xy`.
fn is_object_id(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Engine {
    /// Returns the processor customer for `user_id`, creating it on first use.
    #[tracing::instrument(skip(self))]
    async fn customer_for(&self, user_id: &str) -> Result<String, Error> {
        if user_id.trim().is_empty() {
            return Err(missing_input_error("user id"));
        }

        if let Some(customer_id) = self.customers.find_customer(user_id).await? {
            return Ok(customer_id);
        }

        let customer_id = self.processor.create_customer(user_id).await?;
        self.customers.save_customer(user_id, &customer_id).await?;

        tracing::info!(%customer_id, "created processor customer");

        Ok(customer_id)
    }
}

#[async_trait]
impl PaymentMethodAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn init_payment_sheet(&self, user_id: &str) -> Result<PaymentSheetSetup, Error> {
        let customer_id = self.customer_for(user_id).await?;

        let ephemeral_key = self.processor.create_ephemeral_key(&customer_id).await?;
        let setup_intent_client_secret = self.processor.create_setup_intent(&customer_id).await?;

        Ok(PaymentSheetSetup {
            setup_intent_client_secret,
            ephemeral_key,
            customer_id,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn list_payment_methods(&self, user_id: &str) -> Result<Vec<PaymentMethod>, Error> {
        let customer_id = self.customer_for(user_id).await?;

        self.processor.list_card_payment_methods(&customer_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_payment_method(&self, payment_method_id: &str) -> Result<PaymentMethod, Error> {
        if payment_method_id.trim().is_empty() {
            return Err(missing_input_error("payment method id"));
        }

        if !is_object_id(payment_method_id) {
            return Err(invalid_identifier_error(payment_method_id));
        }

        self.processor.detach_payment_method(payment_method_id).await
    }
}
