use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
}

/// Secrets the client needs to open the processor's "add payment method" sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSheetSetup {
    pub setup_intent_client_secret: String,
    pub ephemeral_key: String,
    pub customer_id: String,
}
