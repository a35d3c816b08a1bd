use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processor-side authorization returned when an intent is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessorIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
}

/// What the client needs to confirm a payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
    pub intent_id: String,
}

/// History entry written once per created intent.
///
/// `status` is passed through from the processor as-is (`requires_payment_method`,
/// `processing`, `succeeded`, ...) and is a snapshot taken at creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRecord {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentIntentRecord {
    pub fn new(intent: &ProcessorIntent, amount: i64, currency: &str) -> Self {
        Self {
            id: intent.id.clone(),
            amount,
            currency: currency.into(),
            status: intent.status.clone(),
            created_at: Utc::now(),
        }
    }
}
