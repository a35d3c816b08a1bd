use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{PaymentIntent, PaymentIntentRecord};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateIntentParams {
    amount: Option<i64>,
    currency: Option<String>,
}

pub async fn create_intent(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateIntentParams>,
) -> Result<Json<PaymentIntent>, Error> {
    // absent fields fail the same validation as zero / empty ones
    let amount = params.amount.unwrap_or(0);
    let currency = params.currency.unwrap_or_default();

    let intent = api.create_payment_intent(amount, &currency).await?;

    Ok(intent.into())
}

pub async fn history(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Vec<PaymentIntentRecord>>, Error> {
    let history = api.list_payment_history().await?;

    Ok(history.into())
}
