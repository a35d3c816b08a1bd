use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{PaymentMethod, PaymentSheetSetup};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    user_id: Option<String>,
}

impl UserParams {
    fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

pub async fn init_payment_sheet(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<UserParams>,
) -> Result<Json<PaymentSheetSetup>, Error> {
    let setup = api.init_payment_sheet(params.user_id()).await?;

    Ok(setup.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<PaymentMethod>>, Error> {
    let methods = api.list_payment_methods(params.user_id()).await?;

    Ok(methods.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    Path(pm_id): Path<String>,
) -> Result<Json<PaymentMethod>, Error> {
    let detached = api.remove_payment_method(&pm_id).await?;

    Ok(detached.into())
}
