use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::{entities::RouteSummary, error::Error};

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    pickup: Option<String>,
    dropoff: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<RouteSummary>, Error> {
    // absent and null addresses fail the same check as empty ones
    let pickup = params.pickup.unwrap_or_default();
    let dropoff = params.dropoff.unwrap_or_default();

    let route = api.find_route(&pickup, &dropoff).await?;

    Ok(route.into())
}
