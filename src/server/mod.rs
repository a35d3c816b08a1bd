mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{delete, get, post},
    Router,
};

use crate::api::DynAPI;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{payment_methods, payments, routes};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/route", post(routes::create))
        .route(
            "/api/payment/create-payment-intent",
            post(payments::create_intent),
        )
        .route("/api/payment/history", get(payments::history))
        .route(
            "/api/payment-methods/init-payment-sheet",
            post(payment_methods::init_payment_sheet),
        )
        .route("/api/payment-methods/list", get(payment_methods::list))
        .route(
            "/api/payment-methods/remove/:pm_id",
            delete(payment_methods::remove),
        )
        .layer(Extension(api))
}

pub async fn serve(api: DynAPI, port: u16) -> Result<(), Error> {
    let app = router(api);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(%err, "server error");
            unexpected_error()
        })
}

async fn root() -> &'static str {
    "TaxiLuxe API is up"
}
