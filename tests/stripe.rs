//! Stripe client and test payment sheet against a mock HTTP server.

use std::sync::Arc;

use serde_json::json;
use taxiluxe::booking::{PaymentSheet, SheetOutcome};
use taxiluxe::config::StripeConfig;
use taxiluxe::error::PROCESSOR;
use taxiluxe::external::stripe::{PaymentProcessor, Stripe, StripePaymentSheet, API_VERSION};
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn stripe(server: &MockServer) -> Stripe {
    Stripe::new(StripeConfig {
        api_base: server.uri(),
        secret_key: "sk_test_123".into(),
    })
}

fn sheet(server: &MockServer, accept: bool) -> StripePaymentSheet {
    StripePaymentSheet::new(
        server.uri(),
        "pk_test_123",
        "pm_card_visa",
        Arc::new(move |_: &str| accept),
    )
}

#[tokio::test]
async fn creates_payment_intent_with_automatic_methods() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(header("stripe-version", API_VERSION))
        .and(body_string_contains("amount=1500"))
        .and(body_string_contains("currency=eur"))
        .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "object": "payment_intent",
            "amount": 1500,
            "currency": "eur",
            "status": "requires_payment_method",
            "client_secret": "pi_1_secret_abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let intent = stripe(&server)
        .create_payment_intent(1500, "eur")
        .await
        .unwrap();

    assert_eq!(intent.id, "pi_1");
    assert_eq!(intent.client_secret, "pi_1_secret_abc");
    assert_eq!(intent.status, "requires_payment_method");
}

#[tokio::test]
async fn processor_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "Invalid API Key provided: sk_test_***123"
            }
        })))
        .mount(&server)
        .await;

    let err = stripe(&server)
        .create_payment_intent(1500, "eur")
        .await
        .unwrap_err();

    assert_eq!(err.code, PROCESSOR);
    assert_eq!(err.message, "Invalid API Key provided: sk_test_***123");
}

#[tokio::test]
async fn lists_card_payment_methods() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/payment_methods"))
        .and(query_param("customer", "cus_1"))
        .and(query_param("type", "card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "pm_1", "type": "card", "card": {"brand": "visa", "last4": "4242"}},
                {"id": "pm_2", "type": "card", "card": {"brand": "mastercard", "last4": "4444"}}
            ],
            "has_more": false
        })))
        .mount(&server)
        .await;

    let methods = stripe(&server)
        .list_card_payment_methods("cus_1")
        .await
        .unwrap();

    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].id, "pm_1");
    assert_eq!(methods[0].card_brand.as_deref(), Some("visa"));
    assert_eq!(methods[1].card_last4.as_deref(), Some("4444"));
}

#[tokio::test]
async fn detaches_payment_method() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_methods/pm_1/detach"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pm_1",
            "card": {"brand": "visa", "last4": "4242"},
            "customer": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detached = stripe(&server).detach_payment_method("pm_1").await.unwrap();

    assert_eq!(detached.id, "pm_1");
}

#[tokio::test]
async fn detach_keeps_odd_ids_inside_the_payment_method_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "pi_1"})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No such PaymentMethod"}
        })))
        .mount(&server)
        .await;

    let err = stripe(&server)
        .detach_payment_method("../payment_intents/pi_1/cancel?x=")
        .await
        .unwrap_err();

    assert_eq!(err.code, PROCESSOR);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].url.path(),
        "/v1/payment_methods/..%2Fpayment_intents%2Fpi_1%2Fcancel%3Fx=/detach"
    );
    assert_eq!(received[0].url.query(), None);
}

async fn mount_intent_lookup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/payment_intents/pi_1"))
        .and(query_param("client_secret", "pi_1_secret_abc"))
        .and(header("authorization", "Bearer pk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "amount": 1897,
            "currency": "eur",
            "status": "requires_payment_method"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sheet_confirms_with_test_payment_method() {
    let server = MockServer::start().await;
    mount_intent_lookup(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_1/confirm"))
        .and(body_string_contains("payment_method=pm_card_visa"))
        .and(body_string_contains("client_secret=pi_1_secret_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "status": "succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sheet = sheet(&server, true);

    sheet.initialize("pi_1_secret_abc", "TaxiLuxe").await.unwrap();

    assert_eq!(sheet.present().await, SheetOutcome::Confirmed);
}

#[tokio::test]
async fn sheet_dismissed_by_user_never_confirms() {
    let server = MockServer::start().await;
    mount_intent_lookup(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_1/confirm"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sheet = sheet(&server, false);

    sheet.initialize("pi_1_secret_abc", "TaxiLuxe").await.unwrap();

    assert_eq!(sheet.present().await, SheetOutcome::Canceled);
}

#[tokio::test]
async fn declined_card_fails_with_processor_message() {
    let server = MockServer::start().await;
    mount_intent_lookup(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_1/confirm"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {"type": "card_error", "code": "card_declined", "message": "Your card was declined."}
        })))
        .mount(&server)
        .await;

    let sheet = sheet(&server, true);

    sheet.initialize("pi_1_secret_abc", "TaxiLuxe").await.unwrap();

    assert_eq!(
        sheet.present().await,
        SheetOutcome::Failed("Your card was declined.".into())
    );
}

#[tokio::test]
async fn unknown_intent_fails_initialization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/payment_intents/pi_9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"type": "invalid_request_error", "message": "No such payment_intent: 'pi_9'"}
        })))
        .mount(&server)
        .await;

    let sheet = sheet(&server, true);

    let err = sheet.initialize("pi_9_secret_x", "TaxiLuxe").await.unwrap_err();

    assert_eq!(err, "No such payment_intent: 'pi_9'");
    assert!(matches!(sheet.present().await, SheetOutcome::Failed(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn sheet_accepts_a_blocking_prompt() {
    let server = MockServer::start().await;
    mount_intent_lookup(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_1/confirm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "status": "succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sheet = StripePaymentSheet::new(
        server.uri(),
        "pk_test_123",
        "pm_card_visa",
        Arc::new(|summary: &str| {
            tokio::task::block_in_place(|| {
                std::thread::sleep(std::time::Duration::from_millis(20));
                summary.starts_with("Pay 18.97 EUR")
            })
        }),
    );

    sheet.initialize("pi_1_secret_abc", "TaxiLuxe").await.unwrap();

    assert_eq!(sheet.present().await, SheetOutcome::Confirmed);
}
