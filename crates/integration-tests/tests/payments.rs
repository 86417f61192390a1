//! Stored payment methods: list, create, delete.

use paymall_client::NewPaymentMethod;
use paymall_core::{PaymentMethod, PaymentMethodId};
use paymall_integration_tests::TestContext;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const PAYMENT_METHODS_PATH: &str = "/users/payment-methods/";

#[tokio::test]
async fn list_parses_stored_methods() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(PAYMENT_METHODS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "payment_type": "CARD", "provider": "Visa", "is_default": true },
            { "id": 6, "payment_type": "UPI", "provider": null, "is_default": false }
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let methods = ctx.payments().list().await.expect("list");
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].payment_type, PaymentMethod::Card);
    assert!(methods[0].is_default);
    assert_eq!(methods[1].provider, None);
}

#[tokio::test]
async fn create_sends_the_wire_shape_and_parses_the_entry() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(PAYMENT_METHODS_PATH))
        .and(body_json(json!({
            "payment_type": "CARD",
            "provider": "Visa",
            "is_default": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "payment_type": "CARD",
            "provider": "Visa",
            "is_default": true
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let entry = ctx
        .payments()
        .create(&NewPaymentMethod {
            payment_type: PaymentMethod::Card,
            provider: Some("Visa".to_string()),
            is_default: true,
        })
        .await
        .expect("create");
    assert_eq!(entry.id.as_i64(), 5);
    assert_eq!(entry.payment_type, PaymentMethod::Card);
}

#[tokio::test]
async fn delete_hits_the_entry_path() {
    let ctx = TestContext::new().await;

    Mock::given(method("DELETE"))
        .and(path("/users/payment-methods/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.payments()
        .delete(PaymentMethodId::new(5))
        .await
        .expect("delete");
}
