//! Integration tests for the PayMall client.
//!
//! Each test stands up a `wiremock` `MockServer` playing the PayMall API
//! and drives the real client against it - the full path through bearer
//! attachment, 401 interception, the refresh coordinator, and the stores.
//!
//! # Test Categories
//!
//! - `auth_refresh` - refresh coordination: single-flight, replay, fan-out
//! - `session` - session rehydration, login, registration, logout, profile
//! - `cart` - cart mirror, request-then-refetch, checkout invalidation
//! - `catalog` - product filtering and barcode resolution
//! - `orders` - order history, invoices, cancellation
//! - `payments` - stored payment methods

#![allow(clippy::expect_used)]

use paymall_client::{
    CartStore, Catalog, ClientConfig, HttpClient, Orders, PaymentMethods, SessionStore,
};
use serde_json::{Value, json};
use wiremock::MockServer;

/// A mock PayMall API and a client wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub http: HttpClient,
}

impl TestContext {
    /// Start a mock server and build a client pointed at it.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::new(server.uri()).expect("mock server URI must be valid");
        let http = HttpClient::new(&config).expect("client construction must succeed");
        Self { server, http }
    }

    #[must_use]
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.http.clone())
    }

    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::new(self.http.clone())
    }

    #[must_use]
    pub fn orders(&self) -> Orders {
        Orders::new(self.http.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.http.clone())
    }

    #[must_use]
    pub fn payments(&self) -> PaymentMethods {
        PaymentMethods::new(self.http.clone())
    }
}

/// A user profile as the accounts endpoints return it.
#[must_use]
pub fn user_json() -> Value {
    json!({
        "id": 7,
        "email": "asha@example.com",
        "first_name": "Asha",
        "last_name": "Verma",
        "phone_number": "+91-98000-00000"
    })
}

/// Token endpoint body. The refresh cookie rides on Set-Cookie, not here.
#[must_use]
pub fn login_json(access: &str) -> Value {
    json!({ "access": access, "user": user_json() })
}

#[must_use]
pub fn product_json(id: i64, name: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "barcode": format!("890123456789{id}"),
        "description": null,
        "price": price,
        "marked_price": null,
        "discount_percentage": null,
        "image": null,
        "category": 3,
        "category_name": "Dairy",
        "mall": 1,
        "mall_name": "Central Mall",
        "stock_quantity": 20,
        "is_available": true
    })
}

/// A one-line cart with server-computed totals.
#[must_use]
pub fn cart_json() -> Value {
    json!({
        "id": 4,
        "items": [{
            "id": 11,
            "product": product_json(2, "Milk 1L", "55.00"),
            "quantity": 2,
            "total_price": "110.00"
        }],
        "subtotal": "110.00",
        "tax_amount": "5.50",
        "total_amount": "115.50"
    })
}

#[must_use]
pub fn empty_cart_json() -> Value {
    json!({
        "id": 4,
        "items": [],
        "subtotal": "0.00",
        "tax_amount": "0.00",
        "total_amount": "0.00"
    })
}

/// The order-create / order-detail body.
#[must_use]
pub fn order_detail_json() -> Value {
    json!({
        "id": 9,
        "order_number": "ORD-1A2B3C4D",
        "user": 7,
        "mall": 1,
        "status": "PENDING",
        "payment_status": "PENDING",
        "payment_method": "UPI",
        "subtotal": "110.00",
        "tax": "5.50",
        "total": "115.50",
        "items": [{
            "id": 21,
            "product": 2,
            "product_name": "Milk 1L",
            "product_price": "55.00",
            "product_barcode": "8901234567892",
            "quantity": 2,
            "total_price": "110.00"
        }],
        "created_at": "2025-11-02T10:30:00Z"
    })
}

#[must_use]
pub fn order_list_json() -> Value {
    json!([{
        "id": 9,
        "order_number": "ORD-1A2B3C4D",
        "status": "PENDING",
        "payment_status": "PAID",
        "mall": { "id": 1, "name": "Central Mall", "location": "Downtown" },
        "payment_method": "UPI",
        "total": "115.50",
        "created_at": "2025-11-02T10:30:00Z"
    }])
}
