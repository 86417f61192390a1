//! Wire types for the PayMall API.
//!
//! Field names follow the server's JSON. Money fields are DRF decimals
//! serialized as strings, so they deserialize through
//! `rust_decimal::serde::str`. The server computes every total; the client
//! only mirrors them.

use chrono::{DateTime, Utc};
use paymall_core::{
    CartId, CartItemId, CategoryId, Email, MallId, OrderId, OrderItemId, OrderStatus,
    PaymentMethod, PaymentMethodId, PaymentStatus, ProductId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// An authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl User {
    /// Display name, falling back to the email's local part.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let trimmed = full.trim();
        if trimmed.is_empty() {
            self.email.local_part().to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Credentials sent to the token endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Token endpoint response. The refresh credential itself arrives in an
/// HTTP-only cookie, not in this body.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access: String,
    pub user: User,
}

/// Refresh endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

/// Bare `{"message": ...}` body some mutation endpoints return on success.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Partial profile update. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A stored payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodEntry {
    pub id: PaymentMethodId,
    pub payment_type: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Payload for registering a new payment method.
#[derive(Debug, Clone, Serialize)]
pub struct NewPaymentMethod {
    pub payment_type: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub is_default: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// A mall (physical store location).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mall {
    pub id: MallId,
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A product, as returned by the catalog list and barcode endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub barcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub marked_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mall: Option<MallId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mall_name: Option<String>,
    pub stock_quantity: u32,
    pub is_available: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart
// ─────────────────────────────────────────────────────────────────────────────

/// One line in the cart. `total_price` is server-computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// The server-authoritative cart. All totals are computed server-side;
/// the client never derives them (total = subtotal + tax is the server's
/// invariant to keep, the client trusts it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(rename = "tax_amount", with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    #[serde(rename = "total_amount", with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl Cart {
    /// Number of lines in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

/// An order as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mall: Option<Mall>,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A line on a completed order. Product fields are denormalized at order
/// time so history survives catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductId>,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub product_price: Decimal,
    pub product_barcode: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// An order as returned by the detail and create endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: OrderId,
    pub order_number: String,
    pub user: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mall: Option<MallId>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// Result of a checkout attempt.
///
/// API-level rejections (empty cart, stock exhausted) are part of normal
/// flow and come back as `Rejected` with the server's payload so the UI can
/// render inline feedback; transport failures are still `Err(ApiError)`.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Order created; the local cart has been reset.
    Completed(OrderDetail),
    /// The server declined to create the order.
    Rejected(ErrorPayload),
}

impl CheckoutOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Result of an order cancellation attempt. Non-pending orders are refused
/// by the server.
#[derive(Debug)]
pub enum CancelOutcome {
    /// The server cancelled the order, with its confirmation message when
    /// one was provided.
    Cancelled { message: Option<String> },
    Rejected(ErrorPayload),
}

impl CancelOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_deserializes_server_shape() {
        let json = r#"{
            "id": 4,
            "items": [{
                "id": 11,
                "product": {
                    "id": 2, "name": "Milk 1L", "barcode": "8901234567890",
                    "description": null, "price": "55.00", "marked_price": "60.00",
                    "discount_percentage": null, "image": null,
                    "category": 3, "category_name": "Dairy",
                    "mall": 1, "mall_name": "Central Mall",
                    "stock_quantity": 14, "is_available": true
                },
                "quantity": 2,
                "total_price": "110.00"
            }],
            "subtotal": "110.00",
            "tax_amount": "5.50",
            "total_amount": "115.50"
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal.to_string(), "110.00");
        assert_eq!(cart.tax.to_string(), "5.50");
        assert_eq!(cart.total.to_string(), "115.50");
        assert_eq!(cart.items[0].product.name, "Milk 1L");
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_order_deserializes_server_shape() {
        let json = r#"{
            "id": 9,
            "order_number": "ORD-1A2B3C4D",
            "status": "PENDING",
            "payment_status": "PAID",
            "mall": {"id": 1, "name": "Central Mall", "location": "Downtown"},
            "payment_method": "UPI",
            "total": "115.50",
            "created_at": "2025-11-02T10:30:00Z"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_number, "ORD-1A2B3C4D");
        assert!(order.status.is_cancellable());
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.mall.as_ref().unwrap().name, "Central Mall");
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            first_name: Some("Asha".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"first_name":"Asha"}"#
        );
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "email": "asha@example.com", "first_name": "", "last_name": ""}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "asha");
    }
}
