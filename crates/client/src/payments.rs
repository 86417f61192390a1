//! Stored payment methods.

use paymall_core::PaymentMethodId;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{NewPaymentMethod, PaymentMethodEntry};

const PAYMENT_METHODS_PATH: &str = "/users/payment-methods/";

/// Client for the payment-method endpoints.
#[derive(Clone)]
pub struct PaymentMethods {
    http: HttpClient,
}

impl PaymentMethods {
    /// Create a payment-methods client over an injected HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List the user's stored payment methods.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn list(&self) -> Result<Vec<PaymentMethodEntry>, ApiError> {
        self.http.get_json(PAYMENT_METHODS_PATH).await
    }

    /// Register a new payment method. Setting `is_default` unsets the
    /// previous default of the same type server-side.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn create(&self, method: &NewPaymentMethod) -> Result<PaymentMethodEntry, ApiError> {
        self.http.post_json(PAYMENT_METHODS_PATH, method).await
    }

    /// Remove a stored payment method.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn delete(&self, id: PaymentMethodId) -> Result<(), ApiError> {
        self.http.delete(&format!("{PAYMENT_METHODS_PATH}{id}/")).await
    }
}
