//! Order history: list, detail, invoice download, cancellation.
//!
//! Order creation lives on the cart store (`CartStore::checkout`) since it
//! consumes the cart.

use paymall_core::OrderId;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Acknowledgement, CancelOutcome, Order, OrderDetail};

const ORDERS_PATH: &str = "/orders/orders/";

/// Client for the order history endpoints.
#[derive(Clone)]
pub struct Orders {
    http: HttpClient,
}

impl Orders {
    /// Create an orders client over an injected HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List the user's orders, newest first (server-side ordering).
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        self.http.get_json(ORDERS_PATH).await
    }

    /// Fetch one order with its lines.
    ///
    /// # Errors
    ///
    /// An unknown or foreign order is an API rejection with status 404.
    pub async fn detail(&self, id: OrderId) -> Result<OrderDetail, ApiError> {
        self.http.get_json(&format!("{ORDERS_PATH}{id}/")).await
    }

    /// Download the invoice PDF for an order.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    #[instrument(skip(self))]
    pub async fn invoice(&self, id: OrderId) -> Result<Vec<u8>, ApiError> {
        self.http.get_bytes(&format!("{ORDERS_PATH}{id}/invoice/")).await
    }

    /// Ask the server to cancel an order.
    ///
    /// The server refuses non-pending orders; that refusal is normal flow
    /// and comes back as [`CancelOutcome::Rejected`] with the server's
    /// message. Acceptance carries the server's confirmation message too,
    /// when one is provided.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures or an expired
    /// session.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<CancelOutcome, ApiError> {
        let result = self
            .http
            .post_empty_json::<Acknowledgement>(&format!("{ORDERS_PATH}{id}/cancel/"))
            .await;
        match result {
            Ok(ack) => Ok(CancelOutcome::Cancelled { message: ack.message }),
            Err(ApiError::Api { payload, .. }) => Ok(CancelOutcome::Rejected(payload)),
            Err(err) => Err(err),
        }
    }
}
