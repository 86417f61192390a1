//! Cart store: a client-side mirror of the server-authoritative cart.
//!
//! Mutations are request-then-refetch pairs: after every add/update/remove
//! the full cart is refetched so the mirror always carries server-computed
//! totals. There is no optimistic merge and no local price math.

use std::sync::Arc;

use paymall_core::{CartItemId, PaymentMethod, ProductId};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Cart, CheckoutOutcome, OrderDetail};

const CART_PATH: &str = "/orders/cart/";
const CART_ADD_PATH: &str = "/orders/cart/add/";
const ORDER_CREATE_PATH: &str = "/orders/orders/create/";

fn cart_item_path(item_id: CartItemId) -> String {
    format!("/orders/cart/items/{item_id}/")
}

#[derive(Default)]
struct CartState {
    cart: Option<Cart>,
    loaded: bool,
}

/// Holds the cart mirror. Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct CartStore {
    http: HttpClient,
    state: Arc<RwLock<CartState>>,
}

impl CartStore {
    /// Create a cart store over an injected HTTP client.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            state: Arc::new(RwLock::new(CartState::default())),
        }
    }

    /// The local mirror, without touching the network.
    pub async fn current(&self) -> Option<Cart> {
        self.state.read().await.cart.clone()
    }

    /// Whether the mirror reflects a fetch since the last invalidation.
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// Fetch the cart if it has not been loaded since the last
    /// invalidation; otherwise serve the mirror.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures from the fetch.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Cart, ApiError> {
        if let Some(cart) = {
            let state = self.state.read().await;
            state.loaded.then(|| state.cart.clone()).flatten()
        } {
            return Ok(cart);
        }
        self.refetch().await
    }

    /// Add a product to the cart, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidQuantity` for `quantity` < 1 without
    /// issuing a request; otherwise propagates the mutation or refetch
    /// failure (insufficient stock comes back as an API rejection).
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<Cart, ApiError> {
        if quantity < 1 {
            return Err(ApiError::InvalidQuantity);
        }

        self.http
            .post_json::<serde_json::Value>(
                CART_ADD_PATH,
                &json!({ "product_id": product_id, "quantity": quantity }),
            )
            .await?;
        self.refetch().await
    }

    /// Change a line's quantity, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidQuantity` for `quantity` < 1 without
    /// issuing a request; otherwise propagates API and transport failures.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        if quantity < 1 {
            return Err(ApiError::InvalidQuantity);
        }

        self.http
            .put_json::<serde_json::Value>(&cart_item_path(item_id), &json!({ "quantity": quantity }))
            .await?;
        self.refetch().await
    }

    /// Remove a line, then refetch.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, item_id: CartItemId) -> Result<Cart, ApiError> {
        self.http.delete(&cart_item_path(item_id)).await?;
        self.refetch().await
    }

    /// Empty the cart server-side, then refetch.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    #[instrument(skip(self))]
    pub async fn clear_remote(&self) -> Result<Cart, ApiError> {
        self.http.delete(CART_PATH).await?;
        self.refetch().await
    }

    /// Drop the local mirror. The next [`Self::load`] refetches.
    pub async fn clear_local(&self) {
        let mut state = self.state.write().await;
        state.cart = None;
        state.loaded = false;
    }

    /// Create an order from the cart.
    ///
    /// On success the local mirror is reset to empty and marked not-loaded,
    /// so the next [`Self::load`] fetches the fresh (now empty) cart rather
    /// than serving stale lines. The cart is deliberately not refetched
    /// here; the cart view may never be reopened after checkout.
    ///
    /// API rejections (empty cart, stock races) are normal flow and come
    /// back as [`CheckoutOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures or an expired
    /// session.
    #[instrument(skip(self))]
    pub async fn checkout(&self, method: PaymentMethod) -> Result<CheckoutOutcome, ApiError> {
        let result = self
            .http
            .post_json::<OrderDetail>(ORDER_CREATE_PATH, &json!({ "payment_method": method }))
            .await;

        match result {
            Ok(order) => {
                debug!(order_number = %order.order_number, "checkout complete");
                self.clear_local().await;
                Ok(CheckoutOutcome::Completed(order))
            }
            Err(ApiError::Api { status, payload }) => {
                debug!(status, message = payload.message(), "checkout rejected");
                Ok(CheckoutOutcome::Rejected(payload))
            }
            Err(err) => Err(err),
        }
    }

    async fn refetch(&self) -> Result<Cart, ApiError> {
        let cart: Cart = self.http.get_json(CART_PATH).await?;
        let mut state = self.state.write().await;
        state.cart = Some(cart.clone());
        state.loaded = true;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn offline_store() -> CartStore {
        // Points at a closed port; these tests must not reach the network.
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        CartStore::new(HttpClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_locally() {
        let store = offline_store();
        let err = store.add_item(ProductId::new(1), 0).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuantity));

        let err = store
            .update_quantity(CartItemId::new(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_mirror_starts_unloaded() {
        let store = offline_store();
        assert!(!store.is_loaded().await);
        assert!(store.current().await.is_none());
    }
}
