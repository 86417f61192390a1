//! PayMall API client library.
//!
//! A typed client for the PayMall commerce API: token-based authentication
//! with silent refresh, a session store, a server-authoritative cart store,
//! catalog and barcode lookup, order history, and invoices.
//!
//! # Architecture
//!
//! One [`HttpClient`] is constructed from a [`ClientConfig`] and injected
//! into each store - there is no hidden global client. The access token
//! lives only in process memory; the refresh credential is an HTTP-only
//! cookie held by the client's cookie store and sent automatically with the
//! refresh call. A 401 anywhere (except the refresh endpoint itself)
//! triggers one coalesced refresh and one replay; concurrent 401s share a
//! single refresh call.
//!
//! # Example
//!
//! ```rust,ignore
//! use paymall_client::{Catalog, CartStore, ClientConfig, HttpClient, SessionStore};
//! use paymall_core::PaymentMethod;
//!
//! let config = ClientConfig::from_env()?;
//! let http = HttpClient::new(&config)?;
//!
//! let session = SessionStore::new(http.clone());
//! let cart = CartStore::new(http.clone());
//! let catalog = Catalog::new(http);
//!
//! if !session.initialize().await {
//!     session.login("user@example.com", "hunter2").await?;
//! }
//!
//! let product = catalog.product_by_barcode("8901234567890").await?;
//! cart.add_item(product.id, 1).await?;
//! let outcome = cart.checkout(PaymentMethod::Upi).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
mod http;
pub mod orders;
pub mod payments;
pub mod session;
pub mod types;

pub use cart::CartStore;
pub use catalog::{Catalog, ProductFilter};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorPayload};
pub use http::{HttpClient, SessionPhase};
pub use orders::Orders;
pub use payments::PaymentMethods;
pub use session::SessionStore;
pub use types::*;
