//! PayMall Core - Shared types library.
//!
//! This crate provides common types used across all PayMall client components:
//! - `client` - The PayMall API client (auth, cart, catalog, orders)
//! - `cli` - Command-line tools for exercising the API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
