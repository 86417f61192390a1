//! Catalog lookup: malls, categories, and products.
//!
//! Products are looked up by id or by barcode; the barcode endpoint backs
//! the scan flow. Barcode decoding itself happens in the scanning layer,
//! this client only resolves an already-decoded string.

use paymall_core::ProductId;
use tracing::instrument;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Category, Mall, Product};

const MALLS_PATH: &str = "/products/malls/";
const CATEGORIES_PATH: &str = "/products/categories/";
const PRODUCTS_PATH: &str = "/products/products/";

/// Optional filters for the product list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category: Option<i64>,
    /// Restrict to one mall.
    pub mall: Option<i64>,
}

impl ProductFilter {
    fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(search) = &self.search {
            query.append_pair("search", search);
        }
        if let Some(category) = self.category {
            query.append_pair("category", &category.to_string());
        }
        if let Some(mall) = self.mall {
            query.append_pair("mall", &mall.to_string());
        }
        query.finish()
    }
}

/// Read-only catalog client.
#[derive(Clone)]
pub struct Catalog {
    http: HttpClient,
}

impl Catalog {
    /// Create a catalog client over an injected HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List all malls.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn malls(&self) -> Result<Vec<Mall>, ApiError> {
        self.http.get_json(MALLS_PATH).await
    }

    /// List all product categories.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.http.get_json(CATEGORIES_PATH).await
    }

    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Propagates API and transport failures.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let query = filter.to_query();
        let path = if query.is_empty() {
            PRODUCTS_PATH.to_string()
        } else {
            format!("{PRODUCTS_PATH}?{query}")
        };
        self.http.get_json(&path).await
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// A missing product is an API rejection with status 404.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.http.get_json(&format!("{PRODUCTS_PATH}{id}/")).await
    }

    /// Resolve a scanned barcode to a product.
    ///
    /// # Errors
    ///
    /// An unknown barcode is an API rejection with status 404.
    #[instrument(skip(self))]
    pub async fn product_by_barcode(&self, barcode: &str) -> Result<Product, ApiError> {
        let encoded: String = form_urlencoded::byte_serialize(barcode.as_bytes()).collect();
        self.http
            .get_json(&format!("/products/products/barcode/{encoded}/"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_empty() {
        assert_eq!(ProductFilter::default().to_query(), "");
    }

    #[test]
    fn test_filter_query_full() {
        let filter = ProductFilter {
            search: Some("oat milk".to_string()),
            category: Some(3),
            mall: Some(1),
        };
        assert_eq!(filter.to_query(), "search=oat+milk&category=3&mall=1");
    }
}
