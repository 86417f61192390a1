//! Barcode resolution.

use paymall_client::{Catalog, HttpClient};

/// Resolve a decoded barcode to a product and print it.
pub async fn lookup(http: &HttpClient, barcode: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::new(http.clone());
    let product = catalog.product_by_barcode(barcode).await?;

    println!("#{} {}", product.id, product.name);
    println!("price: {}", product.price);
    if let Some(mall) = &product.mall_name {
        println!("mall: {mall}");
    }
    if product.is_available {
        println!("in stock: {}", product.stock_quantity);
    } else {
        println!("unavailable");
    }
    Ok(())
}
