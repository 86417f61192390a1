//! Cart commands.

use clap::Subcommand;
use paymall_client::{Cart, CartStore, CheckoutOutcome, HttpClient};
use paymall_core::{CartItemId, PaymentMethod, ProductId};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart with server-computed totals
    Show,
    /// Add a product by id
    Add {
        /// Product id
        product_id: i64,
        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    SetQty {
        /// Cart item id
        item_id: i64,
        /// New quantity
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Cart item id
        item_id: i64,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(http: &HttpClient, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = CartStore::new(http.clone());

    let cart = match action {
        CartAction::Show => store.load().await?,
        CartAction::Add {
            product_id,
            quantity,
        } => store.add_item(ProductId::new(product_id), quantity).await?,
        CartAction::SetQty { item_id, quantity } => {
            store
                .update_quantity(CartItemId::new(item_id), quantity)
                .await?
        }
        CartAction::Remove { item_id } => store.remove_item(CartItemId::new(item_id)).await?,
        CartAction::Clear => store.clear_remote().await?,
    };

    print_cart(&cart);
    Ok(())
}

pub async fn checkout(
    http: &HttpClient,
    method: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CartStore::new(http.clone());
    // Populate the mirror first so checkout acts on a known cart
    store.load().await?;

    match store.checkout(method).await? {
        CheckoutOutcome::Completed(order) => {
            println!("order {} created", order.order_number);
            println!("total: {} via {}", order.total, method);
            Ok(())
        }
        CheckoutOutcome::Rejected(payload) => Err(payload.message().to_string().into()),
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for item in &cart.items {
        println!(
            "[{}] {} x{} = {}",
            item.id, item.product.name, item.quantity, item.total_price
        );
    }
    println!("subtotal: {}", cart.subtotal);
    println!("tax:      {}", cart.tax);
    println!("total:    {}", cart.total);
}
