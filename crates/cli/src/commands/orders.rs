//! Order history commands.

use std::path::PathBuf;

use clap::Subcommand;
use paymall_client::{CancelOutcome, HttpClient, Orders};
use paymall_core::OrderId;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders, newest first
    List,
    /// Show one order with its lines
    Show {
        /// Order id
        order_id: i64,
    },
    /// Cancel a pending order
    Cancel {
        /// Order id
        order_id: i64,
    },
    /// Download the invoice PDF
    Invoice {
        /// Order id
        order_id: i64,
        /// Output path
        #[arg(short, long, default_value = "invoice.pdf")]
        out: PathBuf,
    },
}

pub async fn run(http: &HttpClient, action: OrderAction) -> Result<(), Box<dyn std::error::Error>> {
    let orders = Orders::new(http.clone());

    match action {
        OrderAction::List => {
            for order in orders.list().await? {
                println!(
                    "[{}] {} {:?}/{:?} total {} ({})",
                    order.id,
                    order.order_number,
                    order.status,
                    order.payment_status,
                    order.total,
                    order.created_at.format("%d %b %Y"),
                );
            }
        }
        OrderAction::Show { order_id } => {
            let order = orders.detail(OrderId::new(order_id)).await?;
            println!("{} ({:?})", order.order_number, order.status);
            for item in &order.items {
                println!(
                    "  {} x{} = {}",
                    item.product_name, item.quantity, item.total_price
                );
            }
            println!("subtotal: {}", order.subtotal);
            println!("tax:      {}", order.tax);
            println!("total:    {}", order.total);
        }
        OrderAction::Cancel { order_id } => {
            match orders.cancel(OrderId::new(order_id)).await? {
                CancelOutcome::Cancelled { message } => {
                    println!("{}", message.as_deref().unwrap_or("order cancelled"));
                }
                CancelOutcome::Rejected(payload) => {
                    return Err(payload.message().to_string().into());
                }
            }
        }
        OrderAction::Invoice { order_id, out } => {
            let bytes = orders.invoice(OrderId::new(order_id)).await?;
            std::fs::write(&out, bytes)?;
            println!("wrote {}", out.display());
        }
    }

    Ok(())
}
