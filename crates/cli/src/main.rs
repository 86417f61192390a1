//! PayMall CLI - exercise the PayMall API from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Who am I?
//! paymall whoami
//!
//! # Resolve a scanned barcode
//! paymall scan 8901234567890
//!
//! # Cart operations
//! paymall cart show
//! paymall cart add 42 --quantity 2
//! paymall cart set-qty 11 3
//! paymall cart remove 11
//! paymall cart clear
//!
//! # Checkout and orders
//! paymall checkout --method upi
//! paymall orders list
//! paymall orders show 9
//! paymall orders cancel 9
//! paymall orders invoice 9 --out invoice.pdf
//! ```
//!
//! Credentials come from `--email`/`--password` or the `PAYMALL_EMAIL` and
//! `PAYMALL_PASSWORD` environment variables; the API base URL from
//! `PAYMALL_API_URL`. Each invocation signs in, runs one command, and signs
//! out.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use paymall_client::{ClientConfig, HttpClient, SessionStore};
use paymall_core::PaymentMethod;

mod commands;

#[derive(Parser)]
#[command(name = "paymall")]
#[command(author, version, about = "PayMall shopping CLI")]
struct Cli {
    /// Account email (or PAYMALL_EMAIL)
    #[arg(long, env = "PAYMALL_EMAIL", global = true)]
    email: Option<String>,

    /// Account password (or PAYMALL_PASSWORD)
    #[arg(long, env = "PAYMALL_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user
    Whoami,
    /// Resolve a scanned barcode to a product
    Scan {
        /// The decoded barcode string
        barcode: String,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Create an order from the cart
    Checkout {
        /// Payment method (card, upi, wallet, cash)
        #[arg(short, long)]
        method: PaymentMethod,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let http = HttpClient::new(&config)?;
    let session = SessionStore::new(http.clone());

    let email = cli.email.ok_or("email required (--email or PAYMALL_EMAIL)")?;
    let password = cli
        .password
        .ok_or("password required (--password or PAYMALL_PASSWORD)")?;

    if !session.login(&email, &password).await? {
        return Err("login rejected, check credentials".into());
    }

    let result = dispatch(cli.command, &http, &session).await;

    // Best-effort sign-out regardless of command outcome
    session.logout().await;

    result
}

async fn dispatch(
    command: Commands,
    http: &HttpClient,
    session: &SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Whoami => commands::account::whoami(session).await,
        Commands::Scan { barcode } => commands::scan::lookup(http, &barcode).await,
        Commands::Cart { action } => commands::cart::run(http, action).await,
        Commands::Checkout { method } => commands::cart::checkout(http, method).await,
        Commands::Orders { action } => commands::orders::run(http, action).await,
    }
}
