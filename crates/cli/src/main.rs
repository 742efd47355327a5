//! SmartStock CLI - inventory client frontend.
//!
//! # Usage
//!
//! ```bash
//! # Log in (persists the session until logout)
//! smartstock login -u admin -p <password>
//!
//! # Browse and manage products
//! smartstock products list --search tea
//! smartstock products add --name "Green Tea" --price 12.50 --quantity 40 --category Beverages
//!
//! # Record a purchase and export its receipt
//! smartstock purchases record --customer "Ada Lovelace" --item 3:2 --item 7:1
//! smartstock purchases receipt 9
//!
//! # Inventory overview
//! smartstock dashboard
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Session lifecycle
//! - `products` - List, inspect, create, update, and delete products
//! - `purchases` - Record, browse, delete purchases and export receipts
//! - `dashboard` - Inventory summary (counts, categories, recent products)
//!
//! Protected commands check the session up front and every rejected
//! authorization is answered the same way: log in again.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use smartstock_client::{ApiClient, ClientConfig, SessionGuard, SessionStore};

mod commands;

use commands::products::ProductAction;
use commands::purchases::PurchaseAction;

#[derive(Parser)]
#[command(name = "smartstock")]
#[command(author, version, about = "SmartStock inventory client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the inventory service and persist the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Record and inspect purchases
    Purchases {
        #[command(subcommand)]
        action: PurchaseAction,
    },
    /// Show the inventory summary
    Dashboard,
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
    let store = SessionStore::new(&config.session_file);
    let guard = SessionGuard::new(store.clone());
    let client = ApiClient::new(&config, store.clone())?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, &store, &username, &password).await
        }
        Commands::Logout => commands::auth::logout(&store),
        Commands::Products { action } => commands::products::run(&client, &guard, action).await,
        Commands::Purchases { action } => commands::purchases::run(&client, &guard, action).await,
        Commands::Dashboard => commands::dashboard::run(&client, &guard).await,
    }
}
