//! Product browsing and management commands.

use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;

use smartstock_client::summary::search_products;
use smartstock_client::{ApiClient, SessionGuard};
use smartstock_core::{NewProduct, Product, ProductId};

use super::{CommandError, money, render_table, surface};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products, optionally filtered
    List {
        /// Case-insensitive filter on name, description, or category
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single product
    Get {
        /// Product id
        id: ProductId,
    },
    /// Create a product
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Unit price, e.g. 12.50
        #[arg(long)]
        price: Decimal,

        /// Units in stock
        #[arg(long)]
        quantity: u32,

        /// Expiry date (YYYY-MM-DD), if any
        #[arg(long)]
        expiry_date: Option<NaiveDate>,

        /// Category label
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Replace a product's fields
    Update {
        /// Product id
        id: ProductId,

        /// Display name
        #[arg(long)]
        name: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Unit price, e.g. 12.50
        #[arg(long)]
        price: Decimal,

        /// Units in stock
        #[arg(long)]
        quantity: u32,

        /// Expiry date (YYYY-MM-DD), if any
        #[arg(long)]
        expiry_date: Option<NaiveDate>,

        /// Category label
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: ProductId,
    },
}

pub async fn run(
    client: &ApiClient,
    guard: &SessionGuard,
    action: ProductAction,
) -> Result<(), CommandError> {
    guard.require()?;

    match action {
        ProductAction::List { search } => list(client, search.as_deref()).await,
        ProductAction::Get { id } => get(client, id).await,
        ProductAction::Add {
            name,
            description,
            price,
            quantity,
            expiry_date,
            category,
        } => {
            let product = client
                .create_product(&NewProduct {
                    name,
                    description,
                    price,
                    quantity,
                    expiry_date,
                    category,
                })
                .await
                .map_err(surface)?;
            println!("Created product {} ({}).", product.id, product.name);
            Ok(())
        }
        ProductAction::Update {
            id,
            name,
            description,
            price,
            quantity,
            expiry_date,
            category,
        } => {
            let product = client
                .update_product(
                    id,
                    &NewProduct {
                        name,
                        description,
                        price,
                        quantity,
                        expiry_date,
                        category,
                    },
                )
                .await
                .map_err(surface)?;
            println!("Updated product {} ({}).", product.id, product.name);
            Ok(())
        }
        ProductAction::Delete { id } => {
            client.delete_product(id).await.map_err(surface)?;
            println!("Deleted product {id}.");
            Ok(())
        }
    }
}

async fn list(client: &ApiClient, search: Option<&str>) -> Result<(), CommandError> {
    let products = client.list_products().await.map_err(surface)?;
    let shown = search_products(&products, search.unwrap_or(""));

    if shown.is_empty() {
        println!(
            "{}",
            if search.is_some() {
                "No products match your search."
            } else {
                "No products available."
            }
        );
        return Ok(());
    }

    let rows = shown.iter().map(|product| product_row(product));
    println!(
        "{}",
        render_table(
            ["ID", "Name", "Category", "Price", "Stock", "Expires"],
            rows
        )
    );
    Ok(())
}

async fn get(client: &ApiClient, id: ProductId) -> Result<(), CommandError> {
    let product = client.get_product(id).await.map_err(surface)?;

    println!("Product {}", product.id);
    println!("  Name:        {}", product.name);
    println!("  Description: {}", product.description);
    println!("  Price:       {}", money(product.price));
    println!("  In stock:    {}", product.quantity);
    println!("  Expires:     {}", format_expiry(product.expiry_date));
    println!("  Category:    {}", display_or_dash(&product.category));
    Ok(())
}

fn product_row(product: &Product) -> [String; 6] {
    [
        product.id.to_string(),
        product.name.clone(),
        display_or_dash(&product.category),
        money(product.price),
        product.quantity.to_string(),
        format_expiry(product.expiry_date),
    ]
}

fn format_expiry(expiry_date: Option<NaiveDate>) -> String {
    expiry_date.map_or_else(|| "-".to_string(), |date| date.to_string())
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
