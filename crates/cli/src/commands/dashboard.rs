//! Inventory dashboard command.

use smartstock_client::{ApiClient, InventorySummary, SessionGuard, display_name};

use super::{CommandError, money, render_table, surface};

pub async fn run(client: &ApiClient, guard: &SessionGuard) -> Result<(), CommandError> {
    let credential = guard.require()?;
    let name = display_name(&credential).unwrap_or_else(|| "Admin".to_string());

    let products = client.list_products().await.map_err(surface)?;
    let summary = InventorySummary::from_products(&products);

    println!("Welcome back, {name}.");
    println!();
    println!("Inventory overview");
    println!("  Total products: {}", summary.total_products);
    println!("  Categories:     {}", summary.categories.len());
    println!();

    if !summary.categories.is_empty() {
        let rows = summary.categories.iter().map(|entry| {
            [
                if entry.category.is_empty() {
                    "-".to_string()
                } else {
                    entry.category.clone()
                },
                entry.count.to_string(),
            ]
        });
        println!("{}", render_table(["Category", "Products"], rows));
        println!();
    }

    if !summary.recent.is_empty() {
        println!("Recently added");
        let rows = summary.recent.iter().map(|product| {
            [
                product.id.to_string(),
                product.name.clone(),
                money(product.price),
                product.quantity.to_string(),
            ]
        });
        println!("{}", render_table(["ID", "Name", "Price", "Stock"], rows));
    }

    Ok(())
}
