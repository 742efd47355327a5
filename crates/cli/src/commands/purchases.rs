//! Purchase recording, browsing, and receipt export commands.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Subcommand;

use smartstock_client::summary::search_purchases;
use smartstock_client::{ApiClient, ClientError, Receipt, SessionGuard};
use smartstock_core::{NewPurchase, NewPurchaseItem, ProductId, Purchase, PurchaseId};

use super::{CommandError, money, render_table, surface};

/// One purchase line on the command line: `PRODUCT_ID:QTY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub product: ProductId,
    pub quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = s
            .split_once(':')
            .ok_or_else(|| format!("expected PRODUCT_ID:QTY, got '{s}'"))?;

        let product = product
            .trim()
            .parse::<ProductId>()
            .map_err(|e| format!("bad product id '{product}': {e}"))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad quantity '{quantity}': {e}"))?;

        // Quantity is floored at 1 when captured, same as the aggregator.
        Ok(Self {
            product,
            quantity: quantity.max(1),
        })
    }
}

impl From<ItemSpec> for NewPurchaseItem {
    fn from(spec: ItemSpec) -> Self {
        Self {
            product: spec.product,
            quantity: spec.quantity,
        }
    }
}

#[derive(Subcommand)]
pub enum PurchaseAction {
    /// List purchases, optionally filtered
    List {
        /// Case-insensitive filter on customer or product name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single purchase with its items and totals
    Get {
        /// Purchase id
        id: PurchaseId,
    },
    /// Record a purchase
    Record {
        /// Customer the purchase is for
        #[arg(short, long)]
        customer: String,

        /// Line items as PRODUCT_ID:QTY; repeatable
        #[arg(short, long = "item", value_name = "PRODUCT_ID:QTY", required = true)]
        items: Vec<ItemSpec>,
    },
    /// Delete a purchase
    Delete {
        /// Purchase id
        id: PurchaseId,
    },
    /// Export a purchase receipt as PDF
    Receipt {
        /// Purchase id
        id: PurchaseId,

        /// Output path (default: purchase-receipt-<id>.pdf)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

pub async fn run(
    client: &ApiClient,
    guard: &SessionGuard,
    action: PurchaseAction,
) -> Result<(), CommandError> {
    guard.require()?;

    match action {
        PurchaseAction::List { search } => list(client, search.as_deref()).await,
        PurchaseAction::Get { id } => get(client, id).await,
        PurchaseAction::Record { customer, items } => record(client, customer, items).await,
        PurchaseAction::Delete { id } => {
            client.delete_purchase(id).await.map_err(surface)?;
            println!("Deleted purchase {id}.");
            Ok(())
        }
        PurchaseAction::Receipt { id, out } => receipt(client, id, out).await,
    }
}

async fn list(client: &ApiClient, search: Option<&str>) -> Result<(), CommandError> {
    let purchases = client.list_purchases().await.map_err(surface)?;
    let shown = search_purchases(&purchases, search.unwrap_or(""));

    if shown.is_empty() {
        println!(
            "{}",
            if search.is_some() {
                "No purchases match your search."
            } else {
                "No purchase history available."
            }
        );
        return Ok(());
    }

    let rows = shown.iter().map(|purchase| purchase_row(purchase));
    println!(
        "{}",
        render_table(["ID", "Customer", "Date", "Items", "Total"], rows)
    );
    Ok(())
}

async fn get(client: &ApiClient, id: PurchaseId) -> Result<(), CommandError> {
    let purchase = client.get_purchase(id).await.map_err(surface)?;

    println!("Purchase Receipt");
    println!("  Receipt #: {}", purchase.id);
    println!("  Customer:  {}", purchase.customer_name);
    println!(
        "  Date:      {}",
        purchase.purchase_date.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    let rows = purchase.items.iter().map(|item| {
        [
            item.product_name.clone(),
            money(item.unit_price),
            item.quantity.to_string(),
            money(item.total()),
        ]
    });
    println!(
        "{}",
        render_table(["Product", "Unit Price", "Quantity", "Total"], rows)
    );

    let grand_total = purchase.grand_total();
    println!();
    println!("  Subtotal: {}", money(grand_total));
    println!("  Tax:      $0.00");
    println!("  Total:    {}", money(grand_total));
    Ok(())
}

async fn record(
    client: &ApiClient,
    customer: String,
    items: Vec<ItemSpec>,
) -> Result<(), CommandError> {
    // clap already requires at least one --item; keep the typed rejection
    // for callers that bypass argument parsing.
    if items.is_empty() {
        return Err(Box::new(ClientError::EmptySubmission));
    }

    let submission = NewPurchase {
        customer_name: customer,
        items: items.into_iter().map(NewPurchaseItem::from).collect(),
    };

    let purchase = client.create_purchase(&submission).await.map_err(surface)?;
    println!(
        "Purchase {} recorded for {} - total {}.",
        purchase.id,
        purchase.customer_name,
        money(purchase.grand_total())
    );
    Ok(())
}

async fn receipt(
    client: &ApiClient,
    id: PurchaseId,
    out: Option<PathBuf>,
) -> Result<(), CommandError> {
    let purchase = client.get_purchase(id).await.map_err(surface)?;

    let receipt = Receipt::new(&purchase)?;
    let path = out.unwrap_or_else(|| PathBuf::from(receipt.file_name()));
    receipt.save(&path)?;

    println!(
        "Receipt for purchase {} ({}) saved to {}.",
        purchase.id,
        money(receipt.grand_total()),
        path.display()
    );
    Ok(())
}

fn purchase_row(purchase: &Purchase) -> [String; 5] {
    [
        purchase.id.to_string(),
        purchase.customer_name.clone(),
        purchase.purchase_date.format("%Y-%m-%d").to_string(),
        purchase.items.len().to_string(),
        money(purchase.grand_total()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_spec_parses_id_and_quantity() {
        let spec: ItemSpec = "3:2".parse().unwrap();
        assert_eq!(spec.product, ProductId::new(3));
        assert_eq!(spec.quantity, 2);
    }

    #[test]
    fn test_item_spec_floors_zero_quantity() {
        let spec: ItemSpec = "3:0".parse().unwrap();
        assert_eq!(spec.quantity, 1);
    }

    #[test]
    fn test_item_spec_rejects_malformed_input() {
        assert!("3".parse::<ItemSpec>().is_err());
        assert!("x:2".parse::<ItemSpec>().is_err());
        assert!("3:y".parse::<ItemSpec>().is_err());
    }
}
