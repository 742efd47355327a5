//! Dashboard summaries and client-side search filters.
//!
//! Plain functions called at defined points ("on view activation, fetch
//! then summarize"; "on search input, refilter") rather than anything
//! framework-bound. All pure; the data comes in from the gateway.

use std::collections::BTreeMap;

use smartstock_core::{Product, Purchase};

/// How many recently added products the dashboard shows.
const RECENT_LIMIT: usize = 5;

/// Product count for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category label as recorded on the products.
    pub category: String,
    /// Number of products in the category.
    pub count: usize,
}

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    /// Total number of products.
    pub total_products: usize,
    /// Per-category product counts, sorted by category name.
    pub categories: Vec<CategoryCount>,
    /// The most recently added products, newest first.
    pub recent: Vec<Product>,
}

impl InventorySummary {
    /// Summarize a product listing.
    ///
    /// "Recently added" follows listing order: the service returns products
    /// oldest-first, so the tail of the list is the newest.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for product in products {
            *counts.entry(product.category.as_str()).or_insert(0) += 1;
        }

        let categories = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();

        let recent = products.iter().rev().take(RECENT_LIMIT).cloned().collect();

        Self {
            total_products: products.len(),
            categories,
            recent,
        }
    }
}

/// Filter products by a case-insensitive substring of name, description,
/// or category. An empty term matches everything.
#[must_use]
pub fn search_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|product| {
            contains(&product.name, &needle)
                || contains(&product.description, &needle)
                || contains(&product.category, &needle)
        })
        .collect()
}

/// Filter purchases by a case-insensitive substring of the customer name
/// or any item's product name. An empty term matches everything.
#[must_use]
pub fn search_purchases<'a>(purchases: &'a [Purchase], term: &str) -> Vec<&'a Purchase> {
    let needle = term.to_lowercase();
    purchases
        .iter()
        .filter(|purchase| {
            contains(&purchase.customer_name, &needle)
                || purchase
                    .items
                    .iter()
                    .any(|item| contains(&item.product_name, &needle))
        })
        .collect()
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use smartstock_core::{
        ProductId, PurchaseId, PurchaseItemId, PurchaseLineItem,
    };

    use super::*;

    fn product(id: i64, name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::new(100, 2),
            quantity: 10,
            expiry_date: None,
            category: category.to_string(),
        }
    }

    fn purchase(id: i64, customer: &str, product_names: &[&str]) -> Purchase {
        Purchase {
            id: PurchaseId::new(id),
            customer_name: customer.to_string(),
            purchase_date: Utc::now(),
            items: product_names
                .iter()
                .enumerate()
                .map(|(i, name)| PurchaseLineItem {
                    id: PurchaseItemId::new(i64::try_from(i).unwrap()),
                    product_name: (*name).to_string(),
                    unit_price: Decimal::new(100, 2),
                    quantity: 1,
                    line_total: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_summary_counts_categories_sorted() {
        let products = vec![
            product(1, "Tea", "Beverages"),
            product(2, "Coffee", "Beverages"),
            product(3, "Salt", "Pantry"),
        ];

        let summary = InventorySummary::from_products(&products);
        assert_eq!(summary.total_products, 3);
        assert_eq!(
            summary.categories,
            vec![
                CategoryCount {
                    category: "Beverages".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "Pantry".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_summary_recent_is_last_five_newest_first() {
        let products: Vec<Product> = (1..=7)
            .map(|i| product(i, &format!("Product {i}"), "Misc"))
            .collect();

        let summary = InventorySummary::from_products(&products);
        let recent_names: Vec<&str> = summary.recent.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            recent_names,
            vec!["Product 7", "Product 6", "Product 5", "Product 4", "Product 3"]
        );
    }

    #[test]
    fn test_summary_of_empty_listing() {
        let summary = InventorySummary::from_products(&[]);
        assert_eq!(summary.total_products, 0);
        assert!(summary.categories.is_empty());
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_search_products_matches_any_field_case_insensitively() {
        let products = vec![
            product(1, "Green Tea", "Beverages"),
            product(2, "Salt", "Pantry"),
        ];

        assert_eq!(search_products(&products, "green").len(), 1);
        assert_eq!(search_products(&products, "PANTRY").len(), 1);
        assert_eq!(search_products(&products, "description").len(), 2);
        assert_eq!(search_products(&products, "missing").len(), 0);
    }

    #[test]
    fn test_search_with_empty_term_matches_everything() {
        let products = vec![product(1, "Tea", "Beverages")];
        assert_eq!(search_products(&products, "").len(), 1);
    }

    #[test]
    fn test_search_purchases_matches_customer_or_item() {
        let purchases = vec![
            purchase(1, "Ada Lovelace", &["Green Tea"]),
            purchase(2, "Charles Babbage", &["Salt"]),
        ];

        assert_eq!(search_purchases(&purchases, "ada").len(), 1);
        assert_eq!(search_purchases(&purchases, "salt").len(), 1);
        assert_eq!(search_purchases(&purchases, "nobody").len(), 0);
    }
}
