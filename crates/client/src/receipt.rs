//! Printable purchase receipts.
//!
//! Renders a purchase (plus its computed totals) into a fixed-layout A4
//! PDF: header, receipt number, issue date, customer block, the items table
//! in submission order, a totals block, and the footer lines. Totals come
//! from the core aggregator and nothing else, so the export always agrees
//! with the on-screen numbers.

use std::fs;
use std::path::Path;

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point};
use rust_decimal::Decimal;
use thiserror::Error;

use smartstock_core::{Purchase, PurchaseId};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: Mm = Mm(15.0);

// Table column x positions (product, unit price, quantity, line total).
const COL_PRODUCT: Mm = Mm(15.0);
const COL_UNIT_PRICE: Mm = Mm(105.0);
const COL_QUANTITY: Mm = Mm(140.0);
const COL_TOTAL: Mm = Mm(170.0);

const ROW_HEIGHT: Mm = Mm(7.0);

/// Errors that can occur when exporting a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Refused to render a degenerate document for an item-less purchase.
    #[error("purchase {0} has no line items; nothing to export")]
    EmptyPurchase(PurchaseId),

    /// PDF assembly failed.
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] printpdf::Error),

    /// The rendered document could not be written to disk.
    #[error("could not write receipt: {0}")]
    Io(#[from] std::io::Error),
}

/// A purchase prepared for export, with its grand total fixed up front.
#[derive(Debug)]
pub struct Receipt<'a> {
    purchase: &'a Purchase,
    grand_total: Decimal,
}

impl<'a> Receipt<'a> {
    /// Prepare a receipt for the given purchase.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::EmptyPurchase`] if the purchase has no line
    /// items - no document is produced in that case.
    pub fn new(purchase: &'a Purchase) -> Result<Self, ReceiptError> {
        if purchase.items.is_empty() {
            return Err(ReceiptError::EmptyPurchase(purchase.id));
        }

        Ok(Self {
            purchase,
            grand_total: purchase.grand_total(),
        })
    }

    /// The grand total that will appear on the document.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Default artifact name for this receipt.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("purchase-receipt-{}.pdf", self.purchase.id)
    }

    /// Render the receipt into PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PDF assembly fails.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, ReceiptError> {
        let (doc, page, layer) =
            PdfDocument::new("Purchase Receipt", PAGE_WIDTH, PAGE_HEIGHT, "receipt");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        let purchase = self.purchase;
        let mut y = Mm(277.0);

        // Header
        layer.use_text("Purchase Receipt", 16.0, Mm(80.0), y, &bold);
        y = y - Mm(12.0);
        layer.use_text(
            format!("Receipt #: {}", purchase.id),
            10.0,
            MARGIN,
            y,
            &regular,
        );
        y = y - Mm(5.0);
        layer.use_text(
            format!("Date: {}", purchase.purchase_date.format("%Y-%m-%d %H:%M UTC")),
            10.0,
            MARGIN,
            y,
            &regular,
        );

        // Customer block
        y = y - Mm(12.0);
        layer.use_text("Customer Information:", 12.0, MARGIN, y, &bold);
        y = y - Mm(6.0);
        layer.use_text(
            format!("Name: {}", purchase.customer_name),
            10.0,
            MARGIN,
            y,
            &regular,
        );

        // Items table, in submission order
        y = y - Mm(12.0);
        layer.use_text("Product", 10.0, COL_PRODUCT, y, &bold);
        layer.use_text("Unit Price", 10.0, COL_UNIT_PRICE, y, &bold);
        layer.use_text("Quantity", 10.0, COL_QUANTITY, y, &bold);
        layer.use_text("Total", 10.0, COL_TOTAL, y, &bold);
        y = y - Mm(2.0);
        horizontal_rule(&layer, y);

        for item in &purchase.items {
            y = y - ROW_HEIGHT;
            layer.use_text(item.product_name.as_str(), 10.0, COL_PRODUCT, y, &regular);
            layer.use_text(
                format!("${:.2}", item.unit_price),
                10.0,
                COL_UNIT_PRICE,
                y,
                &regular,
            );
            layer.use_text(item.quantity.to_string(), 10.0, COL_QUANTITY, y, &regular);
            layer.use_text(
                format!("${:.2}", item.total()),
                10.0,
                COL_TOTAL,
                y,
                &regular,
            );
        }

        y = y - Mm(4.0);
        horizontal_rule(&layer, y);

        // Totals block: subtotal, tax (none is computed - always zero),
        // grand total.
        y = y - ROW_HEIGHT;
        layer.use_text("Subtotal:", 10.0, COL_QUANTITY, y, &regular);
        layer.use_text(
            format!("${:.2}", self.grand_total),
            10.0,
            COL_TOTAL,
            y,
            &regular,
        );
        y = y - Mm(5.0);
        layer.use_text("Tax:", 10.0, COL_QUANTITY, y, &regular);
        layer.use_text("$0.00", 10.0, COL_TOTAL, y, &regular);
        y = y - Mm(6.0);
        layer.use_text("Total:", 12.0, COL_QUANTITY, y, &bold);
        layer.use_text(
            format!("${:.2}", self.grand_total),
            12.0,
            COL_TOTAL,
            y,
            &bold,
        );

        // Footer
        y = y - Mm(18.0);
        layer.use_text("Thank you for your purchase!", 10.0, Mm(80.0), y, &regular);
        y = y - Mm(5.0);
        layer.use_text("SmartStock Inventory System", 10.0, Mm(80.0), y, &regular);

        Ok(doc.save_to_bytes()?)
    }

    /// Render and save the receipt to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReceiptError> {
        let bytes = self.to_pdf_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

fn horizontal_rule(layer: &PdfLayerReference, y: Mm) {
    let rule = Line {
        points: vec![
            (Point::new(MARGIN, y), false),
            (Point::new(Mm(195.0), y), false),
        ],
        is_closed: false,
    };
    layer.add_line(rule);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use smartstock_core::{PurchaseItemId, PurchaseLineItem};

    use super::*;

    fn populated_purchase() -> Purchase {
        Purchase {
            id: PurchaseId::new(42),
            customer_name: "Ada Lovelace".to_string(),
            purchase_date: Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap(),
            items: vec![
                PurchaseLineItem {
                    id: PurchaseItemId::new(1),
                    product_name: "Green Tea".to_string(),
                    unit_price: Decimal::new(1000, 2),
                    quantity: 2,
                    line_total: Some(Decimal::new(2000, 2)),
                },
                PurchaseLineItem {
                    id: PurchaseItemId::new(2),
                    product_name: "Biscuits".to_string(),
                    unit_price: Decimal::new(550, 2),
                    quantity: 3,
                    line_total: None,
                },
            ],
        }
    }

    #[test]
    fn test_empty_purchase_is_rejected() {
        let purchase = Purchase {
            id: PurchaseId::new(7),
            customer_name: "Nobody".to_string(),
            purchase_date: Utc::now(),
            items: vec![],
        };

        let result = Receipt::new(&purchase);
        assert!(matches!(result, Err(ReceiptError::EmptyPurchase(id)) if id == purchase.id));
    }

    #[test]
    fn test_grand_total_matches_aggregator() {
        let purchase = populated_purchase();
        let receipt = Receipt::new(&purchase).unwrap();
        assert_eq!(receipt.grand_total(), Decimal::new(3650, 2));
    }

    #[test]
    fn test_file_name_uses_purchase_id() {
        let purchase = populated_purchase();
        let receipt = Receipt::new(&purchase).unwrap();
        assert_eq!(receipt.file_name(), "purchase-receipt-42.pdf");
    }

    #[test]
    fn test_rendered_bytes_are_a_pdf() {
        let purchase = populated_purchase();
        let receipt = Receipt::new(&purchase).unwrap();

        let bytes = receipt.to_pdf_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let purchase = populated_purchase();
        let receipt = Receipt::new(&purchase).unwrap();

        let path = dir.path().join(receipt.file_name());
        receipt.save(&path).unwrap();

        assert!(path.metadata().unwrap().len() > 0);
    }
}
