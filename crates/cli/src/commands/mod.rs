//! Command implementations for the `smartstock` binary.

pub mod auth;
pub mod dashboard;
pub mod products;
pub mod purchases;

use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::settings::Style;

use smartstock_client::ApiError;

/// Boxed error type used across command implementations.
pub type CommandError = Box<dyn std::error::Error>;

/// Uniform policy for rejected authorized requests: a 401/403 always means
/// the stored session no longer works, and the remedy is a fresh login.
pub fn surface(error: ApiError) -> CommandError {
    if error.is_auth_failure() {
        format!("{error} - your session is no longer valid, run `smartstock login` to sign in again")
            .into()
    } else {
        Box::new(error)
    }
}

/// Render rows into a bordered table for terminal output.
pub fn render_table<H, R, C>(header: H, rows: R) -> String
where
    H: IntoIterator,
    H::Item: Into<String>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// Format a decimal amount as currency for display.
pub fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formats_two_decimal_places() {
        assert_eq!(money(Decimal::new(3650, 2)), "$36.50");
        assert_eq!(money(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_render_table_includes_header_and_rows() {
        let table = render_table(["Name", "Qty"], vec![vec!["Tea", "2"]]);
        assert!(table.contains("Name"));
        assert!(table.contains("Tea"));
    }
}
