//! Report generation business logic.
//!
//! This module builds the inventory overview and product search results, and holds
//! the text formatting helpers shared by the bot layer. All functions are
//! framework-agnostic and return structured data or plain strings.

use crate::{
    core::{catalog, ledger},
    entities::product,
    errors::Result,
};
use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;

/// One product's line in the inventory overview.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLine {
    /// The product
    pub product: product::Model,
    /// Current stock
    pub stock: f64,
    /// Latest purchase cost figure, if any
    pub last_price: Option<f64>,
    /// When the product was last purchased, if ever
    pub last_purchase_at: Option<NaiveDateTime>,
}

/// Builds the stock line for a single product as of now.
pub async fn stock_line<C>(db: &C, product: product::Model) -> Result<StockLine>
where
    C: ConnectionTrait,
{
    let stock = ledger::current_stock(db, product.id).await?;
    let last_price = ledger::last_purchase_price(db, product.id, None).await?;
    let last_purchase_at = ledger::last_purchase_timestamp(db, product.id, None).await?;

    Ok(StockLine {
        product,
        stock,
        last_price,
        last_purchase_at,
    })
}

/// Every product with its stock and latest purchase, sorted by name.
pub async fn inventory_overview<C>(db: &C) -> Result<Vec<StockLine>>
where
    C: ConnectionTrait,
{
    let mut products = catalog::list_all(db).await?;
    products.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines = Vec::with_capacity(products.len());
    for product in products {
        lines.push(stock_line(db, product).await?);
    }
    Ok(lines)
}

/// Finds a product for a free-text search.
///
/// An exact (trimmed) name match wins; otherwise the first product in store order
/// whose name contains the term, ignoring case.
pub async fn find_product<C>(db: &C, term: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    let term = term.trim();
    if term.is_empty() {
        return Ok(None);
    }

    if let Some(exact) = catalog::get_product_by_name(db, term).await? {
        return Ok(Some(exact));
    }

    let needle = term.to_lowercase();
    Ok(catalog::list_all(db)
        .await?
        .into_iter()
        .find(|p| p.name.to_lowercase().contains(&needle)))
}

/// Formats a timestamp in 12-hour form, e.g. `Jan 05, 2024, 03:04 PM`.
#[must_use]
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%b %d, %Y, %I:%M %p").to_string()
}

/// Formats a money figure with two decimals and the currency label.
#[must_use]
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Formats an optional cost figure, `N/A` when absent.
#[must_use]
pub fn format_optional_money(amount: Option<f64>, currency: &str) -> String {
    amount.map_or_else(|| "N/A".to_string(), |a| format_money(a, currency))
}

/// Formats a quantity without trailing zeros, followed by its unit.
#[must_use]
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    let fixed = format!("{quantity:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let number = if trimmed == "-0" { "0" } else { trimmed };
    format!("{number} {unit}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::ledger::record_at;
    use crate::test_utils::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(at(2024, 1, 5, 15, 4, 0)),
            "Jan 05, 2024, 03:04 PM"
        );
        assert_eq!(
            format_timestamp(at(2024, 12, 31, 0, 30, 0)),
            "Dec 31, 2024, 12:30 AM"
        );
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1000.0, "INR"), "1000.00 INR");
        assert_eq!(format_money(-12.5, "BDT"), "-12.50 BDT");
        assert_eq!(format_optional_money(None, "INR"), "N/A");
        assert_eq!(format_optional_money(Some(2.5), "INR"), "2.50 INR");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(50.0, "kg"), "50 kg");
        assert_eq!(format_quantity(2.5, "liters"), "2.5 liters");
        assert_eq!(format_quantity(0.125, "kg"), "0.125 kg");
        assert_eq!(format_quantity(-20.0, "kg"), "-20 kg");
        assert_eq!(format_quantity(0.0, "pieces"), "0 pieces");
    }

    #[tokio::test]
    async fn test_inventory_overview() -> Result<()> {
        let db = setup_test_db().await?;
        let sugar = create_custom_product(&db, "Sugar", "kg").await?;
        let oil = create_custom_product(&db, "Oil", "liters").await?;

        record_at(&db, sugar.id, 20.0, Some(900.0), at(2024, 1, 1, 9, 0, 0)).await?;
        record_at(&db, sugar.id, -5.0, Some(48.0), at(2024, 1, 2, 9, 0, 0)).await?;
        record_at(&db, oil.id, 3.0, None, at(2024, 1, 3, 9, 0, 0)).await?;

        let lines = inventory_overview(&db).await?;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product.name, "Oil");
        assert_eq!(lines[0].stock, 3.0);
        assert_eq!(lines[0].last_price, None);
        assert_eq!(lines[0].last_purchase_at, Some(at(2024, 1, 3, 9, 0, 0)));
        assert_eq!(lines[1].product.name, "Sugar");
        assert_eq!(lines[1].stock, 15.0);
        assert_eq!(lines[1].last_price, Some(900.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_product() -> Result<()> {
        let db = setup_test_db().await?;
        let basmati = create_custom_product(&db, "Basmati Rice", "kg").await?;
        let rice = create_custom_product(&db, "rice", "kg").await?;

        assert_eq!(find_product(&db, " rice ").await?.unwrap().id, rice.id);
        assert_eq!(find_product(&db, "BASMATI").await?.unwrap().id, basmati.id);
        assert_eq!(find_product(&db, "flour").await?, None);
        assert_eq!(find_product(&db, "   ").await?, None);
        Ok(())
    }
}
