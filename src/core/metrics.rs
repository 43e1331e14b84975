//! Metrics engine - Daily earnings and restocking needs derived from the ledger.
//!
//! The arithmetic lives in pure functions over [`Movement`] slices so the rules can
//! be checked without a database; the async wrappers only fetch the rows.

use crate::{
    core::{
        catalog,
        ledger::{self, Movement, MovementKind},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use std::{collections::BTreeMap, fmt};
use tracing::{debug, instrument};

/// How the stored price of a purchase is interpreted.
///
/// Sale prices are always per unit. Purchases depend on this setting, which is
/// fixed per database: mixing conventions in one ledger makes every cost figure
/// ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostConvention {
    /// The price column holds the total cost of the purchased lot
    #[default]
    LineTotal,
    /// The price column holds the cost of one unit
    PerUnit,
}

impl CostConvention {
    /// Money spent on a purchase line given its stored cost figure.
    #[must_use]
    pub fn purchase_line_cost(self, stored_cost: f64, quantity: f64) -> f64 {
        match self {
            Self::LineTotal => stored_cost,
            Self::PerUnit => stored_cost * quantity.abs(),
        }
    }

    /// Cost figure to store for a purchase of `quantity` units that cost
    /// `total_cost` altogether.
    #[must_use]
    pub fn stored_purchase_cost(self, total_cost: f64, quantity: f64) -> f64 {
        match self {
            Self::LineTotal => total_cost,
            Self::PerUnit => total_cost / quantity,
        }
    }
}

impl fmt::Display for CostConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineTotal => write!(f, "total cost per purchase"),
            Self::PerUnit => write!(f, "cost per unit"),
        }
    }
}

/// Revenue and cost totals for one day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyEarnings {
    /// Sum of `price * |quantity|` over sales
    pub sale_revenue: f64,
    /// Sum of purchase line costs
    pub purchase_cost: f64,
    /// `sale_revenue - purchase_cost`
    pub net: f64,
}

/// Totals revenue and cost over a day's movements. Rows without a cost figure are
/// skipped.
#[must_use]
pub fn summarize_movements(movements: &[Movement], convention: CostConvention) -> DailyEarnings {
    let mut earnings = DailyEarnings::default();

    for movement in movements {
        let Some(cost) = movement.cost else {
            continue;
        };
        match movement.kind {
            MovementKind::Purchase => {
                earnings.purchase_cost += convention.purchase_line_cost(cost, movement.quantity);
            }
            MovementKind::Sale => earnings.sale_revenue += cost * movement.quantity.abs(),
        }
    }

    earnings.net = earnings.sale_revenue - earnings.purchase_cost;
    earnings
}

/// Restocking heuristic over a day's movements and each product's current stock.
///
/// Units sold per product are accumulated. A product whose stock is below what it
/// sold reports the shortfall (never below zero); one whose stock covers it keeps
/// the sold amount. A product without sales reports zero only when its stock is
/// exactly zero and is omitted otherwise.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn compute_needs(movements: &[Movement], stocks: &[(String, f64)]) -> BTreeMap<String, f64> {
    let mut needs: BTreeMap<String, f64> = BTreeMap::new();

    for movement in movements.iter().filter(|m| m.kind == MovementKind::Sale) {
        *needs.entry(movement.product_name.clone()).or_default() += movement.quantity.abs();
    }

    for (name, stock) in stocks {
        if let Some(need) = needs.get_mut(name) {
            if *stock < *need {
                *need = (*need - *stock).max(0.0);
            }
        } else if *stock == 0.0 {
            needs.insert(name.clone(), 0.0);
        }
    }

    needs
}

/// Sale revenue, purchase cost and net for `date`.
#[instrument(skip(db))]
pub async fn daily_earnings<C>(
    db: &C,
    date: NaiveDate,
    convention: CostConvention,
) -> Result<DailyEarnings>
where
    C: ConnectionTrait,
{
    let movements = ledger::all_movements_on(db, date).await?;
    let earnings = summarize_movements(&movements, convention);
    debug!(
        "Daily earnings for {date}: revenue={}, purchase cost={}, net={}",
        earnings.sale_revenue, earnings.purchase_cost, earnings.net
    );
    Ok(earnings)
}

/// Sale revenue minus purchase cost for `date`; 0 for a day without transactions.
pub async fn daily_net<C>(db: &C, date: NaiveDate, convention: CostConvention) -> Result<f64>
where
    C: ConnectionTrait,
{
    Ok(daily_earnings(db, date, convention).await?.net)
}

/// Estimated quantities to restock per product name, based on what sold on `date`.
#[instrument(skip(db))]
pub async fn estimate_needs<C>(db: &C, date: NaiveDate) -> Result<BTreeMap<String, f64>>
where
    C: ConnectionTrait,
{
    let movements = ledger::all_movements_on(db, date).await?;

    let mut stocks = Vec::new();
    for product in catalog::list_all(db).await? {
        let stock = ledger::current_stock(db, product.id).await?;
        stocks.push((product.name, stock));
    }

    Ok(compute_needs(&movements, &stocks))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::ledger::record_at;
    use crate::test_utils::*;

    fn movement(name: &str, quantity: f64, cost: Option<f64>) -> Movement {
        Movement {
            product_name: name.to_string(),
            quantity,
            cost,
            kind: MovementKind::from_quantity(quantity),
        }
    }

    #[test]
    fn test_summarize_line_total() {
        let movements = [
            movement("Rice", 50.0, Some(1000.0)),
            movement("Rice", -20.0, Some(25.0)),
        ];

        let earnings = summarize_movements(&movements, CostConvention::LineTotal);

        assert_eq!(earnings.purchase_cost, 1000.0);
        assert_eq!(earnings.sale_revenue, 500.0);
        assert_eq!(earnings.net, -500.0);
    }

    #[test]
    fn test_summarize_per_unit() {
        let movements = [
            movement("Rice", 50.0, Some(20.0)),
            movement("Rice", -20.0, Some(25.0)),
        ];

        let earnings = summarize_movements(&movements, CostConvention::PerUnit);

        assert_eq!(earnings.purchase_cost, 1000.0);
        assert_eq!(earnings.net, -500.0);
    }

    #[test]
    fn test_summarize_skips_missing_costs() {
        let movements = [
            movement("Oil", 5.0, None),
            movement("Oil", -1.0, None),
            movement("Oil", -2.0, Some(150.0)),
        ];

        let earnings = summarize_movements(&movements, CostConvention::LineTotal);

        assert_eq!(earnings.purchase_cost, 0.0);
        assert_eq!(earnings.sale_revenue, 300.0);
    }

    #[test]
    fn test_summarize_empty_day_is_zero() {
        let earnings = summarize_movements(&[], CostConvention::LineTotal);
        assert_eq!(earnings, DailyEarnings::default());
    }

    #[test]
    fn test_cost_convention_conversions() {
        assert_eq!(CostConvention::LineTotal.stored_purchase_cost(500.0, 10.0), 500.0);
        assert_eq!(CostConvention::PerUnit.stored_purchase_cost(500.0, 10.0), 50.0);
        assert_eq!(CostConvention::LineTotal.purchase_line_cost(500.0, 10.0), 500.0);
        assert_eq!(CostConvention::PerUnit.purchase_line_cost(50.0, 10.0), 500.0);
    }

    #[test]
    fn test_compute_needs_rules() {
        let movements = [
            movement("Rice", -10.0, Some(25.0)),
            movement("Sugar", -10.0, Some(40.0)),
            movement("Sugar", 3.0, Some(90.0)),
            movement("Dal", -5.0, Some(80.0)),
            movement("Salt", -2.0, Some(20.0)),
        ];
        let stocks = [
            ("Rice".to_string(), 4.0),
            ("Sugar".to_string(), 20.0),
            ("Dal".to_string(), -3.0),
            ("Salt".to_string(), 0.0),
            ("Oil".to_string(), 0.0),
            ("Flour".to_string(), 12.0),
            ("Tea".to_string(), -1.0),
        ];

        let needs = compute_needs(&movements, &stocks);

        assert_eq!(needs.get("Rice"), Some(&6.0));
        assert_eq!(needs.get("Sugar"), Some(&10.0));
        assert_eq!(needs.get("Dal"), Some(&8.0));
        assert_eq!(needs.get("Salt"), Some(&2.0));
        assert_eq!(needs.get("Oil"), Some(&0.0));
        assert_eq!(needs.get("Flour"), None);
        assert_eq!(needs.get("Tea"), None);
        assert!(needs.values().all(|need| *need >= 0.0));
    }

    #[tokio::test]
    async fn test_daily_net_scenario() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = catalog::resolve_or_create(&db, "Rice", "kg").await?;

        record_at(&db, rice, 50.0, Some(1000.0), at(2024, 1, 1, 9, 0, 0)).await?;
        record_at(&db, rice, -20.0, Some(25.0), at(2024, 1, 1, 18, 0, 0)).await?;

        let net = daily_net(&db, date(2024, 1, 1), CostConvention::LineTotal).await?;

        assert_eq!(net, -500.0);
        assert_eq!(ledger::current_stock(&db, rice).await?, 30.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_daily_net_without_transactions() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        record_at(&db, product.id, 5.0, Some(100.0), at(2024, 1, 1, 9, 0, 0)).await?;

        assert_eq!(
            daily_net(&db, date(2024, 6, 1), CostConvention::LineTotal).await?,
            0.0
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_estimate_needs_from_ledger() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = create_custom_product(&db, "Rice", "kg").await?;
        let oil = create_custom_product(&db, "Oil", "liters").await?;
        let flour = create_custom_product(&db, "Flour", "kg").await?;

        record_at(&db, rice.id, 30.0, Some(600.0), at(2024, 1, 1, 8, 0, 0)).await?;
        record_at(&db, rice.id, -25.0, Some(25.0), at(2024, 1, 2, 10, 0, 0)).await?;
        record_at(&db, oil.id, 4.0, Some(600.0), at(2024, 1, 1, 8, 0, 0)).await?;
        record_at(&db, oil.id, -4.0, Some(160.0), at(2024, 1, 1, 19, 0, 0)).await?;
        record_at(&db, flour.id, 10.0, Some(300.0), at(2024, 1, 1, 8, 0, 0)).await?;

        let needs = estimate_needs(&db, date(2024, 1, 2)).await?;

        // Rice: sold 25, stock 5 -> 20. Oil: no sales that day, stock 0 -> 0.
        assert_eq!(needs.get("Rice"), Some(&20.0));
        assert_eq!(needs.get("Oil"), Some(&0.0));
        assert_eq!(needs.get("Flour"), None);
        Ok(())
    }
}
