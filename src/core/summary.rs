//! Daily summary business logic - Saved cash-flow tallies per calendar day.
//!
//! A summary is an overlay: it stores what the operator entered (cash in, cash out)
//! next to the purchase costs derived from the ledger when it was saved. It is not
//! recomputed afterwards. Deleting a summary is destructive: it also removes every
//! purchase recorded on that day.

use crate::{
    core::{
        ledger::{self, end_of_day_exclusive, start_of_day},
        metrics::{self, CostConvention},
    },
    entities::{DailySummary, Transaction, daily_summary, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// The four figures stored for a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryFigures {
    /// Cash received
    pub cash_in: f64,
    /// Cash paid out besides stock purchases
    pub cash_out: f64,
    /// Purchase costs derived from the ledger
    pub purchase_costs: f64,
    /// `cash_in - (cash_out + purchase_costs)`
    pub profit_loss: f64,
}

impl From<daily_summary::Model> for SummaryFigures {
    fn from(model: daily_summary::Model) -> Self {
        Self {
            cash_in: model.cash_in,
            cash_out: model.cash_out,
            purchase_costs: model.purchase_costs,
            profit_loss: model.profit_loss,
        }
    }
}

/// A day's cash-flow tally as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// Cash received
    pub cash_in: f64,
    /// Cash paid out besides stock purchases
    pub cash_out: f64,
    /// Purchase costs derived from the ledger
    pub purchase_costs: f64,
    /// `cash_out + purchase_costs`
    pub total_cash_out: f64,
    /// `cash_in - total_cash_out`
    pub profit_loss: f64,
}

impl CashFlow {
    /// Builds the tally from the entered cash figures and the derived purchase costs.
    #[must_use]
    pub fn tally(cash_in: f64, cash_out: f64, purchase_costs: f64) -> Self {
        let total_cash_out = cash_out + purchase_costs;
        Self {
            cash_in,
            cash_out,
            purchase_costs,
            total_cash_out,
            profit_loss: cash_in - total_cash_out,
        }
    }

    /// The subset that gets persisted.
    #[must_use]
    pub const fn figures(&self) -> SummaryFigures {
        SummaryFigures {
            cash_in: self.cash_in,
            cash_out: self.cash_out,
            purchase_costs: self.purchase_costs,
            profit_loss: self.profit_loss,
        }
    }
}

/// Result of [`delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryDeleteOutcome {
    /// The summary and that day's purchases were deleted
    Deleted {
        /// Purchase transactions removed alongside the summary
        transactions_removed: u64,
        /// Products dropped because they had no transactions left
        products_removed: u64,
    },
    /// No summary exists for the date; nothing was touched
    NotFound,
}

/// Tallies `date` using the day's purchase line costs from the ledger.
pub async fn compute_cash_flow<C>(
    db: &C,
    date: NaiveDate,
    cash_in: f64,
    cash_out: f64,
    convention: CostConvention,
) -> Result<CashFlow>
where
    C: ConnectionTrait,
{
    let earnings = metrics::daily_earnings(db, date, convention).await?;
    Ok(CashFlow::tally(cash_in, cash_out, earnings.purchase_cost))
}

/// Saves the summary for `date`, replacing any earlier one.
#[instrument(skip(db))]
pub async fn save<C>(
    db: &C,
    date: NaiveDate,
    figures: SummaryFigures,
) -> Result<daily_summary::Model>
where
    C: ConnectionTrait,
{
    let existing = DailySummary::find_by_id(date).one(db).await?;

    let saved = if let Some(summary) = existing {
        let mut active_model: daily_summary::ActiveModel = summary.into();
        active_model.cash_in = Set(figures.cash_in);
        active_model.cash_out = Set(figures.cash_out);
        active_model.purchase_costs = Set(figures.purchase_costs);
        active_model.profit_loss = Set(figures.profit_loss);
        active_model.update(db).await?
    } else {
        daily_summary::ActiveModel {
            date: Set(date),
            cash_in: Set(figures.cash_in),
            cash_out: Set(figures.cash_out),
            purchase_costs: Set(figures.purchase_costs),
            profit_loss: Set(figures.profit_loss),
        }
        .insert(db)
        .await?
    };

    info!(
        "Saved daily summary for {date}: cash in={}, cash out={}, purchase costs={}, profit/loss={}",
        saved.cash_in, saved.cash_out, saved.purchase_costs, saved.profit_loss
    );
    Ok(saved)
}

/// Loads the summary saved for `date`, if any.
pub async fn load<C>(db: &C, date: NaiveDate) -> Result<Option<SummaryFigures>>
where
    C: ConnectionTrait,
{
    Ok(DailySummary::find_by_id(date)
        .one(db)
        .await?
        .map(SummaryFigures::from))
}

/// Deletes the summary for `date` together with every purchase recorded that day.
///
/// The cascade removes purchases whether or not they contributed to the saved
/// purchase costs, and products left without transactions go with them. It is not
/// guarded against negative stock. Everything commits in one database transaction.
/// Without a saved summary nothing is deleted.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, date: NaiveDate) -> Result<SummaryDeleteOutcome> {
    let txn = db.begin().await?;

    if DailySummary::find_by_id(date).one(&txn).await?.is_none() {
        return Ok(SummaryDeleteOutcome::NotFound);
    }

    let transactions_removed = Transaction::delete_many()
        .filter(transaction::Column::Quantity.gt(0.0))
        .filter(transaction::Column::Timestamp.gte(start_of_day(date)))
        .filter(transaction::Column::Timestamp.lt(end_of_day_exclusive(date)))
        .exec(&txn)
        .await?
        .rows_affected;

    DailySummary::delete_by_id(date).exec(&txn).await?;
    let products_removed = ledger::remove_orphaned_products(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted daily summary for {date} with {transactions_removed} purchase transaction(s), {products_removed} product(s) cleaned up"
    );
    Ok(SummaryDeleteOutcome::Deleted {
        transactions_removed,
        products_removed,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{catalog, ledger::record_at};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn figures(cash_in: f64, cash_out: f64, purchase_costs: f64) -> SummaryFigures {
        CashFlow::tally(cash_in, cash_out, purchase_costs).figures()
    }

    #[test]
    fn test_tally() {
        let flow = CashFlow::tally(5000.0, 300.0, 1200.0);
        assert_eq!(flow.total_cash_out, 1500.0);
        assert_eq!(flow.profit_loss, 3500.0);

        let loss = CashFlow::tally(100.0, 50.0, 200.0);
        assert_eq!(loss.profit_loss, -150.0);
    }

    #[tokio::test]
    async fn test_load_absent() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(load(&db, date(2024, 1, 1)).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<()> {
        let db = setup_test_db().await?;
        let day = date(2024, 1, 1);

        save(&db, day, figures(5000.0, 300.0, 1200.0)).await?;

        let loaded = load(&db, day).await?.unwrap();
        assert_eq!(loaded.cash_in, 5000.0);
        assert_eq!(loaded.cash_out, 300.0);
        assert_eq!(loaded.purchase_costs, 1200.0);
        assert_eq!(loaded.profit_loss, 3500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_last_save_wins() -> Result<()> {
        let db = setup_test_db().await?;
        let day = date(2024, 1, 1);

        save(&db, day, figures(100.0, 0.0, 0.0)).await?;
        save(&db, day, figures(250.0, 10.0, 40.0)).await?;

        let loaded = load(&db, day).await?.unwrap();
        assert_eq!(loaded, figures(250.0, 10.0, 40.0));
        assert_eq!(DailySummary::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_compute_cash_flow_uses_purchase_costs() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = catalog::resolve_or_create(&db, "Rice", "kg").await?;
        record_at(&db, rice, 50.0, Some(1000.0), at(2024, 1, 1, 9, 0, 0)).await?;
        record_at(&db, rice, -20.0, Some(25.0), at(2024, 1, 1, 17, 0, 0)).await?;

        let flow =
            compute_cash_flow(&db, date(2024, 1, 1), 500.0, 100.0, CostConvention::LineTotal)
                .await?;

        assert_eq!(flow.purchase_costs, 1000.0);
        assert_eq!(flow.total_cash_out, 1100.0);
        assert_eq!(flow.profit_loss, -600.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cascades_to_same_day_purchases() -> Result<()> {
        let db = setup_test_db().await?;
        let day = date(2024, 1, 1);
        let rice = catalog::resolve_or_create(&db, "Rice", "kg").await?;
        let tea = catalog::resolve_or_create(&db, "Tea", "packets").await?;

        record_at(&db, rice, 50.0, Some(1000.0), at(2024, 1, 1, 9, 0, 0)).await?;
        record_at(&db, rice, 10.0, Some(210.0), at(2023, 12, 31, 9, 0, 0)).await?;
        record_at(&db, rice, -5.0, Some(25.0), at(2024, 1, 1, 12, 0, 0)).await?;
        record_at(&db, tea, 20.0, Some(400.0), at(2024, 1, 1, 23, 59, 59)).await?;
        save(&db, day, figures(800.0, 0.0, 1400.0)).await?;

        let outcome = delete(&db, day).await?;

        assert_eq!(
            outcome,
            SummaryDeleteOutcome::Deleted {
                transactions_removed: 2,
                products_removed: 1,
            }
        );
        assert!(ledger::transactions_on(&db, day).await?.is_empty());
        assert_eq!(load(&db, day).await?, None);
        // The sale and the previous day's purchase survive.
        assert_eq!(ledger::current_stock(&db, rice).await?, 5.0);
        assert_eq!(catalog::lookup(&db, "Tea").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_without_summary_touches_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = catalog::resolve_or_create(&db, "Rice", "kg").await?;
        record_at(&db, rice, 50.0, Some(1000.0), at(2024, 1, 1, 9, 0, 0)).await?;

        let outcome = delete(&db, date(2024, 1, 1)).await?;

        assert_eq!(outcome, SummaryDeleteOutcome::NotFound);
        assert_eq!(ledger::transactions_on(&db, date(2024, 1, 1)).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_not_found_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<daily_summary::Model>::new()])
            .into_connection();

        assert_eq!(
            delete(&db, date(2024, 1, 1)).await?,
            SummaryDeleteOutcome::NotFound
        );
        Ok(())
    }
}
