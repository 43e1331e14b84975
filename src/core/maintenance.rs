//! Database maintenance - Retention pruning and snapshot backups.
//!
//! Pruning drops ledger rows older than the retention window so the single-file
//! store stays small. Backups write a consistent copy of the live database with
//! SQLite's `VACUUM INTO`, which works while the bot keeps its connection open.

use crate::{
    core::ledger::{self, now_timestamp},
    entities::{Transaction, transaction},
    errors::Result,
};
use chrono::{Months, NaiveDateTime};
use sea_orm::{ConnectionTrait, TransactionTrait, prelude::*};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// What a pruning run removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Transactions strictly older than this were deleted
    pub cutoff: NaiveDateTime,
    /// Number of transactions deleted
    pub transactions_removed: u64,
    /// Products dropped because they had no transactions left
    pub products_removed: u64,
}

/// Cutoff for a retention window of `keep_years` counted back from `now`.
#[must_use]
pub fn retention_cutoff(now: NaiveDateTime, keep_years: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(keep_years.saturating_mul(12)))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Deletes transactions older than `keep_years` years, then products left empty.
pub async fn prune_old_transactions(db: &DatabaseConnection, keep_years: u32) -> Result<PruneReport> {
    prune_before(db, retention_cutoff(now_timestamp(), keep_years)).await
}

/// Deletes transactions with a timestamp strictly before `cutoff`, then products
/// left without transactions, in one database transaction.
#[instrument(skip(db))]
pub async fn prune_before(db: &DatabaseConnection, cutoff: NaiveDateTime) -> Result<PruneReport> {
    let txn = db.begin().await?;

    let transactions_removed = Transaction::delete_many()
        .filter(transaction::Column::Timestamp.lt(cutoff))
        .exec(&txn)
        .await?
        .rows_affected;
    let products_removed = ledger::remove_orphaned_products(&txn).await?;

    txn.commit().await?;
    info!(
        "Pruned {transactions_removed} transaction(s) older than {cutoff}, {products_removed} product(s) cleaned up"
    );
    Ok(PruneReport {
        cutoff,
        transactions_removed,
        products_removed,
    })
}

/// Writes a snapshot of the database into `dir` and returns the file path.
///
/// Files are named `inventory-YYYYMMDD-HHMMSS.sqlite`; a numeric suffix is added
/// when a snapshot with that name already exists.
///
/// # Errors
/// Returns `Error::Io` when the directory cannot be created or no snapshot file
/// appears, as happens for an in-memory database.
#[instrument(skip(db))]
pub async fn backup_database<C>(db: &C, dir: &Path) -> Result<PathBuf>
where
    C: ConnectionTrait,
{
    std::fs::create_dir_all(dir)?;

    let stamp = now_timestamp().format("%Y%m%d-%H%M%S").to_string();
    let mut path = dir.join(format!("inventory-{stamp}.sqlite"));
    let mut attempt = 1;
    while path.exists() {
        path = dir.join(format!("inventory-{stamp}-{attempt}.sqlite"));
        attempt += 1;
    }

    let target = path.to_string_lossy().replace('\'', "''");
    db.execute_unprepared(&format!("VACUUM INTO '{target}'"))
        .await?;

    // SQLite accepts VACUUM INTO on an in-memory store without writing a file.
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no snapshot was written to {}", path.display()),
        )
        .into());
    }

    info!("Backed up database to {}", path.display());
    Ok(path)
}
