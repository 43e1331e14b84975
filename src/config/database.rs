//! Database configuration module for `StockBuddy`.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the on-disk layout always matches the Rust
//! structs. Creation is idempotent: every statement uses `IF NOT EXISTS`, which lets
//! the bot reopen an existing inventory file on restart.

use crate::entities::{DailySummary, Product, Transaction, transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Default database location, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/inventory.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file under `data/`.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Extracts the on-disk file path from a `sqlite://` URL.
///
/// Returns `None` for in-memory databases and for URLs of other schemes.
#[must_use]
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path.contains(":memory:") {
        return None;
    }

    Some(PathBuf::from(path))
}

/// Establishes a connection to the `SQLite` database at `database_url`.
///
/// The parent directory of a file-backed database is created when missing, so a
/// fresh checkout can start without manual set-up.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(std::path::Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
        debug!("Ensured data directory {}", parent.display());
    }

    let db = Database::connect(database_url).await?;
    info!("Database connection opened");
    Ok(db)
}

/// Creates all tables and indexes if they do not exist yet.
///
/// The `(product_id, timestamp)` index backs every per-product history and
/// last-price scan. Daily summaries are keyed by date, so their primary key already
/// serves date lookups.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut summary_table = schema.create_table_from_entity(DailySummary);

    product_table.if_not_exists();
    transaction_table.if_not_exists();
    summary_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&summary_table)).await?;

    let ledger_index = Index::create()
        .if_not_exists()
        .name("idx_transactions_product_timestamp")
        .table(Transaction)
        .col(transaction::Column::ProductId)
        .col(transaction::Column::Timestamp)
        .to_owned();
    db.execute(builder.build(&ledger_index)).await?;

    debug!("Tables and indexes created/verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        daily_summary::Model as DailySummaryModel, product::Model as ProductModel,
        transaction::Model as TransactionModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<DailySummaryModel> = DailySummary::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/inventory.sqlite?mode=rwc"),
            Some(PathBuf::from("data/inventory.sqlite"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:shop.db"),
            Some(PathBuf::from("shop.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/shop"), None);
    }
}
