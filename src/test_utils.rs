//! Shared test utilities for `StockBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

use crate::{core::catalog, entities, errors::Result};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date; panics on an invalid one.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds a second-resolution timestamp; panics on an invalid one.
#[must_use]
pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, min, sec).unwrap()
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `unit`: "kg"
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    create_custom_product(db, name, "kg").await
}

/// Creates a test product with a custom unit.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    unit: &str,
) -> Result<entities::product::Model> {
    let id = catalog::resolve_or_create(db, name, unit).await?;
    Ok(catalog::get_product_by_id(db, id).await?.unwrap())
}

/// Sets up a complete test environment with one product.
/// Returns (db, product) for ledger-related tests.
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Test Product").await?;
    Ok((db, product))
}
