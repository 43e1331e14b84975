//! Core business logic - framework-agnostic catalog, ledger, metrics and reporting.
//!
//! Every function takes the database handle explicitly; nothing here knows about
//! Discord. Functions that only read or insert are generic over
//! [`sea_orm::ConnectionTrait`] so they run inside a caller's transaction as well.

/// Product catalog: name to id and unit
pub mod catalog;
/// Append-only stock movement ledger
pub mod ledger;
/// Retention pruning and backups
pub mod maintenance;
/// Daily earnings and restocking needs
pub mod metrics;
/// Inventory overview, search and formatting
pub mod report;
/// Saved daily cash-flow summaries
pub mod summary;
