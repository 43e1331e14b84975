//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod daily_summary;
pub mod product;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use daily_summary::{
    Column as DailySummaryColumn, Entity as DailySummary, Model as DailySummaryModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
