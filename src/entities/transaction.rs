//! Transaction entity - One signed stock movement in the ledger.
//!
//! Each transaction has a `product_id`, a signed `quantity` (positive for purchases,
//! negative for sales), a nullable `price` cost figure and a second-resolution
//! `timestamp`. Rows are never updated, only inserted or deleted whole.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product this movement belongs to
    pub product_id: i64,
    /// Signed quantity (positive for purchases, negative for sales)
    pub quantity: f64,
    /// Cost figure: purchase cost per the configured `CostConvention`, or sale price per unit
    pub price: Option<f64>,
    /// Local wall-clock insertion time, truncated to whole seconds
    pub timestamp: DateTime,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
