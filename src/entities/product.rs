//! Product entity - A stocked item in the shop catalog.
//!
//! Products are created the first time a purchase names them and disappear when
//! their last ledger transaction is removed. Names are stored trimmed and compared
//! case-sensitively; the unit is a free-text label such as `kg` or `packets`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Rice", "চিনি")
    #[sea_orm(unique)]
    pub name: String,
    /// Unit of measurement (e.g., "kg", "liters")
    pub unit: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many ledger transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
