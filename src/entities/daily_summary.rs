//! Daily summary entity - The saved cash-flow tally for one calendar day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily summary database model, keyed by date
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_summaries")]
pub struct Model {
    /// Calendar day this summary covers
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    /// Cash received, entered by the operator
    pub cash_in: f64,
    /// Cash paid out besides stock purchases, entered by the operator
    pub cash_out: f64,
    /// Purchase line costs derived from the ledger when the summary was saved
    pub purchase_costs: f64,
    /// `cash_in - (cash_out + purchase_costs)`
    pub profit_loss: f64,
}

/// `DailySummary` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
