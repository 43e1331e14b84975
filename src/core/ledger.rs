//! Ledger business logic - The append-only log of stock movements.
//!
//! Every purchase and sale is one immutable row with a signed quantity. Current
//! stock, purchase history and last prices are all derived from these rows. Inserts
//! are trusted as given; only deletions are checked, and a deletion that would drive
//! a product's stock negative is refused.
//!
//! Removing a product's last transaction also removes the product. Both steps run in
//! one database transaction, transaction row first, so a failure never leaves a
//! transaction pointing at a missing product.

use crate::{
    entities::{Product, Transaction, product, transaction},
    errors::{Error, Result},
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::fmt;
use tracing::{info, instrument, warn};

/// Slack allowed when checking that a deletion keeps stock non-negative, so
/// fractional quantities do not trip the guard through rounding.
const STOCK_EPSILON: f64 = 1e-9;

/// One purchase row of a product's history.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    /// Transaction id
    pub id: i64,
    /// When the purchase was recorded
    pub timestamp: NaiveDateTime,
    /// Quantity bought (always positive)
    pub quantity: f64,
    /// Stored cost figure, if any
    pub cost: Option<f64>,
}

/// A purchase on a given day, joined with its product.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPurchase {
    /// Transaction id, used to delete the row
    pub id: i64,
    /// Product name
    pub product_name: String,
    /// Quantity bought
    pub quantity: f64,
    /// Stored cost figure, if any
    pub cost: Option<f64>,
    /// Product unit
    pub unit: String,
    /// When the purchase was recorded
    pub timestamp: NaiveDateTime,
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Stock-in (positive quantity)
    Purchase,
    /// Stock-out (zero or negative quantity)
    Sale,
}

impl MovementKind {
    /// Classifies a signed quantity.
    #[must_use]
    pub fn from_quantity(quantity: f64) -> Self {
        if quantity > 0.0 {
            Self::Purchase
        } else {
            Self::Sale
        }
    }
}

/// Any movement on a given day, purchases and sales alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    /// Product name
    pub product_name: String,
    /// Signed quantity
    pub quantity: f64,
    /// Stored cost figure, if any
    pub cost: Option<f64>,
    /// Purchase or sale
    pub kind: MovementKind,
}

/// Why a deletion was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveRejection {
    /// Removing the row would leave the product with negative stock
    NegativeStock {
        /// Stock before the attempted removal
        current_stock: f64,
        /// Stock the removal would have produced
        resulting_stock: f64,
    },
}

impl fmt::Display for RemoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeStock { .. } => write!(f, "would cause negative stock"),
        }
    }
}

/// Result of [`remove`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The row was deleted
    Deleted {
        /// Whether the product went with it because no transactions remained
        product_removed: bool,
    },
    /// No transaction has that id
    NotFound,
    /// The deletion was refused and nothing changed
    Rejected(RemoveRejection),
}

/// Current local wall-clock time truncated to whole seconds.
#[must_use]
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// First instant of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// First instant after `date`.
#[must_use]
pub fn end_of_day_exclusive(date: NaiveDate) -> NaiveDateTime {
    date.succ_opt()
        .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN))
}

/// Last whole second of `date`, the cutoff used for "as of that day" price lookups.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or(NaiveDateTime::MAX)
}

/// Appends a movement stamped with the current time.
///
/// Quantity and price are stored as given: positive quantities are purchases,
/// negative ones sales. The caller validates operator input.
///
/// # Errors
/// Returns `Error::ProductNotFound` when `product_id` does not exist, or a database
/// error if the insert fails.
pub async fn record<C>(
    db: &C,
    product_id: i64,
    quantity: f64,
    price: Option<f64>,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    record_at(db, product_id, quantity, price, now_timestamp()).await
}

/// Appends a movement with an explicit timestamp.
#[instrument(skip(db))]
pub(crate) async fn record_at<C>(
    db: &C,
    product_id: i64,
    quantity: f64,
    price: Option<f64>,
    timestamp: NaiveDateTime,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    let created = transaction::ActiveModel {
        product_id: Set(product_id),
        quantity: Set(quantity),
        price: Set(price),
        timestamp: Set(timestamp),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Recorded transaction {} for product_id {}: quantity {} at {:?}",
        created.id, product_id, quantity, price
    );
    Ok(created)
}

/// Signed sum of every quantity recorded for the product; 0 without history.
pub async fn current_stock<C>(db: &C, product_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let quantities: Vec<f64> = Transaction::find()
        .select_only()
        .column(transaction::Column::Quantity)
        .filter(transaction::Column::ProductId.eq(product_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(quantities.iter().sum())
}

/// Retrieves a transaction by id.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction unless doing so would make the product's stock negative.
///
/// Post-condition: when the deleted row was the product's last transaction, the
/// product is deleted from the catalog as well. The check, the row deletion and the
/// product cleanup commit together or not at all.
#[instrument(skip(db))]
pub async fn remove(db: &DatabaseConnection, transaction_id: i64) -> Result<RemoveOutcome> {
    let txn = db.begin().await?;

    let Some(row) = Transaction::find_by_id(transaction_id).one(&txn).await? else {
        return Ok(RemoveOutcome::NotFound);
    };

    let product_id = row.product_id;
    let stock = current_stock(&txn, product_id).await?;
    let resulting_stock = stock - row.quantity;
    if resulting_stock < -STOCK_EPSILON {
        warn!(
            "Refusing to delete transaction {transaction_id}: stock of product_id {product_id} would drop from {stock} to {resulting_stock}"
        );
        return Ok(RemoveOutcome::Rejected(RemoveRejection::NegativeStock {
            current_stock: stock,
            resulting_stock,
        }));
    }

    row.delete(&txn).await?;
    info!("Deleted transaction {transaction_id} for product_id {product_id}");

    let product_removed = remove_product_if_orphaned(&txn, product_id).await?;

    txn.commit().await?;
    Ok(RemoveOutcome::Deleted { product_removed })
}

/// Deletes the product when it has no transactions left. Returns whether it did.
pub(crate) async fn remove_product_if_orphaned<C>(db: &C, product_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let remaining = Transaction::find()
        .filter(transaction::Column::ProductId.eq(product_id))
        .count(db)
        .await?;

    if remaining > 0 {
        return Ok(false);
    }

    Product::delete_by_id(product_id).exec(db).await?;
    info!("Cleaned up product_id {product_id} with no remaining transactions");
    Ok(true)
}

/// Deletes every product that has no transactions. Returns how many were removed.
pub(crate) async fn remove_orphaned_products<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut removed = 0;
    for product in Product::find().all(db).await? {
        if remove_product_if_orphaned(db, product.id).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Purchases of a product in ascending time order, optionally limited to a range of
/// calendar days (both bounds inclusive).
pub async fn purchases_for<C>(
    db: &C,
    product_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<PurchaseRecord>>
where
    C: ConnectionTrait,
{
    let mut query = Transaction::find()
        .filter(transaction::Column::ProductId.eq(product_id))
        .filter(transaction::Column::Quantity.gt(0.0));

    if let Some(start) = start {
        query = query.filter(transaction::Column::Timestamp.gte(start_of_day(start)));
    }
    if let Some(end) = end {
        query = query.filter(transaction::Column::Timestamp.lt(end_of_day_exclusive(end)));
    }

    let rows = query
        .order_by_asc(transaction::Column::Timestamp)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|t| PurchaseRecord {
            id: t.id,
            timestamp: t.timestamp,
            quantity: t.quantity,
            cost: t.price,
        })
        .collect())
}

/// Most recent purchase at or before `as_of`, newest insertion winning ties.
async fn last_purchase<C>(
    db: &C,
    product_id: i64,
    as_of: Option<NaiveDateTime>,
    with_cost: bool,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    let cutoff = as_of.unwrap_or_else(now_timestamp);

    let mut query = Transaction::find()
        .filter(transaction::Column::ProductId.eq(product_id))
        .filter(transaction::Column::Quantity.gt(0.0))
        .filter(transaction::Column::Timestamp.lte(cutoff));

    if with_cost {
        query = query.filter(transaction::Column::Price.is_not_null());
    }

    query
        .order_by_desc(transaction::Column::Timestamp)
        .order_by_desc(transaction::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Cost figure of the latest purchase with a cost at or before `as_of` (default now).
pub async fn last_purchase_price<C>(
    db: &C,
    product_id: i64,
    as_of: Option<NaiveDateTime>,
) -> Result<Option<f64>>
where
    C: ConnectionTrait,
{
    Ok(last_purchase(db, product_id, as_of, true)
        .await?
        .and_then(|t| t.price))
}

/// Timestamp of the latest purchase at or before `as_of` (default now).
pub async fn last_purchase_timestamp<C>(
    db: &C,
    product_id: i64,
    as_of: Option<NaiveDateTime>,
) -> Result<Option<NaiveDateTime>>
where
    C: ConnectionTrait,
{
    Ok(last_purchase(db, product_id, as_of, false)
        .await?
        .map(|t| t.timestamp))
}

/// Loads every transaction of a calendar day together with its product.
async fn movements_with_products<C>(
    db: &C,
    date: NaiveDate,
    purchases_only: bool,
) -> Result<Vec<(transaction::Model, product::Model)>>
where
    C: ConnectionTrait,
{
    let mut query = Transaction::find()
        .find_also_related(Product)
        .filter(transaction::Column::Timestamp.gte(start_of_day(date)))
        .filter(transaction::Column::Timestamp.lt(end_of_day_exclusive(date)));

    if purchases_only {
        query = query.filter(transaction::Column::Quantity.gt(0.0));
    }

    let rows = query
        .order_by_asc(transaction::Column::Timestamp)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(t, p)| p.map(|p| (t, p)))
        .collect())
}

/// Purchases recorded on `date`, oldest first.
pub async fn transactions_on<C>(db: &C, date: NaiveDate) -> Result<Vec<DailyPurchase>>
where
    C: ConnectionTrait,
{
    Ok(movements_with_products(db, date, true)
        .await?
        .into_iter()
        .map(|(t, p)| DailyPurchase {
            id: t.id,
            product_name: p.name,
            quantity: t.quantity,
            cost: t.price,
            unit: p.unit,
            timestamp: t.timestamp,
        })
        .collect())
}

/// Purchases and sales recorded on `date`, oldest first.
pub async fn all_movements_on<C>(db: &C, date: NaiveDate) -> Result<Vec<Movement>>
where
    C: ConnectionTrait,
{
    Ok(movements_with_products(db, date, false)
        .await?
        .into_iter()
        .map(|(t, p)| Movement {
            product_name: p.name,
            quantity: t.quantity,
            cost: t.price,
            kind: MovementKind::from_quantity(t.quantity),
        })
        .collect())
}
