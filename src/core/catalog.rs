//! Product catalog - Maps product names to identities and units.
//!
//! Products are created lazily the first time a purchase names them. The catalog
//! never deletes a product itself: a product disappears as a post-condition of the
//! ledger removing its last transaction (see [`crate::core::ledger::remove`],
//! [`crate::core::summary::delete`] and
//! [`crate::core::maintenance::prune_old_transactions`]).

use crate::{
    entities::{Product, product},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Returns the id of the product named `name`, creating it with `unit` if needed.
///
/// The name is trimmed before lookup. An existing product keeps its stored unit;
/// the supplied `unit` is only used when a new product is inserted.
#[instrument(skip(db))]
pub async fn resolve_or_create<C>(db: &C, name: &str, unit: &str) -> Result<i64>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_product_by_name(db, name).await? {
        return Ok(existing.id);
    }

    let created = product::ActiveModel {
        name: Set(name.trim().to_string()),
        unit: Set(unit.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Added product '{}' with unit '{}'", created.name, created.unit);
    Ok(created.id)
}

/// Looks up a product id by exact (trimmed) name.
pub async fn lookup<C>(db: &C, name: &str) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    Ok(get_product_by_name(db, name).await?.map(|p| p.id))
}

/// Finds a product by exact (trimmed, case-sensitive) name.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by its id.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every product in store order.
pub async fn list_all<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find().all(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_resolve_or_create_creates_new_product() -> Result<()> {
        let db = setup_test_db().await?;

        let id = resolve_or_create(&db, "Rice", "kg").await?;

        let product = get_product_by_id(&db, id).await?.unwrap();
        assert_eq!(product.name, "Rice");
        assert_eq!(product.unit, "kg");
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_or_create_trims_name() -> Result<()> {
        let db = setup_test_db().await?;

        let id = resolve_or_create(&db, "  Sugar  ", " kg ").await?;
        let again = resolve_or_create(&db, "Sugar", "kg").await?;

        assert_eq!(id, again);
        let product = get_product_by_id(&db, id).await?.unwrap();
        assert_eq!(product.name, "Sugar");
        assert_eq!(product.unit, "kg");
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_existing_ignores_new_unit() -> Result<()> {
        let db = setup_test_db().await?;

        let id = resolve_or_create(&db, "Milk", "liters").await?;
        let again = resolve_or_create(&db, "Milk", "packets").await?;

        assert_eq!(id, again);
        let product = get_product_by_id(&db, id).await?.unwrap();
        assert_eq!(product.unit, "liters");
        assert_eq!(list_all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() -> Result<()> {
        let db = setup_test_db().await?;

        let lower = resolve_or_create(&db, "rice", "kg").await?;
        let upper = resolve_or_create(&db, "Rice", "kg").await?;

        assert_ne!(lower, upper);
        assert_eq!(lookup(&db, "RICE").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_and_list_all() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(list_all(&db).await?.is_empty());
        let rice = resolve_or_create(&db, "Rice", "kg").await?;
        let salt = resolve_or_create(&db, "লবণ", "packets").await?;

        assert_eq!(lookup(&db, "Rice").await?, Some(rice));
        assert_eq!(lookup(&db, " লবণ").await?, Some(salt));
        assert_eq!(lookup(&db, "Flour").await?, None);

        let mut names: Vec<String> = list_all(&db).await?.into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, vec!["Rice".to_string(), "লবণ".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_not_found_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        assert_eq!(lookup(&db, "Nothing").await?, None);
        Ok(())
    }
}
