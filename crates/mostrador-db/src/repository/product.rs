//! # Product Repository
//!
//! Catalog operations for products.
//!
//! ## Key Operations
//! - CRUD on catalog fields (sku, name, prices)
//! - Soft delete
//!
//! Stock is written here exactly once, on insert. Every later change goes
//! through the [`InventoryLedger`](super::inventory::InventoryLedger), so
//! catalog edits can never bypass an insufficiency check.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, LedgerResult};
use mostrador_core::validation::validate_product_draft;
use mostrador_core::{Product, ProductDraft};

/// Column list matching [`Product`]'s `FromRow`.
pub(crate) const PRODUCT_COLUMNS: &str = r#"
    id, sku, name, cost_price, sale_price, stock,
    is_active, version, created_at, updated_at
"#;

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.insert(&draft).await?;
/// let same = repo.get_by_sku("YERBA-1KG").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product with its opening stock.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id
    /// * `Err(Storage(UniqueViolation))` - SKU already exists
    pub async fn insert(&self, draft: &ProductDraft) -> LedgerResult<Product> {
        validate_product_draft(draft)?;

        let sku = draft.sku.trim();
        debug!(sku = %sku, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, cost_price, sale_price, stock,
                is_active, version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, 0, ?6, ?6)
            "#,
        )
        .bind(sku)
        .bind(draft.name.trim())
        .bind(draft.cost_price.amount().to_string())
        .bind(draft.sale_price.amount().to_string())
        .bind(draft.stock.value().to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", sku),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id).into())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut conn, id).await
    }

    /// Gets a product by ID on an existing connection / transaction.
    pub async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE sku = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Whether a product row exists (active or not).
    pub async fn exists_in(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }

    /// Lists active products ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE is_active = 1 ORDER BY name, id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Updates catalog fields (sku, name, prices).
    ///
    /// `draft.stock` is ignored: stock only moves through the inventory
    /// ledger.
    pub async fn update_catalog(&self, id: i64, draft: &ProductDraft) -> LedgerResult<Product> {
        validate_product_draft(draft)?;

        debug!(id = id, sku = %draft.sku, "Updating product catalog fields");

        let sku = draft.sku.trim();
        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                cost_price = ?4,
                sale_price = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(sku)
        .bind(draft.name.trim())
        .bind(draft.cost_price.amount().to_string())
        .bind(draft.sale_price.amount().to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", sku),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(mostrador_core::CoreError::ProductNotFound(id).into());
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id).into())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sale lines still reference the row.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Soft-deleting product");

        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};
    use mostrador_core::{CoreError, Money, Quantity};
    use rust_decimal_macros::dec;

    fn draft(sku: &str, stock: Quantity) -> ProductDraft {
        ProductDraft {
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            cost_price: Money::new(dec!(6.50)),
            sale_price: Money::new(dec!(10.00)),
            stock,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&draft("YERBA-1KG", Quantity::units(5))).await.unwrap();
        assert!(product.id > 0);
        assert_eq!(product.stock, Quantity::units(5));
        assert_eq!(product.sale_price, Money::new(dec!(10)));
        assert!(product.is_active);

        let by_sku = repo.get_by_sku("YERBA-1KG").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fractional_stock_round_trips_exactly() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&draft("QUESO-KG", Quantity::new(dec!(12.345))))
            .await
            .unwrap();
        assert_eq!(product.stock.value(), dec!(12.345));
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&draft("DUP-1", Quantity::units(1))).await.unwrap();
        let err = repo.insert(&draft("DUP-1", Quantity::units(1))).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage(DbError::UniqueViolation { ref value, .. }) if value == "DUP-1"
        ));
    }

    #[tokio::test]
    async fn test_update_catalog_never_touches_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&draft("P-1", Quantity::units(5))).await.unwrap();

        let mut edit = draft("P-1", Quantity::units(500));
        edit.name = "Renamed".to_string();
        edit.sale_price = Money::new(dec!(12.00));

        let updated = repo.update_catalog(product.id, &edit).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.sale_price, Money::new(dec!(12)));
        assert_eq!(updated.stock, Quantity::units(5));

        let missing = repo.update_catalog(9999, &edit).await.unwrap_err();
        assert!(matches!(
            missing,
            LedgerError::Core(CoreError::ProductNotFound(9999))
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = repo.insert(&draft("A-1", Quantity::units(1))).await.unwrap();
        repo.insert(&draft("B-1", Quantity::units(1))).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.soft_delete(a.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.list_active().await.unwrap().len(), 1);

        // Row is still there for historical references
        assert!(!repo.get_by_id(a.id).await.unwrap().unwrap().is_active);
        assert!(repo.soft_delete(9999).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_invalid_draft() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .products()
            .insert(&draft("has space", Quantity::units(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::Validation(_))));
    }
}
