//! # Inventory Ledger
//!
//! The only code path that moves stock.
//!
//! ## Decrease Under Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. UPDATE products SET version = version + 1 … RETURNING stock        │
//! │     (a write: takes the database write lock before stock is read)      │
//! │  2. stock < requested ?  ──► InsufficientStock, caller rolls back      │
//! │  3. UPDATE products SET stock = stock - requested                      │
//! │                                                                         │
//! │  Two sales of the last unit: the second one blocks at step 1 until     │
//! │  the first commits, then reads the already-decreased stock.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, LedgerResult};
use mostrador_core::validation::validate_quantity;
use mostrador_core::{CoreError, Quantity, ValidationError};
use rust_decimal::Decimal;

/// Stock increase/decrease with insufficiency checks.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    /// Creates a new InventoryLedger.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    /// Adds `quantity` to a product's stock (restock, returns).
    ///
    /// ## Returns
    /// * `Ok(Quantity)` - Stock after the increase
    /// * `Err(Core(ProductNotFound))` - No such product
    pub async fn increase(&self, product_id: i64, quantity: Quantity) -> LedgerResult<Quantity> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let stock = Self::increase_in(&mut tx, product_id, quantity).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(stock)
    }

    /// Removes `quantity` from a product's stock.
    ///
    /// ## Returns
    /// * `Ok(Quantity)` - Stock after the decrease
    /// * `Err(Core(InsufficientStock))` - Stock unchanged
    /// * `Err(Core(ProductNotFound))` - No such product
    pub async fn decrease(&self, product_id: i64, quantity: Quantity) -> LedgerResult<Quantity> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let stock = Self::decrease_in(&mut tx, product_id, quantity).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(stock)
    }

    /// [`InventoryLedger::increase`] on a caller-owned transaction.
    pub async fn increase_in(
        conn: &mut SqliteConnection,
        product_id: i64,
        quantity: Quantity,
    ) -> LedgerResult<Quantity> {
        validate_quantity(quantity)?;

        let (sku, stock) = Self::lock_row(conn, product_id).await?;
        let new_stock = stock
            .checked_add(quantity)
            .ok_or_else(|| ValidationError::TooLarge {
                field: "stock".to_string(),
                max: Decimal::MAX.to_string(),
            })?;
        Self::write_stock(conn, product_id, new_stock).await?;

        info!(product_id = product_id, sku = %sku, stock = %new_stock, "Stock increased");
        Ok(new_stock)
    }

    /// [`InventoryLedger::decrease`] on a caller-owned transaction.
    ///
    /// On `InsufficientStock` nothing has been written except the version
    /// bump; the caller is expected to roll back.
    pub async fn decrease_in(
        conn: &mut SqliteConnection,
        product_id: i64,
        quantity: Quantity,
    ) -> LedgerResult<Quantity> {
        validate_quantity(quantity)?;

        let (sku, stock) = Self::lock_row(conn, product_id).await?;

        if stock < quantity {
            debug!(
                product_id = product_id,
                available = %stock,
                requested = %quantity,
                "Insufficient stock"
            );
            return Err(CoreError::InsufficientStock {
                product_id,
                sku,
                available: stock,
                requested: quantity,
            }
            .into());
        }

        let new_stock = stock - quantity;
        Self::write_stock(conn, product_id, new_stock).await?;

        debug!(product_id = product_id, stock = %new_stock, "Stock decreased");
        Ok(new_stock)
    }

    /// Whether `quantity` could be taken right now. False for unknown products.
    ///
    /// Advisory only: the answer can be stale by the time a sale commits.
    pub async fn has_sufficient_stock(
        &self,
        product_id: i64,
        quantity: Quantity,
    ) -> LedgerResult<bool> {
        match self.stock_of(product_id).await {
            Ok(stock) => Ok(stock >= quantity),
            Err(crate::error::LedgerError::Core(CoreError::ProductNotFound(_))) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Current stock on hand.
    pub async fn stock_of(&self, product_id: i64) -> LedgerResult<Quantity> {
        let raw: Option<String> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        match raw {
            Some(raw) => parse_stock(product_id, raw),
            None => Err(CoreError::ProductNotFound(product_id).into()),
        }
    }

    /// Bumps the row version and reads the stock under the write lock.
    async fn lock_row(
        conn: &mut SqliteConnection,
        product_id: i64,
    ) -> LedgerResult<(String, Quantity)> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            UPDATE products SET version = version + 1, updated_at = ?2
            WHERE id = ?1
            RETURNING sku, stock
            "#,
        )
        .bind(product_id)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;

        let (sku, raw) = row.ok_or(CoreError::ProductNotFound(product_id))?;
        Ok((sku, parse_stock(product_id, raw)?))
    }

    async fn write_stock(
        conn: &mut SqliteConnection,
        product_id: i64,
        stock: Quantity,
    ) -> LedgerResult<()> {
        sqlx::query("UPDATE products SET stock = ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(stock.value().to_string())
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}

fn parse_stock(product_id: i64, raw: String) -> LedgerResult<Quantity> {
    Quantity::try_from(raw).map_err(|e| {
        DbError::CorruptValue(format!("stock of product {}: {}", product_id, e)).into()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
