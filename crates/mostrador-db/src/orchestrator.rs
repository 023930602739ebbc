//! # Sale Orchestrator
//!
//! Registers, updates, voids and deletes sales, keeping the sale, its
//! stock effect and its mirrored treasury movement consistent.
//!
//! ## Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     register(draft)  (one transaction)                  │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    │                                                                    │
//! │    ├── SequenceAssigner::next_in(SALE)     ← takes the write lock      │
//! │    ├── SaleRepository::insert_in           ← header, number stamped    │
//! │    ├── InventoryLedger::decrease_in × N    ← InsufficientStock aborts  │
//! │    ├── SaleRepository::insert_lines_in                                 │
//! │    └── TreasuryMirror::create_for_sale_in  ← INGRESO, check metadata   │
//! │    │                                                                    │
//! │  COMMIT ──► Sale                                                       │
//! │                                                                         │
//! │  Any error drops the transaction: no number consumed, no stock moved,  │
//! │  no movement left behind. DbError::Busy is retried from BEGIN.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Machine
//! ```text
//! REGISTERED ──update──► REGISTERED ──void──► VOIDED
//!      │
//!      └──────delete──────► (row gone)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_REGISTER_ATTEMPTS;
use crate::error::{DbError, LedgerError, LedgerResult};
use crate::repository::inventory::InventoryLedger;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::sequence::SequenceAssigner;
use crate::repository::treasury::TreasuryMirror;
use mostrador_core::validation::validate_sale_draft;
use mostrador_core::{CoreError, DocumentSeries, Sale, SaleDraft, SaleStatus};

/// Coordinates the Sequence Assigner, Inventory Ledger, sale persistence
/// and Treasury Mirror.
///
/// ## Usage
/// ```rust,ignore
/// let orchestrator = db.orchestrator().with_max_attempts(config.register_attempts);
///
/// let sale = orchestrator.register(draft).await?;
/// orchestrator.void_sale(sale.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleOrchestrator {
    pool: SqlitePool,
    max_attempts: u32,
}

impl SaleOrchestrator {
    /// Creates a new SaleOrchestrator.
    pub fn new(pool: SqlitePool) -> Self {
        SaleOrchestrator {
            pool,
            max_attempts: DEFAULT_REGISTER_ATTEMPTS,
        }
    }

    /// Sets how many times `register` runs when the write lock is contended.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    // =========================================================================
    // Register
    // =========================================================================

    /// Registers a sale: number, stock decrease and mirrored movement.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The registered sale with its lines
    /// * `Err(Core(InsufficientStock))` - Nothing was persisted
    /// * `Err(Core(ProductNotFound))` - Nothing was persisted
    pub async fn register(&self, draft: SaleDraft) -> LedgerResult<Sale> {
        validate_sale_draft(&draft)?;

        let mut attempt = 1;
        loop {
            match self.register_once(&draft).await {
                Err(err) if err.is_busy() && attempt < self.max_attempts => {
                    warn!(attempt = attempt, error = %err, "Sale registration hit lock contention, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn register_once(&self, draft: &SaleDraft) -> LedgerResult<Sale> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let number = SequenceAssigner::next_in(&mut tx, DocumentSeries::Sale).await?;
        let sale_id = SaleRepository::insert_in(&mut tx, number, draft, now).await?;

        for line in &draft.lines {
            InventoryLedger::decrease_in(&mut tx, line.product_id, line.quantity).await?;
        }
        SaleRepository::insert_lines_in(&mut tx, sale_id, &draft.lines).await?;

        let sale = SaleRepository::get_in(&mut tx, sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        let movement = TreasuryMirror::create_for_sale_in(&mut tx, &sale, now).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            sale_id = sale.id,
            number = sale.number,
            total = %sale.total,
            method = %sale.payment_method,
            movement_id = movement.id,
            "Sale registered"
        );
        Ok(sale)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Overwrites a sale's business fields and replaces its lines, then
    /// syncs the mirrored movement.
    ///
    /// The number never changes. Stock is not adjusted for the difference
    /// between the old and new lines.
    ///
    /// ## Returns
    /// * `Err(Core(SaleNotFound))` - No such sale
    /// * `Err(Core(InvalidSaleStatus))` - The sale is voided
    pub async fn update(&self, id: i64, draft: SaleDraft) -> LedgerResult<Sale> {
        validate_sale_draft(&draft)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let updated = SaleRepository::update_header_in(&mut tx, id, &draft, now).await?;
        if updated == 0 {
            return Err(match SaleRepository::voided_flag_in(&mut tx, id).await? {
                Some(true) => CoreError::InvalidSaleStatus {
                    sale_id: id,
                    current_status: SaleStatus::Voided.to_string(),
                },
                _ => CoreError::SaleNotFound(id),
            }
            .into());
        }

        for line in &draft.lines {
            if !ProductRepository::exists_in(&mut tx, line.product_id).await? {
                return Err(CoreError::ProductNotFound(line.product_id).into());
            }
        }

        SaleRepository::delete_lines_in(&mut tx, id).await?;
        SaleRepository::insert_lines_in(&mut tx, id, &draft.lines).await?;

        let sale = SaleRepository::get_in(&mut tx, id)
            .await?
            .ok_or(CoreError::SaleNotFound(id))?;

        if TreasuryMirror::sync_for_sale_in(&mut tx, &sale, now)
            .await?
            .is_none()
        {
            warn!(sale_id = id, "Updated sale has no live mirrored movement");
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id = id, number = sale.number, total = %sale.total, "Sale updated");
        Ok(sale)
    }

    // =========================================================================
    // Void / Delete
    // =========================================================================

    /// Voids a sale and its mirrored movement. Stock is not restored.
    ///
    /// `Ok(false)` when the sale doesn't exist. Voiding twice is harmless.
    pub async fn void_sale(&self, id: i64) -> LedgerResult<bool> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        if SaleRepository::mark_voided_in(&mut tx, id, now).await? == 0 {
            debug!(sale_id = id, "Void requested for unknown sale");
            return Ok(false);
        }

        let movements = TreasuryMirror::void_for_sale_in(&mut tx, id, now).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id = id, movements_voided = movements, "Sale voided");
        Ok(true)
    }

    /// Hard-deletes a sale and its lines.
    ///
    /// Stock and the mirrored movement are left as they are; use
    /// [`SaleOrchestrator::void_sale`] to cancel a sale's cash effect.
    /// `Ok(false)` when the sale doesn't exist.
    pub async fn delete(&self, id: i64) -> LedgerResult<bool> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        if SaleRepository::delete_in(&mut tx, id).await? == 0 {
            debug!(sale_id = id, "Delete requested for unknown sale");
            return Ok(false);
        }

        if let Some(movement) = TreasuryMirror::live_for_sale_in(&mut tx, id).await? {
            warn!(
                sale_id = id,
                movement_id = movement.id,
                amount = %movement.amount,
                "Deleted sale leaves a live treasury movement"
            );
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id = id, "Sale deleted");
        Ok(true)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale with its lines.
    pub async fn get(&self, id: i64) -> LedgerResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        Ok(SaleRepository::get_in(&mut conn, id).await?)
    }

    /// Lists sale headers, newest number first.
    pub async fn list(&self) -> LedgerResult<Vec<Sale>> {
        SaleRepository::new(self.pool.clone())
            .list()
            .await
            .map_err(LedgerError::from)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
