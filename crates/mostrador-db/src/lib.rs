//! # mostrador-db: Ledger Storage for Mostrador
//!
//! SQLite persistence for the Mostrador back office, and the Sale
//! Orchestrator that keeps sales, stock and treasury consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Data Flow                              │
//! │                                                                         │
//! │  Caller (HTTP handler, seed binary, tests)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  mostrador-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   SaleOrchestrator ── register / update / void / delete        │   │
//! │  │       │                                                         │   │
//! │  │       ├──► SequenceAssigner   (gap-free numbers)               │   │
//! │  │       ├──► InventoryLedger    (stock, insufficiency checks)    │   │
//! │  │       ├──► SaleRepository     (sale rows + lines)              │   │
//! │  │       └──► TreasuryMirror     (mirrored cash movement)         │   │
//! │  │                                                                 │   │
//! │  │   Database (pool.rs) ── SqlitePool, WAL, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven ledger configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage errors and the ledger error boundary
//! - [`repository`] - Components (products, inventory, sequences, sales, treasury, delivery notes)
//! - [`orchestrator`] - The Sale Orchestrator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mostrador_db::{Database, LedgerConfig};
//!
//! let config = LedgerConfig::from_env()?;
//! let db = Database::new(config.db.clone()).await?;
//!
//! let sale = db
//!     .orchestrator()
//!     .with_max_attempts(config.register_attempts)
//!     .register(draft)
//!     .await?;
//! let checks = db.treasury().upcoming_checks(config.upcoming_check_days).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod orchestrator;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, LedgerConfig};
pub use error::{DbError, DbResult, ErrorBody, ErrorCode, LedgerError, LedgerResult};
pub use orchestrator::SaleOrchestrator;
pub use pool::{Database, DbConfig};

// Component re-exports for convenience
pub use repository::{
    DeliveryNoteRepository, InventoryLedger, ProductRepository, SaleRepository,
    SequenceAssigner, TreasuryMirror,
};
