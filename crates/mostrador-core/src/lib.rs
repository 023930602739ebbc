//! # mostrador-core: Pure Business Logic for Mostrador
//!
//! Domain types and rules for a retail back office: sales, stock, delivery
//! notes and the treasury movements that mirror every sale. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP layer / frontend (outside workspace)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  mostrador-db (Database Layer)                  │   │
//! │  │   SaleOrchestrator ─► SequenceAssigner, InventoryLedger,        │   │
//! │  │                       TreasuryMirror (SQLite transactions)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ mostrador-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ treasury  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ mirror_of │  │   rules   │  │   │
//! │  │   │   Sale    │  │ Quantity  │  │  Summary  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, TreasuryMovement, etc.)
//! - [`money`] - Decimal `Money` and `Quantity` (no floating point!)
//! - [`treasury`] - Sale → treasury movement mirror mapping and totals
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mostrador_core::{derive_expiry, PaymentMethod};
//!
//! // A postdated check due on Jan 1st expires 30 days later
//! let due = NaiveDate::from_ymd_opt(2024, 1, 1);
//! let expiry = derive_expiry(PaymentMethod::Check, due, None);
//! assert_eq!(expiry, NaiveDate::from_ymd_opt(2024, 1, 31));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod treasury;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Quantity};
pub use treasury::{mirror_of, MirrorFields, TreasurySummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default look-ahead window for upcoming check queries, in days.
pub const DEFAULT_UPCOMING_CHECK_DAYS: i64 = 7;
