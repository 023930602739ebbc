//! # Repository Module
//!
//! Database components for Mostrador.
//!
//! ## Component Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pool-level vs transaction-level                      │
//! │                                                                         │
//! │  db.inventory().decrease(id, qty)        ← own transaction             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryLedger::decrease_in(&mut tx, id, qty)                        │
//! │       ▲                                                                 │
//! │       │                                                                 │
//! │  SaleOrchestrator::register  ← one tx for number, sale, stock, mirror │
//! │                                                                         │
//! │  Every write that takes part in a sale has an `*_in` form taking       │
//! │  `&mut SqliteConnection`, so the orchestrator can compose them inside  │
//! │  a single transaction.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Components
//!
//! - [`ProductRepository`] - Product catalog
//! - [`InventoryLedger`] - Stock increase/decrease
//! - [`SequenceAssigner`] - Gap-free document numbers
//! - [`SaleRepository`] - Sale rows and lines
//! - [`TreasuryMirror`] - Treasury movements and check queries
//! - [`DeliveryNoteRepository`] - Delivery notes

pub mod delivery_note;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod sequence;
pub mod treasury;

pub use delivery_note::DeliveryNoteRepository;
pub use inventory::InventoryLedger;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use sequence::SequenceAssigner;
pub use treasury::TreasuryMirror;
