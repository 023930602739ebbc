//! # Database Error Types
//!
//! Error types for database operations and for the ledger boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       │      CoreError (business rule, from mostrador-core)            │
//! │       │           │                                                     │
//! │       ▼           ▼                                                     │
//! │  LedgerError { Storage | Core } ← What repositories/orchestrator return│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ErrorCode + http_status() ← HTTP layer picks 404 / 400 / 422 / 500    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mostrador_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// DbError
// =============================================================================

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting duplicate SKU
    /// - A second live mirrored movement for the same sale
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Delivery note line referencing a non-existent product
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// SQLite write lock could not be taken within the busy timeout.
    ///
    /// ## When This Occurs
    /// - Many concurrent registrations against one database file
    ///
    /// The enclosing transaction has been rolled back; retrying is safe.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// A stored value could not be decoded (e.g. a malformed decimal).
    #[error("Corrupt stored value: {0}")]
    CorruptValue(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Lock contention that a fresh transaction may get past.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_))
    }
}

/// SQLite primary result codes for lock contention (BUSY, LOCKED) and their
/// extended forms.
const BUSY_CODES: [&str; 6] = ["5", "6", "261", "262", "517", "773"];

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → BUSY/LOCKED or constraint type from message
/// sqlx::Error::ColumnDecode   → DbError::CorruptValue
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                let busy_code = db_err
                    .code()
                    .map(|code| BUSY_CODES.contains(&code.as_ref()))
                    .unwrap_or(false);

                if busy_code || msg.contains("database is locked") {
                    DbError::Busy(msg.to_string())
                } else if msg.contains("UNIQUE constraint failed") {
                    // "UNIQUE constraint failed: <table>.<column>"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnDecode { index, source } => {
                DbError::CorruptValue(format!("column {}: {}", index, source))
            }

            sqlx::Error::Decode(source) => DbError::CorruptValue(source.to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// LedgerError
// =============================================================================

/// Error returned by the ledger operations (repositories with business
/// rules and the Sale Orchestrator).
///
/// Business violations are typed and recoverable; storage failures are
/// carried unchanged.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(DbError::from(err))
    }
}

impl LedgerError {
    /// Machine-readable category for the caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Core(err) => match err {
                CoreError::ProductNotFound(_)
                | CoreError::SaleNotFound(_)
                | CoreError::MovementNotFound(_)
                | CoreError::DeliveryNoteNotFound(_) => ErrorCode::NotFound,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::InvalidSaleStatus { .. } => ErrorCode::BusinessLogic,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            LedgerError::Storage(err) => match err {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                    ErrorCode::ValidationError
                }
                _ => ErrorCode::DatabaseError,
            },
        }
    }

    /// Lock contention; the whole operation can be retried.
    pub fn is_busy(&self) -> bool {
        matches!(self, LedgerError::Storage(err) if err.is_busy())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Error Codes
// =============================================================================

/// Error categories exposed to the HTTP layer.
///
/// ## Serialization
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for ..." }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Stock would go negative (400)
    InsufficientStock,

    /// Business logic error (422)
    BusinessLogic,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    /// Status code equivalent.
    pub const fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => 400,
            ErrorCode::BusinessLogic => 422,
            ErrorCode::DatabaseError => 500,
        }
    }
}

/// Serializable error payload: code plus human-readable message.
///
/// Storage failures get a generic message; the detail goes to the log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&LedgerError> for ErrorBody {
    fn from(err: &LedgerError) -> Self {
        let code = err.code();
        let message = match (code, err) {
            (ErrorCode::DatabaseError, LedgerError::Storage(db_err)) => {
                tracing::error!(error = %db_err, "Database operation failed");
                "Database operation failed".to_string()
            }
            _ => err.to_string(),
        };
        ErrorBody { code, message }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::Quantity;

    #[test]
    fn test_core_errors_map_to_client_codes() {
        let not_found: LedgerError = CoreError::SaleNotFound(9).into();
        assert_eq!(not_found.code(), ErrorCode::NotFound);
        assert_eq!(not_found.code().http_status(), 404);

        let stock: LedgerError = CoreError::InsufficientStock {
            product_id: 1,
            sku: "P-1".to_string(),
            available: Quantity::units(1),
            requested: Quantity::units(2),
        }
        .into();
        assert_eq!(stock.code(), ErrorCode::InsufficientStock);
        assert_eq!(stock.code().http_status(), 400);

        let status: LedgerError = CoreError::InvalidSaleStatus {
            sale_id: 1,
            current_status: "VOIDED".to_string(),
        }
        .into();
        assert_eq!(status.code().http_status(), 422);

        let validation: LedgerError = ValidationError::Required {
            field: "lines".to_string(),
        }
        .into();
        assert_eq!(validation.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_storage_errors_map_to_500() {
        let err: LedgerError = DbError::QueryFailed("syntax error".to_string()).into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.code().http_status(), 500);

        let body = ErrorBody::from(&err);
        assert_eq!(body.message, "Database operation failed");
    }

    #[test]
    fn test_busy_is_retryable() {
        let err: LedgerError = DbError::Busy("database is locked".to_string()).into();
        assert!(err.is_busy());
        assert!(!LedgerError::from(CoreError::SaleNotFound(1)).is_busy());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_error_body_serialization() {
        let err: LedgerError = CoreError::ProductNotFound(3).into();
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 3");
    }
}
