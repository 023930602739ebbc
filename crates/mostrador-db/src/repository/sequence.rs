//! # Sequence Assigner
//!
//! Gap-free document numbers per series (sales, purchases, delivery notes).
//!
//! ## Counter Row
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  document_sequences                                                     │
//! │  ┌───────────────┬────────────┐                                        │
//! │  │ series        │ last_value │                                        │
//! │  ├───────────────┼────────────┤                                        │
//! │  │ SALE          │ 41         │ ◄── one UPSERT … RETURNING per number  │
//! │  │ DELIVERY_NOTE │ 7          │                                        │
//! │  └───────────────┴────────────┘                                        │
//! │                                                                         │
//! │  next = max(last_value, MAX(number) in the series table) + 1           │
//! │                                                                         │
//! │  The UPSERT is a write, so when it is the first statement of a         │
//! │  transaction it takes the SQLite write lock. A second registration     │
//! │  waits on the busy handler until the first one commits or rolls back.  │
//! │  A rollback also rolls the counter back: no gaps.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use mostrador_core::DocumentSeries;

/// Produces the next number of a document series.
#[derive(Debug, Clone)]
pub struct SequenceAssigner {
    pool: SqlitePool,
}

impl SequenceAssigner {
    /// Creates a new SequenceAssigner.
    pub fn new(pool: SqlitePool) -> Self {
        SequenceAssigner { pool }
    }

    /// Takes the next number in its own transaction.
    ///
    /// Only useful for series whose documents are stored elsewhere (e.g.
    /// purchases). Documents stored here take their number with
    /// [`SequenceAssigner::next_in`] inside the insert's transaction.
    pub async fn next_number(&self, series: DocumentSeries) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;
        let number = Self::next_in(&mut tx, series).await?;
        tx.commit().await?;
        Ok(number)
    }

    /// Takes the next number on `conn`.
    ///
    /// ## Usage
    /// Must be the first statement of the transaction that inserts the
    /// numbered document.
    pub async fn next_in(conn: &mut SqliteConnection, series: DocumentSeries) -> DbResult<i64> {
        // The table name comes from a closed enum, never from input
        let seed = match series.numbered_table() {
            Some(table) => format!("(SELECT COALESCE(MAX(number), 0) + 1 FROM {})", table),
            None => "1".to_string(),
        };

        let sql = format!(
            r#"
            INSERT INTO document_sequences (series, last_value)
            VALUES (?1, {seed})
            ON CONFLICT(series) DO UPDATE SET
                last_value = MAX(document_sequences.last_value, excluded.last_value - 1) + 1
            RETURNING last_value
            "#
        );

        let number: i64 = sqlx::query_scalar(&sql)
            .bind(series.as_str())
            .fetch_one(&mut *conn)
            .await?;

        debug!(series = %series, number = number, "Assigned document number");
        Ok(number)
    }

    /// Last number handed out, `None` if the series was never used.
    pub async fn current(&self, series: DocumentSeries) -> DbResult<Option<i64>> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT last_value FROM document_sequences WHERE series = ?1")
                .bind(series.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_series_starts_at_one() {
        let db = db().await;
        let seq = db.sequences();

        assert_eq!(seq.current(DocumentSeries::Purchase).await.unwrap(), None);
        assert_eq!(seq.next_number(DocumentSeries::Purchase).await.unwrap(), 1);
        assert_eq!(seq.next_number(DocumentSeries::Purchase).await.unwrap(), 2);
        assert_eq!(seq.current(DocumentSeries::Purchase).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_series_are_independent() {
        let db = db().await;
        let seq = db.sequences();

        assert_eq!(seq.next_number(DocumentSeries::Sale).await.unwrap(), 1);
        assert_eq!(seq.next_number(DocumentSeries::Sale).await.unwrap(), 2);
        assert_eq!(seq.next_number(DocumentSeries::DeliveryNote).await.unwrap(), 1);
        assert_eq!(seq.next_number(DocumentSeries::Purchase).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seeds_from_existing_numbers() {
        let db = db().await;
        let now = Utc::now();

        // Legacy row imported without going through the counter
        sqlx::query(
            "INSERT INTO sales (number, sold_at, total, created_at, updated_at)
             VALUES (41, ?1, '10', ?1, ?1)",
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let seq = db.sequences();
        assert_eq!(seq.next_number(DocumentSeries::Sale).await.unwrap(), 42);
        assert_eq!(seq.next_number(DocumentSeries::Sale).await.unwrap(), 43);
    }

    #[tokio::test]
    async fn test_rollback_returns_the_number() {
        let db = db().await;

        let mut tx = db.pool().begin().await.unwrap();
        let taken = SequenceAssigner::next_in(&mut tx, DocumentSeries::Sale)
            .await
            .unwrap();
        assert_eq!(taken, 1);
        tx.rollback().await.unwrap();

        let seq = db.sequences();
        assert_eq!(seq.next_number(DocumentSeries::Sale).await.unwrap(), 1);
    }
}
