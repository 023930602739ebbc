//! # Delivery Note Repository
//!
//! Numbered delivery notes (remitos). They record what left the counter
//! for a customer but never move stock.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult, LedgerResult};
use crate::repository::sequence::SequenceAssigner;
use mostrador_core::validation::validate_delivery_note_draft;
use mostrador_core::{
    CoreError, DeliveryNote, DeliveryNoteDraft, DeliveryNoteLine, DeliveryNoteLineDraft,
    DocumentSeries,
};

const NOTE_COLUMNS: &str = r#"
    id, number, issued_at, customer_name, customer_address,
    customer_postal_code, customer_note, notes, created_at, updated_at
"#;

/// Repository for delivery notes.
#[derive(Debug, Clone)]
pub struct DeliveryNoteRepository {
    pool: SqlitePool,
}

impl DeliveryNoteRepository {
    /// Creates a new DeliveryNoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryNoteRepository { pool }
    }

    /// Creates a delivery note under the next DELIVERY_NOTE number.
    pub async fn create(&self, draft: &DeliveryNoteDraft) -> LedgerResult<DeliveryNote> {
        validate_delivery_note_draft(draft)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Number first: the counter UPSERT takes the write lock
        let number = SequenceAssigner::next_in(&mut tx, DocumentSeries::DeliveryNote).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO delivery_notes (
                number, issued_at, customer_name, customer_address,
                customer_postal_code, customer_note, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?2, ?2)
            "#,
        )
        .bind(number)
        .bind(now)
        .bind(draft.customer_name.as_deref())
        .bind(draft.customer_address.as_deref())
        .bind(draft.customer_postal_code.as_deref())
        .bind(draft.customer_note.as_deref())
        .bind(draft.notes.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let id = result.last_insert_rowid();
        insert_lines(&mut tx, id, &draft.lines).await?;

        let note = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("DeliveryNote", id))?;

        tx.commit().await.map_err(DbError::from)?;

        info!(id = id, number = number, "Delivery note created");
        Ok(note)
    }

    /// Replaces header fields and lines. The number never changes.
    pub async fn update(&self, id: i64, draft: &DeliveryNoteDraft) -> LedgerResult<DeliveryNote> {
        validate_delivery_note_draft(draft)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE delivery_notes SET
                customer_name = ?2,
                customer_address = ?3,
                customer_postal_code = ?4,
                customer_note = ?5,
                notes = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(draft.customer_name.as_deref())
        .bind(draft.customer_address.as_deref())
        .bind(draft.customer_postal_code.as_deref())
        .bind(draft.customer_note.as_deref())
        .bind(draft.notes.as_deref())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::DeliveryNoteNotFound(id).into());
        }

        sqlx::query("DELETE FROM delivery_note_lines WHERE delivery_note_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        insert_lines(&mut tx, id, &draft.lines).await?;

        let note = get_in(&mut tx, id)
            .await?
            .ok_or(CoreError::DeliveryNoteNotFound(id))?;

        tx.commit().await.map_err(DbError::from)?;

        debug!(id = id, lines = note.lines.len(), "Delivery note updated");
        Ok(note)
    }

    /// Gets a delivery note with its lines.
    pub async fn get(&self, id: i64) -> DbResult<Option<DeliveryNote>> {
        let mut conn = self.pool.acquire().await?;
        get_in(&mut conn, id).await
    }

    /// Lists delivery note headers, newest number first.
    pub async fn list(&self) -> DbResult<Vec<DeliveryNote>> {
        let sql = format!("SELECT {} FROM delivery_notes ORDER BY number DESC", NOTE_COLUMNS);
        let notes = sqlx::query_as::<_, DeliveryNote>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(notes)
    }

    /// Deletes a delivery note and its lines. `false` when it didn't exist.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM delivery_notes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = id, deleted = result.rows_affected(), "Delivery note delete");
        Ok(result.rows_affected() > 0)
    }
}

async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<DeliveryNote>> {
    let sql = format!("SELECT {} FROM delivery_notes WHERE id = ?1", NOTE_COLUMNS);
    let note = sqlx::query_as::<_, DeliveryNote>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(mut note) = note else {
        return Ok(None);
    };

    note.lines = sqlx::query_as::<_, DeliveryNoteLine>(
        r#"
        SELECT id, delivery_note_id, product_id, quantity, notes
        FROM delivery_note_lines
        WHERE delivery_note_id = ?1
        ORDER BY id
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(note))
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    note_id: i64,
    lines: &[DeliveryNoteLineDraft],
) -> LedgerResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO delivery_note_lines (delivery_note_id, product_id, quantity, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(note_id)
        .bind(line.product_id)
        .bind(line.quantity.value().to_string())
        .bind(line.notes.as_deref())
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => {
                crate::error::LedgerError::from(CoreError::ProductNotFound(line.product_id))
            }
            other => other.into(),
        })?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};
    use mostrador_core::{Money, ProductDraft, Quantity};
    use rust_decimal_macros::dec;

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&ProductDraft {
                sku: "CAJA-10".to_string(),
                name: "Caja x10".to_string(),
                cost_price: Money::new(dec!(1)),
                sale_price: Money::new(dec!(2)),
                stock: Quantity::units(4),
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn draft(product_id: i64, qty: i64) -> DeliveryNoteDraft {
        DeliveryNoteDraft {
            customer_name: Some("Almacén Don Pepe".to_string()),
            customer_address: Some("Av. Siempreviva 742".to_string()),
            lines: vec![DeliveryNoteLineDraft {
                product_id,
                quantity: Quantity::units(qty),
                notes: None,
            }],
            ..DeliveryNoteDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_numbers_sequentially_without_moving_stock() {
        let (db, product_id) = setup().await;
        let repo = db.delivery_notes();

        let first = repo.create(&draft(product_id, 2)).await.unwrap();
        let second = repo.create(&draft(product_id, 3)).await.unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(first.lines.len(), 1);

        // Quantity above stock is fine: notes don't touch inventory
        let stock = db.inventory().stock_of(product_id).await.unwrap();
        assert_eq!(stock, Quantity::units(4));
    }

    #[tokio::test]
    async fn test_update_keeps_number_and_replaces_lines() {
        let (db, product_id) = setup().await;
        let repo = db.delivery_notes();

        let note = repo.create(&draft(product_id, 1)).await.unwrap();

        let mut edit = draft(product_id, 5);
        edit.lines.push(DeliveryNoteLineDraft {
            product_id,
            quantity: Quantity::new(dec!(0.5)),
            notes: Some("loose".to_string()),
        });
        edit.notes = Some("Deliver before noon".to_string());

        let updated = repo.update(note.id, &edit).await.unwrap();
        assert_eq!(updated.number, note.number);
        assert_eq!(updated.lines.len(), 2);
        assert_eq!(updated.lines[0].quantity, Quantity::units(5));
        assert_eq!(updated.notes.as_deref(), Some("Deliver before noon"));

        let err = repo.update(9999, &edit).await.unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::DeliveryNoteNotFound(9999))));
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_the_number() {
        let (db, _) = setup().await;
        let repo = db.delivery_notes();

        let err = repo.create(&draft(9999, 1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::ProductNotFound(9999))));
        assert!(repo.list().await.unwrap().is_empty());
        assert_eq!(db.sequences().current(DocumentSeries::DeliveryNote).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, product_id) = setup().await;
        let repo = db.delivery_notes();

        let note = repo.create(&draft(product_id, 1)).await.unwrap();
        assert!(repo.delete(note.id).await.unwrap());
        assert!(repo.get(note.id).await.unwrap().is_none());
        assert!(!repo.delete(note.id).await.unwrap());

        // Number is not reused
        let next = repo.create(&draft(product_id, 1)).await.unwrap();
        assert_eq!(next.number, 2);
    }

    #[tokio::test]
    async fn test_requires_lines() {
        let (db, _) = setup().await;
        let err = db
            .delivery_notes()
            .create(&DeliveryNoteDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::Validation(_))));
    }
}
