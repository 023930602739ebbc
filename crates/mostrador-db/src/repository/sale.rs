//! # Sale Repository
//!
//! Row-level operations for sales and sale lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. REGISTER                                                           │
//! │     └── number taken, header + lines inserted, stock decreased,        │
//! │         treasury movement mirrored (one transaction)                   │
//! │                                                                         │
//! │  2. (OPTIONAL) UPDATE                                                  │
//! │     └── header overwritten, lines replaced, mirror synced              │
//! │                                                                         │
//! │  3. (OPTIONAL) VOID                                                    │
//! │     └── status VOIDED, mirror voided, stock NOT restored               │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── header + lines removed, mirror left in place                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are only exposed as `*_in` functions taking the caller's
//! transaction; the [`SaleOrchestrator`](crate::orchestrator::SaleOrchestrator)
//! strings them together with the other components.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbResult, LedgerResult};
use mostrador_core::validation::{line_subtotal, sale_total};
use mostrador_core::{Sale, SaleDraft, SaleLine, SaleLineDraft, SaleStatus};

/// Column list matching [`Sale`]'s `FromRow`.
const SALE_COLUMNS: &str = r#"
    id, number, sold_at, customer_id, customer_name, description,
    total, payment_method, status, voided,
    check_bank, check_number, check_drawer,
    check_issue_date, check_due_date, check_expiry_date,
    created_at, updated_at
"#;

const SALE_LINE_COLUMNS: &str = "id, sale_id, product_id, quantity, unit_price, subtotal";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale by ID, with its lines.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut conn, id).await
    }

    /// Gets a sale by its series number, with its lines.
    pub async fn get_by_number(&self, number: i64) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!("SELECT {} FROM sales WHERE number = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(number)
            .fetch_optional(&mut *conn)
            .await?;

        match sale {
            Some(mut sale) => {
                sale.lines = Self::lines_in(&mut conn, sale.id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Gets a sale with its lines on an existing connection / transaction.
    pub async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales WHERE id = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match sale {
            Some(mut sale) => {
                sale.lines = Self::lines_in(conn, id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Lines of a sale in insertion order.
    pub async fn lines_in(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        let sql = format!(
            "SELECT {} FROM sale_lines WHERE sale_id = ?1 ORDER BY id",
            SALE_LINE_COLUMNS
        );
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&mut *conn)
            .await?;

        Ok(lines)
    }

    /// Lists sale headers (without lines), newest number first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {} FROM sales ORDER BY number DESC", SALE_COLUMNS);
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists sale headers with `sold_at` in `[from, to)`, oldest first.
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales WHERE sold_at >= ?1 AND sold_at < ?2 ORDER BY sold_at, number",
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Counts sales, voided ones included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// `Some(voided)` for an existing sale, `None` otherwise.
    pub async fn voided_flag_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<bool>> {
        let voided: Option<bool> = sqlx::query_scalar("SELECT voided FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(voided)
    }

    // =========================================================================
    // Writes (caller-owned transaction)
    // =========================================================================

    /// Inserts the sale header under `number` and returns its id.
    ///
    /// `sold_at` defaults to `now`, check fields are normalized for the
    /// payment method. A total that does not fit fails with `TooLarge`.
    pub async fn insert_in(
        conn: &mut SqliteConnection,
        number: i64,
        draft: &SaleDraft,
        now: DateTime<Utc>,
    ) -> LedgerResult<i64> {
        let total = sale_total(draft)?;
        let check = draft.check_details();

        debug!(number = number, method = %draft.payment_method(), "Inserting sale header");

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                number, sold_at, customer_id, customer_name, description,
                total, payment_method, status, voided,
                check_bank, check_number, check_drawer,
                check_issue_date, check_due_date, check_expiry_date,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, 0,
                ?9, ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?15
            )
            "#,
        )
        .bind(number)
        .bind(draft.sold_at.unwrap_or(now))
        .bind(draft.customer_id)
        .bind(draft.customer_name.as_deref())
        .bind(draft.description.as_deref())
        .bind(total.amount().to_string())
        .bind(draft.payment_method())
        .bind(SaleStatus::Registered)
        .bind(check.bank)
        .bind(check.number)
        .bind(check.drawer)
        .bind(check.issue_date)
        .bind(check.due_date)
        .bind(check.expiry_date)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts `lines` under `sale_id`, computing each subtotal.
    pub async fn insert_lines_in(
        conn: &mut SqliteConnection,
        sale_id: i64,
        lines: &[SaleLineDraft],
    ) -> LedgerResult<()> {
        for line in lines {
            let subtotal = line_subtotal(line)?;
            sqlx::query(
                r#"
                INSERT INTO sale_lines (sale_id, product_id, quantity, unit_price, subtotal)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity.value().to_string())
            .bind(line.unit_price.amount().to_string())
            .bind(subtotal.amount().to_string())
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Removes every line of a sale.
    pub async fn delete_lines_in(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sale_lines WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Overwrites the header of a live sale. Number and status are kept;
    /// `sold_at` is kept when the draft has none.
    ///
    /// Returns rows affected: 0 when the sale is missing or voided.
    pub async fn update_header_in(
        conn: &mut SqliteConnection,
        id: i64,
        draft: &SaleDraft,
        now: DateTime<Utc>,
    ) -> LedgerResult<u64> {
        let total = sale_total(draft)?;
        let check = draft.check_details();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                sold_at = COALESCE(?2, sold_at),
                customer_id = ?3,
                customer_name = ?4,
                description = ?5,
                total = ?6,
                payment_method = ?7,
                check_bank = ?8,
                check_number = ?9,
                check_drawer = ?10,
                check_issue_date = ?11,
                check_due_date = ?12,
                check_expiry_date = ?13,
                updated_at = ?14
            WHERE id = ?1 AND voided = 0
            "#,
        )
        .bind(id)
        .bind(draft.sold_at)
        .bind(draft.customer_id)
        .bind(draft.customer_name.as_deref())
        .bind(draft.description.as_deref())
        .bind(total.amount().to_string())
        .bind(draft.payment_method())
        .bind(check.bank)
        .bind(check.number)
        .bind(check.drawer)
        .bind(check.issue_date)
        .bind(check.due_date)
        .bind(check.expiry_date)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flags a sale as voided. Returns rows affected (0 when missing).
    pub async fn mark_voided_in(
        conn: &mut SqliteConnection,
        id: i64,
        now: DateTime<Utc>,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE sales SET voided = 1, status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(SaleStatus::Voided)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Hard-deletes a sale; its lines go with it (ON DELETE CASCADE).
    pub async fn delete_in(conn: &mut SqliteConnection, id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, NaiveDate, TimeZone};
    use mostrador_core::{CheckDetails, Money, PaymentMethod, ProductDraft, Quantity};
    use rust_decimal_macros::dec;

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&ProductDraft {
                sku: "P-1".to_string(),
                name: "Product 1".to_string(),
                cost_price: Money::new(dec!(5)),
                sale_price: Money::new(dec!(10)),
                stock: Quantity::units(10),
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn check_draft(product_id: i64) -> SaleDraft {
        SaleDraft {
            description: Some("Postdated".to_string()),
            payment_method: Some(PaymentMethod::Check),
            check: CheckDetails {
                bank: Some("Banco Provincia".to_string()),
                due_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..CheckDetails::default()
            },
            lines: vec![SaleLineDraft::new(
                product_id,
                Quantity::units(2),
                Money::new(dec!(10.00)),
            )],
            ..SaleDraft::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (db, product_id) = setup().await;
        let now = Utc::now();

        let mut tx = db.pool().begin().await.unwrap();
        let id = SaleRepository::insert_in(&mut tx, 1, &check_draft(product_id), now)
            .await
            .unwrap();
        SaleRepository::insert_lines_in(&mut tx, id, &check_draft(product_id).lines)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let sale = db.sales().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(sale.number, 1);
        assert_eq!(sale.total, Money::new(dec!(20)));
        assert_eq!(sale.status, SaleStatus::Registered);
        assert!(!sale.voided);
        assert_eq!(sale.check.bank.as_deref(), Some("Banco Provincia"));
        assert_eq!(sale.check.expiry_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.lines[0].subtotal, Money::new(dec!(20)));

        let by_number = db.sales().get_by_number(1).await.unwrap().unwrap();
        assert_eq!(by_number.id, id);
        assert_eq!(by_number.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_update_header_skips_voided_sales() {
        let (db, product_id) = setup().await;
        let now = Utc::now();
        let draft = check_draft(product_id);

        let mut conn = db.pool().acquire().await.unwrap();
        let id = SaleRepository::insert_in(&mut conn, 1, &draft, now).await.unwrap();

        let cash = SaleDraft {
            payment_method: Some(PaymentMethod::Cash),
            ..draft.clone()
        };
        assert_eq!(SaleRepository::update_header_in(&mut conn, id, &cash, now).await.unwrap(), 1);

        let sale = SaleRepository::get_in(&mut conn, id).await.unwrap().unwrap();
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
        assert!(sale.check.is_empty());

        assert_eq!(SaleRepository::mark_voided_in(&mut conn, id, now).await.unwrap(), 1);
        assert_eq!(SaleRepository::voided_flag_in(&mut conn, id).await.unwrap(), Some(true));
        assert_eq!(SaleRepository::update_header_in(&mut conn, id, &cash, now).await.unwrap(), 0);

        let sale = SaleRepository::get_in(&mut conn, id).await.unwrap().unwrap();
        assert_eq!(sale.status, SaleStatus::Voided);
        assert_eq!(SaleRepository::voided_flag_in(&mut conn, 9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stored_amounts_keep_cents() {
        let (db, product_id) = setup().await;
        let draft = SaleDraft {
            lines: vec![SaleLineDraft::new(product_id, Quantity::units(2), Money::new(dec!(10)))],
            ..SaleDraft::default()
        };

        let mut conn = db.pool().acquire().await.unwrap();
        let id = SaleRepository::insert_in(&mut conn, 1, &draft, Utc::now()).await.unwrap();
        SaleRepository::insert_lines_in(&mut conn, id, &draft.lines).await.unwrap();

        let total: String = sqlx::query_scalar("SELECT total FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let subtotal: String = sqlx::query_scalar("SELECT subtotal FROM sale_lines WHERE sale_id = ?1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(total, "20.00");
        assert_eq!(subtotal, "20.00");
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected_not_panicking() {
        let (db, product_id) = setup().await;
        let draft = SaleDraft {
            lines: vec![SaleLineDraft::new(
                product_id,
                Quantity::new(dec!(1000000000000000)),
                Money::new(dec!(100000000000000000)),
            )],
            ..SaleDraft::default()
        };

        let mut conn = db.pool().acquire().await.unwrap();
        let header = SaleRepository::insert_in(&mut conn, 1, &draft, Utc::now()).await;
        assert!(matches!(
            header,
            Err(crate::error::LedgerError::Core(mostrador_core::CoreError::Validation(
                mostrador_core::ValidationError::TooLarge { .. }
            )))
        ));

        let lines = SaleRepository::insert_lines_in(&mut conn, 1, &draft.lines).await;
        assert!(lines.is_err());
        drop(conn);

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_lines() {
        let (db, product_id) = setup().await;
        let draft = check_draft(product_id);

        let mut conn = db.pool().acquire().await.unwrap();
        let id = SaleRepository::insert_in(&mut conn, 1, &draft, Utc::now()).await.unwrap();
        SaleRepository::insert_lines_in(&mut conn, id, &draft.lines).await.unwrap();

        assert_eq!(SaleRepository::delete_in(&mut conn, id).await.unwrap(), 1);
        assert!(SaleRepository::lines_in(&mut conn, id).await.unwrap().is_empty());
        assert_eq!(SaleRepository::delete_in(&mut conn, id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_between() {
        let (db, product_id) = setup().await;
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        for (number, offset) in [(1, 0), (2, 1), (3, 2)] {
            let draft = SaleDraft {
                sold_at: Some(base + Duration::days(offset)),
                ..check_draft(product_id)
            };
            SaleRepository::insert_in(&mut conn, number, &draft, base).await.unwrap();
        }
        drop(conn);

        let sales = db
            .sales()
            .list_between(base, base + Duration::days(2))
            .await
            .unwrap();
        let numbers: Vec<i64> = sales.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);

        assert_eq!(db.sales().list().await.unwrap()[0].number, 3);
        assert_eq!(db.sales().count().await.unwrap(), 3);
    }
}
