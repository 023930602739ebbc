//! # Treasury Mirror
//!
//! Treasury (cash-flow) movements: the movement mirrored from each sale,
//! manual movements, and postdated-check queries.
//!
//! ## Mirror Invariant
//! At most one non-voided movement per `sale_id`. The orchestrator keeps it
//! by construction; the `uq_treasury_live_mirror` partial unique index
//! rejects anything that slips past.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult, LedgerResult};
use mostrador_core::validation::validate_new_movement;
use mostrador_core::{
    mirror_of, window_end, CoreError, NewMovement, PaymentMethod, Sale, TreasuryMovement,
    TreasurySummary,
};

/// Column list matching [`TreasuryMovement`]'s `FromRow`.
const MOVEMENT_COLUMNS: &str = r#"
    id, direction, payment_method, amount, reference, description,
    moved_at, sale_id, voided, collected,
    check_bank, check_number, check_drawer,
    check_issue_date, check_due_date, check_expiry_date, check_kind,
    created_at, updated_at
"#;

/// Treasury movements and check queries.
///
/// ## Usage
/// ```rust,ignore
/// let treasury = db.treasury();
///
/// let mirrored = treasury.find_live_by_sale_id(sale.id).await?;
/// let due_soon = treasury.upcoming_checks(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TreasuryMirror {
    pool: SqlitePool,
}

impl TreasuryMirror {
    /// Creates a new TreasuryMirror.
    pub fn new(pool: SqlitePool) -> Self {
        TreasuryMirror { pool }
    }

    // =========================================================================
    // Sale Mirror
    // =========================================================================

    /// Creates the movement mirroring `sale`.
    pub async fn create_for_sale(&self, sale: &Sale) -> DbResult<TreasuryMovement> {
        let mut tx = self.pool.begin().await?;
        let movement = Self::create_for_sale_in(&mut tx, sale, Utc::now()).await?;
        tx.commit().await?;
        Ok(movement)
    }

    /// Brings the live mirrored movement of `sale` in line with it.
    ///
    /// `Ok(None)` when the sale has no live movement.
    pub async fn sync_for_sale(&self, sale: &Sale) -> DbResult<Option<TreasuryMovement>> {
        let mut tx = self.pool.begin().await?;
        let movement = Self::sync_for_sale_in(&mut tx, sale, Utc::now()).await?;
        tx.commit().await?;
        Ok(movement)
    }

    /// Voids every live movement of `sale_id`. Returns how many were voided.
    pub async fn void_for_sale(&self, sale_id: i64) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let voided = Self::void_for_sale_in(&mut tx, sale_id, Utc::now()).await?;
        tx.commit().await?;
        Ok(voided)
    }

    /// [`TreasuryMirror::create_for_sale`] on a caller-owned transaction.
    ///
    /// ## Returns
    /// * `Err(UniqueViolation)` - The sale already has a live movement
    pub async fn create_for_sale_in(
        conn: &mut SqliteConnection,
        sale: &Sale,
        now: DateTime<Utc>,
    ) -> DbResult<TreasuryMovement> {
        let fields = mirror_of(sale);

        debug!(sale_id = sale.id, amount = %fields.amount, "Creating mirrored movement");

        let result = sqlx::query(
            r#"
            INSERT INTO treasury_movements (
                direction, payment_method, amount, reference, description,
                moved_at, sale_id, voided, collected,
                check_bank, check_number, check_drawer,
                check_issue_date, check_due_date, check_expiry_date, check_kind,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, 0, 0,
                ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?15
            )
            "#,
        )
        .bind(fields.direction)
        .bind(fields.payment_method)
        .bind(fields.amount.amount().to_string())
        .bind(&fields.reference)
        .bind(&fields.description)
        .bind(sale.sold_at)
        .bind(sale.id)
        .bind(&fields.check.bank)
        .bind(&fields.check.number)
        .bind(&fields.check.drawer)
        .bind(fields.check.issue_date)
        .bind(fields.check.due_date)
        .bind(fields.check.expiry_date)
        .bind(fields.check_kind)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("treasury_movements.sale_id", sale.id.to_string())
            }
            other => other,
        })?;

        let id = result.last_insert_rowid();
        Self::get_in(conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("TreasuryMovement", id))
    }

    /// [`TreasuryMirror::sync_for_sale`] on a caller-owned transaction.
    ///
    /// Overwrites every mirrored field, so check fields are nulled when the
    /// sale no longer pays by check.
    pub async fn sync_for_sale_in(
        conn: &mut SqliteConnection,
        sale: &Sale,
        now: DateTime<Utc>,
    ) -> DbResult<Option<TreasuryMovement>> {
        let fields = mirror_of(sale);

        let row: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE treasury_movements SET
                direction = ?2,
                payment_method = ?3,
                amount = ?4,
                reference = ?5,
                description = ?6,
                check_bank = ?7,
                check_number = ?8,
                check_drawer = ?9,
                check_issue_date = ?10,
                check_due_date = ?11,
                check_expiry_date = ?12,
                check_kind = ?13,
                updated_at = ?14
            WHERE sale_id = ?1 AND voided = 0
            RETURNING id
            "#,
        )
        .bind(sale.id)
        .bind(fields.direction)
        .bind(fields.payment_method)
        .bind(fields.amount.amount().to_string())
        .bind(&fields.reference)
        .bind(&fields.description)
        .bind(&fields.check.bank)
        .bind(&fields.check.number)
        .bind(&fields.check.drawer)
        .bind(fields.check.issue_date)
        .bind(fields.check.due_date)
        .bind(fields.check.expiry_date)
        .bind(fields.check_kind)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(id) => {
                debug!(sale_id = sale.id, movement_id = id, "Synced mirrored movement");
                Self::get_in(conn, id).await
            }
            None => {
                debug!(sale_id = sale.id, "No live mirrored movement to sync");
                Ok(None)
            }
        }
    }

    /// [`TreasuryMirror::void_for_sale`] on a caller-owned transaction.
    pub async fn void_for_sale_in(
        conn: &mut SqliteConnection,
        sale_id: i64,
        now: DateTime<Utc>,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE treasury_movements SET voided = 1, updated_at = ?2 WHERE sale_id = ?1 AND voided = 0",
        )
        .bind(sale_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        debug!(sale_id = sale_id, voided = result.rows_affected(), "Voided mirrored movements");
        Ok(result.rows_affected())
    }

    /// Every movement ever mirrored from `sale_id`, voided ones included.
    pub async fn find_by_sale_id(&self, sale_id: i64) -> DbResult<Vec<TreasuryMovement>> {
        let sql = format!(
            "SELECT {} FROM treasury_movements WHERE sale_id = ?1 ORDER BY id",
            MOVEMENT_COLUMNS
        );
        let movements = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// The live (non-voided) movement of `sale_id`, if any.
    pub async fn find_live_by_sale_id(&self, sale_id: i64) -> DbResult<Option<TreasuryMovement>> {
        let mut conn = self.pool.acquire().await?;
        Self::live_for_sale_in(&mut conn, sale_id).await
    }

    pub(crate) async fn live_for_sale_in(
        conn: &mut SqliteConnection,
        sale_id: i64,
    ) -> DbResult<Option<TreasuryMovement>> {
        let sql = format!(
            "SELECT {} FROM treasury_movements WHERE sale_id = ?1 AND voided = 0",
            MOVEMENT_COLUMNS
        );
        let movement = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(sale_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(movement)
    }

    // =========================================================================
    // Check Queries
    // =========================================================================

    /// Live, uncollected CHECK movements expiring within `[today, today + days)`.
    ///
    /// Windows reaching past the last storable date are clamped to it;
    /// `days <= 0` yields nothing.
    pub async fn upcoming_checks(&self, days: i64) -> DbResult<Vec<TreasuryMovement>> {
        self.upcoming_checks_on(days, Utc::now().date_naive()).await
    }

    /// [`TreasuryMirror::upcoming_checks`] as of a given day.
    pub async fn upcoming_checks_on(
        &self,
        days: i64,
        today: NaiveDate,
    ) -> DbResult<Vec<TreasuryMovement>> {
        let sql = format!(
            r#"
            SELECT {} FROM treasury_movements
            WHERE payment_method = ?1
              AND voided = 0 AND collected = 0
              AND check_expiry_date >= ?2 AND check_expiry_date < ?3
            ORDER BY check_expiry_date, id
            "#,
            MOVEMENT_COLUMNS
        );
        let movements = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(PaymentMethod::Check)
            .bind(today)
            .bind(storable(window_end(today, days)))
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Live, uncollected CHECK movements whose expiry has passed.
    pub async fn overdue_checks(&self) -> DbResult<Vec<TreasuryMovement>> {
        self.overdue_checks_on(Utc::now().date_naive()).await
    }

    /// [`TreasuryMirror::overdue_checks`] as of a given day.
    pub async fn overdue_checks_on(&self, today: NaiveDate) -> DbResult<Vec<TreasuryMovement>> {
        let sql = format!(
            r#"
            SELECT {} FROM treasury_movements
            WHERE payment_method = ?1
              AND voided = 0 AND collected = 0
              AND check_expiry_date < ?2
            ORDER BY check_expiry_date, id
            "#,
            MOVEMENT_COLUMNS
        );
        let movements = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(PaymentMethod::Check)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    // =========================================================================
    // Manual Movements
    // =========================================================================

    /// Records a manual movement (not linked to a sale).
    pub async fn record(&self, movement: &NewMovement) -> LedgerResult<TreasuryMovement> {
        validate_new_movement(movement)?;

        let method = movement.payment_method;
        let check = normalized_check(movement);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO treasury_movements (
                direction, payment_method, amount, reference, description,
                moved_at, sale_id, voided, collected,
                check_bank, check_number, check_drawer,
                check_issue_date, check_due_date, check_expiry_date, check_kind,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, NULL, 0, 0,
                ?7, ?8, ?9,
                ?10, ?11, ?12, ?13,
                ?14, ?14
            )
            "#,
        )
        .bind(movement.direction)
        .bind(method)
        .bind(movement.amount.amount().to_string())
        .bind(movement.reference.as_deref())
        .bind(movement.description.as_deref())
        .bind(movement.moved_at.unwrap_or(now))
        .bind(check.bank)
        .bind(check.number)
        .bind(check.drawer)
        .bind(check.issue_date)
        .bind(check.due_date)
        .bind(check.expiry_date)
        .bind(method.check_kind())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        let id = result.last_insert_rowid();
        info!(id = id, direction = %movement.direction, amount = %movement.amount, "Recorded treasury movement");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("TreasuryMovement", id).into())
    }

    /// Overwrites the business fields of a movement.
    ///
    /// The sale link and the voided/collected flags are kept.
    pub async fn update_movement(
        &self,
        id: i64,
        movement: &NewMovement,
    ) -> LedgerResult<TreasuryMovement> {
        validate_new_movement(movement)?;

        let method = movement.payment_method;
        let check = normalized_check(movement);

        debug!(id = id, "Updating treasury movement");

        let result = sqlx::query(
            r#"
            UPDATE treasury_movements SET
                direction = ?2,
                payment_method = ?3,
                amount = ?4,
                reference = ?5,
                description = ?6,
                moved_at = COALESCE(?7, moved_at),
                check_bank = ?8,
                check_number = ?9,
                check_drawer = ?10,
                check_issue_date = ?11,
                check_due_date = ?12,
                check_expiry_date = ?13,
                check_kind = ?14,
                updated_at = ?15
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(movement.direction)
        .bind(method)
        .bind(movement.amount.amount().to_string())
        .bind(movement.reference.as_deref())
        .bind(movement.description.as_deref())
        .bind(movement.moved_at)
        .bind(check.bank)
        .bind(check.number)
        .bind(check.drawer)
        .bind(check.issue_date)
        .bind(check.due_date)
        .bind(check.expiry_date)
        .bind(method.check_kind())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::MovementNotFound(id).into());
        }

        self.get(id)
            .await?
            .ok_or_else(|| CoreError::MovementNotFound(id).into())
    }

    /// Flags a check movement as collected (cashed).
    pub async fn mark_collected(&self, id: i64) -> LedgerResult<TreasuryMovement> {
        let result = sqlx::query(
            "UPDATE treasury_movements SET collected = 1, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::MovementNotFound(id).into());
        }

        info!(id = id, "Check marked as collected");

        self.get(id)
            .await?
            .ok_or_else(|| CoreError::MovementNotFound(id).into())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a movement by ID.
    pub async fn get(&self, id: i64) -> DbResult<Option<TreasuryMovement>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut conn, id).await
    }

    async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<TreasuryMovement>> {
        let sql = format!("SELECT {} FROM treasury_movements WHERE id = ?1", MOVEMENT_COLUMNS);
        let movement = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(movement)
    }

    /// Lists every movement, newest first.
    pub async fn list(&self) -> DbResult<Vec<TreasuryMovement>> {
        let sql = format!(
            "SELECT {} FROM treasury_movements ORDER BY moved_at DESC, id DESC",
            MOVEMENT_COLUMNS
        );
        let movements = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Lists movements dated in `[from, to)`, oldest first.
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<TreasuryMovement>> {
        let sql = format!(
            "SELECT {} FROM treasury_movements WHERE moved_at >= ?1 AND moved_at < ?2 ORDER BY moved_at, id",
            MOVEMENT_COLUMNS
        );
        let movements = sqlx::query_as::<_, TreasuryMovement>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Income, expense and balance over non-voided movements.
    pub async fn summary(&self) -> DbResult<TreasurySummary> {
        let movements = self.list().await?;
        Ok(TreasurySummary::from_movements(&movements))
    }
}

/// Dates are stored as `YYYY-MM-DD` text; bounds past year 9999 would
/// render with a sign and break the comparison.
fn storable(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).map_or(date, |last| date.min(last))
}

/// Check fields as stored: expiry derived for checks, nothing otherwise.
fn normalized_check(movement: &NewMovement) -> mostrador_core::CheckDetails {
    if movement.payment_method.is_check() {
        movement
            .check
            .clone()
            .with_derived_expiry(movement.payment_method)
    } else {
        mostrador_core::CheckDetails::default()
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
    use chrono::Duration;
    use mostrador_core::{CheckDetails, CheckKind, Money, MovementDirection};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn check_income(due: NaiveDate) -> NewMovement {
        NewMovement {
            direction: MovementDirection::Income,
            payment_method: PaymentMethod::Check,
            amount: Money::new(dec!(150.00)),
            reference: Some("Customer payment".to_string()),
            description: None,
            moved_at: None,
            check: CheckDetails {
                bank: Some("Banco Nación".to_string()),
                number: Some("0001".to_string()),
                due_date: Some(due),
                ..CheckDetails::default()
            },
        }
    }

    fn cash(direction: MovementDirection, amount: Money) -> NewMovement {
        NewMovement {
            direction,
            payment_method: PaymentMethod::Cash,
            amount,
            reference: None,
            description: Some("Petty cash".to_string()),
            moved_at: None,
            check: CheckDetails::default(),
        }
    }

    #[tokio::test]
    async fn test_record_derives_expiry_and_kind() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let movement = db
            .treasury()
            .record(&check_income(date(2024, 1, 1)))
            .await
            .unwrap();

        assert_eq!(movement.sale_id, None);
        assert_eq!(movement.check.expiry_date, Some(date(2024, 1, 31)));
        assert_eq!(movement.check_kind, Some(CheckKind::Physical));
        assert!(!movement.voided);
        assert!(!movement.collected);
    }

    #[tokio::test]
    async fn test_record_drops_check_fields_for_cash() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut input = check_income(date(2024, 1, 1));
        input.payment_method = PaymentMethod::Cash;
        let movement = db.treasury().record(&input).await.unwrap();

        assert!(movement.check.is_empty());
        assert_eq!(movement.check_kind, None);
    }

    #[tokio::test]
    async fn test_upcoming_and_overdue_checks() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let treasury = db.treasury();
        let today = date(2024, 3, 10);

        // Expiry = due + 30
        let overdue = treasury.record(&check_income(date(2024, 2, 1))).await.unwrap(); // 03-02
        let due_today = treasury.record(&check_income(date(2024, 2, 9))).await.unwrap(); // 03-10
        let due_soon = treasury.record(&check_income(date(2024, 2, 14))).await.unwrap(); // 03-15
        treasury.record(&check_income(date(2024, 2, 15))).await.unwrap(); // 03-16, outside [10, 16)
        treasury
            .record(&cash(MovementDirection::Income, Money::new(dec!(10))))
            .await
            .unwrap();

        let upcoming = treasury.upcoming_checks_on(6, today).await.unwrap();
        let ids: Vec<i64> = upcoming.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![due_today.id, due_soon.id]);
        assert!(upcoming.iter().all(|m| m.is_due_within_on(6, today)));

        let overdue_list = treasury.overdue_checks_on(today).await.unwrap();
        assert_eq!(overdue_list.len(), 1);
        assert_eq!(overdue_list[0].id, overdue.id);
        assert!(overdue_list[0].is_overdue_on(today));

        // Collected checks drop out of both queries
        treasury.mark_collected(overdue.id).await.unwrap();
        treasury.mark_collected(due_today.id).await.unwrap();
        assert!(treasury.overdue_checks_on(today).await.unwrap().is_empty());
        assert_eq!(treasury.upcoming_checks_on(6, today).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upcoming_checks_with_huge_or_empty_window() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let treasury = db.treasury();
        let today = date(2024, 3, 10);

        let due_soon = treasury.record(&check_income(date(2024, 2, 14))).await.unwrap(); // 03-15
        let far = treasury.record(&check_income(date(2999, 1, 1))).await.unwrap();

        for days in [200_000_000, i64::MAX] {
            let ids: Vec<i64> = treasury
                .upcoming_checks_on(days, today)
                .await
                .unwrap()
                .iter()
                .map(|m| m.id)
                .collect();
            assert_eq!(ids, vec![due_soon.id, far.id]);
        }
        assert_eq!(treasury.upcoming_checks(200_000_000).await.unwrap().len(), 1);

        assert!(treasury.upcoming_checks_on(0, today).await.unwrap().is_empty());
        assert!(treasury.upcoming_checks_on(-5, today).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_electronic_checks_are_not_in_check_queries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let treasury = db.treasury();

        let mut input = check_income(date(2024, 3, 1));
        input.payment_method = PaymentMethod::CheckElectronic;
        input.check.expiry_date = Some(date(2024, 3, 12));
        let movement = treasury.record(&input).await.unwrap();
        assert_eq!(movement.check_kind, Some(CheckKind::Electronic));

        assert!(treasury
            .upcoming_checks_on(7, date(2024, 3, 10))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_movement() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let treasury = db.treasury();

        let original = treasury.record(&check_income(date(2024, 1, 1))).await.unwrap();
        let updated = treasury
            .update_movement(original.id, &cash(MovementDirection::Expense, Money::new(dec!(40))))
            .await
            .unwrap();

        assert_eq!(updated.direction, MovementDirection::Expense);
        assert_eq!(updated.amount, Money::new(dec!(40)));
        assert!(updated.check.is_empty());
        assert_eq!(updated.check_kind, None);
        assert_eq!(updated.moved_at, original.moved_at);

        let err = treasury
            .update_movement(9999, &cash(MovementDirection::Expense, Money::new(dec!(1))))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::MovementNotFound(9999))));
    }

    #[tokio::test]
    async fn test_mark_collected_unknown() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.treasury().mark_collected(42).await.unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::MovementNotFound(42))));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .treasury()
            .record(&cash(MovementDirection::Income, Money::zero()))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_summary_and_list_between() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let treasury = db.treasury();

        treasury
            .record(&cash(MovementDirection::Income, Money::new(dec!(100.50))))
            .await
            .unwrap();
        treasury
            .record(&cash(MovementDirection::Expense, Money::new(dec!(30.25))))
            .await
            .unwrap();

        let summary = treasury.summary().await.unwrap();
        assert_eq!(summary.income, Money::new(dec!(100.50)));
        assert_eq!(summary.expense, Money::new(dec!(30.25)));
        assert_eq!(summary.balance, Money::new(dec!(70.25)));

        let now = Utc::now();
        let window = treasury
            .list_between(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert!(treasury
            .list_between(now + Duration::hours(1), now + Duration::hours(2))
            .await
            .unwrap()
            .is_empty());
    }
}
