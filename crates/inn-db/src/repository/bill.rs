//! # Bill Repository
//!
//! The billing ledger. Bills are created with their booking and moved only
//! by lifecycle operations; this module holds the reads and the one write
//! helper every lifecycle step shares.
//!
//! ## Ledger Columns
//! ```text
//! room_charge_cents ─────┐
//! services_charge_cents ─┼─► total_amount_cents (CHECK: = room + services − discount)
//! discount_cents ────────┘           │
//!                                    ▼
//!                    paid_amount_cents (CHECK: 0 ≤ paid ≤ total)
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use inn_core::{Bill, BillSummary, BillTotals};

const BILL_COLUMNS: &str = "id, branch_id, booking_id, room_charge_cents, services_charge_cents, \
     discount_cents, total_amount_cents, paid_amount_cents, payment_method, created_at";

/// Repository for bill reads.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Lists the bills of a branch for the cashier, newest first.
    pub async fn list(&self, branch_id: i64) -> DbResult<Vec<BillSummary>> {
        let bills = sqlx::query_as::<_, BillSummary>(
            r#"
            SELECT
                bl.id, bl.branch_id, bl.booking_id,
                bl.room_charge_cents, bl.services_charge_cents, bl.discount_cents,
                bl.total_amount_cents, bl.paid_amount_cents, bl.payment_method,
                bl.created_at,
                g.full_name AS guest_name,
                r.room_number,
                b.status AS booking_status
            FROM bills bl
            JOIN bookings b ON bl.booking_id = b.id
            JOIN guests g ON b.guest_id = g.id
            JOIN rooms r ON b.room_id = r.id
            WHERE bl.branch_id = ?1
            ORDER BY bl.id DESC
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }

    /// Gets a bill by id within a branch.
    pub async fn get_by_id(&self, branch_id: i64, id: i64) -> DbResult<Option<Bill>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, branch_id, id).await
    }

    /// Gets the bill of a booking.
    pub async fn get_by_booking(&self, branch_id: i64, booking_id: i64) -> DbResult<Option<Bill>> {
        let mut conn = self.pool.acquire().await?;
        find_by_booking(&mut conn, branch_id, booking_id).await
    }
}

/// Loads a bill on an open connection or transaction.
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<Bill>> {
    let bill = sqlx::query_as::<_, Bill>(&format!(
        "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1 AND branch_id = ?2"
    ))
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(bill)
}

/// Loads the bill of a booking on an open connection or transaction.
pub(crate) async fn find_by_booking(
    conn: &mut SqliteConnection,
    branch_id: i64,
    booking_id: i64,
) -> DbResult<Option<Bill>> {
    let bill = sqlx::query_as::<_, Bill>(&format!(
        "SELECT {BILL_COLUMNS} FROM bills WHERE booking_id = ?1 AND branch_id = ?2"
    ))
    .bind(booking_id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(bill)
}

/// Writes new charge components; `total_amount` is derived from them.
pub(crate) async fn write_totals(
    conn: &mut SqliteConnection,
    bill_id: i64,
    totals: &BillTotals,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE bills
        SET room_charge_cents = ?1,
            services_charge_cents = ?2,
            discount_cents = ?3,
            total_amount_cents = ?4,
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(totals.room_charge)
    .bind(totals.services_charge)
    .bind(totals.discount)
    .bind(totals.total())
    .bind(Utc::now())
    .bind(bill_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
