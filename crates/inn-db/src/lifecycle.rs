//! # Booking Lifecycle
//!
//! The four operations that move bookings, bills and rooms together.
//!
//! ## State Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_booking ──► Room: available → occupied                          │
//! │       │             Booking: ongoing                                    │
//! │       │             Bill: room_charge = tariff(expected_hours)          │
//! │       ▼                                                                 │
//! │  add_service ─────► booking_services line, Bill.services_charge += sub  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pay ─────────────► Bill.paid_amount += amount                          │
//! │       │                  │                                              │
//! │       │                  └── paid ≥ total ──► BillFullyPaid             │
//! │       │                                            │                    │
//! │       ▼                                            ▼                    │
//! │  update_booking(completed | cancelled) ───► release_room                │
//! │                                            Room: occupied → available   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! Every operation is one SQLite transaction whose first statement is a
//! guarded write:
//!
//! | Operation        | Opening statement                                     |
//! |------------------|-------------------------------------------------------|
//! | `create_booking` | `UPDATE rooms ... WHERE status = 'available'`         |
//! | `update_booking` | `UPDATE bookings ... WHERE status = 'ongoing'`        |
//! | `add_service`    | `INSERT INTO booking_services ... SELECT` (gated)     |
//! | `pay`            | `UPDATE bills SET updated_at ...`                     |
//!
//! Taking the write lock first means two desks racing for one room are
//! serialized by SQLite; the loser sees zero affected rows and is told why.
//! The partial unique index on `bookings(room_id) WHERE status = 'ongoing'`
//! backs this up at the storage level.
//!
//! Rejected payments are the one place where a transaction commits while the
//! operation fails: the `failed_payment` audit entry must survive.

use chrono::Utc;
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::audit::{self, AuditRecord};
use crate::repository::{bill, booking, guest, room, service};
use inn_core::validation::{
    validate_expected_hours, validate_payment_amount, validate_service_quantity,
};
use inn_core::{
    AuditAction, BillTotals, BookingStatus, CancellationPolicy, CoreError, LifecyclePolicy, Money,
    PaymentDecision, ServiceAttachPolicy, SessionContext, Tariff,
};

// =============================================================================
// Events & Results
// =============================================================================

/// Something that happened inside a lifecycle transaction and has follow-up
/// work in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A payment brought `paid_amount` up to `total_amount`.
    BillFullyPaid {
        bill_id: i64,
        booking_id: i64,
        room_id: i64,
    },
}

/// Outcome of an accepted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub bill_id: i64,
    pub paid_amount: Money,
    pub total_amount: Money,
    /// True when the payment settled the bill and checked the guest out.
    pub booking_completed: bool,
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Booking, billing and payment operations bound to a set of policies.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    pool: SqlitePool,
    policy: LifecyclePolicy,
}

impl Lifecycle {
    pub fn new(pool: SqlitePool, policy: LifecyclePolicy) -> Self {
        Lifecycle { pool, policy }
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Opens a booking on an available room and its bill.
    ///
    /// ## Errors
    /// * `RoomNotFound` - no such room in the session's branch
    /// * `RoomUnavailable` - room is occupied or under maintenance
    /// * `GuestNotFound` - no such guest in the branch
    /// * `RoomConflict` - another ongoing booking already holds the room
    pub async fn create_booking(
        &self,
        session: &SessionContext,
        room_id: i64,
        guest_id: i64,
        expected_hours: i64,
    ) -> DbResult<i64> {
        validate_expected_hours(expected_hours)?;

        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE rooms SET status = 'occupied' WHERE id = ?1 AND branch_id = ?2 AND status = 'available'",
        )
        .bind(room_id)
        .bind(session.branch_id)
        .execute(&mut *tx)
        .await?;

        let room = room::find(&mut tx, session.branch_id, room_id).await?;
        let room = match room {
            Some(room) if claimed.rows_affected() == 1 => room,
            Some(room) => {
                debug!(room_id, status = %room.status, "Room not available for booking");
                return Err(CoreError::RoomUnavailable {
                    room_id,
                    status: room.status,
                }
                .into());
            }
            None => return Err(CoreError::RoomNotFound(room_id).into()),
        };

        if guest::find(&mut tx, session.branch_id, guest_id).await?.is_none() {
            return Err(CoreError::GuestNotFound(guest_id).into());
        }

        let now = Utc::now();

        let booking_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (branch_id, room_id, guest_id, user_id, check_in, expected_hours, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'ongoing')
            RETURNING id
            "#,
        )
        .bind(session.branch_id)
        .bind(room_id)
        .bind(guest_id)
        .bind(session.user_id)
        .bind(now)
        .bind(expected_hours)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| room_conflict(e, room_id))?;

        let totals = BillTotals::opening(Tariff::from(&room).charge(expected_hours)?);

        let bill_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bills (
                branch_id, booking_id, room_charge_cents, services_charge_cents,
                discount_cents, total_amount_cents, paid_amount_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)
            RETURNING id
            "#,
        )
        .bind(session.branch_id)
        .bind(booking_id)
        .bind(totals.room_charge)
        .bind(totals.services_charge)
        .bind(totals.discount)
        .bind(totals.total())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("bookings", booking_id, AuditAction::Insert).json(json!({
                "room_id": room_id,
                "guest_id": guest_id,
                "expected_hours": expected_hours,
            })),
        )
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("rooms", room_id, AuditAction::Update)
                .details(format!("Room occupied by booking {booking_id}")),
        )
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("bills", bill_id, AuditAction::Insert).json(json!({
                "booking_id": booking_id,
                "room_charge": totals.room_charge.to_major_f64(),
                "total_amount": totals.total().to_major_f64(),
            })),
        )
        .await?;

        tx.commit().await?;

        info!(
            booking_id,
            bill_id,
            room_id,
            room_charge = %totals.room_charge,
            "Booking created"
        );
        Ok(booking_id)
    }

    /// Changes the planned hours and/or closes an ongoing booking.
    ///
    /// ## Transitions
    /// ```text
    /// ongoing ──► ongoing     hours only, bill untouched
    /// ongoing ──► completed   check_out = now, room charge re-priced, room freed
    /// ongoing ──► cancelled   room freed, bill per CancellationPolicy
    /// completed / cancelled   BookingClosed
    /// ```
    pub async fn update_booking(
        &self,
        session: &SessionContext,
        booking_id: i64,
        expected_hours: i64,
        status: BookingStatus,
    ) -> DbResult<()> {
        validate_expected_hours(expected_hours)?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE bookings
            SET expected_hours = ?1,
                status = ?2,
                check_out = CASE WHEN ?2 = 'completed' THEN ?3 ELSE check_out END
            WHERE id = ?4 AND branch_id = ?5 AND status = 'ongoing'
            "#,
        )
        .bind(expected_hours)
        .bind(status)
        .bind(Utc::now())
        .bind(booking_id)
        .bind(session.branch_id)
        .execute(&mut *tx)
        .await?;

        let booking = booking::find(&mut tx, session.branch_id, booking_id).await?;
        let booking = match booking {
            Some(booking) if updated.rows_affected() == 1 => booking,
            Some(booking) => {
                return Err(CoreError::BookingClosed {
                    booking_id,
                    status: booking.status,
                }
                .into());
            }
            None => return Err(CoreError::BookingNotFound(booking_id).into()),
        };

        match status {
            BookingStatus::Ongoing => {
                let others: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM bookings
                    WHERE room_id = ?1 AND branch_id = ?2 AND status = 'ongoing' AND id <> ?3
                    "#,
                )
                .bind(booking.room_id)
                .bind(session.branch_id)
                .bind(booking_id)
                .fetch_one(&mut *tx)
                .await?;

                if others > 0 {
                    return Err(CoreError::RoomConflict {
                        room_id: booking.room_id,
                    }
                    .into());
                }
            }
            BookingStatus::Completed => {
                let room = room::find(&mut tx, session.branch_id, booking.room_id)
                    .await?
                    .ok_or(CoreError::RoomNotFound(booking.room_id))?;
                let bill = bill::find_by_booking(&mut tx, session.branch_id, booking_id)
                    .await?
                    .ok_or(CoreError::BookingNotFound(booking_id))?;

                let totals = BillTotals::of(&bill)
                    .with_room_charge(Tariff::from(&room).charge(expected_hours)?);
                totals.ensure_covers(bill.paid_amount)?;

                bill::write_totals(&mut tx, bill.id, &totals).await?;

                audit::record(
                    &mut tx,
                    session,
                    AuditRecord::new("bills", bill.id, AuditAction::Update).json(json!({
                        "action": "checkout",
                        "room_charge": totals.room_charge.to_major_f64(),
                        "total_amount": totals.total().to_major_f64(),
                    })),
                )
                .await?;

                release_room(&mut tx, session, booking.room_id, "Room freed on checkout").await?;
            }
            BookingStatus::Cancelled => {
                release_room(&mut tx, session, booking.room_id, "Room freed on cancellation")
                    .await?;

                if self.policy.cancellation == CancellationPolicy::Void {
                    let bill = bill::find_by_booking(&mut tx, session.branch_id, booking_id)
                        .await?
                        .ok_or(CoreError::BookingNotFound(booking_id))?;

                    let before = BillTotals::of(&bill);
                    let totals = before.written_off_to(bill.paid_amount);
                    bill::write_totals(&mut tx, bill.id, &totals).await?;

                    audit::record(
                        &mut tx,
                        session,
                        AuditRecord::new("bills", bill.id, AuditAction::Update).json(json!({
                            "action": "void",
                            "written_off": (before.total() - totals.total()).to_major_f64(),
                            "total_amount": totals.total().to_major_f64(),
                        })),
                    )
                    .await?;
                }
            }
        }

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("bookings", booking_id, AuditAction::Update).json(json!({
                "expected_hours": expected_hours,
                "status": status,
            })),
        )
        .await?;

        tx.commit().await?;

        info!(booking_id, %status, expected_hours, "Booking updated");
        Ok(())
    }

    /// Attaches `qty` units of a catalog service to a booking and charges
    /// them to its bill. Returns the new line id.
    ///
    /// ## Errors
    /// * `ServiceNotFound` / `BookingNotFound` - not in the session's branch
    /// * `BookingClosed` - booking not ongoing under `ServiceAttachPolicy::OngoingOnly`
    pub async fn add_service(
        &self,
        session: &SessionContext,
        booking_id: i64,
        service_id: i64,
        qty: i64,
    ) -> DbResult<i64> {
        validate_service_quantity(qty)?;

        let any_status = self.policy.service_attach == ServiceAttachPolicy::AnyStatus;

        let mut tx = self.pool.begin().await?;

        let line: Option<(i64, Money)> = sqlx::query_as(
            r#"
            INSERT INTO booking_services (booking_id, service_id, quantity, total_price_cents, created_at)
            SELECT b.id, s.id, ?1, s.price_cents * ?1, ?2
            FROM bookings b
            JOIN services s ON s.id = ?3 AND s.branch_id = b.branch_id
            WHERE b.id = ?4 AND b.branch_id = ?5 AND (?6 OR b.status = 'ongoing')
            RETURNING id, total_price_cents
            "#,
        )
        .bind(qty)
        .bind(Utc::now())
        .bind(service_id)
        .bind(booking_id)
        .bind(session.branch_id)
        .bind(any_status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((line_id, subtotal)) = line else {
            if service::find(&mut tx, session.branch_id, service_id).await?.is_none() {
                return Err(CoreError::ServiceNotFound(service_id).into());
            }
            return Err(match booking::find(&mut tx, session.branch_id, booking_id).await? {
                None => CoreError::BookingNotFound(booking_id),
                Some(booking) => CoreError::BookingClosed {
                    booking_id,
                    status: booking.status,
                },
            }
            .into());
        };

        let bill = bill::find_by_booking(&mut tx, session.branch_id, booking_id)
            .await?
            .ok_or(CoreError::BookingNotFound(booking_id))?;
        let totals = BillTotals::of(&bill).with_service(subtotal);
        bill::write_totals(&mut tx, bill.id, &totals).await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("booking_services", line_id, AuditAction::Insert).json(json!({
                "booking_id": booking_id,
                "service_id": service_id,
                "qty": qty,
                "total_price": subtotal.to_major_f64(),
            })),
        )
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("bills", bill.id, AuditAction::Update).json(json!({
                "action": "service",
                "services_charge": totals.services_charge.to_major_f64(),
                "total_amount": totals.total().to_major_f64(),
            })),
        )
        .await?;

        tx.commit().await?;

        info!(booking_id, service_id, qty, subtotal = %subtotal, "Service added to booking");
        Ok(line_id)
    }

    /// Applies a payment to a bill.
    ///
    /// ## Flow
    /// ```text
    /// bill_id / amount missing ───────────────► MissingFields
    /// amount ≤ 0 ─────────────────────────────► Validation
    /// bill not in branch ──── failed_payment ─► BillNotFound
    /// booking completed ───── failed_payment ─► BookingAlreadyCompleted
    /// paid + amount > total ─ failed_payment ─► OverpaymentRejected
    /// otherwise ── paid += amount ── paid ≥ total? ── BillFullyPaid
    /// ```
    pub async fn pay(
        &self,
        session: &SessionContext,
        bill_id: Option<i64>,
        amount: Option<Money>,
        payment_method: Option<String>,
    ) -> DbResult<PaymentReceipt> {
        let (Some(bill_id), Some(amount)) = (bill_id, amount) else {
            return Err(CoreError::MissingFields("Missing payment details".to_string()).into());
        };
        validate_payment_amount(amount)?;

        let payment_method = payment_method
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE bills SET updated_at = ?1 WHERE id = ?2 AND branch_id = ?3")
            .bind(Utc::now())
            .bind(bill_id)
            .bind(session.branch_id)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            audit::record(
                &mut tx,
                session,
                AuditRecord::new("bills", bill_id, AuditAction::FailedPayment).json(json!({
                    "attempted_bill_id": bill_id,
                    "attempted_amount": amount.to_major_f64(),
                    "payment_method": payment_method,
                    "reason": "Bill not found",
                })),
            )
            .await?;
            tx.commit().await?;

            warn!(bill_id, "Payment rejected: bill not found");
            return Err(CoreError::BillNotFound(bill_id).into());
        }

        let bill = bill::find(&mut tx, session.branch_id, bill_id)
            .await?
            .ok_or(CoreError::BillNotFound(bill_id))?;
        let booking = booking::find(&mut tx, session.branch_id, bill.booking_id)
            .await?
            .ok_or(CoreError::BookingNotFound(bill.booking_id))?;

        if booking.status == BookingStatus::Completed {
            audit::record(
                &mut tx,
                session,
                AuditRecord::new("bills", bill_id, AuditAction::FailedPayment).json(json!({
                    "bill_id": bill_id,
                    "booking_status": booking.status,
                    "attempted_amount": amount.to_major_f64(),
                    "payment_method": payment_method,
                    "reason": "Booking already completed",
                })),
            )
            .await?;
            tx.commit().await?;

            warn!(bill_id, booking_id = booking.id, "Payment rejected: booking completed");
            return Err(CoreError::BookingAlreadyCompleted {
                booking_id: booking.id,
            }
            .into());
        }

        let (new_paid, fully_paid) =
            match PaymentDecision::evaluate(bill.paid_amount, bill.total_amount, amount)? {
                PaymentDecision::Accepted {
                    new_paid,
                    fully_paid,
                } => (new_paid, fully_paid),
                PaymentDecision::Overpayment {
                    current_paid,
                    attempted_amount,
                    resulting_paid,
                    total_amount,
                } => {
                    audit::record(
                        &mut tx,
                        session,
                        AuditRecord::new("bills", bill_id, AuditAction::FailedPayment).json(
                            json!({
                                "bill_id": bill_id,
                                "current_paid": current_paid.to_major_f64(),
                                "attempted_amount": attempted_amount.to_major_f64(),
                                "resulting_paid": resulting_paid.to_major_f64(),
                                "total_amount": total_amount.to_major_f64(),
                                "payment_method": payment_method,
                                "reason": "Overpayment attempt",
                            }),
                        ),
                    )
                    .await?;
                    tx.commit().await?;

                    warn!(
                        bill_id,
                        current_paid = %current_paid,
                        attempted_amount = %attempted_amount,
                        total_amount = %total_amount,
                        "Payment rejected: overpayment"
                    );
                    return Err(CoreError::OverpaymentRejected {
                        current_paid,
                        attempted_amount,
                        resulting_paid,
                        total_amount,
                    }
                    .into());
                }
            };

        sqlx::query(
            r#"
            UPDATE bills
            SET paid_amount_cents = ?1,
                payment_method = COALESCE(?2, payment_method)
            WHERE id = ?3
            "#,
        )
        .bind(new_paid)
        .bind(payment_method.as_deref())
        .bind(bill_id)
        .execute(&mut *tx)
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("bills", bill_id, AuditAction::Update).json(json!({
                "action": "payment",
                "attempted_amount": amount.to_major_f64(),
                "new_paid_amount": new_paid.to_major_f64(),
                "payment_method": payment_method,
            })),
        )
        .await?;

        let booking_completed = if fully_paid {
            handle(
                &mut tx,
                session,
                LifecycleEvent::BillFullyPaid {
                    bill_id,
                    booking_id: booking.id,
                    room_id: booking.room_id,
                },
            )
            .await?
        } else {
            false
        };

        tx.commit().await?;

        info!(bill_id, amount = %amount, paid = %new_paid, fully_paid, "Payment recorded");
        Ok(PaymentReceipt {
            bill_id,
            paid_amount: new_paid,
            total_amount: bill.total_amount,
            booking_completed,
        })
    }
}

// =============================================================================
// Shared Steps
// =============================================================================

/// Runs the follow-up of an event on the open transaction.
///
/// Returns true if a booking was completed.
async fn handle(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    event: LifecycleEvent,
) -> DbResult<bool> {
    match event {
        LifecycleEvent::BillFullyPaid {
            bill_id,
            booking_id,
            room_id,
        } => {
            // A cancelled booking keeps its status; its room is already free.
            let completed = sqlx::query(
                r#"
                UPDATE bookings
                SET status = 'completed', check_out = ?1
                WHERE id = ?2 AND branch_id = ?3 AND status = 'ongoing'
                "#,
            )
            .bind(Utc::now())
            .bind(booking_id)
            .bind(session.branch_id)
            .execute(&mut *conn)
            .await?;

            if completed.rows_affected() == 0 {
                debug!(bill_id, booking_id, "Bill settled on a closed booking");
                return Ok(false);
            }

            audit::record(
                &mut *conn,
                session,
                AuditRecord::new("bookings", booking_id, AuditAction::Update)
                    .details("Auto-completed after full payment"),
            )
            .await?;

            release_room(conn, session, room_id, "Room freed after full payment").await?;

            info!(bill_id, booking_id, room_id, "Booking auto-completed after full payment");
            Ok(true)
        }
    }
}

/// Sets a room back to `available` and audits the flip.
async fn release_room(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    room_id: i64,
    details: &str,
) -> DbResult<()> {
    sqlx::query("UPDATE rooms SET status = 'available' WHERE id = ?1 AND branch_id = ?2")
        .bind(room_id)
        .bind(session.branch_id)
        .execute(&mut *conn)
        .await?;

    audit::record(
        conn,
        session,
        AuditRecord::new("rooms", room_id, AuditAction::Update).details(details),
    )
    .await?;

    Ok(())
}

fn room_conflict(err: sqlx::Error, room_id: i64) -> DbError {
    let err = DbError::from(err);
    if err.is_unique_violation_on("bookings.room_id") {
        CoreError::RoomConflict { room_id }.into()
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_guest, add_room, add_service, setup};
    use inn_core::RoomStatus;

    #[tokio::test]
    async fn test_unknown_room_and_guest() {
        let (db, session) = setup().await;
        let lifecycle = db.lifecycle(LifecyclePolicy::default());
        let guest = add_guest(&db, &session, "Ana Reyes").await;

        let err = lifecycle.create_booking(&session, 404, guest, 3).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::RoomNotFound(404))));

        let room = add_room(&db, &session, "101", 500, 4, 100).await;
        let err = lifecycle.create_booking(&session, room, 999, 3).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::GuestNotFound(999))));

        // the claim on the room rolled back with the failed insert
        let room = db.rooms().get_by_id(session.branch_id, room).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn test_maintenance_room_unavailable() {
        let (db, session) = setup().await;
        let room = add_room(&db, &session, "101", 500, 4, 100).await;
        let guest = add_guest(&db, &session, "Ana Reyes").await;
        sqlx::query("UPDATE rooms SET status = 'maintenance' WHERE id = ?1")
            .bind(room)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .lifecycle(LifecyclePolicy::default())
            .create_booking(&session, room, guest, 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::RoomUnavailable {
                status: RoomStatus::Maintenance,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_closed_booking_cannot_change() {
        let (db, session) = setup().await;
        let lifecycle = db.lifecycle(LifecyclePolicy::default());
        let room = add_room(&db, &session, "101", 500, 4, 100).await;
        let guest = add_guest(&db, &session, "Ana Reyes").await;
        let booking = lifecycle.create_booking(&session, room, guest, 4).await.unwrap();

        lifecycle
            .update_booking(&session, booking, 4, BookingStatus::Cancelled)
            .await
            .unwrap();

        let err = lifecycle
            .update_booking(&session, booking, 4, BookingStatus::Ongoing)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::BookingClosed {
                status: BookingStatus::Cancelled,
                ..
            })
        ));

        let err = lifecycle
            .update_booking(&session, 77, 4, BookingStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::BookingNotFound(77))));
    }

    #[tokio::test]
    async fn test_add_service_diagnosis() {
        let (db, session) = setup().await;
        let lifecycle = db.lifecycle(LifecyclePolicy::default());
        let room = add_room(&db, &session, "101", 500, 4, 100).await;
        let guest = add_guest(&db, &session, "Ana Reyes").await;
        let laundry = add_service(&db, &session, "Laundry", 150).await;
        let booking = lifecycle.create_booking(&session, room, guest, 4).await.unwrap();

        let err = lifecycle.add_service(&session, booking, 55, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ServiceNotFound(55))));

        let err = lifecycle.add_service(&session, 66, laundry, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::BookingNotFound(66))));

        let err = lifecycle.add_service(&session, booking, laundry, 0).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_payment_on_cancelled_booking_keeps_status() {
        let (db, session) = setup().await;
        let lifecycle = db.lifecycle(LifecyclePolicy::default());
        let room = add_room(&db, &session, "101", 500, 4, 100).await;
        let guest = add_guest(&db, &session, "Ana Reyes").await;
        let booking = lifecycle.create_booking(&session, room, guest, 4).await.unwrap();
        lifecycle
            .update_booking(&session, booking, 4, BookingStatus::Cancelled)
            .await
            .unwrap();

        let bill = db
            .bills()
            .get_by_booking(session.branch_id, booking)
            .await
            .unwrap()
            .unwrap();
        let receipt = lifecycle
            .pay(&session, Some(bill.id), Some(Money::from_major(500)), None)
            .await
            .unwrap();

        assert!(!receipt.booking_completed);
        let booking = db.bookings().get_by_id(session.branch_id, booking).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_missing_payment_details() {
        let (db, session) = setup().await;
        let err = db
            .lifecycle(LifecyclePolicy::default())
            .pay(&session, Some(1), None, Some("cash".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::MissingFields(_))));
        assert_eq!(db.audit().count(session.branch_id).await.unwrap(), 0);
    }
}
