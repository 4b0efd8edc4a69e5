//! # Booking Repository
//!
//! Read side of bookings. Creating and advancing bookings moves rooms and
//! bills too, so those operations live in [`crate::lifecycle`].

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use inn_core::{Booking, BookingDetail};

const DETAIL_SELECT: &str = r#"
    SELECT
        b.id, b.branch_id, b.room_id, b.guest_id, b.user_id,
        b.check_in, b.expected_hours, b.status, b.check_out,
        g.full_name AS guest,
        r.room_number,
        r.room_type
    FROM bookings b
    JOIN guests g ON b.guest_id = g.id
    JOIN rooms r ON b.room_id = r.id
"#;

/// Repository for booking reads.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Lists the bookings of a branch with guest and room, newest first.
    pub async fn list(&self, branch_id: i64) -> DbResult<Vec<BookingDetail>> {
        let bookings = sqlx::query_as::<_, BookingDetail>(&format!(
            "{DETAIL_SELECT} WHERE b.branch_id = ?1 ORDER BY b.id DESC"
        ))
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Gets one booking with guest and room.
    pub async fn get_detail(&self, branch_id: i64, id: i64) -> DbResult<Option<BookingDetail>> {
        let booking = sqlx::query_as::<_, BookingDetail>(&format!(
            "{DETAIL_SELECT} WHERE b.id = ?1 AND b.branch_id = ?2"
        ))
        .bind(id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Gets a booking row by id within a branch.
    pub async fn get_by_id(&self, branch_id: i64, id: i64) -> DbResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, branch_id, id).await
    }

    /// Ongoing bookings holding `room_id`. Never more than one.
    pub async fn ongoing_for_room(&self, room_id: i64) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, branch_id, room_id, guest_id, user_id, check_in,
                   expected_hours, status, check_out
            FROM bookings
            WHERE room_id = ?1 AND status = 'ongoing'
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}

/// Loads a booking on an open connection or transaction.
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, branch_id, room_id, guest_id, user_id, check_in,
               expected_hours, status, check_out
        FROM bookings
        WHERE id = ?1 AND branch_id = ?2
        "#,
    )
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(booking)
}
