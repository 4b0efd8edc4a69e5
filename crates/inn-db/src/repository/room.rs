//! # Room Repository
//!
//! Database operations for rooms.
//!
//! Room status is normally driven by the booking lifecycle
//! (`available → occupied → available`); the desk can also set it directly
//! here, e.g. to take a room into `maintenance`.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::audit::{self, AuditRecord};
use inn_core::validation::validate_room_input;
use inn_core::{AuditAction, CoreError, Room, RoomInput, SessionContext};

const ROOM_COLUMNS: &str = "id, branch_id, room_number, room_type, status, min_hours, \
     base_price_cents, extra_hour_price_cents, capacity";

/// Repository for room database operations.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a new RoomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomRepository { pool }
    }

    /// Lists the rooms of a branch, ordered by id.
    pub async fn list(&self, branch_id: i64) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE branch_id = ?1 ORDER BY id ASC"
        ))
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(branch_id, count = rooms.len(), "Listed rooms");
        Ok(rooms)
    }

    /// Gets a room by id within a branch.
    ///
    /// ## Returns
    /// * `Ok(Some(Room))` - Room found
    /// * `Ok(None)` - No such room in this branch
    pub async fn get_by_id(&self, branch_id: i64, id: i64) -> DbResult<Option<Room>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, branch_id, id).await
    }

    /// Creates a room and audits the insert.
    pub async fn create(&self, session: &SessionContext, input: &RoomInput) -> DbResult<i64> {
        validate_room_input(input)?;

        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO rooms (
                branch_id, room_number, room_type, status, min_hours,
                base_price_cents, extra_hour_price_cents, capacity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id
            "#,
        )
        .bind(session.branch_id)
        .bind(input.room_number.trim())
        .bind(input.room_type.trim())
        .bind(input.status)
        .bind(input.min_hours)
        .bind(input.base_price)
        .bind(input.extra_hour_price)
        .bind(input.capacity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| duplicate_number(e, &input.room_number))?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("rooms", id, AuditAction::Insert).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;

        debug!(id, room_number = %input.room_number, "Room created");
        Ok(id)
    }

    /// Replaces every editable field of a room and audits the update.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: i64,
        input: &RoomInput,
    ) -> DbResult<()> {
        validate_room_input(input)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET room_number = ?1,
                room_type = ?2,
                status = ?3,
                min_hours = ?4,
                base_price_cents = ?5,
                extra_hour_price_cents = ?6,
                capacity = ?7
            WHERE id = ?8 AND branch_id = ?9
            "#,
        )
        .bind(input.room_number.trim())
        .bind(input.room_type.trim())
        .bind(input.status)
        .bind(input.min_hours)
        .bind(input.base_price)
        .bind(input.extra_hour_price)
        .bind(input.capacity)
        .bind(id)
        .bind(session.branch_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_number(e, &input.room_number))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::RoomNotFound(id).into());
        }

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("rooms", id, AuditAction::Update).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;

        debug!(id, "Room updated");
        Ok(())
    }
}

/// Loads a room on an open connection or transaction.
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<Room>> {
    let room = sqlx::query_as::<_, Room>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1 AND branch_id = ?2"
    ))
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(room)
}

fn duplicate_number(err: sqlx::Error, room_number: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("room_number", room_number.trim()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use inn_core::{Money, RoomStatus};

    fn deluxe(number: &str) -> RoomInput {
        RoomInput {
            room_number: number.to_string(),
            room_type: "Deluxe".to_string(),
            status: RoomStatus::Available,
            min_hours: 4,
            base_price: Money::from_major(500),
            extra_hour_price: Money::from_major(100),
            capacity: 2,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, session) = setup().await;
        let rooms = db.rooms();

        let id = rooms.create(&session, &deluxe("101")).await.unwrap();
        let room = rooms.get_by_id(session.branch_id, id).await.unwrap().unwrap();

        assert_eq!(room.room_number, "101");
        assert_eq!(room.base_price, Money::from_major(500));
        assert!(room.is_available());

        let audit = db.audit().for_record("rooms", id).await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::Insert);
    }

    #[tokio::test]
    async fn test_branch_scoping() {
        let (db, session) = setup().await;
        let id = db.rooms().create(&session, &deluxe("101")).await.unwrap();

        assert!(db.rooms().get_by_id(session.branch_id + 1, id).await.unwrap().is_none());
        assert!(db.rooms().list(session.branch_id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (db, session) = setup().await;
        let rooms = db.rooms();
        let id = rooms.create(&session, &deluxe("101")).await.unwrap();

        let mut input = deluxe("101A");
        input.status = RoomStatus::Maintenance;
        input.extra_hour_price = Money::from_cents(12_550);
        rooms.update(&session, id, &input).await.unwrap();

        let room = rooms.get_by_id(session.branch_id, id).await.unwrap().unwrap();
        assert_eq!(room.room_number, "101A");
        assert_eq!(room.status, RoomStatus::Maintenance);
        assert_eq!(room.extra_hour_price.cents(), 12_550);
    }

    #[tokio::test]
    async fn test_update_unknown_room() {
        let (db, session) = setup().await;
        let err = db.rooms().update(&session, 99, &deluxe("1")).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::RoomNotFound(99))));
    }

    #[tokio::test]
    async fn test_duplicate_room_number() {
        let (db, session) = setup().await;
        db.rooms().create(&session, &deluxe("101")).await.unwrap();
        let err = db.rooms().create(&session, &deluxe("101")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let (db, session) = setup().await;
        let a = db.rooms().create(&session, &deluxe("201")).await.unwrap();
        let b = db.rooms().create(&session, &deluxe("101")).await.unwrap();

        let ids: Vec<i64> = db
            .rooms()
            .list(session.branch_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }
}
