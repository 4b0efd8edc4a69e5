//! # Guest Repository
//!
//! Guest contact records. Every mutation is audited.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::audit::{self, AuditRecord};
use inn_core::validation::validate_guest_input;
use inn_core::{AuditAction, CoreError, Guest, GuestInput, SessionContext};

/// Repository for guest database operations.
#[derive(Debug, Clone)]
pub struct GuestRepository {
    pool: SqlitePool,
}

impl GuestRepository {
    /// Creates a new GuestRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GuestRepository { pool }
    }

    /// Lists the guests of a branch, newest first.
    pub async fn list(&self, branch_id: i64) -> DbResult<Vec<Guest>> {
        let guests = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, branch_id, full_name, phone, email, created_at
            FROM guests
            WHERE branch_id = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(guests)
    }

    /// Gets a guest by id within a branch.
    pub async fn get_by_id(&self, branch_id: i64, id: i64) -> DbResult<Option<Guest>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, branch_id, id).await
    }

    /// Creates a guest and audits the insert.
    pub async fn create(&self, session: &SessionContext, input: &GuestInput) -> DbResult<i64> {
        validate_guest_input(input)?;

        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO guests (branch_id, full_name, phone, email, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(session.branch_id)
        .bind(input.full_name.trim())
        .bind(blank_to_none(input.phone.as_deref()))
        .bind(blank_to_none(input.email.as_deref()))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("guests", id, AuditAction::Insert).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;

        debug!(id, "Guest created");
        Ok(id)
    }

    /// Updates a guest and audits the change.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: i64,
        input: &GuestInput,
    ) -> DbResult<()> {
        validate_guest_input(input)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE guests
            SET full_name = ?1, phone = ?2, email = ?3
            WHERE id = ?4 AND branch_id = ?5
            "#,
        )
        .bind(input.full_name.trim())
        .bind(blank_to_none(input.phone.as_deref()))
        .bind(blank_to_none(input.email.as_deref()))
        .bind(id)
        .bind(session.branch_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::GuestNotFound(id).into());
        }

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("guests", id, AuditAction::Update).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a guest.
    ///
    /// Guests with bookings are kept: the foreign key from `bookings`
    /// rejects the delete.
    pub async fn delete(&self, session: &SessionContext, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM guests WHERE id = ?1 AND branch_id = ?2")
            .bind(id)
            .bind(session.branch_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::GuestNotFound(id).into());
        }

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("guests", id, AuditAction::Delete).details("Guest deleted"),
        )
        .await?;

        tx.commit().await?;

        debug!(id, "Guest deleted");
        Ok(())
    }
}

/// Loads a guest on an open connection or transaction.
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<Guest>> {
    let guest = sqlx::query_as::<_, Guest>(
        r#"
        SELECT id, branch_id, full_name, phone, email, created_at
        FROM guests
        WHERE id = ?1 AND branch_id = ?2
        "#,
    )
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(guest)
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::setup;

    fn ana() -> GuestInput {
        GuestInput {
            full_name: "Ana Reyes".to_string(),
            phone: Some("0917 555 0101".to_string()),
            email: Some(" ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let (db, session) = setup().await;
        let guests = db.guests();

        let id = guests.create(&session, &ana()).await.unwrap();
        let guest = guests.get_by_id(session.branch_id, id).await.unwrap().unwrap();
        assert_eq!(guest.full_name, "Ana Reyes");
        assert_eq!(guest.email, None);

        let mut input = ana();
        input.email = Some("ana@example.com".to_string());
        guests.update(&session, id, &input).await.unwrap();
        let guest = guests.get_by_id(session.branch_id, id).await.unwrap().unwrap();
        assert_eq!(guest.email.as_deref(), Some("ana@example.com"));

        guests.delete(&session, id).await.unwrap();
        assert!(guests.get_by_id(session.branch_id, id).await.unwrap().is_none());

        let actions: Vec<AuditAction> = db
            .audit()
            .for_record("guests", id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(
            actions,
            vec![AuditAction::Insert, AuditAction::Update, AuditAction::Delete]
        );
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (db, session) = setup().await;
        let first = db.guests().create(&session, &ana()).await.unwrap();
        let second = db.guests().create(&session, &ana()).await.unwrap();

        let list = db.guests().list(session.branch_id).await.unwrap();
        assert_eq!(list[0].id, second);
        assert_eq!(list[1].id, first);
    }

    #[tokio::test]
    async fn test_missing_guest() {
        let (db, session) = setup().await;
        let err = db.guests().delete(&session, 42).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::GuestNotFound(42))));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (db, session) = setup().await;
        let input = GuestInput {
            full_name: "  ".to_string(),
            phone: None,
            email: None,
        };
        let err = db.guests().create(&session, &input).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }
}
