//! # Audit Repository
//!
//! Append-only audit log.
//!
//! ## Writing vs Reading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WRITE: audit::record(&mut tx, session, AuditRecord)                    │
//! │         runs on the caller's transaction, so the entry commits or       │
//! │         rolls back together with the mutation it describes              │
//! │                                                                         │
//! │  READ:  db.audit().for_record("bills", 7)                               │
//! │         pool-backed, for the desk history view and tests                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are never updated or deleted; triggers in the schema enforce it.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use inn_core::{AuditAction, AuditEntry, SessionContext};

/// An entry about to be written.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub table_name: &'static str,
    pub record_id: Option<i64>,
    pub action: AuditAction,
    pub details: Option<String>,
}

impl AuditRecord {
    pub fn new(table_name: &'static str, record_id: i64, action: AuditAction) -> Self {
        AuditRecord {
            table_name,
            record_id: Some(record_id),
            action,
            details: None,
        }
    }

    /// Attaches free text or a serialized JSON document.
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches a JSON document.
    pub fn json(self, value: serde_json::Value) -> Self {
        self.details(value.to_string())
    }
}

/// Appends one entry on the given connection (normally an open transaction).
pub async fn record(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    entry: AuditRecord,
) -> DbResult<i64> {
    debug!(
        table = entry.table_name,
        record_id = ?entry.record_id,
        action = ?entry.action,
        user_id = session.user_id,
        "Writing audit entry"
    );

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO audit_logs (table_name, record_id, action, user_id, branch_id, details, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING id
        "#,
    )
    .bind(entry.table_name)
    .bind(entry.record_id)
    .bind(entry.action)
    .bind(session.user_id)
    .bind(session.branch_id)
    .bind(entry.details)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Read side of the audit log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// All entries about one record, oldest first.
    pub async fn for_record(&self, table_name: &str, record_id: i64) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, table_name, record_id, action, user_id, branch_id, details, created_at
            FROM audit_logs
            WHERE table_name = ?1 AND record_id = ?2
            ORDER BY id
            "#,
        )
        .bind(table_name)
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Most recent entries of a branch, newest first.
    pub async fn recent(&self, branch_id: i64, limit: u32) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, table_name, record_id, action, user_id, branch_id, details, created_at
            FROM audit_logs
            WHERE branch_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )
        .bind(branch_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Number of entries in a branch.
    pub async fn count(&self, branch_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE branch_id = ?1")
            .bind(branch_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn session() -> SessionContext {
        SessionContext {
            user_id: 1,
            branch_id: 1,
            role: "staff".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        record(
            &mut conn,
            &session(),
            AuditRecord::new("guests", 5, AuditAction::Delete).details("Guest deleted"),
        )
        .await
        .unwrap();
        drop(conn);

        let entries = db.audit().for_record("guests", 5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Delete);
        assert_eq!(entries[0].details.as_deref(), Some("Guest deleted"));
        assert_eq!(db.audit().count(1).await.unwrap(), 1);
        assert_eq!(db.audit().count(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_log_is_append_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let id = record(
            &mut conn,
            &session(),
            AuditRecord::new("rooms", 1, AuditAction::Insert),
        )
        .await
        .unwrap();

        let update = sqlx::query("UPDATE audit_logs SET details = 'x' WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM audit_logs WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await;
        assert!(delete.is_err());
    }
}
