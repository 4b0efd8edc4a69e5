//! # Service Catalog Repository
//!
//! Named add-on services with a unit price. Attaching a service to a booking
//! lives in the lifecycle module, since it also moves the bill.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::audit::{self, AuditRecord};
use inn_core::validation::validate_service_input;
use inn_core::{AuditAction, CoreError, Service, ServiceInput, ServiceLineItem, SessionContext};

/// Repository for the service catalog.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Lists the services of a branch, newest first.
    pub async fn list(&self, branch_id: i64) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT id, branch_id, name, price_cents FROM services WHERE branch_id = ?1 ORDER BY id DESC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Gets a service by id within a branch.
    pub async fn get_by_id(&self, branch_id: i64, id: i64) -> DbResult<Option<Service>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, branch_id, id).await
    }

    /// Adds a service to the catalog.
    pub async fn create(&self, session: &SessionContext, input: &ServiceInput) -> DbResult<i64> {
        validate_service_input(input)?;

        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO services (branch_id, name, price_cents) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(session.branch_id)
        .bind(input.name.trim())
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await?;

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("services", id, AuditAction::Insert).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;

        debug!(id, name = %input.name, "Service created");
        Ok(id)
    }

    /// Renames or re-prices a service. Lines already on bills keep the price
    /// they were charged at.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: i64,
        input: &ServiceInput,
    ) -> DbResult<()> {
        validate_service_input(input)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE services SET name = ?1, price_cents = ?2 WHERE id = ?3 AND branch_id = ?4",
        )
        .bind(input.name.trim())
        .bind(input.price)
        .bind(id)
        .bind(session.branch_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ServiceNotFound(id).into());
        }

        audit::record(
            &mut tx,
            session,
            AuditRecord::new("services", id, AuditAction::Update).json(serde_json::json!(input)),
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Service lines attached to a booking, in the order they were added.
    pub async fn lines_for_booking(&self, booking_id: i64) -> DbResult<Vec<ServiceLineItem>> {
        let lines = sqlx::query_as::<_, ServiceLineItem>(
            r#"
            SELECT id, booking_id, service_id, quantity, total_price_cents, created_at
            FROM booking_services
            WHERE booking_id = ?1
            ORDER BY id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

/// Loads a service on an open connection or transaction.
pub(crate) async fn find(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<Service>> {
    let service = sqlx::query_as::<_, Service>(
        "SELECT id, branch_id, name, price_cents FROM services WHERE id = ?1 AND branch_id = ?2",
    )
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::setup;
    use inn_core::Money;

    fn laundry() -> ServiceInput {
        ServiceInput {
            name: "Laundry".to_string(),
            price: Money::from_major(150),
        }
    }

    #[tokio::test]
    async fn test_create_and_reprice() {
        let (db, session) = setup().await;
        let services = db.services();

        let id = services.create(&session, &laundry()).await.unwrap();
        services
            .update(
                &session,
                id,
                &ServiceInput {
                    name: "Laundry (express)".to_string(),
                    price: Money::from_cents(17_550),
                },
            )
            .await
            .unwrap();

        let service = services.get_by_id(session.branch_id, id).await.unwrap().unwrap();
        assert_eq!(service.name, "Laundry (express)");
        assert_eq!(service.price.cents(), 17_550);
        assert_eq!(services.list(session.branch_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let (db, session) = setup().await;
        let input = ServiceInput {
            name: "Refund".to_string(),
            price: Money::from_major(-1),
        };
        let err = db.services().create(&session, &input).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_other_branch_cannot_update() {
        let (db, session) = setup().await;
        let id = db.services().create(&session, &laundry()).await.unwrap();

        let other = SessionContext {
            branch_id: session.branch_id + 1,
            ..session.clone()
        };
        let err = db.services().update(&other, id, &laundry()).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ServiceNotFound(_))));
    }
}
