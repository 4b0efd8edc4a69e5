//! # Inventory Repository
//!
//! Stock items per branch, shared categories, and a movement log.
//!
//! ## Save Semantics
//! ```text
//! save_item { id: None, quantity: 10 }
//!      └── INSERT item ──► transaction (add, 10, "New item added")
//!
//! save_item { id: Some(7), quantity: 4 }   (was 10)
//!      └── UPDATE item ──► transaction (remove, 6, "Adjusted from 10 to 4")
//! ```
//! Both paths write an audit entry in the same transaction.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::audit::{self, AuditRecord};
use inn_core::validation::{validate_item_input, validate_text};
use inn_core::{
    AuditAction, CoreError, InventoryAction, InventoryCategory, InventoryCategoryInput,
    InventoryItem, InventoryItemInput, InventoryItemView, InventoryTransaction, SessionContext,
};

/// Whether a save created a new row or changed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Created(i64),
    Updated(i64),
}

impl Saved {
    pub fn id(&self) -> i64 {
        match self {
            Saved::Created(id) | Saved::Updated(id) => *id,
        }
    }
}

/// Repository for inventory operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// All categories, by name.
    pub async fn categories(&self) -> DbResult<Vec<InventoryCategory>> {
        let categories = sqlx::query_as::<_, InventoryCategory>(
            "SELECT id, name, description FROM inventory_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Items of a branch with their category name, newest first.
    pub async fn items(&self, branch_id: i64) -> DbResult<Vec<InventoryItemView>> {
        let items = sqlx::query_as::<_, InventoryItemView>(
            r#"
            SELECT i.id, i.branch_id, i.category_id, i.name, i.description,
                   i.quantity, i.unit,
                   c.name AS category_name
            FROM inventory_items i
            LEFT JOIN inventory_categories c ON i.category_id = c.id
            WHERE i.branch_id = ?1
            ORDER BY i.id DESC
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by id within a branch.
    pub async fn get_item(&self, branch_id: i64, id: i64) -> DbResult<Option<InventoryItem>> {
        let mut conn = self.pool.acquire().await?;
        find_item(&mut conn, branch_id, id).await
    }

    /// Movement log of an item, oldest first.
    pub async fn transactions(&self, item_id: i64) -> DbResult<Vec<InventoryTransaction>> {
        let rows = sqlx::query_as::<_, InventoryTransaction>(
            r#"
            SELECT id, item_id, user_id, branch_id, action, quantity, notes, created_at
            FROM inventory_transactions
            WHERE item_id = ?1
            ORDER BY id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts or updates a category.
    pub async fn save_category(
        &self,
        session: &SessionContext,
        input: &InventoryCategoryInput,
    ) -> DbResult<Saved> {
        validate_text("name", &input.name, 100)?;

        let mut tx = self.pool.begin().await?;

        let saved = match input.id {
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE inventory_categories SET name = ?1, description = ?2 WHERE id = ?3",
                )
                .bind(input.name.trim())
                .bind(input.description.as_deref())
                .bind(id)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(CoreError::InventoryCategoryNotFound(id).into());
                }

                audit::record(
                    &mut tx,
                    session,
                    AuditRecord::new("inventory_categories", id, AuditAction::Update)
                        .details(format!("Category updated: {}", input.name.trim())),
                )
                .await?;

                Saved::Updated(id)
            }
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO inventory_categories (name, description) VALUES (?1, ?2) RETURNING id",
                )
                .bind(input.name.trim())
                .bind(input.description.as_deref())
                .fetch_one(&mut *tx)
                .await?;

                audit::record(
                    &mut tx,
                    session,
                    AuditRecord::new("inventory_categories", id, AuditAction::Insert)
                        .details(format!("Category added: {}", input.name.trim())),
                )
                .await?;

                Saved::Created(id)
            }
        };

        tx.commit().await?;
        Ok(saved)
    }

    /// Inserts or updates an item, logging the stock movement.
    pub async fn save_item(
        &self,
        session: &SessionContext,
        input: &InventoryItemInput,
    ) -> DbResult<Saved> {
        validate_item_input(input)?;

        let mut tx = self.pool.begin().await?;
        let name = input.name.trim();

        let saved = match input.id {
            Some(id) => {
                let Some(old) = find_item(&mut tx, session.branch_id, id).await? else {
                    return Err(CoreError::InventoryItemNotFound(id).into());
                };

                sqlx::query(
                    r#"
                    UPDATE inventory_items
                    SET name = ?1, category_id = ?2, quantity = ?3, unit = ?4, description = ?5
                    WHERE id = ?6 AND branch_id = ?7
                    "#,
                )
                .bind(name)
                .bind(input.category_id)
                .bind(input.quantity)
                .bind(input.unit.trim())
                .bind(input.description.as_deref())
                .bind(id)
                .bind(session.branch_id)
                .execute(&mut *tx)
                .await?;

                log_movement(
                    &mut tx,
                    session,
                    id,
                    InventoryAction::for_change(old.quantity, input.quantity),
                    (input.quantity - old.quantity).abs(),
                    &format!("Adjusted from {} to {}", old.quantity, input.quantity),
                )
                .await?;

                audit::record(
                    &mut tx,
                    session,
                    AuditRecord::new("inventory_items", id, AuditAction::Update)
                        .details(format!("Item updated: {name}")),
                )
                .await?;

                Saved::Updated(id)
            }
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO inventory_items (branch_id, category_id, name, description, quantity, unit)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    RETURNING id
                    "#,
                )
                .bind(session.branch_id)
                .bind(input.category_id)
                .bind(name)
                .bind(input.description.as_deref())
                .bind(input.quantity)
                .bind(input.unit.trim())
                .fetch_one(&mut *tx)
                .await?;

                log_movement(
                    &mut tx,
                    session,
                    id,
                    InventoryAction::Add,
                    input.quantity,
                    "New item added",
                )
                .await?;

                audit::record(
                    &mut tx,
                    session,
                    AuditRecord::new("inventory_items", id, AuditAction::Insert)
                        .details(format!("Item added: {name}")),
                )
                .await?;

                Saved::Created(id)
            }
        };

        tx.commit().await?;

        debug!(id = saved.id(), "Inventory item saved");
        Ok(saved)
    }
}

async fn find_item(
    conn: &mut SqliteConnection,
    branch_id: i64,
    id: i64,
) -> DbResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        SELECT id, branch_id, category_id, name, description, quantity, unit
        FROM inventory_items
        WHERE id = ?1 AND branch_id = ?2
        "#,
    )
    .bind(id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

async fn log_movement(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    item_id: i64,
    action: InventoryAction,
    quantity: i64,
    notes: &str,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_transactions (item_id, user_id, branch_id, action, quantity, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(item_id)
    .bind(session.user_id)
    .bind(session.branch_id)
    .bind(action)
    .bind(quantity)
    .bind(notes)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::setup;

    fn towels(id: Option<i64>, quantity: i64) -> InventoryItemInput {
        InventoryItemInput {
            id,
            name: "Bath towel".to_string(),
            category_id: None,
            quantity,
            unit: "pcs".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_item_movements() {
        let (db, session) = setup().await;
        let inv = db.inventory();

        let saved = inv.save_item(&session, &towels(None, 10)).await.unwrap();
        let Saved::Created(id) = saved else {
            panic!("expected insert");
        };

        inv.save_item(&session, &towels(Some(id), 4)).await.unwrap();
        inv.save_item(&session, &towels(Some(id), 4)).await.unwrap();
        inv.save_item(&session, &towels(Some(id), 9)).await.unwrap();

        let log: Vec<(InventoryAction, i64)> = inv
            .transactions(id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.action, t.quantity))
            .collect();
        assert_eq!(
            log,
            vec![
                (InventoryAction::Add, 10),
                (InventoryAction::Remove, 6),
                (InventoryAction::Adjust, 0),
                (InventoryAction::Add, 5),
            ]
        );

        let notes = inv.transactions(id).await.unwrap()[1].notes.clone();
        assert_eq!(notes.as_deref(), Some("Adjusted from 10 to 4"));

        let item = inv.get_item(session.branch_id, id).await.unwrap().unwrap();
        assert_eq!(item.quantity, 9);
        assert_eq!(db.audit().for_record("inventory_items", id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_categories_and_listing() {
        let (db, session) = setup().await;
        let inv = db.inventory();

        let linen = inv
            .save_category(
                &session,
                &InventoryCategoryInput {
                    id: None,
                    name: "Linen".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id();

        let mut input = towels(None, 3);
        input.category_id = Some(linen);
        inv.save_item(&session, &input).await.unwrap();

        let items = inv.items(session.branch_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category_name.as_deref(), Some("Linen"));
        assert_eq!(inv.categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_item_update() {
        let (db, session) = setup().await;
        let err = db
            .inventory()
            .save_item(&session, &towels(Some(77), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InventoryItemNotFound(77))));
    }
}
