use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use pannon_application::MenuTreeRepository;
use pannon_core::{AppError, AppResult};
use pannon_domain::{ApplicationId, MenuItem, MenuItemId};

/// PostgreSQL-backed repository for menu tree rows.
#[derive(Clone)]
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    id: Uuid,
    application_id: Uuid,
    parent_id: Option<Uuid>,
    label: String,
    position: i32,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: MenuItemId::from_uuid(row.id),
            application_id: ApplicationId::from_uuid(row.application_id),
            parent_id: row.parent_id.map(MenuItemId::from_uuid),
            label: row.label,
            position: row.position,
        }
    }
}

#[async_trait]
impl MenuTreeRepository for PostgresMenuRepository {
    async fn find_item(&self, item_id: MenuItemId) -> AppResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, application_id, parent_id, label, position
            FROM menu_items
            WHERE id = $1
            "#,
        )
        .bind(item_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load menu item: {error}")))?;

        Ok(row.map(MenuItem::from))
    }

    async fn list_children(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, application_id, parent_id, label, position
            FROM menu_items
            WHERE parent_id = $1
            ORDER BY position, label
            "#,
        )
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list menu item children: {error}"))
        })?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    async fn list_items_for_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, application_id, parent_id, label, position
            FROM menu_items
            WHERE application_id = $1
            ORDER BY position, label
            "#,
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list application menu items: {error}"))
        })?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }
}

#[cfg(test)]
mod tests;
