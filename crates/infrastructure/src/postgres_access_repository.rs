use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use pannon_application::PermissionSnapshotRepository;
use pannon_core::{AppError, AppResult};
use pannon_domain::{
    ApplicationId, ApplicationSummary, PermissionId, PermissionSnapshot, PermissionSummary,
    RoleId, RoleSummary, UserId,
};

/// PostgreSQL-backed repository resolving effective access from RBAC tables.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: String,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    name: String,
    is_active: bool,
}

#[async_trait]
impl PermissionSnapshotRepository for PostgresAccessRepository {
    async fn load_snapshot(&self, user_id: UserId) -> AppResult<Option<PermissionSnapshot>> {
        let Some(user) = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user: {error}")))?
        else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT roles.id, roles.name
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user roles: {error}")))?;

        let permissions = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT permissions.id, permissions.name
            FROM user_roles
            INNER JOIN role_permissions
                ON role_permissions.role_id = user_roles.role_id
            INNER JOIN permissions
                ON permissions.id = role_permissions.permission_id
            WHERE user_roles.user_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load user permissions: {error}"))
        })?;

        let applications = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT DISTINCT applications.id, applications.name, applications.is_active
            FROM user_roles
            INNER JOIN role_applications
                ON role_applications.role_id = user_roles.role_id
            INNER JOIN applications
                ON applications.id = role_applications.application_id
            WHERE user_roles.user_id = $1
                AND applications.is_active = true
            ORDER BY applications.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load user applications: {error}"))
        })?;

        Ok(Some(PermissionSnapshot::new(
            UserId::from_uuid(user.id),
            user.email,
            user.display_name,
            roles
                .into_iter()
                .map(|row| RoleSummary {
                    id: RoleId::from_uuid(row.id),
                    name: row.name,
                })
                .collect(),
            permissions
                .into_iter()
                .map(|row| PermissionSummary {
                    id: PermissionId::from_uuid(row.id),
                    name: row.name,
                })
                .collect(),
            applications
                .into_iter()
                .map(|row| ApplicationSummary {
                    id: ApplicationId::from_uuid(row.id),
                    name: row.name,
                    is_active: row.is_active,
                })
                .collect(),
        )))
    }

    async fn list_active_user_ids(&self, limit: usize) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE is_active = true AND deleted_at IS NULL
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list active users: {error}")))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn list_user_ids_with_role(&self, role_name: &str) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_roles.user_id
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
            INNER JOIN users
                ON users.id = user_roles.user_id
            WHERE roles.name = $1
                AND users.deleted_at IS NULL
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list users with role: {error}"))
        })?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn list_user_ids_for_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_roles.user_id
            FROM user_roles
            INNER JOIN role_applications
                ON role_applications.role_id = user_roles.role_id
            INNER JOIN users
                ON users.id = user_roles.user_id
            WHERE role_applications.application_id = $1
                AND users.deleted_at IS NULL
            "#,
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list users for application: {error}"))
        })?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
