//! Effective access aggregated per user.
//!
//! Permissions and applications in a snapshot are always derived as
//! set-unions over the user's current roles, never stored as an
//! independent authority.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, PermissionId, RoleId, UserId};

/// Role row projection carried in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
}

/// Permission row projection carried in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSummary {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Unique permission name.
    pub name: String,
}

/// Application row projection carried in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    /// Stable application identifier.
    pub id: ApplicationId,
    /// Application display name.
    pub name: String,
    /// Whether the application is currently enabled.
    pub is_active: bool,
}

/// Resolved access for one user: roles plus the permission and active
/// application unions those roles grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    /// User the snapshot belongs to.
    pub user_id: UserId,
    /// User email.
    pub email: String,
    /// User display name.
    pub display_name: String,
    /// Roles currently assigned to the user.
    pub roles: Vec<RoleSummary>,
    /// Union of permissions granted through the roles, unique by id.
    pub permissions: Vec<PermissionSummary>,
    /// Union of active applications reachable through the roles, unique by id.
    pub applications: Vec<ApplicationSummary>,
    /// When the snapshot was resolved from the row store.
    pub resolved_at: DateTime<Utc>,
}

impl PermissionSnapshot {
    /// Builds a snapshot from raw role/permission/application rows.
    ///
    /// A permission or application reachable through two different roles
    /// counts once; inactive applications are dropped. First-seen order is
    /// preserved.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        roles: Vec<RoleSummary>,
        permissions: Vec<PermissionSummary>,
        applications: Vec<ApplicationSummary>,
    ) -> Self {
        let mut seen_permissions = HashSet::new();
        let permissions = permissions
            .into_iter()
            .filter(|permission| seen_permissions.insert(permission.id))
            .collect();

        let mut seen_applications = HashSet::new();
        let applications = applications
            .into_iter()
            .filter(|application| application.is_active && seen_applications.insert(application.id))
            .collect();

        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
            roles,
            permissions,
            applications,
            resolved_at: Utc::now(),
        }
    }

    /// Returns whether the snapshot grants the named permission.
    #[must_use]
    pub fn has_permission(&self, permission_name: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.name == permission_name)
    }

    /// Returns whether the snapshot grants access to the application.
    #[must_use]
    pub fn can_access_application(&self, application_id: ApplicationId) -> bool {
        self.applications
            .iter()
            .any(|application| application.id == application_id)
    }
}
