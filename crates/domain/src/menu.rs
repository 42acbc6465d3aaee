//! Menu tree rows edited through the admin console.

use pannon_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, MenuItemId};

/// One node of an application's menu tree.
///
/// The parent pointer is the only self-referential edge in the schema;
/// reassigning it is gated by cycle detection before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable menu item identifier.
    pub id: MenuItemId,
    /// Application the item belongs to.
    pub application_id: ApplicationId,
    /// Parent item, `None` for roots.
    pub parent_id: Option<MenuItemId>,
    /// Label shown in navigation.
    pub label: String,
    /// Ordering position among siblings.
    pub position: i32,
}

impl MenuItem {
    /// Creates a menu item, rejecting blank labels.
    pub fn new(
        id: MenuItemId,
        application_id: ApplicationId,
        parent_id: Option<MenuItemId>,
        label: impl Into<String>,
        position: i32,
    ) -> AppResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(AppError::Validation(
                "menu item label must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self {
            id,
            application_id,
            parent_id,
            label,
            position,
        })
    }

    /// Returns whether the item sits at the top of its tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
