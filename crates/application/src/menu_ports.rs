use async_trait::async_trait;

use pannon_core::AppResult;
use pannon_domain::{ApplicationId, MenuItem, MenuItemId};

/// Repository port for menu tree rows.
///
/// The hierarchy service queries the row store on every call and caches no
/// graph of its own; menu trees are small and correctness wins.
#[async_trait]
pub trait MenuTreeRepository: Send + Sync {
    /// Finds one menu item by id.
    async fn find_item(&self, item_id: MenuItemId) -> AppResult<Option<MenuItem>>;

    /// Lists the direct children of an item.
    async fn list_children(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItem>>;

    /// Lists every item belonging to an application.
    async fn list_items_for_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<MenuItem>>;
}

/// Structural problem found during a hierarchy scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyIssue {
    /// An item lists itself as its own parent.
    SelfReference {
        /// The self-referencing item.
        item_id: MenuItemId,
    },
    /// An item's parent points at a row that does not exist.
    MissingParent {
        /// The orphaned item.
        item_id: MenuItemId,
        /// The dangling parent reference.
        parent_id: MenuItemId,
    },
}

/// Outcome of a full hierarchy scan for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyReport {
    /// Whether the scan found no structural issues.
    pub is_valid: bool,
    /// Issues found, empty when valid.
    pub issues: Vec<HierarchyIssue>,
    /// Number of items scanned.
    pub item_count: usize,
}
