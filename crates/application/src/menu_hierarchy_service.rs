use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use pannon_core::{AppError, AppResult};
use pannon_domain::{ApplicationId, MenuItemId};

use crate::menu_ports::{HierarchyIssue, HierarchyReport, MenuTreeRepository};

/// Guards menu parent reassignment against cycles and answers tree queries
/// for admin tooling.
///
/// Parent reassignment is the only mutation that can violate the acyclic
/// invariant, so [`MenuHierarchyService::would_create_cycle`] must be checked
/// before persisting one.
#[derive(Clone)]
pub struct MenuHierarchyService {
    repository: Arc<dyn MenuTreeRepository>,
}

impl MenuHierarchyService {
    /// Creates a hierarchy service over a menu tree repository.
    #[must_use]
    pub fn new(repository: Arc<dyn MenuTreeRepository>) -> Self {
        Self { repository }
    }

    /// Returns whether reparenting `item_id` under `proposed_parent_id`
    /// would close a cycle.
    ///
    /// Self-parenting is always a cycle. Otherwise walks `item_id`'s
    /// descendants breadth-first looking for the proposed parent; the
    /// visited set guarantees termination even when the stored data is
    /// already inconsistent.
    pub async fn would_create_cycle(
        &self,
        item_id: MenuItemId,
        proposed_parent_id: MenuItemId,
    ) -> AppResult<bool> {
        if item_id == proposed_parent_id {
            return Ok(true);
        }

        let mut visited = HashSet::from([item_id]);
        let mut queue = VecDeque::from([item_id]);
        while let Some(current) = queue.pop_front() {
            for child in self.repository.list_children(current).await? {
                if child.id == proposed_parent_id {
                    return Ok(true);
                }
                if visited.insert(child.id) {
                    queue.push_back(child.id);
                }
            }
        }

        Ok(false)
    }

    /// Returns every descendant of an item in breadth-first visit order,
    /// the item itself excluded.
    pub async fn descendants(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItemId>> {
        let mut collected = Vec::new();
        let mut visited = HashSet::from([item_id]);
        let mut queue = VecDeque::from([item_id]);
        while let Some(current) = queue.pop_front() {
            for child in self.repository.list_children(current).await? {
                if visited.insert(child.id) {
                    collected.push(child.id);
                    queue.push_back(child.id);
                }
            }
        }

        Ok(collected)
    }

    /// Returns the number of ancestors above an item; roots and unknown
    /// items have depth 0.
    pub async fn depth(&self, item_id: MenuItemId) -> AppResult<usize> {
        let chain = self.chain_to_root(item_id).await?;
        Ok(chain.len().saturating_sub(1))
    }

    /// Returns item ids from the root down to the item inclusive; empty for
    /// an unknown item.
    pub async fn path_from_root(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItemId>> {
        let mut chain = self.chain_to_root(item_id).await?;
        chain.reverse();
        Ok(chain)
    }

    /// Scans all items of an application for structural problems.
    ///
    /// Flags self-references and parents pointing at missing rows. A
    /// self-referencing item skips the orphan check; deeper cycles are
    /// caught at mutation time by [`MenuHierarchyService::would_create_cycle`].
    pub async fn validate_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<HierarchyReport> {
        let items = self
            .repository
            .list_items_for_application(application_id)
            .await?;
        let known: HashSet<MenuItemId> = items.iter().map(|item| item.id).collect();

        let mut issues = Vec::new();
        for item in &items {
            let Some(parent_id) = item.parent_id else {
                continue;
            };

            if parent_id == item.id {
                issues.push(HierarchyIssue::SelfReference { item_id: item.id });
                continue;
            }

            if !known.contains(&parent_id) {
                issues.push(HierarchyIssue::MissingParent {
                    item_id: item.id,
                    parent_id,
                });
            }
        }

        Ok(HierarchyReport {
            is_valid: issues.is_empty(),
            item_count: items.len(),
            issues,
        })
    }

    /// Walks parent pointers upward, item-first.
    ///
    /// The walk assumes the chain is acyclic; when a stored cycle is
    /// encountered anyway it returns an error instead of looping.
    async fn chain_to_root(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItemId>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = Some(item_id);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return Err(AppError::Internal(format!(
                    "menu hierarchy contains a cycle at item '{current}'"
                )));
            }

            let Some(item) = self.repository.find_item(current).await? else {
                break;
            };
            chain.push(item.id);
            cursor = item.parent_id;
        }

        Ok(chain)
    }
}

#[cfg(test)]
mod tests;
