use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use pannon_core::{AppError, AppResult};
use pannon_domain::{ApplicationId, MenuItem, MenuItemId};

use crate::menu_ports::{HierarchyIssue, MenuTreeRepository};

use super::MenuHierarchyService;

struct FakeMenuRepository {
    items: HashMap<MenuItemId, MenuItem>,
}

impl FakeMenuRepository {
    fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}

#[async_trait]
impl MenuTreeRepository for FakeMenuRepository {
    async fn find_item(&self, item_id: MenuItemId) -> AppResult<Option<MenuItem>> {
        Ok(self.items.get(&item_id).cloned())
    }

    async fn list_children(&self, item_id: MenuItemId) -> AppResult<Vec<MenuItem>> {
        let mut children: Vec<MenuItem> = self
            .items
            .values()
            .filter(|item| item.parent_id == Some(item_id))
            .cloned()
            .collect();
        children.sort_by_key(|item| item.position);
        Ok(children)
    }

    async fn list_items_for_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<MenuItem>> {
        Ok(self
            .items
            .values()
            .filter(|item| item.application_id == application_id)
            .cloned()
            .collect())
    }
}

fn item(
    application_id: ApplicationId,
    id: MenuItemId,
    parent_id: Option<MenuItemId>,
    position: i32,
) -> MenuItem {
    MenuItem {
        id,
        application_id,
        parent_id,
        label: format!("item-{position}"),
        position,
    }
}

/// root -> child_one -> child_two, plus one unrelated root.
fn chain() -> (FakeMenuRepository, MenuItemId, MenuItemId, MenuItemId, MenuItemId) {
    let application_id = ApplicationId::new();
    let root = MenuItemId::new();
    let child_one = MenuItemId::new();
    let child_two = MenuItemId::new();
    let unrelated = MenuItemId::new();

    let repository = FakeMenuRepository::new(vec![
        item(application_id, root, None, 0),
        item(application_id, child_one, Some(root), 1),
        item(application_id, child_two, Some(child_one), 2),
        item(application_id, unrelated, None, 3),
    ]);

    (repository, root, child_one, child_two, unrelated)
}

#[tokio::test]
async fn self_parenting_is_always_a_cycle() {
    let (repository, root, ..) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.would_create_cycle(root, root).await;
    assert!(result.is_ok_and(|cyclic| cyclic));
}

#[tokio::test]
async fn reparenting_onto_a_descendant_is_rejected() {
    let (repository, root, _, child_two, _) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.would_create_cycle(root, child_two).await;
    assert!(result.is_ok_and(|cyclic| cyclic));
}

#[tokio::test]
async fn reparenting_onto_an_unrelated_item_is_allowed() {
    let (repository, _, child_one, _, unrelated) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.would_create_cycle(child_one, unrelated).await;
    assert!(result.is_ok_and(|cyclic| !cyclic));
}

#[tokio::test]
async fn cycle_check_terminates_on_already_corrupted_data() {
    let application_id = ApplicationId::new();
    let first = MenuItemId::new();
    let second = MenuItemId::new();
    let unrelated = MenuItemId::new();

    // first and second already reference each other.
    let repository = FakeMenuRepository::new(vec![
        item(application_id, first, Some(second), 0),
        item(application_id, second, Some(first), 1),
        item(application_id, unrelated, None, 2),
    ]);
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.would_create_cycle(first, unrelated).await;
    assert!(result.is_ok_and(|cyclic| !cyclic));
}

#[tokio::test]
async fn descendants_are_collected_breadth_first() {
    let (repository, root, child_one, child_two, _) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.descendants(root).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap_or_default(), vec![child_one, child_two]);
}

#[tokio::test]
async fn leaves_have_no_descendants() {
    let (repository, _, _, child_two, _) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.descendants(child_two).await;
    assert!(result.is_ok_and(|descendants| descendants.is_empty()));
}

#[tokio::test]
async fn depth_and_path_agree_along_a_chain() {
    let (repository, root, child_one, child_two, _) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let depth = service.depth(child_two).await;
    assert!(depth.is_ok_and(|depth| depth == 2));

    let path = service.path_from_root(child_two).await;
    assert!(path.is_ok());
    assert_eq!(path.unwrap_or_default(), vec![root, child_one, child_two]);
}

#[tokio::test]
async fn roots_have_depth_zero_and_a_single_element_path() {
    let (repository, root, ..) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let depth = service.depth(root).await;
    assert!(depth.is_ok_and(|depth| depth == 0));

    let path = service.path_from_root(root).await;
    assert!(path.is_ok());
    assert_eq!(path.unwrap_or_default(), vec![root]);
}

#[tokio::test]
async fn unknown_items_have_depth_zero_and_an_empty_path() {
    let (repository, ..) = chain();
    let service = MenuHierarchyService::new(Arc::new(repository));

    let depth = service.depth(MenuItemId::new()).await;
    assert!(depth.is_ok_and(|depth| depth == 0));

    let path = service.path_from_root(MenuItemId::new()).await;
    assert!(path.is_ok_and(|path| path.is_empty()));
}

#[tokio::test]
async fn upward_walk_reports_an_error_on_a_stored_cycle() {
    let application_id = ApplicationId::new();
    let first = MenuItemId::new();
    let second = MenuItemId::new();

    let repository = FakeMenuRepository::new(vec![
        item(application_id, first, Some(second), 0),
        item(application_id, second, Some(first), 1),
    ]);
    let service = MenuHierarchyService::new(Arc::new(repository));

    let depth = service.depth(first).await;
    assert!(matches!(depth, Err(AppError::Internal(_))));

    let path = service.path_from_root(first).await;
    assert!(matches!(path, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn validation_flags_self_references_and_orphans() {
    let application_id = ApplicationId::new();
    let root = MenuItemId::new();
    let selfish = MenuItemId::new();
    let orphan = MenuItemId::new();
    let dangling_parent = MenuItemId::new();

    let repository = FakeMenuRepository::new(vec![
        item(application_id, root, None, 0),
        item(application_id, selfish, Some(selfish), 1),
        item(application_id, orphan, Some(dangling_parent), 2),
    ]);
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.validate_application(application_id).await;
    assert!(result.is_ok());
    let report = match result {
        Ok(report) => report,
        Err(_) => return,
    };

    assert!(!report.is_valid);
    assert_eq!(report.item_count, 3);
    assert_eq!(report.issues.len(), 2);
    assert!(
        report
            .issues
            .contains(&HierarchyIssue::SelfReference { item_id: selfish })
    );
    assert!(report.issues.contains(&HierarchyIssue::MissingParent {
        item_id: orphan,
        parent_id: dangling_parent,
    }));
}

#[tokio::test]
async fn validation_passes_a_well_formed_tree() {
    let (repository, _, _, _, _) = chain();
    let application_id = match repository.items.values().next() {
        Some(item) => item.application_id,
        None => return,
    };
    let service = MenuHierarchyService::new(Arc::new(repository));

    let result = service.validate_application(application_id).await;
    assert!(result.is_ok_and(|report| report.is_valid && report.item_count == 4));
}
