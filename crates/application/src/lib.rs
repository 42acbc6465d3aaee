//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod menu_hierarchy_service;
mod menu_ports;
mod permission_preloader;

pub use access_ports::{CacheStats, PermissionSnapshotCache, PermissionSnapshotRepository};
pub use access_service::AccessService;
pub use menu_hierarchy_service::MenuHierarchyService;
pub use menu_ports::{HierarchyIssue, HierarchyReport, MenuTreeRepository};
pub use permission_preloader::{DEFAULT_PRELOAD_BATCH_SIZE, PermissionPreloader};
