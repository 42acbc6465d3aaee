//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_permission_cache;
mod postgres_access_repository;
mod postgres_menu_repository;

pub use in_memory_permission_cache::{DEFAULT_SNAPSHOT_TTL, InMemoryPermissionCache};
pub use postgres_access_repository::PostgresAccessRepository;
pub use postgres_menu_repository::PostgresMenuRepository;
