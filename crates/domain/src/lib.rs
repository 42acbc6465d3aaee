//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod identity;
mod menu;

pub use access::{ApplicationSummary, PermissionSnapshot, PermissionSummary, RoleSummary};
pub use identity::{ApplicationId, MenuItemId, PermissionId, RoleId, UserId};
pub use menu::MenuItem;
