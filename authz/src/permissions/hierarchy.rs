//! Role hierarchy comparisons.
//!
//! Levels form a total preorder: higher is more privileged, ties are allowed.

use std::cmp::Ordering;

use super::registry::RoleRegistry;
use super::roles::{Role, RoleSet};

/// Hierarchy level of a role.
pub fn get_role_level(role: Role) -> u8 {
    RoleRegistry::global().level_for_role(role)
}

/// Whether `user_role` ranks at or above `required_role`.
///
/// Reflexive: every role satisfies its own minimum.
pub fn has_higher_role_level(user_role: Role, required_role: Role) -> bool {
    get_role_level(user_role) >= get_role_level(required_role)
}

/// Compare two roles by level only.
pub fn compare_roles(a: Role, b: Role) -> Ordering {
    get_role_level(a).cmp(&get_role_level(b))
}

/// Highest level across held roles; 0 when no role is held.
pub fn effective_level(roles: RoleSet) -> u8 {
    roles.roles().map(get_role_level).max().unwrap_or(0)
}

/// Whether the effective level of `roles` reaches `min_level`.
pub fn meets_min_level(roles: RoleSet, min_level: u8) -> bool {
    effective_level(roles) >= min_level
}

/// Most privileged held role. Ties go to the role declared first.
pub fn highest_role(roles: RoleSet) -> Option<Role> {
    roles.roles().fold(None, |best, role| match best {
        Some(current) if get_role_level(current) >= get_role_level(role) => Some(current),
        _ => Some(role),
    })
}
