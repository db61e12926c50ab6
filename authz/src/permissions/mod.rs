//! Permission system types and utilities.
//!
//! Roles bundle permissions, features and a hierarchy level. Decisions are
//! pure functions of an [`AuthorizationContext`] snapshot and an
//! [`AccessQuery`].

pub mod catalog;
pub mod codes;
pub mod context;
pub mod evaluator;
pub mod features;
pub mod hierarchy;
pub mod policies;
pub mod registry;
pub mod resolver;
pub mod roles;
pub mod vocabulary;

pub use catalog::{CatalogDecision, FeatureCatalog, UnmappedFeaturePolicy};
pub use codes::{Permission, PermissionSet};
pub use context::{AuthorizationContext, PermissionDrift};
pub use evaluator::{
    check_access, has_all_permissions, has_all_roles, has_any_permission, has_any_role,
    has_feature, has_permission, has_role, robust_check_access, AccessQuery,
};
pub use features::{Feature, FeatureSet};
pub use hierarchy::{
    compare_roles, effective_level, get_role_level, has_higher_role_level, highest_role,
    meets_min_level,
};
pub use policies::Policy;
pub use registry::{RoleDefinition, RoleRegistry};
pub use resolver::{resolve_features, resolve_permissions};
pub use roles::{BackendRoleCode, Role, RoleSet};
pub use vocabulary::{satisfies, FlagSet, Match, Vocabulary};

/// Map a backend role code onto an internal role; `None` when unrecognized.
pub fn map_backend_role_to_frontend(code: &str) -> Option<Role> {
    RoleRegistry::global().map_backend_to_frontend(code)
}

/// Map an internal role onto its backend code.
pub fn map_frontend_role_to_backend(role: Role) -> BackendRoleCode {
    RoleRegistry::global().map_frontend_to_backend(role)
}
