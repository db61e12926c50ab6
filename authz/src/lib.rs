//! Loan portal authorization engine.
//!
//! Role-based access control over a fixed vocabulary of permissions, roles
//! and features. Callers pass an [`AuthorizationContext`] snapshot into pure
//! decision functions; the [`Authorizer`] facade adds configuration and
//! logging on top.
//!
//! ```
//! use lp_authz::{check_access, AccessQuery, AuthorizationContext, Permission, RoleSet};
//!
//! let ctx = AuthorizationContext::for_roles(RoleSet::MANAGER);
//! assert!(check_access(&ctx, &AccessQuery::new().permissions([Permission::LoanApprove])));
//! ```

pub mod authorizer;
pub mod config;
pub mod error;
pub mod identity;
pub mod observability;
pub mod permissions;

pub use authorizer::Authorizer;
pub use config::{AuthzConfig, PermissionSource};
pub use error::{AccessDenied, AuthzError, AuthzResult};
pub use identity::{audit_identity, check_identity_consistency, ConsistencyReport, IdentityPair};
pub use permissions::{
    check_access, get_role_level, has_higher_role_level, map_backend_role_to_frontend,
    map_frontend_role_to_backend, resolve_permissions, robust_check_access, AccessQuery,
    AuthorizationContext, Feature, Permission, PermissionSet, Policy, Role, RoleSet,
};
