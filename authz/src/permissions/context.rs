//! Point-in-time authorization snapshot.

use serde::{Deserialize, Serialize};

use super::codes::PermissionSet;
use super::registry::RoleRegistry;
use super::resolver::resolve_permissions;
use super::roles::RoleSet;
use super::vocabulary::as_list;

/// What the session layer knows about the current user at call time.
///
/// The evaluator trusts `permissions` as given; it is expected to equal
/// `resolve_permissions(roles)` but nothing here enforces that. Use
/// [`AuthorizationContext::permission_drift`] to detect divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationContext {
    pub is_authenticated: bool,
    #[serde(with = "as_list", default)]
    pub roles: RoleSet,
    #[serde(with = "as_list", default)]
    pub permissions: PermissionSet,
}

impl AuthorizationContext {
    #[must_use]
    pub const fn new(is_authenticated: bool, roles: RoleSet, permissions: PermissionSet) -> Self {
        Self {
            is_authenticated,
            roles,
            permissions,
        }
    }

    /// Signed-out snapshot with no roles or permissions.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::new(false, RoleSet::empty(), PermissionSet::empty())
    }

    /// Authenticated snapshot whose permissions are resolved from `roles`.
    #[must_use]
    pub fn for_roles(roles: RoleSet) -> Self {
        Self::new(true, roles, resolve_permissions(roles))
    }

    /// Build a snapshot from role spellings sent by the identity service.
    ///
    /// Each spelling goes through [`RoleRegistry::normalize_role`];
    /// unrecognized spellings are dropped, so they grant nothing.
    #[must_use]
    pub fn from_backend_roles<'a>(
        is_authenticated: bool,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let registry = RoleRegistry::global();
        let roles: RoleSet = codes
            .into_iter()
            .filter_map(|code| registry.normalize_role(code))
            .collect();
        Self::new(is_authenticated, roles, resolve_permissions(roles))
    }

    /// Copy of this snapshot with permissions recomputed from its roles.
    #[must_use]
    pub fn with_derived_permissions(self) -> Self {
        Self {
            permissions: resolve_permissions(self.roles),
            ..self
        }
    }

    /// Difference between the supplied permissions and those implied by roles.
    #[must_use]
    pub fn permission_drift(&self) -> PermissionDrift {
        let derived = resolve_permissions(self.roles);
        PermissionDrift {
            missing: derived.difference(self.permissions),
            unexpected: self.permissions.difference(derived),
        }
    }
}

/// Divergence between a snapshot's permissions and its roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionDrift {
    /// Implied by the roles but absent from the snapshot.
    pub missing: PermissionSet,
    /// Present in the snapshot but not implied by any held role.
    pub unexpected: PermissionSet,
}

impl PermissionDrift {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Permission, Role};

    #[test]
    fn test_anonymous_is_empty() {
        let ctx = AuthorizationContext::anonymous();
        assert!(!ctx.is_authenticated);
        assert!(ctx.roles.is_empty());
        assert!(ctx.permissions.is_empty());
        assert_eq!(ctx, AuthorizationContext::default());
    }

    #[test]
    fn test_for_roles_resolves_permissions() {
        let ctx = AuthorizationContext::for_roles(RoleSet::RISK_ANALYST);
        assert!(ctx.is_authenticated);
        assert!(ctx.permissions.has_permission(Permission::RiskAssess));
        assert!(ctx.permission_drift().is_empty());
    }

    #[test]
    fn test_from_backend_roles_normalizes_and_drops_unknown() {
        let ctx =
            AuthorizationContext::from_backend_roles(true, ["admin", "CLIENT", "UNKNOWN", ""]);
        assert_eq!(ctx.roles, RoleSet::ADMINISTRATOR | RoleSet::CLIENT_USER);
        assert_eq!(ctx.permissions, PermissionSet::all());
    }

    #[test]
    fn test_from_backend_roles_all_unknown_is_powerless() {
        let ctx = AuthorizationContext::from_backend_roles(true, ["ROOT", "superuser"]);
        assert!(ctx.roles.is_empty());
        assert!(ctx.permissions.is_empty());
    }

    #[test]
    fn test_permission_drift_detects_stale_snapshot() {
        let ctx = AuthorizationContext::new(
            true,
            RoleSet::CLIENT_USER,
            PermissionSet::PROFILE_VIEW | PermissionSet::USER_DELETE,
        );
        let drift = ctx.permission_drift();
        assert!(!drift.is_empty());
        assert!(drift.unexpected.has_permission(Permission::UserDelete));
        assert!(drift.missing.has_permission(Permission::LoanCreate));
        assert!(!drift.missing.has_permission(Permission::ProfileView));
    }

    #[test]
    fn test_with_derived_permissions_repairs_drift() {
        let stale = AuthorizationContext::new(true, RoleSet::MANAGER, PermissionSet::empty());
        let fixed = stale.with_derived_permissions();
        assert!(fixed.permission_drift().is_empty());
        assert_eq!(fixed.roles, RoleSet::MANAGER);
    }

    #[test]
    fn test_deserialize_from_supplier_json() {
        let json = r#"{
            "isAuthenticated": true,
            "roles": ["Manager", "Risk Analyst"],
            "permissions": ["risk_view", "report_view"]
        }"#;
        let ctx: AuthorizationContext = serde_json::from_str(json).unwrap();
        assert!(ctx.is_authenticated);
        assert!(ctx.roles.has_role(Role::Manager));
        assert!(ctx.roles.has_role(Role::RiskAnalyst));
        assert_eq!(
            ctx.permissions,
            PermissionSet::RISK_VIEW | PermissionSet::REPORT_VIEW
        );
    }

    #[test]
    fn test_deserialize_missing_lists_default_empty() {
        let ctx: AuthorizationContext =
            serde_json::from_str(r#"{"isAuthenticated": false}"#).unwrap();
        assert_eq!(ctx, AuthorizationContext::anonymous());
    }

    #[test]
    fn test_deserialize_rejects_unknown_permission() {
        let json = r#"{"isAuthenticated": true, "roles": [], "permissions": ["root"]}"#;
        assert!(serde_json::from_str::<AuthorizationContext>(json).is_err());
    }

    #[test]
    fn test_serialize_lists_codes() {
        let ctx = AuthorizationContext::new(
            true,
            RoleSet::CLIENT_USER,
            PermissionSet::LOAN_CREATE,
        );
        let json = serde_json::to_value(ctx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isAuthenticated": true,
                "roles": ["Client User"],
                "permissions": ["loan_create"]
            })
        );
    }
}
