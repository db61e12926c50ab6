//! Permission resolution logic.
//!
//! Computes the effective permissions and features of a role set.

use super::codes::PermissionSet;
use super::features::FeatureSet;
use super::registry::RoleRegistry;
use super::roles::RoleSet;

/// Compute the effective permissions of a role set.
///
/// The result is the union of every held role's permissions; an empty role
/// set yields an empty permission set.
pub fn resolve_permissions(roles: RoleSet) -> PermissionSet {
    let registry = RoleRegistry::global();
    roles
        .roles()
        .fold(PermissionSet::empty(), |perms, role| {
            perms | registry.permissions_for_role(role)
        })
}

/// Compute the features enabled by a role set.
pub fn resolve_features(roles: RoleSet) -> FeatureSet {
    let registry = RoleRegistry::global();
    roles
        .roles()
        .fold(FeatureSet::empty(), |features, role| {
            features | registry.features_for_role(role)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Feature, Permission, Role};

    #[test]
    fn test_empty_roles_resolve_to_nothing() {
        assert!(resolve_permissions(RoleSet::empty()).is_empty());
        assert!(resolve_features(RoleSet::empty()).is_empty());
    }

    #[test]
    fn test_single_role_matches_registry() {
        let registry = RoleRegistry::global();
        for role in Role::all() {
            assert_eq!(
                resolve_permissions(role.flag()),
                registry.permissions_for_role(*role)
            );
            assert_eq!(
                resolve_features(role.flag()),
                registry.features_for_role(*role)
            );
        }
    }

    #[test]
    fn test_role_permissions_combined() {
        let perms = resolve_permissions(RoleSet::CLIENT_USER | RoleSet::COMPLIANCE_AUDITOR);

        assert!(perms.has_permission(Permission::LoanCreate)); // from client
        assert!(perms.has_permission(Permission::ViewAuditLogs)); // from auditor
        assert!(!perms.has_permission(Permission::LoanApprove));
    }

    #[test]
    fn test_union_over_every_role_pair() {
        let registry = RoleRegistry::global();
        for a in Role::all() {
            for b in Role::all() {
                let expected =
                    registry.permissions_for_role(*a) | registry.permissions_for_role(*b);
                assert_eq!(resolve_permissions(a.flag() | b.flag()), expected);
            }
        }
    }

    #[test]
    fn test_features_combined() {
        let features = resolve_features(RoleSet::RISK_ANALYST | RoleSet::COMPLIANCE_AUDITOR);
        assert!(features.has_feature(Feature::RiskDashboard));
        assert!(features.has_feature(Feature::ComplianceCenter));
        assert!(!features.has_feature(Feature::UserManagement));
    }
}
