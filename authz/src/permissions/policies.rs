//! Named access policies.
//!
//! Each screen-level rule is one [`AccessQuery`] evaluated with
//! [`robust_check_access`] behind an authentication gate. Callers ask for a
//! policy by name instead of restating role lists inline.

use super::codes::Permission;
use super::context::AuthorizationContext;
use super::evaluator::{robust_check_access, AccessQuery};
use super::features::Feature;
use super::roles::Role;

/// Canonical access rules for the portal's guarded areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Report list and report detail views
    ViewReports,
    /// Staff-only areas closed to client users
    StaffArea,
    /// User administration
    ManageUsers,
    /// Audit log browser
    ViewAuditLogs,
    /// Security monitoring views
    SecurityMonitoring,
    /// Loan approve/reject actions
    DecideLoans,
    /// Administrator dashboard
    AdminDashboard,
}

impl Policy {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ViewReports => "view_reports",
            Self::StaffArea => "staff_area",
            Self::ManageUsers => "manage_users",
            Self::ViewAuditLogs => "view_audit_logs",
            Self::SecurityMonitoring => "security_monitoring",
            Self::DecideLoans => "decide_loans",
            Self::AdminDashboard => "admin_dashboard",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViewReports,
            Self::StaffArea,
            Self::ManageUsers,
            Self::ViewAuditLogs,
            Self::SecurityMonitoring,
            Self::DecideLoans,
            Self::AdminDashboard,
        ]
    }

    /// The query this policy evaluates.
    #[must_use]
    pub fn query(&self) -> AccessQuery {
        match self {
            Self::ViewReports => AccessQuery::new()
                .permissions([Permission::ReportView])
                .exclude_roles([Role::ClientUser]),
            Self::StaffArea => AccessQuery::new()
                .exclude_roles([Role::ClientUser])
                .min_role_level(3),
            Self::ManageUsers => AccessQuery::new()
                .permissions([Permission::UserCreate, Permission::UserEdit])
                .features([Feature::UserManagement])
                .require_all(true),
            Self::ViewAuditLogs => AccessQuery::new()
                .permissions([Permission::ViewAuditLogs])
                .features([Feature::AuditLogs]),
            Self::SecurityMonitoring => AccessQuery::new()
                .permissions([Permission::SecurityMonitor])
                .exclude_roles([Role::ClientUser]),
            Self::DecideLoans => AccessQuery::new()
                .permissions([Permission::LoanApprove, Permission::LoanReject])
                .min_role_level(4),
            Self::AdminDashboard => AccessQuery::new().roles([Role::Administrator]),
        }
    }

    /// Evaluate this policy against a snapshot.
    ///
    /// Every guarded area requires a signed-in user, whatever roles the
    /// snapshot carries.
    pub fn allows(&self, ctx: &AuthorizationContext) -> bool {
        ctx.is_authenticated && robust_check_access(ctx, &self.query())
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::RoleSet;

    fn allowed_roles(policy: Policy) -> Vec<Role> {
        Role::all()
            .iter()
            .copied()
            .filter(|role| policy.allows(&AuthorizationContext::for_roles(role.flag())))
            .collect()
    }

    #[test]
    fn test_view_reports() {
        assert_eq!(
            allowed_roles(Policy::ViewReports),
            vec![
                Role::Administrator,
                Role::Manager,
                Role::RiskAnalyst,
                Role::ComplianceAuditor
            ]
        );
    }

    #[test]
    fn test_staff_area_excludes_clients_even_with_staff_role() {
        let ctx = AuthorizationContext::for_roles(RoleSet::MANAGER | RoleSet::CLIENT_USER);
        assert!(!Policy::StaffArea.allows(&ctx));
        assert!(Policy::StaffArea.allows(&AuthorizationContext::for_roles(RoleSet::MANAGER)));
    }

    #[test]
    fn test_manage_users_is_admin_only() {
        assert_eq!(allowed_roles(Policy::ManageUsers), vec![Role::Administrator]);
    }

    #[test]
    fn test_view_audit_logs() {
        assert_eq!(
            allowed_roles(Policy::ViewAuditLogs),
            vec![Role::Administrator, Role::Manager, Role::ComplianceAuditor]
        );
    }

    #[test]
    fn test_security_monitoring() {
        assert_eq!(
            allowed_roles(Policy::SecurityMonitoring),
            vec![Role::Administrator, Role::Manager]
        );
    }

    #[test]
    fn test_decide_loans() {
        assert_eq!(
            allowed_roles(Policy::DecideLoans),
            vec![Role::Administrator, Role::Manager]
        );
    }

    #[test]
    fn test_admin_dashboard() {
        assert_eq!(allowed_roles(Policy::AdminDashboard), vec![Role::Administrator]);
    }

    #[test]
    fn test_anonymous_is_refused_everything_gated() {
        let anon = AuthorizationContext::anonymous();
        for policy in Policy::all() {
            assert!(!policy.allows(&anon), "{policy} admitted an anonymous snapshot");
        }
    }

    #[test]
    fn test_signed_out_snapshot_with_roles_is_refused() {
        let signed_out = AuthorizationContext {
            is_authenticated: false,
            ..AuthorizationContext::for_roles(RoleSet::all())
        };
        for policy in Policy::all() {
            assert!(!policy.allows(&signed_out), "{policy} admitted a signed-out snapshot");
        }
    }

    #[test]
    fn test_policy_names_serialize() {
        for policy in Policy::all() {
            let json = serde_json::to_string(policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.name()));
        }
    }
}
