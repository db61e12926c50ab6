//! Permission codes and the permission bit set.
//!
//! Permissions are organized into categories:
//! - Users (bits 0-3): Account administration
//! - Roles (bits 4-6): Role inspection and assignment
//! - Loans (bits 7-11): Loan application intake and decisions
//! - Risk (bits 12-14): Risk assessment
//! - Reports (bits 15-17): Reporting and exports
//! - Compliance (bits 18-20): Audit logs and compliance review
//! - Security (bits 21-22): Security monitoring
//! - System (bit 23): Platform settings
//! - Profile (bits 24-25): Self-service profile access

use bitflags::bitflags;

use super::vocabulary::{FlagSet, Vocabulary};

/// A single permission code from the closed vocabulary.
///
/// Serialized as its snake_case code, e.g. `"user_view_all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View every user account on the platform
    UserViewAll,
    /// Create user accounts
    UserCreate,
    /// Edit user accounts
    UserEdit,
    /// Delete user accounts
    UserDelete,
    /// View role definitions and assignments
    RoleView,
    /// Edit role definitions
    RoleEdit,
    /// Assign roles to users
    RoleAssign,
    /// View one's own loan applications
    LoanViewOwn,
    /// Submit a loan application
    LoanCreate,
    /// View every loan application
    LoanViewAll,
    /// Approve loan applications
    LoanApprove,
    /// Reject loan applications
    LoanReject,
    /// View risk scores and dashboards
    RiskView,
    /// Perform risk assessments
    RiskAssess,
    /// Configure risk models and thresholds
    RiskConfigure,
    /// View reports
    ReportView,
    /// Export reports
    ReportExport,
    /// Administer report definitions
    ReportAdmin,
    /// View the audit log
    ViewAuditLogs,
    /// View compliance dashboards
    ComplianceView,
    /// Review and sign off compliance cases
    ComplianceReview,
    /// View security monitoring
    SecurityMonitor,
    /// Configure security policies
    SecurityConfigure,
    /// Manage platform settings
    SystemSettings,
    /// View one's own profile
    ProfileView,
    /// Edit one's own profile
    ProfileEdit,
}

impl Permission {
    /// Returns the canonical permission code.
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::Permission;
    ///
    /// assert_eq!(Permission::ViewAuditLogs.code(), "view_audit_logs");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UserViewAll => "user_view_all",
            Self::UserCreate => "user_create",
            Self::UserEdit => "user_edit",
            Self::UserDelete => "user_delete",
            Self::RoleView => "role_view",
            Self::RoleEdit => "role_edit",
            Self::RoleAssign => "role_assign",
            Self::LoanViewOwn => "loan_view_own",
            Self::LoanCreate => "loan_create",
            Self::LoanViewAll => "loan_view_all",
            Self::LoanApprove => "loan_approve",
            Self::LoanReject => "loan_reject",
            Self::RiskView => "risk_view",
            Self::RiskAssess => "risk_assess",
            Self::RiskConfigure => "risk_configure",
            Self::ReportView => "report_view",
            Self::ReportExport => "report_export",
            Self::ReportAdmin => "report_admin",
            Self::ViewAuditLogs => "view_audit_logs",
            Self::ComplianceView => "compliance_view",
            Self::ComplianceReview => "compliance_review",
            Self::SecurityMonitor => "security_monitor",
            Self::SecurityConfigure => "security_configure",
            Self::SystemSettings => "system_settings",
            Self::ProfileView => "profile_view",
            Self::ProfileEdit => "profile_edit",
        }
    }

    /// Parse an exact permission code.
    ///
    /// Codes are case-sensitive; anything outside the vocabulary is `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.code() == code)
    }

    /// Returns all permissions as a slice, in bit order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UserViewAll,
            Self::UserCreate,
            Self::UserEdit,
            Self::UserDelete,
            Self::RoleView,
            Self::RoleEdit,
            Self::RoleAssign,
            Self::LoanViewOwn,
            Self::LoanCreate,
            Self::LoanViewAll,
            Self::LoanApprove,
            Self::LoanReject,
            Self::RiskView,
            Self::RiskAssess,
            Self::RiskConfigure,
            Self::ReportView,
            Self::ReportExport,
            Self::ReportAdmin,
            Self::ViewAuditLogs,
            Self::ComplianceView,
            Self::ComplianceReview,
            Self::SecurityMonitor,
            Self::SecurityConfigure,
            Self::SystemSettings,
            Self::ProfileView,
            Self::ProfileEdit,
        ]
    }

    /// The bit this permission occupies in a [`PermissionSet`].
    #[must_use]
    pub const fn flag(self) -> PermissionSet {
        match self {
            Self::UserViewAll => PermissionSet::USER_VIEW_ALL,
            Self::UserCreate => PermissionSet::USER_CREATE,
            Self::UserEdit => PermissionSet::USER_EDIT,
            Self::UserDelete => PermissionSet::USER_DELETE,
            Self::RoleView => PermissionSet::ROLE_VIEW,
            Self::RoleEdit => PermissionSet::ROLE_EDIT,
            Self::RoleAssign => PermissionSet::ROLE_ASSIGN,
            Self::LoanViewOwn => PermissionSet::LOAN_VIEW_OWN,
            Self::LoanCreate => PermissionSet::LOAN_CREATE,
            Self::LoanViewAll => PermissionSet::LOAN_VIEW_ALL,
            Self::LoanApprove => PermissionSet::LOAN_APPROVE,
            Self::LoanReject => PermissionSet::LOAN_REJECT,
            Self::RiskView => PermissionSet::RISK_VIEW,
            Self::RiskAssess => PermissionSet::RISK_ASSESS,
            Self::RiskConfigure => PermissionSet::RISK_CONFIGURE,
            Self::ReportView => PermissionSet::REPORT_VIEW,
            Self::ReportExport => PermissionSet::REPORT_EXPORT,
            Self::ReportAdmin => PermissionSet::REPORT_ADMIN,
            Self::ViewAuditLogs => PermissionSet::VIEW_AUDIT_LOGS,
            Self::ComplianceView => PermissionSet::COMPLIANCE_VIEW,
            Self::ComplianceReview => PermissionSet::COMPLIANCE_REVIEW,
            Self::SecurityMonitor => PermissionSet::SECURITY_MONITOR,
            Self::SecurityConfigure => PermissionSet::SECURITY_CONFIGURE,
            Self::SystemSettings => PermissionSet::SYSTEM_SETTINGS,
            Self::ProfileView => PermissionSet::PROFILE_VIEW,
            Self::ProfileEdit => PermissionSet::PROFILE_EDIT,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

bitflags! {
    /// Set of permissions represented as a 64-bit bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PermissionSet: u64 {
        // === Users (bits 0-3) ===
        const USER_VIEW_ALL      = 1 << 0;
        const USER_CREATE        = 1 << 1;
        const USER_EDIT          = 1 << 2;
        const USER_DELETE        = 1 << 3;

        // === Roles (bits 4-6) ===
        const ROLE_VIEW          = 1 << 4;
        const ROLE_EDIT          = 1 << 5;
        const ROLE_ASSIGN        = 1 << 6;

        // === Loans (bits 7-11) ===
        const LOAN_VIEW_OWN      = 1 << 7;
        const LOAN_CREATE        = 1 << 8;
        const LOAN_VIEW_ALL      = 1 << 9;
        const LOAN_APPROVE       = 1 << 10;
        const LOAN_REJECT        = 1 << 11;

        // === Risk (bits 12-14) ===
        const RISK_VIEW          = 1 << 12;
        const RISK_ASSESS        = 1 << 13;
        const RISK_CONFIGURE     = 1 << 14;

        // === Reports (bits 15-17) ===
        const REPORT_VIEW        = 1 << 15;
        const REPORT_EXPORT      = 1 << 16;
        const REPORT_ADMIN       = 1 << 17;

        // === Compliance (bits 18-20) ===
        const VIEW_AUDIT_LOGS    = 1 << 18;
        const COMPLIANCE_VIEW    = 1 << 19;
        const COMPLIANCE_REVIEW  = 1 << 20;

        // === Security (bits 21-22) ===
        const SECURITY_MONITOR   = 1 << 21;
        const SECURITY_CONFIGURE = 1 << 22;

        // === System (bit 23) ===
        const SYSTEM_SETTINGS    = 1 << 23;

        // === Profile (bits 24-25) ===
        const PROFILE_VIEW       = 1 << 24;
        const PROFILE_EDIT       = 1 << 25;
    }
}

impl PermissionSet {
    // === Preset Combinations ===

    /// Self-service permissions every signed-in role carries.
    pub const SELF_SERVICE: Self = Self::PROFILE_VIEW.union(Self::PROFILE_EDIT);

    /// Read-only access to every loan application.
    pub const LOAN_REVIEW: Self = Self::LOAN_VIEW_ALL;

    /// Viewing and exporting reports.
    pub const REPORTING: Self = Self::REPORT_VIEW.union(Self::REPORT_EXPORT);

    /// Permissions that grant control over other accounts or the platform.
    ///
    /// Only the administrator role may hold any of these.
    pub const PRIVILEGED: Self = Self::USER_CREATE
        .union(Self::USER_EDIT)
        .union(Self::USER_DELETE)
        .union(Self::ROLE_EDIT)
        .union(Self::ROLE_ASSIGN)
        .union(Self::RISK_CONFIGURE)
        .union(Self::REPORT_ADMIN)
        .union(Self::SECURITY_CONFIGURE)
        .union(Self::SYSTEM_SETTINGS);

    /// Check if this set includes the specified permission(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::PermissionSet;
    ///
    /// let perms = PermissionSet::RISK_VIEW | PermissionSet::REPORT_VIEW;
    /// assert!(perms.has(PermissionSet::RISK_VIEW));
    /// assert!(!perms.has(PermissionSet::USER_DELETE));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    /// Check membership of a single permission code.
    #[must_use]
    pub const fn has_permission(self, permission: Permission) -> bool {
        self.contains(permission.flag())
    }

    /// Iterate the permission codes in this set, in bit order.
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        super::vocabulary::members(self)
    }
}

impl Vocabulary for Permission {
    type Set = PermissionSet;

    fn all() -> &'static [Self] {
        Self::all()
    }

    fn flag(self) -> PermissionSet {
        self.flag()
    }
}

impl FlagSet for PermissionSet {
    type Item = Permission;
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        super::vocabulary::collect(iter)
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        permission.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_snake_case() {
        for perm in Permission::all() {
            let code = perm.code();
            assert!(
                code.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "Permission code '{code}' should be snake_case"
            );
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: std::collections::HashSet<&str> =
            Permission::all().iter().map(|p| p.code()).collect();
        assert_eq!(codes.len(), Permission::all().len());
    }

    #[test]
    fn test_each_permission_owns_its_own_bit() {
        for (i, perm) in Permission::all().iter().enumerate() {
            assert_eq!(perm.flag().bits(), 1 << i, "{perm:?} is out of bit order");
        }
    }

    #[test]
    fn test_flags_cover_the_whole_set() {
        let union: PermissionSet = Permission::all().iter().copied().collect();
        assert_eq!(union, PermissionSet::all());
    }

    #[test]
    fn test_from_code_roundtrip() {
        for perm in Permission::all() {
            assert_eq!(Permission::from_code(perm.code()), Some(*perm));
        }
    }

    #[test]
    fn test_from_code_is_exact() {
        assert_eq!(Permission::from_code("ROLE_VIEW"), None);
        assert_eq!(Permission::from_code(" role_view"), None);
        assert_eq!(Permission::from_code("role_delete"), None);
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Permission::ReportAdmin.to_string(), "report_admin");
    }

    #[test]
    fn test_serde_matches_code() {
        for perm in Permission::all() {
            let json = serde_json::to_string(perm).unwrap();
            assert_eq!(json, format!("\"{}\"", perm.code()));
            let restored: Permission = serde_json::from_str(&json).unwrap();
            assert_eq!(*perm, restored);
        }
    }

    #[test]
    fn test_deserialize_unknown_code_fails() {
        assert!(serde_json::from_str::<Permission>("\"launch_missiles\"").is_err());
    }

    #[test]
    fn test_has_permission() {
        let set = PermissionSet::REPORTING;
        assert!(set.has_permission(Permission::ReportExport));
        assert!(!set.has_permission(Permission::ReportAdmin));
    }

    #[test]
    fn test_privileged_excludes_self_service() {
        assert!(!PermissionSet::PRIVILEGED.intersects(PermissionSet::SELF_SERVICE));
        assert!(!PermissionSet::PRIVILEGED.intersects(PermissionSet::REPORTING));
    }

    #[test]
    fn test_permissions_iterator() {
        let set = PermissionSet::SELF_SERVICE;
        let perms: Vec<Permission> = set.permissions().collect();
        assert_eq!(perms, vec![Permission::ProfileView, Permission::ProfileEdit]);
    }
}
