//! Product features gated by role membership.
//!
//! A role's feature set is declared alongside its permissions in the
//! registry but never derived from them.

use bitflags::bitflags;

use super::vocabulary::{FlagSet, Vocabulary};

/// Product capability identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// User administration screens
    UserManagement,
    /// Audit log browser
    AuditLogs,
    /// Loan application intake and tracking
    LoanApplications,
    /// Loan decision workflow
    LoanApproval,
    /// Risk scoring dashboard
    RiskDashboard,
    /// Reporting and exports
    Reports,
    /// Compliance case management
    ComplianceCenter,
    /// Security monitoring views
    SecurityMonitoring,
    /// Platform settings
    SystemSettings,
    /// Team workload overview
    TeamOverview,
}

impl Feature {
    /// Canonical feature name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserManagement => "user_management",
            Self::AuditLogs => "audit_logs",
            Self::LoanApplications => "loan_applications",
            Self::LoanApproval => "loan_approval",
            Self::RiskDashboard => "risk_dashboard",
            Self::Reports => "reports",
            Self::ComplianceCenter => "compliance_center",
            Self::SecurityMonitoring => "security_monitoring",
            Self::SystemSettings => "system_settings",
            Self::TeamOverview => "team_overview",
        }
    }

    /// Parse an exact feature name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    /// Returns all features, in bit order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UserManagement,
            Self::AuditLogs,
            Self::LoanApplications,
            Self::LoanApproval,
            Self::RiskDashboard,
            Self::Reports,
            Self::ComplianceCenter,
            Self::SecurityMonitoring,
            Self::SystemSettings,
            Self::TeamOverview,
        ]
    }

    /// The bit this feature occupies in a [`FeatureSet`].
    #[must_use]
    pub const fn flag(self) -> FeatureSet {
        match self {
            Self::UserManagement => FeatureSet::USER_MANAGEMENT,
            Self::AuditLogs => FeatureSet::AUDIT_LOGS,
            Self::LoanApplications => FeatureSet::LOAN_APPLICATIONS,
            Self::LoanApproval => FeatureSet::LOAN_APPROVAL,
            Self::RiskDashboard => FeatureSet::RISK_DASHBOARD,
            Self::Reports => FeatureSet::REPORTS,
            Self::ComplianceCenter => FeatureSet::COMPLIANCE_CENTER,
            Self::SecurityMonitoring => FeatureSet::SECURITY_MONITORING,
            Self::SystemSettings => FeatureSet::SYSTEM_SETTINGS,
            Self::TeamOverview => FeatureSet::TEAM_OVERVIEW,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of enabled features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureSet: u32 {
        const USER_MANAGEMENT     = 1 << 0;
        const AUDIT_LOGS          = 1 << 1;
        const LOAN_APPLICATIONS   = 1 << 2;
        const LOAN_APPROVAL       = 1 << 3;
        const RISK_DASHBOARD      = 1 << 4;
        const REPORTS             = 1 << 5;
        const COMPLIANCE_CENTER   = 1 << 6;
        const SECURITY_MONITORING = 1 << 7;
        const SYSTEM_SETTINGS     = 1 << 8;
        const TEAM_OVERVIEW       = 1 << 9;
    }
}

impl FeatureSet {
    #[must_use]
    pub const fn has_feature(self, feature: Feature) -> bool {
        self.contains(feature.flag())
    }

    pub fn features(self) -> impl Iterator<Item = Feature> {
        super::vocabulary::members(self)
    }
}

impl Vocabulary for Feature {
    type Set = FeatureSet;

    fn all() -> &'static [Self] {
        Self::all()
    }

    fn flag(self) -> FeatureSet {
        self.flag()
    }
}

impl FlagSet for FeatureSet {
    type Item = Feature;
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        super::vocabulary::collect(iter)
    }
}

impl From<Feature> for FeatureSet {
    fn from(feature: Feature) -> Self {
        feature.flag()
    }
}
