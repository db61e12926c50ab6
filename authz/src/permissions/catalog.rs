//! Feature catalog gate.
//!
//! A catalog maps feature names to the permissions that unlock them. This is
//! separate from the role-declared feature sets used by
//! [`robust_check_access`](super::robust_check_access): holding any one of the
//! mapped permissions is enough.
//!
//! Unmapped feature names are granted by default ([`UnmappedFeaturePolicy::Allow`]).
//! This is the one fail-open path in the engine; deployments that want the
//! fail-closed posture everywhere set [`UnmappedFeaturePolicy::Deny`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::codes::{Permission, PermissionSet};
use super::features::Feature;
use crate::error::{AuthzError, AuthzResult};

/// What to do with a feature name the catalog does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedFeaturePolicy {
    /// Grant access (fail-open).
    #[default]
    Allow,
    /// Refuse access (fail-closed).
    Deny,
}

impl UnmappedFeaturePolicy {
    /// Parse `allow` / `deny`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" | "open" => Some(Self::Allow),
            "deny" | "closed" => Some(Self::Deny),
            _ => None,
        }
    }
}

/// Outcome of a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogDecision {
    /// Feature is mapped and the user holds one of its permissions.
    Granted,
    /// Feature is mapped and the user holds none of its permissions.
    Denied,
    /// Feature is not in the catalog and the policy allowed it.
    UnmappedAllowed,
    /// Feature is not in the catalog and the policy refused it.
    UnmappedDenied,
}

impl CatalogDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Granted | Self::UnmappedAllowed)
    }
}

/// Feature name → permissions lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCatalog {
    entries: HashMap<String, PermissionSet>,
    unmapped: UnmappedFeaturePolicy,
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FeatureCatalog {
    /// Empty catalog with the given unmapped-feature policy.
    #[must_use]
    pub fn empty(unmapped: UnmappedFeaturePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            unmapped,
        }
    }

    /// Catalog covering every built-in [`Feature`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty(UnmappedFeaturePolicy::default());
        for feature in Feature::all() {
            catalog.insert(feature.name(), builtin_permissions(*feature));
        }
        catalog
    }

    /// Parse a catalog from a JSON object of feature name → permission codes.
    ///
    /// ```json
    /// { "reports": ["report_view", "report_admin"], "beta_export": ["report_export"] }
    /// ```
    pub fn from_json(json: &str) -> AuthzResult<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;

        let mut catalog = Self::empty(UnmappedFeaturePolicy::default());
        for (feature, codes) in raw {
            let mut perms = PermissionSet::empty();
            for code in codes {
                let perm =
                    Permission::from_code(&code).ok_or_else(|| AuthzError::UnknownPermission {
                        feature: feature.clone(),
                        code: code.clone(),
                    })?;
                perms |= perm.flag();
            }
            catalog.insert(feature, perms);
        }
        Ok(catalog)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_path(path: &Path) -> AuthzResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AuthzError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Replace the unmapped-feature policy.
    #[must_use]
    pub const fn with_unmapped_policy(mut self, policy: UnmappedFeaturePolicy) -> Self {
        self.unmapped = policy;
        self
    }

    pub const fn unmapped_policy(&self) -> UnmappedFeaturePolicy {
        self.unmapped
    }

    /// Map a feature name to permissions, replacing any earlier entry.
    pub fn insert(&mut self, feature: impl Into<String>, permissions: PermissionSet) {
        self.entries.insert(feature.into(), permissions);
    }

    /// Permissions mapped to `feature`, if it is listed.
    pub fn permissions_for(&self, feature: &str) -> Option<PermissionSet> {
        self.entries.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify access to `feature` for the given permissions.
    ///
    /// A mapped feature with an empty permission list is never granted.
    pub fn decide(&self, feature: &str, permissions: PermissionSet) -> CatalogDecision {
        match self.entries.get(feature) {
            Some(required) if permissions.intersects(*required) => CatalogDecision::Granted,
            Some(_) => CatalogDecision::Denied,
            None => match self.unmapped {
                UnmappedFeaturePolicy::Allow => CatalogDecision::UnmappedAllowed,
                UnmappedFeaturePolicy::Deny => CatalogDecision::UnmappedDenied,
            },
        }
    }

    /// Whether `permissions` unlock `feature`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::{FeatureCatalog, PermissionSet};
    ///
    /// let catalog = FeatureCatalog::builtin();
    /// assert!(catalog.can_access_feature("reports", PermissionSet::REPORT_VIEW));
    /// assert!(!catalog.can_access_feature("reports", PermissionSet::PROFILE_VIEW));
    ///
    /// // Unmapped names are allowed under the default policy.
    /// assert!(catalog.can_access_feature("holiday_banner", PermissionSet::empty()));
    /// ```
    pub fn can_access_feature(&self, feature: &str, permissions: PermissionSet) -> bool {
        self.decide(feature, permissions).is_allowed()
    }
}

/// Default permission mapping for each built-in feature.
const fn builtin_permissions(feature: Feature) -> PermissionSet {
    match feature {
        Feature::UserManagement => PermissionSet::USER_VIEW_ALL
            .union(PermissionSet::USER_CREATE)
            .union(PermissionSet::USER_EDIT)
            .union(PermissionSet::USER_DELETE),
        Feature::AuditLogs => PermissionSet::VIEW_AUDIT_LOGS,
        Feature::LoanApplications => PermissionSet::LOAN_VIEW_OWN
            .union(PermissionSet::LOAN_CREATE)
            .union(PermissionSet::LOAN_VIEW_ALL),
        Feature::LoanApproval => PermissionSet::LOAN_APPROVE.union(PermissionSet::LOAN_REJECT),
        Feature::RiskDashboard => PermissionSet::RISK_VIEW,
        Feature::Reports => PermissionSet::REPORT_VIEW.union(PermissionSet::REPORT_ADMIN),
        Feature::ComplianceCenter => {
            PermissionSet::COMPLIANCE_VIEW.union(PermissionSet::COMPLIANCE_REVIEW)
        }
        Feature::SecurityMonitoring => PermissionSet::SECURITY_MONITOR,
        Feature::SystemSettings => PermissionSet::SYSTEM_SETTINGS,
        Feature::TeamOverview => PermissionSet::USER_VIEW_ALL,
    }
}
