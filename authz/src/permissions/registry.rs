//! Static role registry.
//!
//! Maps each role to its permissions, features and hierarchy level, and owns
//! the only translation from external role spellings to [`Role`]. Nothing
//! downstream of [`RoleRegistry::normalize_role`] compares role strings.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use super::codes::PermissionSet;
use super::features::FeatureSet;
use super::roles::{BackendRoleCode, Role};
use super::vocabulary::as_list;

/// Process-wide registry, built on first use and never mutated.
static REGISTRY: LazyLock<RoleRegistry> = LazyLock::new(RoleRegistry::builtin);

/// Everything the engine knows about one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    pub role: Role,
    #[serde(with = "as_list")]
    pub permissions: PermissionSet,
    #[serde(with = "as_list")]
    pub features: FeatureSet,
    /// Higher is more privileged. Distinct roles may share a level.
    pub hierarchy_level: u8,
}

const ADMINISTRATOR: RoleDefinition = RoleDefinition {
    role: Role::Administrator,
    permissions: PermissionSet::all(),
    features: FeatureSet::all(),
    hierarchy_level: 5,
};

const MANAGER: RoleDefinition = RoleDefinition {
    role: Role::Manager,
    permissions: PermissionSet::SELF_SERVICE
        .union(PermissionSet::USER_VIEW_ALL)
        .union(PermissionSet::ROLE_VIEW)
        .union(PermissionSet::LOAN_REVIEW)
        .union(PermissionSet::LOAN_APPROVE)
        .union(PermissionSet::LOAN_REJECT)
        .union(PermissionSet::RISK_VIEW)
        .union(PermissionSet::RISK_ASSESS)
        .union(PermissionSet::REPORTING)
        .union(PermissionSet::VIEW_AUDIT_LOGS)
        .union(PermissionSet::COMPLIANCE_VIEW)
        .union(PermissionSet::SECURITY_MONITOR),
    features: FeatureSet::TEAM_OVERVIEW
        .union(FeatureSet::LOAN_APPLICATIONS)
        .union(FeatureSet::LOAN_APPROVAL)
        .union(FeatureSet::RISK_DASHBOARD)
        .union(FeatureSet::REPORTS)
        .union(FeatureSet::AUDIT_LOGS),
    hierarchy_level: 4,
};

const RISK_ANALYST: RoleDefinition = RoleDefinition {
    role: Role::RiskAnalyst,
    permissions: PermissionSet::SELF_SERVICE
        .union(PermissionSet::LOAN_REVIEW)
        .union(PermissionSet::RISK_VIEW)
        .union(PermissionSet::RISK_ASSESS)
        .union(PermissionSet::REPORTING),
    features: FeatureSet::RISK_DASHBOARD
        .union(FeatureSet::REPORTS)
        .union(FeatureSet::LOAN_APPLICATIONS),
    hierarchy_level: 3,
};

const COMPLIANCE_AUDITOR: RoleDefinition = RoleDefinition {
    role: Role::ComplianceAuditor,
    permissions: PermissionSet::SELF_SERVICE
        .union(PermissionSet::LOAN_REVIEW)
        .union(PermissionSet::RISK_VIEW)
        .union(PermissionSet::REPORTING)
        .union(PermissionSet::VIEW_AUDIT_LOGS)
        .union(PermissionSet::COMPLIANCE_VIEW)
        .union(PermissionSet::COMPLIANCE_REVIEW),
    features: FeatureSet::AUDIT_LOGS
        .union(FeatureSet::COMPLIANCE_CENTER)
        .union(FeatureSet::REPORTS),
    hierarchy_level: 3,
};

const CLIENT_USER: RoleDefinition = RoleDefinition {
    role: Role::ClientUser,
    permissions: PermissionSet::SELF_SERVICE
        .union(PermissionSet::LOAN_VIEW_OWN)
        .union(PermissionSet::LOAN_CREATE),
    features: FeatureSet::LOAN_APPLICATIONS,
    hierarchy_level: 1,
};

/// Extra spellings seen from upstream systems, in normalized form.
///
/// Display names and backend codes are registered automatically.
const ALIASES: &[(&str, Role)] = &[
    ("sysadmin", Role::Administrator),
    ("mgr", Role::Manager),
    ("risk", Role::RiskAnalyst),
    ("compliance", Role::ComplianceAuditor),
    ("customer", Role::ClientUser),
];

/// Immutable role registry.
#[derive(Debug)]
pub struct RoleRegistry {
    definitions: HashMap<Role, RoleDefinition>,
    aliases: HashMap<String, Role>,
}

impl RoleRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    fn builtin() -> Self {
        let definitions: HashMap<Role, RoleDefinition> = [
            ADMINISTRATOR,
            MANAGER,
            RISK_ANALYST,
            COMPLIANCE_AUDITOR,
            CLIENT_USER,
        ]
        .into_iter()
        .map(|def| (def.role, def))
        .collect();

        let mut aliases = HashMap::new();
        for role in Role::all() {
            aliases.insert(normalize_spelling(role.name()), *role);
            aliases.insert(normalize_spelling(backend_code(*role).as_str()), *role);
        }
        for (alias, role) in ALIASES {
            aliases.insert(normalize_spelling(alias), *role);
        }

        Self {
            definitions,
            aliases,
        }
    }

    /// Look up the full definition of a role.
    pub fn definition(&self, role: Role) -> Option<&RoleDefinition> {
        self.definitions.get(&role)
    }

    /// All definitions, most privileged first.
    ///
    /// Roles sharing a level keep declaration order.
    pub fn definitions(&self) -> Vec<&RoleDefinition> {
        let mut defs: Vec<_> = Role::all()
            .iter()
            .filter_map(|role| self.definitions.get(role))
            .collect();
        defs.sort_by(|a, b| b.hierarchy_level.cmp(&a.hierarchy_level));
        defs
    }

    /// Permissions granted by a role. Unknown roles grant nothing.
    pub fn permissions_for_role(&self, role: Role) -> PermissionSet {
        self.definition(role)
            .map_or_else(PermissionSet::empty, |def| def.permissions)
    }

    /// Features enabled by a role. Unknown roles enable nothing.
    pub fn features_for_role(&self, role: Role) -> FeatureSet {
        self.definition(role)
            .map_or_else(FeatureSet::empty, |def| def.features)
    }

    /// Hierarchy level of a role; 0 ranks below every defined role.
    pub fn level_for_role(&self, role: Role) -> u8 {
        self.definition(role).map_or(0, |def| def.hierarchy_level)
    }

    /// Hierarchy level for a raw role spelling; unrecognized names rank 0.
    pub fn level_for_name(&self, name: &str) -> u8 {
        self.normalize_role(name)
            .map_or(0, |role| self.level_for_role(role))
    }

    /// Permissions for a raw role spelling; unrecognized names grant nothing.
    pub fn permissions_for_name(&self, name: &str) -> PermissionSet {
        self.normalize_role(name)
            .map_or_else(PermissionSet::empty, |role| self.permissions_for_role(role))
    }

    /// Map a backend role code onto an internal role.
    ///
    /// Input is case-insensitive. `None` means "treat as having no role".
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::{Role, RoleRegistry};
    ///
    /// let registry = RoleRegistry::global();
    /// assert_eq!(registry.map_backend_to_frontend("admin"), Some(Role::Administrator));
    /// assert_eq!(registry.map_backend_to_frontend("UNKNOWN"), None);
    /// ```
    pub fn map_backend_to_frontend(&self, code: &str) -> Option<Role> {
        BackendRoleCode::parse(code).map(frontend_role)
    }

    /// Map an internal role onto its backend code.
    pub const fn map_frontend_to_backend(&self, role: Role) -> BackendRoleCode {
        backend_code(role)
    }

    /// Resolve any known spelling of a role.
    ///
    /// Accepts backend codes, display names and registered aliases, ignoring
    /// case, surrounding whitespace, and `_`/`-` separators.
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::{Role, RoleRegistry};
    ///
    /// let registry = RoleRegistry::global();
    /// assert_eq!(registry.normalize_role("Admin"), Some(Role::Administrator));
    /// assert_eq!(registry.normalize_role("risk_analyst"), Some(Role::RiskAnalyst));
    /// assert_eq!(registry.normalize_role("janitor"), None);
    /// ```
    pub fn normalize_role(&self, raw: &str) -> Option<Role> {
        self.aliases.get(&normalize_spelling(raw)).copied()
    }
}

/// Backend code for each role. The match is exhaustive, so the mapping is
/// total over [`Role`].
const fn backend_code(role: Role) -> BackendRoleCode {
    match role {
        Role::Administrator => BackendRoleCode::Admin,
        Role::Manager => BackendRoleCode::Manager,
        Role::RiskAnalyst => BackendRoleCode::Analyst,
        Role::ComplianceAuditor => BackendRoleCode::Auditor,
        Role::ClientUser => BackendRoleCode::Client,
    }
}

const fn frontend_role(code: BackendRoleCode) -> Role {
    match code {
        BackendRoleCode::Admin => Role::Administrator,
        BackendRoleCode::Manager => Role::Manager,
        BackendRoleCode::Analyst => Role::RiskAnalyst,
        BackendRoleCode::Auditor => Role::ComplianceAuditor,
        BackendRoleCode::Client => Role::ClientUser,
    }
}

/// Lower-case, treat `_` and `-` as spaces, collapse runs of whitespace.
fn normalize_spelling(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
