//! Internal role names, backend role codes, and the role bit set.

use bitflags::bitflags;

use super::vocabulary::{FlagSet, Vocabulary};

/// Internal role identifier.
///
/// Serialized by display name (`"Risk Analyst"`), which is the spelling the
/// rest of the platform works with once a backend code has been mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    #[serde(rename = "Administrator")]
    Administrator,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Risk Analyst")]
    RiskAnalyst,
    #[serde(rename = "Compliance Auditor")]
    ComplianceAuditor,
    #[serde(rename = "Client User")]
    ClientUser,
}

impl Role {
    /// Canonical display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Manager => "Manager",
            Self::RiskAnalyst => "Risk Analyst",
            Self::ComplianceAuditor => "Compliance Auditor",
            Self::ClientUser => "Client User",
        }
    }

    /// Returns all roles, in bit order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Administrator,
            Self::Manager,
            Self::RiskAnalyst,
            Self::ComplianceAuditor,
            Self::ClientUser,
        ]
    }

    /// The bit this role occupies in a [`RoleSet`].
    #[must_use]
    pub const fn flag(self) -> RoleSet {
        match self {
            Self::Administrator => RoleSet::ADMINISTRATOR,
            Self::Manager => RoleSet::MANAGER,
            Self::RiskAnalyst => RoleSet::RISK_ANALYST,
            Self::ComplianceAuditor => RoleSet::COMPLIANCE_AUDITOR,
            Self::ClientUser => RoleSet::CLIENT_USER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Role code used by the backend identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackendRoleCode {
    Admin,
    Manager,
    Analyst,
    Auditor,
    Client,
}

impl BackendRoleCode {
    /// Canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Analyst => "ANALYST",
            Self::Auditor => "AUDITOR",
            Self::Client => "CLIENT",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Admin,
            Self::Manager,
            Self::Analyst,
            Self::Auditor,
            Self::Client,
        ]
    }

    /// Parse a backend code, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use lp_authz::permissions::BackendRoleCode;
    ///
    /// assert_eq!(BackendRoleCode::parse(" admin "), Some(BackendRoleCode::Admin));
    /// assert_eq!(BackendRoleCode::parse("UNKNOWN"), None);
    /// ```
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for BackendRoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of held roles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoleSet: u32 {
        const ADMINISTRATOR      = 1 << 0;
        const MANAGER            = 1 << 1;
        const RISK_ANALYST       = 1 << 2;
        const COMPLIANCE_AUDITOR = 1 << 3;
        const CLIENT_USER        = 1 << 4;
    }
}

impl RoleSet {
    /// Check membership of a single role.
    #[must_use]
    pub const fn has_role(self, role: Role) -> bool {
        self.contains(role.flag())
    }

    /// Iterate the held roles, in bit order.
    pub fn roles(self) -> impl Iterator<Item = Role> {
        super::vocabulary::members(self)
    }
}

impl Vocabulary for Role {
    type Set = RoleSet;

    fn all() -> &'static [Self] {
        Self::all()
    }

    fn flag(self) -> RoleSet {
        self.flag()
    }
}

impl FlagSet for RoleSet {
    type Item = Role;
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        super::vocabulary::collect(iter)
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        role.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_serialize_as_display_names() {
        for role in Role::all() {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.name()));
            let restored: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(*role, restored);
        }
    }

    #[test]
    fn test_role_bits_follow_declaration_order() {
        for (i, role) in Role::all().iter().enumerate() {
            assert_eq!(role.flag().bits(), 1 << i);
        }
    }

    #[test]
    fn test_backend_codes_serialize_upper_case() {
        let json = serde_json::to_string(&BackendRoleCode::Analyst).unwrap();
        assert_eq!(json, "\"ANALYST\"");
    }

    #[test]
    fn test_backend_code_parse_is_case_insensitive() {
        assert_eq!(BackendRoleCode::parse("ADMIN"), Some(BackendRoleCode::Admin));
        assert_eq!(BackendRoleCode::parse("admin"), Some(BackendRoleCode::Admin));
        assert_eq!(BackendRoleCode::parse("Auditor"), Some(BackendRoleCode::Auditor));
        assert_eq!(BackendRoleCode::parse("\tclient\n"), Some(BackendRoleCode::Client));
    }

    #[test]
    fn test_backend_code_parse_rejects_unknown() {
        assert_eq!(BackendRoleCode::parse(""), None);
        assert_eq!(BackendRoleCode::parse("UNKNOWN"), None);
        assert_eq!(BackendRoleCode::parse("Administrator"), None);
    }

    #[test]
    fn test_role_set_collect() {
        let set: RoleSet = [Role::Manager, Role::ClientUser, Role::Manager]
            .into_iter()
            .collect();
        assert_eq!(set, RoleSet::MANAGER | RoleSet::CLIENT_USER);
        assert!(set.has_role(Role::Manager));
        assert!(!set.has_role(Role::Administrator));
        assert_eq!(set.roles().count(), 2);
    }
}
