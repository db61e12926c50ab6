//! Access decisions.
//!
//! Every function here is pure and total: given a snapshot and a query it
//! returns a verdict, never an error. Unknown or absent input degrades to
//! "no access".

use serde::{Deserialize, Serialize};

use super::codes::{Permission, PermissionSet};
use super::context::AuthorizationContext;
use super::features::{Feature, FeatureSet};
use super::hierarchy::meets_min_level;
use super::resolver::resolve_features;
use super::roles::{Role, RoleSet};
use super::vocabulary::{collect, satisfies, Match};

/// A description of what a caller needs.
///
/// [`check_access`] reads `permissions`, `roles`, `require_all` and
/// `require_auth`. [`robust_check_access`] reads `permissions`, `roles`,
/// `exclude_roles`, `features`, `require_all` and `min_role_level`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessQuery {
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
    pub exclude_roles: Vec<Role>,
    pub features: Vec<Feature>,
    pub require_all: bool,
    pub require_auth: bool,
    pub min_role_level: Option<u8>,
}

impl AccessQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query that only asks for a signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::new().require_auth(true)
    }

    #[must_use]
    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn exclude_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.exclude_roles = roles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    #[must_use]
    pub const fn require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }

    #[must_use]
    pub const fn min_role_level(mut self, level: u8) -> Self {
        self.min_role_level = Some(level);
        self
    }

    pub(crate) fn match_mode(&self) -> Match {
        Match::from_require_all(self.require_all)
    }

    pub(crate) fn permission_set(&self) -> PermissionSet {
        collect(self.permissions.iter().copied())
    }

    pub(crate) fn role_set(&self) -> RoleSet {
        collect(self.roles.iter().copied())
    }

    pub(crate) fn excluded_set(&self) -> RoleSet {
        collect(self.exclude_roles.iter().copied())
    }

    pub(crate) fn feature_set(&self) -> FeatureSet {
        collect(self.features.iter().copied())
    }
}

/// Standard access check.
///
/// 1. `require_auth` on an unauthenticated snapshot denies outright.
/// 2. With neither permissions nor roles requested, the verdict is the
///    authentication state (or `true` when auth is not required).
/// 3. Otherwise permissions and roles are each matched ALL/ANY per
///    `require_all`, and combined with AND when `require_all` is set, OR
///    when it is not. Passing either list is enough by default.
///
/// Under AND an empty list is trivially satisfied. Under OR only the lists
/// actually supplied take part, so a roles-only query is decided by roles.
///
/// # Examples
///
/// ```
/// use lp_authz::permissions::{check_access, AccessQuery, AuthorizationContext, Permission, Role, RoleSet};
///
/// let ctx = AuthorizationContext::for_roles(RoleSet::ADMINISTRATOR);
/// assert!(check_access(&ctx, &AccessQuery::new().permissions([Permission::RoleView])));
///
/// let client = AuthorizationContext::for_roles(RoleSet::CLIENT_USER);
/// let staff = AccessQuery::new().roles([Role::Administrator, Role::Manager]);
/// assert!(!check_access(&client, &staff));
/// ```
pub fn check_access(ctx: &AuthorizationContext, query: &AccessQuery) -> bool {
    if query.require_auth && !ctx.is_authenticated {
        return false;
    }

    if query.permissions.is_empty() && query.roles.is_empty() {
        return if query.require_auth {
            ctx.is_authenticated
        } else {
            true
        };
    }

    let mode = query.match_mode();
    let has_permissions = satisfies(ctx.permissions, query.permission_set(), mode);
    let has_roles = satisfies(ctx.roles, query.role_set(), mode);

    if query.require_all {
        has_permissions && has_roles
    } else {
        (!query.permissions.is_empty() && has_permissions)
            || (!query.roles.is_empty() && has_roles)
    }
}

/// Strict access check with exclusions, feature fallback and minimum level.
///
/// Holding any excluded role denies, whatever else the query allows.
/// Otherwise roles and permissions are each matched ALL/ANY per
/// `require_all`, features always match ANY against the features of the
/// held roles, `min_role_level` compares against the highest held level,
/// and every part must pass.
pub fn robust_check_access(ctx: &AuthorizationContext, query: &AccessQuery) -> bool {
    let excluded = query.excluded_set();
    if !excluded.is_empty() && ctx.roles.intersects(excluded) {
        return false;
    }

    let mode = query.match_mode();
    let roles_ok = satisfies(ctx.roles, query.role_set(), mode);
    let permissions_ok = satisfies(ctx.permissions, query.permission_set(), mode);
    let features_ok = satisfies(resolve_features(ctx.roles), query.feature_set(), Match::Any);
    let level_ok = query
        .min_role_level
        .is_none_or(|min| meets_min_level(ctx.roles, min));

    roles_ok && permissions_ok && features_ok && level_ok
}

/// Whether the snapshot holds `permission`.
pub fn has_permission(ctx: &AuthorizationContext, permission: Permission) -> bool {
    has_any_permission(ctx, &[permission])
}

/// Whether the snapshot holds at least one of `permissions`.
///
/// An empty list is trivially satisfied.
pub fn has_any_permission(ctx: &AuthorizationContext, permissions: &[Permission]) -> bool {
    satisfies(
        ctx.permissions,
        collect(permissions.iter().copied()),
        Match::Any,
    )
}

/// Whether the snapshot holds every one of `permissions`.
pub fn has_all_permissions(ctx: &AuthorizationContext, permissions: &[Permission]) -> bool {
    satisfies(
        ctx.permissions,
        collect(permissions.iter().copied()),
        Match::All,
    )
}

/// Whether the snapshot holds `role`.
pub fn has_role(ctx: &AuthorizationContext, role: Role) -> bool {
    has_any_role(ctx, &[role])
}

/// Whether the snapshot holds at least one of `roles`.
pub fn has_any_role(ctx: &AuthorizationContext, roles: &[Role]) -> bool {
    satisfies(ctx.roles, collect(roles.iter().copied()), Match::Any)
}

/// Whether the snapshot holds every one of `roles`.
pub fn has_all_roles(ctx: &AuthorizationContext, roles: &[Role]) -> bool {
    satisfies(ctx.roles, collect(roles.iter().copied()), Match::All)
}

/// Whether any held role enables `feature`.
pub fn has_feature(ctx: &AuthorizationContext, feature: Feature) -> bool {
    resolve_features(ctx.roles).has_feature(feature)
}
