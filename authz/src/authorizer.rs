//! Configured authorization facade.
//!
//! Wraps the pure evaluator with the configured permission source and
//! feature catalog, and reports denials, drift and fail-open grants through
//! `tracing`.

use tracing::{debug, warn};

use crate::config::{AuthzConfig, PermissionSource};
use crate::error::AccessDenied;
use crate::permissions::{
    check_access, effective_level, meets_min_level, resolve_features, robust_check_access,
    satisfies, AccessQuery, AuthorizationContext, CatalogDecision, FeatureCatalog, Match, Policy,
};

/// Access decisions under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    source: PermissionSource,
    catalog: FeatureCatalog,
}

impl Authorizer {
    #[must_use]
    pub const fn new(source: PermissionSource, catalog: FeatureCatalog) -> Self {
        Self { source, catalog }
    }

    /// Build from configuration, loading the feature catalog it names.
    pub fn from_config(config: &AuthzConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.permission_source, config.feature_catalog()?))
    }

    #[must_use]
    pub const fn permission_source(&self) -> PermissionSource {
        self.source
    }

    #[must_use]
    pub const fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// The snapshot decisions are actually made on.
    ///
    /// Under [`PermissionSource::Roles`] the supplied permissions are
    /// replaced by those the roles imply. Drift is logged in both modes.
    #[must_use]
    pub fn effective_context(&self, ctx: &AuthorizationContext) -> AuthorizationContext {
        let drift = ctx.permission_drift();
        if !drift.is_empty() {
            warn!(
                missing = ?drift.missing,
                unexpected = ?drift.unexpected,
                source = ?self.source,
                "Snapshot permissions disagree with roles"
            );
        }

        match self.source {
            PermissionSource::Snapshot => *ctx,
            PermissionSource::Roles => ctx.with_derived_permissions(),
        }
    }

    pub fn check_access(&self, ctx: &AuthorizationContext, query: &AccessQuery) -> bool {
        let allowed = check_access(&self.effective_context(ctx), query);
        debug!(?query, roles = ?ctx.roles, allowed, "check_access");
        allowed
    }

    pub fn robust_check_access(&self, ctx: &AuthorizationContext, query: &AccessQuery) -> bool {
        let allowed = robust_check_access(&self.effective_context(ctx), query);
        debug!(?query, roles = ?ctx.roles, allowed, "robust_check_access");
        allowed
    }

    /// Evaluate a named policy.
    pub fn allows(&self, ctx: &AuthorizationContext, policy: Policy) -> bool {
        let allowed = policy.allows(&self.effective_context(ctx));
        debug!(%policy, roles = ?ctx.roles, allowed, "Policy evaluated");
        allowed
    }

    /// Whether the snapshot unlocks a catalog feature.
    pub fn can_access_feature(&self, ctx: &AuthorizationContext, feature: &str) -> bool {
        self.feature_decision(ctx, feature).is_allowed()
    }

    /// [`check_access`] with a denial reason.
    pub fn require(&self, ctx: &AuthorizationContext, query: &AccessQuery) -> Result<(), AccessDenied> {
        let ctx = self.effective_context(ctx);
        if check_access(&ctx, query) {
            return Ok(());
        }

        let denied = if query.require_auth && !ctx.is_authenticated {
            AccessDenied::Unauthenticated
        } else {
            let missing_permissions = query.permission_set().difference(ctx.permissions);
            let missing_roles = query.role_set().difference(ctx.roles);
            let mode = query.match_mode();

            match (query.permissions.is_empty(), query.roles.is_empty()) {
                (false, true) => AccessDenied::MissingPermissions(missing_permissions),
                (true, false) => AccessDenied::MissingRoles(missing_roles),
                _ if query.require_all
                    && !satisfies(ctx.permissions, query.permission_set(), mode) =>
                {
                    AccessDenied::MissingPermissions(missing_permissions)
                }
                _ if query.require_all => AccessDenied::MissingRoles(missing_roles),
                _ => AccessDenied::Forbidden,
            }
        };

        debug!(?query, reason = %denied, "Access denied");
        Err(denied)
    }

    /// [`robust_check_access`] with the first failing condition as reason.
    ///
    /// Conditions are reported in evaluation order: exclusion, roles,
    /// permissions, features, level.
    pub fn require_robust(
        &self,
        ctx: &AuthorizationContext,
        query: &AccessQuery,
    ) -> Result<(), AccessDenied> {
        let ctx = self.effective_context(ctx);
        if robust_check_access(&ctx, query) {
            return Ok(());
        }

        let denied = robust_denial(&ctx, query);
        debug!(?query, reason = %denied, "Access denied");
        Err(denied)
    }

    /// Evaluate a named policy with a denial reason.
    pub fn require_policy(&self, ctx: &AuthorizationContext, policy: Policy) -> Result<(), AccessDenied> {
        if !ctx.is_authenticated {
            debug!(%policy, reason = %AccessDenied::Unauthenticated, "Access denied");
            return Err(AccessDenied::Unauthenticated);
        }
        self.require_robust(ctx, &policy.query())
    }

    /// Catalog feature access with a denial reason.
    pub fn require_feature(&self, ctx: &AuthorizationContext, feature: &str) -> Result<(), AccessDenied> {
        if self.feature_decision(ctx, feature).is_allowed() {
            Ok(())
        } else {
            Err(AccessDenied::FeatureUnavailable(feature.to_string()))
        }
    }

    fn feature_decision(&self, ctx: &AuthorizationContext, feature: &str) -> CatalogDecision {
        let ctx = self.effective_context(ctx);
        let decision = self.catalog.decide(feature, ctx.permissions);
        match decision {
            CatalogDecision::UnmappedAllowed => {
                warn!(feature, "Unmapped feature granted by fail-open catalog");
            }
            CatalogDecision::UnmappedDenied => {
                debug!(feature, "Unmapped feature refused");
            }
            CatalogDecision::Granted | CatalogDecision::Denied => {
                debug!(feature, ?decision, "Feature decision");
            }
        }
        decision
    }
}

fn robust_denial(ctx: &AuthorizationContext, query: &AccessQuery) -> AccessDenied {
    if let Some(role) = ctx
        .roles
        .intersection(query.excluded_set())
        .roles()
        .next()
    {
        return AccessDenied::ExcludedRole(role);
    }

    let mode = query.match_mode();
    if !satisfies(ctx.roles, query.role_set(), mode) {
        return AccessDenied::MissingRoles(query.role_set().difference(ctx.roles));
    }
    if !satisfies(ctx.permissions, query.permission_set(), mode) {
        return AccessDenied::MissingPermissions(query.permission_set().difference(ctx.permissions));
    }
    if !satisfies(resolve_features(ctx.roles), query.feature_set(), Match::Any) {
        return AccessDenied::MissingFeature(query.features.clone());
    }
    match query.min_role_level {
        Some(required) if !meets_min_level(ctx.roles, required) => AccessDenied::InsufficientLevel {
            required,
            actual: effective_level(ctx.roles),
        },
        _ => AccessDenied::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{resolve_permissions, Feature, Permission, PermissionSet, Role, RoleSet};

    fn strict() -> Authorizer {
        Authorizer::from_config(&AuthzConfig::default_for_test()).unwrap()
    }

    /// Client snapshot that claims an admin-only permission.
    fn stale_client() -> AuthorizationContext {
        AuthorizationContext::new(
            true,
            RoleSet::CLIENT_USER,
            PermissionSet::LOAN_VIEW_OWN | PermissionSet::SYSTEM_SETTINGS,
        )
    }

    #[test]
    fn test_roles_source_ignores_stale_permissions() {
        let query = AccessQuery::new().permissions([Permission::SystemSettings]);
        let authz = Authorizer::default();
        assert_eq!(authz.permission_source(), PermissionSource::Roles);
        assert!(!authz.check_access(&stale_client(), &query));
    }

    #[test]
    fn test_snapshot_source_trusts_permissions() {
        let query = AccessQuery::new().permissions([Permission::SystemSettings]);
        let authz = Authorizer::new(PermissionSource::Snapshot, FeatureCatalog::builtin());
        assert!(authz.check_access(&stale_client(), &query));
    }

    #[test]
    fn test_effective_context_derives_from_roles() {
        let ctx = strict().effective_context(&stale_client());
        assert_eq!(ctx.permissions, resolve_permissions(RoleSet::CLIENT_USER));
        assert!(!ctx.permissions.has(PermissionSet::SYSTEM_SETTINGS));
    }

    #[test]
    fn test_policies_through_facade() {
        let authz = strict();
        let manager = AuthorizationContext::for_roles(RoleSet::MANAGER);
        let client = AuthorizationContext::for_roles(RoleSet::CLIENT_USER);

        assert!(authz.allows(&manager, Policy::ViewReports));
        assert!(!authz.allows(&client, Policy::ViewReports));
        assert!(authz.require_policy(&manager, Policy::DecideLoans).is_ok());
    }

    #[test]
    fn test_require_unauthenticated() {
        let err = strict()
            .require(&AuthorizationContext::anonymous(), &AccessQuery::authenticated())
            .unwrap_err();
        assert_eq!(err, AccessDenied::Unauthenticated);
    }

    #[test]
    fn test_require_reports_missing_permissions() {
        let analyst = AuthorizationContext::for_roles(RoleSet::RISK_ANALYST);
        let query = AccessQuery::new()
            .permissions([Permission::RiskView, Permission::RiskConfigure])
            .require_all(true);
        assert_eq!(
            strict().require(&analyst, &query),
            Err(AccessDenied::MissingPermissions(PermissionSet::RISK_CONFIGURE))
        );
    }

    #[test]
    fn test_require_reports_missing_roles() {
        let client = AuthorizationContext::for_roles(RoleSet::CLIENT_USER);
        let query = AccessQuery::new().roles([Role::Administrator, Role::Manager]);
        assert_eq!(
            strict().require(&client, &query),
            Err(AccessDenied::MissingRoles(RoleSet::ADMINISTRATOR | RoleSet::MANAGER))
        );
    }

    #[test]
    fn test_require_or_failure_is_forbidden() {
        let client = AuthorizationContext::for_roles(RoleSet::CLIENT_USER);
        let query = AccessQuery::new()
            .permissions([Permission::UserDelete])
            .roles([Role::Administrator]);
        assert_eq!(strict().require(&client, &query), Err(AccessDenied::Forbidden));
    }

    #[test]
    fn test_require_robust_reasons() {
        let authz = strict();
        let mixed = AuthorizationContext::for_roles(RoleSet::RISK_ANALYST | RoleSet::CLIENT_USER);
        let analyst = AuthorizationContext::for_roles(RoleSet::RISK_ANALYST);

        let excluded = AccessQuery::new()
            .exclude_roles([Role::ClientUser])
            .permissions([Permission::RiskView]);
        assert_eq!(
            authz.require_robust(&mixed, &excluded),
            Err(AccessDenied::ExcludedRole(Role::ClientUser))
        );
        assert!(authz.require_robust(&analyst, &excluded).is_ok());

        let needs_manager = AccessQuery::new().roles([Role::Manager]);
        assert_eq!(
            authz.require_robust(&analyst, &needs_manager),
            Err(AccessDenied::MissingRoles(RoleSet::MANAGER))
        );

        let needs_feature = AccessQuery::new().features([Feature::UserManagement]);
        assert_eq!(
            authz.require_robust(&analyst, &needs_feature),
            Err(AccessDenied::MissingFeature(vec![Feature::UserManagement]))
        );

        let needs_level = AccessQuery::new().min_role_level(4);
        assert_eq!(
            authz.require_robust(&analyst, &needs_level),
            Err(AccessDenied::InsufficientLevel {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_signed_out_admin_is_refused_every_policy() {
        let authz = strict();
        let signed_out = AuthorizationContext {
            is_authenticated: false,
            ..AuthorizationContext::for_roles(RoleSet::ADMINISTRATOR)
        };
        for policy in Policy::all() {
            assert!(!authz.allows(&signed_out, *policy), "{policy}");
            assert_eq!(
                authz.require_policy(&signed_out, *policy),
                Err(AccessDenied::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_fail_open_catalog_by_default() {
        let client = AuthorizationContext::for_roles(RoleSet::CLIENT_USER);
        let authz = Authorizer::default();
        assert!(authz.can_access_feature(&client, "holiday_banner"));
        assert!(!authz.can_access_feature(&client, "system_settings"));
    }

    #[test]
    fn test_deny_policy_refuses_unmapped() {
        let admin = AuthorizationContext::for_roles(RoleSet::ADMINISTRATOR);
        let authz = strict();
        assert!(authz.can_access_feature(&admin, "system_settings"));
        assert_eq!(
            authz.require_feature(&admin, "holiday_banner"),
            Err(AccessDenied::FeatureUnavailable("holiday_banner".into()))
        );
    }
}
