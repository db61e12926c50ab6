//! User record types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::AuthorizationContext;

/// User as described by the auth session (token claims).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// User ID.
    pub id: Uuid,
    /// Username (unique).
    pub username: String,
    /// Role spellings as issued by the identity service.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether MFA is enabled.
    #[serde(default)]
    pub mfa_enabled: bool,
}

impl SessionUser {
    /// Authorization snapshot for this user.
    ///
    /// Role spellings are normalized; permissions are resolved from roles.
    #[must_use]
    pub fn authorization_context(&self, is_authenticated: bool) -> AuthorizationContext {
        AuthorizationContext::from_backend_roles(
            is_authenticated,
            self.roles.iter().map(String::as_str),
        )
    }
}

/// User as described by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: Option<String>,
}

/// The two independently maintained views of the current user.
///
/// Either side may be absent; that is an expected transient state, e.g.
/// right after sign-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPair<'a> {
    pub session_user: Option<&'a SessionUser>,
    pub profile_user: Option<&'a ProfileUser>,
}

impl<'a> IdentityPair<'a> {
    #[must_use]
    pub const fn new(
        session_user: Option<&'a SessionUser>,
        profile_user: Option<&'a ProfileUser>,
    ) -> Self {
        Self {
            session_user,
            profile_user,
        }
    }
}
