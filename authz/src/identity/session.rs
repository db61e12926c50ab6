//! Session lifecycle.
//!
//! `Unauthenticated → AwaitingMfa → LimitedAccess → FullyAuthenticated`,
//! back to `Unauthenticated` on logout. Transition triggers come from the
//! session layer; this module only computes the next state and the
//! authentication bit of the resulting snapshot.

use chrono::{DateTime, Utc};

use super::types::SessionUser;
use crate::permissions::{AuthorizationContext, PermissionSet, RoleSet};

/// Short-lived credential issued while an MFA challenge is pending.
///
/// Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct TempCredential(String);

impl TempCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TempCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TempCredential([redacted])")
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// Password accepted, second factor pending.
    AwaitingMfa {
        temp_credential: TempCredential,
        expires_at: DateTime<Utc>,
        /// Whether the account already has an authenticator enrolled.
        mfa_enrolled: bool,
    },
    /// Signed in but restricted.
    ///
    /// `requires_mfa_setup` is set when an authenticator must be enrolled
    /// before full access; otherwise a second-factor challenge is still due.
    LimitedAccess { requires_mfa_setup: bool },
    FullyAuthenticated,
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials accepted.
    SignedIn { mfa_required: bool, mfa_enrolled: bool },
    /// Second factor challenge issued. An account without an enrolled
    /// authenticator is challenged through a fallback channel.
    MfaChallengeIssued {
        temp_credential: TempCredential,
        expires_at: DateTime<Utc>,
        mfa_enrolled: bool,
    },
    MfaVerified,
    MfaFailed,
    MfaEnrolled,
    TokenRefreshFailed,
    LoggedOut,
}

impl SessionState {
    /// Compute the state after `event` at time `now`.
    ///
    /// Events that do not apply to the current state leave it unchanged,
    /// except that an expired MFA challenge always falls back to
    /// `Unauthenticated`.
    #[must_use]
    pub fn apply(self, event: SessionEvent, now: DateTime<Utc>) -> Self {
        if self.is_expired(now) {
            return match event {
                // A new sign-in may start over from scratch.
                SessionEvent::SignedIn { .. } | SessionEvent::MfaChallengeIssued { .. } => {
                    Self::Unauthenticated.apply(event, now)
                }
                _ => Self::Unauthenticated,
            };
        }

        match (self, event) {
            (_, SessionEvent::LoggedOut | SessionEvent::TokenRefreshFailed) => {
                Self::Unauthenticated
            }

            (
                Self::Unauthenticated,
                SessionEvent::SignedIn {
                    mfa_required,
                    mfa_enrolled,
                },
            ) => {
                if mfa_required {
                    Self::LimitedAccess {
                        requires_mfa_setup: !mfa_enrolled,
                    }
                } else {
                    Self::FullyAuthenticated
                }
            }

            (
                Self::Unauthenticated | Self::LimitedAccess { .. },
                SessionEvent::MfaChallengeIssued {
                    temp_credential,
                    expires_at,
                    mfa_enrolled,
                },
            ) => Self::AwaitingMfa {
                temp_credential,
                expires_at,
                mfa_enrolled,
            },

            (Self::AwaitingMfa { mfa_enrolled: true, .. }, SessionEvent::MfaVerified) => {
                Self::FullyAuthenticated
            }
            (Self::AwaitingMfa { mfa_enrolled: false, .. }, SessionEvent::MfaVerified) => {
                Self::LimitedAccess {
                    requires_mfa_setup: true,
                }
            }

            (
                Self::LimitedAccess {
                    requires_mfa_setup: true,
                },
                SessionEvent::MfaEnrolled,
            ) => Self::FullyAuthenticated,

            (state, _) => state,
        }
    }

    /// Whether a pending MFA challenge has run out.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self, Self::AwaitingMfa { expires_at, .. } if *expires_at <= now)
    }

    /// Whether the session counts as signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::LimitedAccess { .. } | Self::FullyAuthenticated)
    }

    /// Whether role-derived permissions apply.
    #[must_use]
    pub const fn allows_full_access(&self) -> bool {
        matches!(self, Self::FullyAuthenticated)
    }

    /// Authorization snapshot for this state.
    ///
    /// Only a fully authenticated session carries the user's roles; limited
    /// access is authenticated but powerless.
    #[must_use]
    pub fn authorization_context(&self, user: Option<&SessionUser>) -> AuthorizationContext {
        match (self, user) {
            (Self::FullyAuthenticated, Some(user)) => user.authorization_context(true),
            _ if self.is_authenticated() => {
                AuthorizationContext::new(true, RoleSet::empty(), PermissionSet::empty())
            }
            _ => AuthorizationContext::anonymous(),
        }
    }
}
