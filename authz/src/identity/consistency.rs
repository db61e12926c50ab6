//! Ghost-state detection between the session and profile records.
//!
//! The checker only classifies; it never mutates either record. A separate
//! synchronization routine acts on [`ConsistencyReport::recommended_action`].

use serde::Serialize;
use tracing::warn;

use super::types::IdentityPair;

/// Classification of an [`IdentityPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    /// Profile present without a session.
    pub ghost_user: bool,
    /// Session present without a profile.
    pub ghost_auth: bool,
    /// Both present or both absent.
    pub states_in_sync: bool,
    /// Session present while the session layer reports unauthenticated.
    pub auth_without_authentication: bool,
    pub should_clear_user: bool,
    pub should_set_user: bool,
    /// Both present with different user IDs.
    pub should_sync: bool,
}

/// Corrective action for the synchronization routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Nothing to do.
    None,
    /// Drop the stale profile record.
    ClearProfile,
    /// Populate the profile from the session.
    SetProfileFromSession,
    /// Reload the profile for the session's user.
    ResyncProfile,
}

impl ConsistencyReport {
    /// Whether no corrective action and no warning applies.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.states_in_sync && !self.should_sync && !self.auth_without_authentication
    }

    /// The single action that resolves this report.
    #[must_use]
    pub const fn recommended_action(&self) -> SyncAction {
        if self.should_clear_user {
            SyncAction::ClearProfile
        } else if self.should_set_user {
            SyncAction::SetProfileFromSession
        } else if self.should_sync {
            SyncAction::ResyncProfile
        } else {
            SyncAction::None
        }
    }
}

/// Classify an identity pair.
///
/// Total over every presence combination: exactly one of `ghost_user`,
/// `ghost_auth` and `states_in_sync` is set.
pub fn check_identity_consistency(pair: IdentityPair<'_>, is_authenticated: bool) -> ConsistencyReport {
    let has_session = pair.session_user.is_some();
    let has_profile = pair.profile_user.is_some();

    let ids_differ = match (pair.session_user, pair.profile_user) {
        (Some(session), Some(profile)) => session.id != profile.id,
        _ => false,
    };

    ConsistencyReport {
        ghost_user: has_profile && !has_session,
        ghost_auth: has_session && !has_profile,
        states_in_sync: has_session == has_profile,
        auth_without_authentication: has_session && !is_authenticated,
        should_clear_user: !has_session && has_profile,
        should_set_user: has_session && !has_profile,
        should_sync: ids_differ,
    }
}

/// [`check_identity_consistency`], warning when the records disagree.
pub fn audit_identity(pair: IdentityPair<'_>, is_authenticated: bool) -> ConsistencyReport {
    let report = check_identity_consistency(pair, is_authenticated);
    if !report.is_consistent() {
        warn!(
            ghost_user = report.ghost_user,
            ghost_auth = report.ghost_auth,
            auth_without_authentication = report.auth_without_authentication,
            should_sync = report.should_sync,
            action = ?report.recommended_action(),
            "Identity records out of sync"
        );
    }
    report
}
