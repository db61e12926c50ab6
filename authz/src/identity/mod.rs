//! Current-user identity records and their consistency.
//!
//! The session layer and the profile store each keep their own record of
//! who is signed in. This module classifies disagreements between the two
//! and models the session lifecycle that produces the authentication bit.

pub mod consistency;
pub mod session;
pub mod types;

pub use consistency::{audit_identity, check_identity_consistency, ConsistencyReport, SyncAction};
pub use session::{SessionEvent, SessionState, TempCredential};
pub use types::{IdentityPair, ProfileUser, SessionUser};
