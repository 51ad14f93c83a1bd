use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::models::user::User;

/// The bearer credential for the current tab.
///
/// Held exclusively in memory for the lifetime of the session store and wiped
/// on drop; it is never written to durable storage. The HttpOnly session
/// cookie held by the HTTP client's cookie store is the primary transport —
/// this token, when the server returns one, rides along as an
/// `Authorization: Bearer` header.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    /// The raw token for the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the token itself.
        f.debug_struct("Credential").finish_non_exhaustive()
    }
}

/// The authentication state of the current tab.
///
/// The user identity and the credential live inside the same variant, so they
/// are set and cleared together in a single swap: no observer can ever see a
/// user without its credential or vice versa.
#[derive(Clone, Debug, Default)]
pub enum SessionState {
    /// No session. Also the initial state before `restore_session` resolves.
    #[default]
    Anonymous,
    /// Logged in with `primer_login = true`: the credential is usable only for
    /// the forced password change, and dashboards must stay unreachable.
    Provisional {
        user: User,
        credential: Option<Credential>,
    },
    /// Fully authenticated. The credential is `None` when the deployment
    /// relies purely on the session cookie.
    Authenticated {
        user: User,
        credential: Option<Credential>,
    },
}

impl SessionState {
    /// Whether dashboards and role-scoped endpoints are reachable.
    ///
    /// A provisional session is NOT authenticated: it stays locked to the
    /// password-change endpoint until the forced change completes.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// Whether a forced first-login password change is pending.
    pub fn is_provisional(&self) -> bool {
        matches!(self, SessionState::Provisional { .. })
    }

    /// The signed-in user, if any (provisional included).
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Provisional { user, .. } | SessionState::Authenticated { user, .. } => {
                Some(user)
            }
        }
    }

    /// The bearer credential to attach to outgoing requests, if any.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Provisional { credential, .. }
            | SessionState::Authenticated { credential, .. } => credential.as_ref(),
        }
    }
}
