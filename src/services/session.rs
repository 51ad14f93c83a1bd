use serde::Deserialize;
use zeroize::Zeroizing;

use crate::{
    client::ApiClient,
    error::{AppError, Result},
    models::session::{Credential, SessionState},
    models::user::{Role, User},
    routes::Route,
    validation::auth::{validate_email, validate_login, validate_new_password},
};

/// The response payload of the login endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    /// Bearer token; absent when the deployment is purely cookie-based.
    pub access_token: Option<String>,
    /// The role the server authenticated the user as.
    pub role: Role,
    /// Opaque backend id of the user.
    pub user_id: String,
    /// Whether this is the user's first login, forcing a password change.
    #[serde(default)]
    pub primer_login: bool,
}

/// The response payload of the "who am I" endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MeResponse {
    #[serde(alias = "id")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

/// A human-readable confirmation from the server.
#[derive(Clone, Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// What the login screen should do after a successful login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Fully authenticated: navigate to the role's dashboard.
    LoggedIn(Route),
    /// Provisional session: render the forced password-change flow before any
    /// other navigation.
    PasswordChangeRequired,
}

/// Computes the session transition for a successful login response.
///
/// `primer_login = true` yields a provisional session whose credential is
/// usable only for the forced password change; otherwise the session becomes
/// fully authenticated and the caller redirects to the role's dashboard.
pub fn apply_login(response: &LoginResponse, email: &str) -> (SessionState, LoginOutcome) {
    let user = User {
        id: response.user_id.clone(),
        email: email.to_string(),
        role: response.role,
    };
    let credential = response.access_token.clone().map(Credential::new);

    if response.primer_login {
        (
            SessionState::Provisional { user, credential },
            LoginOutcome::PasswordChangeRequired,
        )
    } else {
        let route = Route::dashboard_for(user.role);
        (
            SessionState::Authenticated { user, credential },
            LoginOutcome::LoggedIn(route),
        )
    }
}

/// Promotes a provisional session to a fully authenticated one after the
/// forced password change succeeded.
///
/// An already-authenticated session passes through unchanged; an anonymous
/// one is an authorization failure.
pub fn finalize_provisional(state: SessionState) -> Result<(SessionState, Route)> {
    match state {
        SessionState::Provisional { user, credential }
        | SessionState::Authenticated { user, credential } => {
            let route = Route::dashboard_for(user.role);
            Ok((SessionState::Authenticated { user, credential }, route))
        }
        SessionState::Anonymous => Err(AppError::Unauthorized),
    }
}

/// Single source of truth for "who is logged in" and "what credential to
/// attach to outgoing requests".
///
/// All session mutations go through this service; the shared state itself
/// lives in the [`ApiClient`] so every component observes the same swap.
#[derive(Clone)]
pub struct SessionManager {
    client: ApiClient,
}

impl SessionManager {
    /// Creates a new `SessionManager` over the shared API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns a snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.client.session_state()
    }

    /// Whether dashboards are currently reachable.
    pub fn is_authenticated(&self) -> bool {
        self.client.session_state().is_authenticated()
    }

    /// Submits the login form to the identity endpoint.
    ///
    /// # Arguments
    ///
    /// * `email` - The user's email address.
    /// * `password` - The user's password.
    /// * `role` - The role the user is signing in as.
    ///
    /// # Returns
    ///
    /// A `Result` containing the [`LoginOutcome`]. Server rejections surface
    /// their text verbatim; transport failures leave the session untouched.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<LoginOutcome> {
        validate_login(email, password)?;

        tracing::info!("🔐 Login attempt - email: {} role: {}", email, role.as_str());

        let password = Zeroizing::new(password.to_string());
        let body = serde_json::json!({
            "email": email,
            "password": password.as_str(),
            "role": role.as_str(),
        });

        let response = self.client.send(self.client.post("/auth/login").json(&body)).await?;
        let login: LoginResponse = self.client.expect_json(response).await?;

        let (state, outcome) = apply_login(&login, email);
        self.client.set_session(state);

        match &outcome {
            LoginOutcome::PasswordChangeRequired => {
                tracing::info!("🔒 First login for {} - password change required", login.user_id);
            }
            LoginOutcome::LoggedIn(route) => {
                tracing::info!("✅ User logged in: {} -> {}", login.user_id, route.path());
            }
        }

        Ok(outcome)
    }

    /// Performs the forced first-login password change.
    ///
    /// The new password is validated locally against the platform policy
    /// before any network call. On server success the provisional session
    /// finalizes into a fully authenticated one.
    ///
    /// # Arguments
    ///
    /// * `new_password` - The new password.
    /// * `confirm` - The confirmation the user retyped.
    ///
    /// # Returns
    ///
    /// A `Result` containing the dashboard route to navigate to.
    pub async fn change_password(&self, new_password: &str, confirm: &str) -> Result<Route> {
        validate_new_password(new_password, confirm)?;

        let state = self.client.session_state();
        let Some(user_id) = state.user().map(|u| u.id.clone()) else {
            return Err(AppError::Unauthorized);
        };

        tracing::info!("🔑 Changing password for user: {}", user_id);

        let new_password = Zeroizing::new(new_password.to_string());
        let body = serde_json::json!({ "password_nueva": new_password.as_str() });

        let response = self
            .client
            .send(self.client.post("/auth/cambiar-password-forzado").json(&body))
            .await?;
        let _: MessageResponse = self.client.expect_json(response).await?;

        let (state, route) = finalize_provisional(self.client.session_state())?;
        self.client.set_session(state);

        tracing::info!("✅ Password changed for user: {} -> {}", user_id, route.path());

        Ok(route)
    }

    /// Asks an administrator for a password reset.
    ///
    /// Fire-and-forget: never mutates session state. The server's
    /// confirmation text is returned verbatim.
    pub async fn request_password_reset(&self, email: &str) -> Result<String> {
        validate_email(email)?;

        tracing::info!("🔑 Password reset requested for: {}", email);

        let body = serde_json::json!({ "email": email });
        let response = self
            .client
            .send(self.client.post("/auth/solicitar-reset-password").json(&body))
            .await?;
        let confirmation: MessageResponse = self.client.expect_json(response).await?;

        Ok(confirmation.message)
    }

    /// Restores the session at application start by validating any existing
    /// cookie against the "who am I" endpoint.
    ///
    /// Restoration never leaves the session indeterminate: any failure,
    /// including a transport error, clears it to anonymous.
    pub async fn restore_session(&self) -> SessionState {
        tracing::debug!("🔄 Restoring session...");

        match self.try_restore().await {
            Ok(user) => {
                tracing::info!("✅ Session restored for user: {}", user.id);
                self.client.set_session(SessionState::Authenticated {
                    user,
                    credential: None,
                });
            }
            Err(e) => {
                tracing::debug!("Session restore failed: {}", e);
                self.client.set_session(SessionState::Anonymous);
            }
        }

        self.client.session_state()
    }

    async fn try_restore(&self) -> Result<User> {
        let response = self.client.send(self.client.get("/auth/me")).await?;
        let me: MeResponse = self.client.expect_json(response).await?;
        Ok(User {
            id: me.user_id,
            email: me.email,
            role: me.role,
        })
    }

    /// Logs out: best-effort server notification, then unconditional local
    /// clear. Never blocks on a network failure.
    pub async fn logout(&self) {
        let user_id = self.client.session_state().user().map(|u| u.id.clone());
        tracing::info!("👋 Logout for user: {:?}", user_id);

        if let Err(e) = self.client.send(self.client.post("/auth/logout")).await {
            tracing::warn!("Logout request failed (clearing locally anyway): {}", e);
        }

        self.client.set_session(SessionState::Anonymous);
        tracing::info!("✅ Session cleared");
    }
}
