use recal_client::services::session::{apply_login, finalize_provisional, LoginResponse};
use recal_client::{ApiClient, Config, LoginOutcome, Role, Route, SessionManager, SessionState};

/// A backend URL nothing listens on, so every network call fails at the
/// transport level immediately.
fn unreachable_client() -> ApiClient {
    ApiClient::new(Config::with_backend_url("http://127.0.0.1:9/api")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response(primer_login: bool) -> LoginResponse {
        serde_json::from_value(serde_json::json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "role": "estudiante",
            "user_id": "abc123",
            "primer_login": primer_login,
        }))
        .unwrap()
    }

    #[test]
    fn login_without_forced_change_authenticates_and_routes_to_dashboard() {
        let (state, outcome) = apply_login(&login_response(false), "a@blindcheck.edu");

        assert!(state.is_authenticated());
        assert!(!state.is_provisional());
        let user = state.user().unwrap();
        assert_eq!(user.id, "abc123");
        assert_eq!(user.email, "a@blindcheck.edu");
        assert_eq!(user.role, Role::Estudiante);
        assert_eq!(state.credential().unwrap().token(), "tok-123");

        assert_eq!(
            outcome,
            LoginOutcome::LoggedIn(Route::EstudianteDashboard)
        );
        assert_eq!(
            match outcome {
                LoginOutcome::LoggedIn(route) => route.path(),
                LoginOutcome::PasswordChangeRequired => unreachable!(),
            },
            "/estudiante/dashboard"
        );
    }

    #[test]
    fn first_login_yields_provisional_session_not_authenticated() {
        let (state, outcome) = apply_login(&login_response(true), "a@blindcheck.edu");

        // The credential exists but dashboards must stay unreachable until
        // the forced password change completes.
        assert!(!state.is_authenticated());
        assert!(state.is_provisional());
        assert!(state.credential().is_some());
        assert_eq!(outcome, LoginOutcome::PasswordChangeRequired);
    }

    #[test]
    fn finalizing_provisional_session_authenticates_and_keeps_identity() {
        let (provisional, _) = apply_login(&login_response(true), "a@blindcheck.edu");

        let (state, route) = finalize_provisional(provisional).unwrap();

        assert!(state.is_authenticated());
        assert_eq!(state.user().unwrap().id, "abc123");
        assert_eq!(state.credential().unwrap().token(), "tok-123");
        assert_eq!(route, Route::EstudianteDashboard);
    }

    #[test]
    fn finalizing_anonymous_session_is_an_authorization_failure() {
        assert!(finalize_provisional(SessionState::Anonymous).is_err());
    }

    #[test]
    fn clearing_a_session_removes_user_and_credential_together() {
        let (mut state, _) = apply_login(&login_response(false), "a@blindcheck.edu");
        assert!(state.user().is_some() && state.credential().is_some());

        // The transition is a single enum swap: there is no representable
        // intermediate with one of the two cleared.
        state = SessionState::Anonymous;
        assert!(state.user().is_none());
        assert!(state.credential().is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn login_response_without_token_still_parses() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "role": "docente",
            "user_id": "d1",
        }))
        .unwrap();

        assert!(response.access_token.is_none());
        assert!(!response.primer_login);

        let (state, outcome) = apply_login(&response, "d@blindcheck.edu");
        assert!(state.is_authenticated());
        assert!(state.credential().is_none());
        assert_eq!(outcome, LoginOutcome::LoggedIn(Route::DocenteDashboard));
    }

    #[test]
    fn dashboard_routes_cover_every_role() {
        assert_eq!(Route::dashboard_for(Role::Estudiante).path(), "/estudiante/dashboard");
        assert_eq!(Route::dashboard_for(Role::Docente).path(), "/docente/dashboard");
        assert_eq!(Route::dashboard_for(Role::Subdecano).path(), "/subdecano/dashboard");
    }

    #[tokio::test]
    async fn transport_failure_during_login_leaves_session_untouched() {
        let client = unreachable_client();
        let manager = SessionManager::new(client.clone());

        let result = manager
            .login("a@blindcheck.edu", "Abcdef1!", Role::Estudiante)
            .await;

        let err = result.unwrap_err();
        assert!(err.is_retryable(), "transport failures must be retryable");
        assert!(matches!(client.session_state(), SessionState::Anonymous));
    }

    #[tokio::test]
    async fn invalid_login_form_is_rejected_before_any_network_call() {
        let manager = SessionManager::new(unreachable_client());

        // An unreachable backend would surface a transport error; a
        // validation error proves the form never left the client.
        let err = manager
            .login("not-an-email", "whatever", Role::Estudiante)
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(err, recal_client::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn short_password_change_is_rejected_locally() {
        let manager = SessionManager::new(unreachable_client());

        let err = manager.change_password("abc1234", "abc1234").await.unwrap_err();
        assert!(matches!(err, recal_client::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn restore_session_clears_state_on_any_failure() {
        let client = unreachable_client();
        let manager = SessionManager::new(client.clone());

        let state = manager.restore_session().await;

        // Restoration must never leave the session indeterminate.
        assert!(matches!(state, SessionState::Anonymous));
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_the_server_is_unreachable() {
        let client = unreachable_client();
        let manager = SessionManager::new(client.clone());

        manager.logout().await;

        assert!(matches!(client.session_state(), SessionState::Anonymous));
    }
}
