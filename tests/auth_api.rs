use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use recal_client::{
    ApiClient, AppError, Config, EvidenceService, LoginOutcome, Role, Route, SessionManager,
    SessionState,
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
            ),
        )
        .with_test_writer()
        .try_init();
});

/// A canned-response HTTP server: each incoming request consumes the next
/// queued response. `Connection: close` keeps reqwest from reusing
/// connections, so requests and responses pair up one to one.
async fn spawn_server(responses: Vec<String>) -> String {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let Some(response) = queue.lock().unwrap().pop_front() else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/api", addr)
}

fn json_response(status: &str, body: &serde_json::Value) -> String {
    let body = body.to_string();
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn login_ok(primer_login: bool) -> String {
    json_response(
        "200 OK",
        &serde_json::json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "role": "estudiante",
            "user_id": "abc123",
            "primer_login": primer_login,
        }),
    )
}

/// A client whose navigation requests are captured for assertions.
fn client_with_navigator(base_url: &str) -> (ApiClient, Arc<Mutex<Vec<Route>>>) {
    let navigations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&navigations);
    let client = ApiClient::new(Config::with_backend_url(base_url))
        .unwrap()
        .with_navigator(Arc::new(move |route| {
            sink.lock().unwrap().push(route);
        }));
    (client, navigations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn student_login_redirects_to_student_dashboard() {
        let base_url = spawn_server(vec![login_ok(false)]).await;
        let (client, navigations) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let outcome = manager
            .login("a@blindcheck.edu", "X", Role::Estudiante)
            .await
            .unwrap();

        assert_eq!(outcome, LoginOutcome::LoggedIn(Route::EstudianteDashboard));
        assert!(manager.is_authenticated());
        assert_eq!(client.session_state().user().unwrap().email, "a@blindcheck.edu");
        assert!(navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_server_detail_verbatim() {
        let base_url = spawn_server(vec![json_response(
            "401 Unauthorized",
            &serde_json::json!({ "detail": "Credenciales incorrectas" }),
        )])
        .await;
        let (client, navigations) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let err = manager
            .login("a@blindcheck.edu", "wrong", Role::Estudiante)
            .await
            .unwrap_err();

        match err {
            AppError::Authentication(msg) => assert_eq!(msg, "Credenciales incorrectas"),
            other => panic!("expected an authentication error, got {other:?}"),
        }
        assert!(matches!(client.session_state(), SessionState::Anonymous));
        // Already on the login view: no redirect loop.
        assert!(navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn forced_password_change_finalizes_the_provisional_session() {
        let base_url = spawn_server(vec![
            login_ok(true),
            json_response(
                "200 OK",
                &serde_json::json!({ "message": "Contraseña actualizada exitosamente" }),
            ),
        ])
        .await;
        let (client, _) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let outcome = manager
            .login("a@blindcheck.edu", "temporal", Role::Estudiante)
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::PasswordChangeRequired);
        // Provisional: dashboards stay unreachable until the change completes.
        assert!(!manager.is_authenticated());
        assert!(client.session_state().is_provisional());

        let route = manager.change_password("Abcdef1!", "Abcdef1!").await.unwrap();

        assert_eq!(route, Route::EstudianteDashboard);
        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn unauthorized_call_clears_session_and_redirects_to_login() {
        let base_url = spawn_server(vec![
            login_ok(false),
            json_response(
                "401 Unauthorized",
                &serde_json::json!({ "detail": "Token inválido o expirado" }),
            ),
        ])
        .await;
        let (client, navigations) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        manager
            .login("a@blindcheck.edu", "X", Role::Estudiante)
            .await
            .unwrap();
        client.set_current_route(Route::EstudianteDashboard);

        let evidence = EvidenceService::new(client.clone());
        let err = evidence
            .save_redacted(
                "deadbeef.png",
                &recal_client::models::evidence::EvidenceForm {
                    estudiante_id: "est-1".to_string(),
                    materia_id: "mat-1".to_string(),
                    grupo: "G1".to_string(),
                    aporte: "parcial".to_string(),
                },
                "",
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Authentication(_)));
        // User and credential vanish in the same observable transition.
        let state = client.session_state();
        assert!(state.user().is_none() && state.credential().is_none());
        assert_eq!(*navigations.lock().unwrap(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn restore_session_populates_state_from_the_me_endpoint() {
        let base_url = spawn_server(vec![json_response(
            "200 OK",
            &serde_json::json!({
                "user_id": "abc123",
                "email": "a@blindcheck.edu",
                "role": "subdecano",
            }),
        )])
        .await;
        let (client, _) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let state = manager.restore_session().await;

        assert!(state.is_authenticated());
        assert_eq!(state.user().unwrap().role, Role::Subdecano);
    }

    #[tokio::test]
    async fn restore_session_against_unauthorized_server_ends_anonymous() {
        let base_url = spawn_server(vec![json_response(
            "401 Unauthorized",
            &serde_json::json!({ "detail": "No autenticado" }),
        )])
        .await;
        let (client, navigations) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let state = manager.restore_session().await;

        assert!(matches!(state, SessionState::Anonymous));
        assert!(!manager.is_authenticated());
        // Startup restore happens on the login view: no redirect requested.
        assert!(navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn password_reset_confirmation_is_returned_verbatim() {
        let base_url = spawn_server(vec![json_response(
            "200 OK",
            &serde_json::json!({ "message": "Solicitud enviada al subdecano" }),
        )])
        .await;
        let (client, _) = client_with_navigator(&base_url);
        let manager = SessionManager::new(client.clone());

        let message = manager
            .request_password_reset("a@blindcheck.edu")
            .await
            .unwrap();

        assert_eq!(message, "Solicitud enviada al subdecano");
        assert!(matches!(client.session_state(), SessionState::Anonymous));
    }
}
