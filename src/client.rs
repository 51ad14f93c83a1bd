use std::sync::{Arc, RwLock};

use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::session::SessionState,
    routes::Route,
};

/// Callback invoked when the core requests navigation to another view.
pub type Navigator = Arc<dyn Fn(Route) + Send + Sync>;

/// The HTTP client shared by every component in the tab.
///
/// Session transport is cookie-based: the underlying `reqwest` client keeps
/// the server's HttpOnly session cookie in its in-memory cookie store. When
/// the session store additionally holds a bearer token, it is attached as an
/// `Authorization` header on every request. Only the session service mutates
/// the session state; everything else reads it through [`ApiClient::session_state`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    session: Arc<RwLock<SessionState>>,
    current_route: Arc<RwLock<Route>>,
    navigator: Option<Navigator>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiClient`.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.http_timeout)
            .build()?;

        tracing::info!("✅ API client initialized for {}", config.backend_url);

        Ok(Self {
            http,
            config,
            session: Arc::new(RwLock::new(SessionState::Anonymous)),
            current_route: Arc::new(RwLock::new(Route::Login)),
            navigator: None,
        })
    }

    /// Registers the callback the core uses to request navigation.
    pub fn with_navigator(mut self, navigator: Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Returns a snapshot of the current session state.
    pub fn session_state(&self) -> SessionState {
        self.session.read().expect("session lock poisoned").clone()
    }

    /// Replaces the session state in a single swap.
    ///
    /// User identity and credential always travel inside the same variant, so
    /// no observer can see one cleared without the other.
    pub(crate) fn set_session(&self, state: SessionState) {
        *self.session.write().expect("session lock poisoned") = state;
    }

    /// The view the application shell currently displays.
    pub fn current_route(&self) -> Route {
        *self.current_route.read().expect("route lock poisoned")
    }

    /// Records the view the application shell navigated to.
    pub fn set_current_route(&self, route: Route) {
        *self.current_route.write().expect("route lock poisoned") = route;
    }

    /// The base URL of the backend API.
    pub fn backend_url(&self) -> &str {
        &self.config.backend_url
    }

    /// Builds a GET request for the given API path, with credentials attached.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    /// Builds a POST request for the given API path, with credentials attached.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    /// Builds a GET request for an absolute URL (e.g. a preview image served
    /// outside the API prefix), with credentials attached.
    pub fn get_url(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.backend_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self
            .session
            .read()
            .expect("session lock poisoned")
            .credential()
            .map(|c| c.token().to_string());

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and applies the global authorization gate.
    ///
    /// A 401 from the server clears the session in the same atomic swap as an
    /// explicit logout and requests navigation to the login screen - unless
    /// the current view already is the login screen, to avoid redirect loops.
    /// The server's rejection text, when present, is surfaced verbatim.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            let detail = Self::extract_detail(response).await;
            return Err(match detail {
                Some(detail) => AppError::Authentication(detail),
                None => AppError::Unauthorized,
            });
        }

        Ok(response)
    }

    /// Decodes a successful response as JSON, or maps the server's rejection
    /// into an `AppError` with the `detail` text surfaced verbatim.
    pub async fn expect_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let detail = Self::extract_detail(response).await;
        Err(match status {
            StatusCode::NOT_FOUND => AppError::NotFound,
            _ => AppError::Api(detail.unwrap_or_else(|| format!("HTTP {}", status))),
        })
    }

    /// Clears the session and requests the login view.
    fn handle_unauthorized(&self) {
        tracing::warn!("❌ 401 received - clearing session");
        self.set_session(SessionState::Anonymous);

        if self.current_route() != Route::Login {
            if let Some(ref navigate) = self.navigator {
                tracing::info!("➡️ Redirecting to {}", Route::Login.path());
                navigate(Route::Login);
            }
        }
    }

    /// Extracts the `detail` field the backend places in rejection bodies.
    async fn extract_detail(response: reqwest::Response) -> Option<String> {
        let body: serde_json::Value = response.json().await.ok()?;
        body.get("detail")
            .and_then(|d| d.as_str())
            .map(str::to_string)
    }
}
