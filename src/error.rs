use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A transport-level HTTP error (connection refused, timeout, DNS).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON decoding error on a response body.
    #[error("JSON format error: {0}")]
    Json(#[from] serde_json::Error),

    /// An authentication error (bad credentials, disabled account).
    /// Carries the server's rejection text verbatim.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An authorization failure (HTTP 401 on an authenticated call).
    /// Terminal for the session: the caller must re-authenticate.
    #[error("Authorization failed")]
    Unauthorized,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A validation error, caught locally before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A server-rejected operation with a user-facing detail message.
    #[error("API error: {0}")]
    Api(String),

    /// An image decoding error in the region selector.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Returns the message to show the user for this error.
    ///
    /// Authentication, validation and API errors surface their text verbatim;
    /// transport and internal failures collapse to generic messages so server
    /// internals never leak into the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(e) => {
                tracing::error!("HTTP transport error: {}", e);
                "Error de conexión. Intenta nuevamente.".to_string()
            }

            AppError::Json(e) => {
                tracing::error!("JSON decode error: {}", e);
                "Respuesta inesperada del servidor.".to_string()
            }

            AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg.clone()
            }

            AppError::Unauthorized => {
                tracing::warn!("Authorization failed");
                "Tu sesión ha expirado. Inicia sesión nuevamente.".to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                "Recurso no encontrado.".to_string()
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::Api(msg) => {
                tracing::warn!("API error: {}", msg);
                msg.clone()
            }

            AppError::Image(e) => {
                tracing::error!("Image decode error: {}", e);
                "No se pudo cargar la imagen.".to_string()
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Error interno.".to_string()
            }
        }
    }

    /// Whether the failed operation may simply be retried by the user.
    ///
    /// Transport failures are retryable and leave session state untouched;
    /// a 401 is terminal for the session and requires re-authentication.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::Json(_))
    }
}
