//! Client-side core of the Recalificación (academic regrade) platform:
//! the session/auth lifecycle and the image region-selection (redaction)
//! tool, plus the HTTP plumbing and evidence upload flow they feed.
//!
//! The session is cookie-based: the shared [`client::ApiClient`] keeps the
//! server's HttpOnly cookie in its in-memory cookie store and attaches a
//! bearer token on top when the server issues one. Nothing is persisted to
//! durable storage, and each tab's session is independent by design.

pub mod config;
pub mod error;
pub mod client;
pub mod routes;

pub mod models {
    pub mod user;
    pub mod session;
    pub mod evidence;
}

pub mod services {
    pub mod session;
    pub mod evidence;
}

pub mod validation {
    pub mod auth;
}

pub mod selector;

pub use client::ApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use models::session::SessionState;
pub use models::user::{Role, User};
pub use routes::Route;
pub use selector::{RegionSelector, SelectionRect};
pub use services::evidence::EvidenceService;
pub use services::session::{LoginOutcome, SessionManager};
