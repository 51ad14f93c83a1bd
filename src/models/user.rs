use serde::{Deserialize, Serialize};

/// The roles served by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student submitting regrade requests.
    Estudiante,
    /// An instructor grading and uploading evidence.
    Docente,
    /// The academic-affairs officer approving requests and managing accounts.
    Subdecano,
}

impl Role {
    /// The wire value used by the login endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Estudiante => "estudiante",
            Role::Docente => "docente",
            Role::Subdecano => "subdecano",
        }
    }
}

/// Represents the signed-in user for the current tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user (opaque backend id).
    pub id: String,
    /// The user's email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
}
