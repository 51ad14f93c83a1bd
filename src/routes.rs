use crate::models::user::Role;

/// The views the session core navigates between.
///
/// The full routing table (request forms, management pages) belongs to the
/// application shell; the core only needs to name the login screen and the
/// per-role dashboards it redirects to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// The public login screen.
    Login,
    /// The student dashboard.
    EstudianteDashboard,
    /// The instructor dashboard.
    DocenteDashboard,
    /// The academic-affairs officer dashboard.
    SubdecanoDashboard,
}

impl Route {
    /// The browser path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::EstudianteDashboard => "/estudiante/dashboard",
            Route::DocenteDashboard => "/docente/dashboard",
            Route::SubdecanoDashboard => "/subdecano/dashboard",
        }
    }

    /// The dashboard route for a role, used for the post-login redirect.
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Estudiante => Route::EstudianteDashboard,
            Role::Docente => Route::DocenteDashboard,
            Role::Subdecano => Route::SubdecanoDashboard,
        }
    }
}
