//! View routes
//!
//! Maps paths to views and runs the route guard in front of protected ones.
//!
//! ```text
//! /login       public
//! /register    public
//! /dashboard   guarded
//! /projects    guarded
//! /tasks       guarded
//! /profile     guarded
//! /, anything else -> /dashboard
//! ```

use std::fmt;

use tasksphere_client::guard::{GuardDecision, RouteGuard, LOGIN_PATH};
use tasksphere_client::session::Session;

/// A navigable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Projects,
    Tasks,
    Profile,
}

impl Route {
    /// Links shown in the navbar for a signed-in user
    pub const MAIN: [Route; 3] = [Route::Dashboard, Route::Projects, Route::Tasks];

    /// Resolves a path; `/` and unknown paths land on the dashboard
    pub fn resolve(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/projects" => Route::Projects,
            "/tasks" => Route::Tasks,
            "/profile" => Route::Profile,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Projects => "/projects",
            Route::Tasks => "/tasks",
            Route::Profile => "/profile",
        }
    }

    /// Navbar label
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Projects => "Projects",
            Route::Tasks => "Tasks",
            Route::Profile => "Profile",
        }
    }

    /// Whether the view requires an authenticated session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of navigating to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the view
    Render(Route),

    /// Session still being validated; show a loading indicator for the view
    Loading(Route),

    /// Show `to` instead of the requested view
    Redirect { from: Route, to: Route },
}

impl Navigation {
    /// Route that ends up on screen
    pub fn route(&self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Loading(route) => *route,
            Navigation::Redirect { to, .. } => *to,
        }
    }
}

/// Resolves `path` and applies the guard for the current session
pub fn navigate(session: &Session, path: &str) -> Navigation {
    let route = Route::resolve(path);

    if !route.is_protected() {
        return Navigation::Render(route);
    }

    match RouteGuard::decide(session) {
        GuardDecision::Render => Navigation::Render(route),
        GuardDecision::Loading => Navigation::Loading(route),
        GuardDecision::Redirect(target) => {
            tracing::debug!(from = route.path(), to = target, "Redirecting anonymous visitor");
            Navigation::Redirect {
                from: route,
                to: Route::resolve(target),
            }
        }
    }
}

/// Where logout sends the user
pub fn after_logout() -> Route {
    Route::resolve(LOGIN_PATH)
}
