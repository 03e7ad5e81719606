//! Login, register and logout actions
//!
//! Each action returns the route to show next.

use tasksphere_shared::models::user::RegisterRequest;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::error::{ActionContext, AppResult};
use crate::routes::{after_logout, Route};

/// Signs in; lands on the dashboard
pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
    cancel: &CancellationToken,
) -> AppResult<Route> {
    state
        .session
        .login(username, password, cancel)
        .await
        .or_banner("Login failed")?;
    Ok(Route::Dashboard)
}

/// Creates an account; the user still has to log in
pub async fn register(
    state: &AppState,
    request: &RegisterRequest,
    cancel: &CancellationToken,
) -> AppResult<Route> {
    state
        .session
        .register(request, cancel)
        .await
        .or_banner("Registration failed")?;
    Ok(Route::Login)
}

/// Ends the session; lands on the login page
pub fn logout(state: &AppState) -> Route {
    state.session.logout();
    after_logout()
}
