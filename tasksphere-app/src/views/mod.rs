//! Text views
//!
//! Views are stateless renderers over store snapshots plus the actions their
//! forms and buttons trigger. Every action surfaces failures as an
//! [`AppError`](crate::error::AppError) whose text is the inline banner.
//!
//! - `auth`: login, register, logout
//! - `dashboard`: counters and recent items
//! - `projects`: project table and form actions
//! - `tasks`: task table with "My Tasks" / "Assigned to Me" tabs
//! - `profile`: profile panel
//! - `navbar`: navigation bar
//! - `format`: chip colors, dates, tables

pub mod auth;
pub mod dashboard;
pub mod format;
pub mod navbar;
pub mod profile;
pub mod projects;
pub mod tasks;

use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::error::AppResult;
use crate::routes::{navigate, Navigation, Route};

/// Shown while a store or the session is loading
pub const LOADING_TEXT: &str = "Loading...";

/// Navigates to `path`, loads what the view needs and renders it with the navbar
///
/// Redirects are followed once, so an anonymous visitor asking for a guarded
/// view gets the login page.
pub async fn open(state: &AppState, path: &str, cancel: &CancellationToken) -> AppResult<String> {
    let session = state.session.snapshot();
    let navigation = navigate(&session, path);
    let route = navigation.route();

    let body = match navigation {
        Navigation::Loading(_) => LOADING_TEXT.to_string(),
        Navigation::Redirect { .. } | Navigation::Render(_) => match route {
            Route::Dashboard => {
                dashboard::load(state, cancel).await?;
                dashboard::render(state)
            }
            Route::Projects => {
                projects::load(state, cancel).await?;
                projects::render(state)
            }
            Route::Tasks => {
                tasks::load(state, tasks::TaskTab::default(), cancel).await?;
                tasks::render(state, tasks::TaskTab::default())
            }
            Route::Profile => profile::render(state),
            Route::Login => "Sign in with `login <username>`".to_string(),
            Route::Register => "Create an account with `register <username> <email>`".to_string(),
        },
    };

    Ok(format!("{}\n\n{}", navbar::render(&session, route), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::Arc;
    use tasksphere_client::transport::StubTransport;
    use tasksphere_shared::auth::token_store::MemoryTokenStore;

    #[tokio::test]
    async fn test_anonymous_dashboard_shows_login() {
        let stub = Arc::new(StubTransport::new());
        let state = AppState::new(
            Config::from_lookup(|_| None).unwrap(),
            stub.clone(),
            Arc::new(MemoryTokenStore::new()),
        );
        state.session.initialize(&CancellationToken::new()).await.unwrap();

        let text = open(&state, "/dashboard", &CancellationToken::new()).await.unwrap();

        assert!(text.contains("[Login]"));
        assert!(text.contains("Sign in"));
        assert_eq!(stub.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session_shows_loading() {
        let state = AppState::new(
            Config::from_lookup(|_| None).unwrap(),
            Arc::new(StubTransport::new()),
            Arc::new(MemoryTokenStore::new()),
        );

        let text = open(&state, "/tasks", &CancellationToken::new()).await.unwrap();
        assert!(text.ends_with(LOADING_TEXT));
    }
}
