//! Error handling for the application layer
//!
//! Views never show raw client errors. Every failed action becomes an
//! [`AppError`] whose `Display` is the text of the inline banner: the
//! backend's own message when it sent one, otherwise the action's fallback
//! ("Failed to create project", "Login failed", ...).
//!
//! # Example
//!
//! ```
//! use tasksphere_app::error::AppError;
//! use tasksphere_client::ClientError;
//!
//! let err = AppError::action("Failed to update task", ClientError::from_status(500, ""));
//! assert_eq!(err.to_string(), "Failed to update task");
//!
//! let err = AppError::action("Login failed", ClientError::from_status(401, "Invalid username or password"));
//! assert_eq!(err.to_string(), "Invalid username or password");
//! ```

use tasksphere_client::ClientError;
use thiserror::Error;

/// Application result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// A user action failed; the message is ready for display
    #[error("{message}")]
    Action {
        message: String,
        #[source]
        source: ClientError,
    },

    /// The view needs a signed-in user
    #[error("Please log in to continue")]
    NotAuthenticated,

    /// Form input failed a local check; nothing was sent
    #[error("{0}")]
    InvalidInput(String),

    /// Client error outside a named action
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AppError {
    /// Wraps a client error with the fallback text for the action
    pub fn action(fallback: &str, source: ClientError) -> Self {
        AppError::Action {
            message: source.user_message(fallback),
            source,
        }
    }

    /// Text for the inline error banner
    pub fn banner(&self) -> String {
        self.to_string()
    }

    /// Whether the failure came from a cancelled call
    pub fn is_cancelled(&self) -> bool {
        match self {
            AppError::Action { source, .. } | AppError::Client(source) => source.is_cancelled(),
            _ => false,
        }
    }
}

/// Attaches an action's fallback message to a client result
pub trait ActionContext<T> {
    fn or_banner(self, fallback: &str) -> AppResult<T>;
}

impl<T> ActionContext<T> for Result<T, ClientError> {
    fn or_banner(self, fallback: &str) -> AppResult<T> {
        self.map_err(|e| AppError::action(fallback, e))
    }
}
