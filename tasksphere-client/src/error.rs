//! Client error taxonomy
//!
//! Every store operation returns `ClientResult<T>`. The variants follow the
//! three failure classes the UI distinguishes:
//!
//! - authentication failures (`Unauthorized`) which may force a logout,
//! - rejected mutations (`Rejected`, `NotFound`, `Validation`) shown inline,
//! - read and transport failures, which leave state untouched.
//!
//! The backend's error body is kept as the message when it is non-empty, so
//! the UI can show exactly what the server said and fall back to a generic
//! line otherwise (see [`ClientError::user_message`]).

use tasksphere_shared::auth::token_store::TokenStoreError;
use validator::ValidationErrors;

use crate::transport::TransportError;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Backend answered 401/403
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend answered 404, or the record is not in the current collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered with another non-2xx status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No response was received
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Input failed the "field present" checks; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Persisting or clearing the session token failed
    #[error("Token storage error: {0}")]
    Storage(String),

    /// The caller cancelled the operation; state was not touched
    #[error("Operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Builds the error for a non-2xx response
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Rejected { status, message },
        }
    }

    /// Message the backend supplied, if any
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ClientError::Unauthorized(m) | ClientError::NotFound(m) => m,
            ClientError::Rejected { message, .. } => message,
            ClientError::Validation(m) => m,
            _ => return None,
        };

        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }

    /// Text for an inline error banner: the server's message or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// HTTP status, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::NotFound(_) => Some(404),
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error means the session token is no longer accepted
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Whether the caller cancelled the operation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

impl From<TokenStoreError> for ClientError {
    fn from(err: TokenStoreError) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();
        ClientError::Validation(messages.join("; "))
    }
}

/// Pulls a human-readable message out of an error body
///
/// Accepts plain text, a JSON string, or a JSON object with `message` or
/// `error`. Anything else is passed through trimmed.
fn extract_message(body: &str) -> String {
    let trimmed = body.trim();

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            .unwrap_or_else(|| trimmed.to_string()),
        _ => trimmed.to_string(),
    }
}
