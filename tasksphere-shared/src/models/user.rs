//! User identity and authentication payloads
//!
//! The backend authenticates with a username/password pair and answers with an
//! opaque bearer token plus a minimal identity. The full profile is fetched
//! separately from `/api/users/profile`.
//!
//! # Wire Shapes
//!
//! ```text
//! POST /api/auth/login     {"username": "alice", "password": "..."}
//!                       -> {"token": "...", "username": "alice", "role": "USER"}
//! GET  /api/users/profile -> {"id": 1, "username": "alice", "role": "USER",
//!                             "firstName": "Alice", "lastName": "Liddell",
//!                             "email": "alice@example.com"}
//! ```

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::RecordId;

/// Role assigned to regular accounts by the register endpoint
pub const DEFAULT_ROLE: &str = "USER";

/// Identity of the signed-in user as held by the session
///
/// Right after login only `username` and `role` are known; the profile fetch
/// replaces the whole summary with the complete record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Backend user ID (absent until the profile is fetched)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Login name
    pub username: String,

    /// Role name as sent by the backend (`USER`, `ADMIN`)
    #[serde(default)]
    pub role: String,

    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserSummary {
    /// Name used for greetings: first name when known, username otherwise
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(first) if !first.trim().is_empty() => first,
            _ => &self.username,
        }
    }

    /// "First Last", skipping whichever part is missing
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the backend considers this user an administrator
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("ADMIN")
    }
}

impl From<LoginResponse> for UserSummary {
    fn from(login: LoginResponse) -> Self {
        UserSummary {
            id: None,
            username: login.username,
            role: login.role,
            first_name: None,
            last_name: None,
            email: None,
        }
    }
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,

    /// Plaintext password (sent over TLS only)
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token
    pub token: String,

    /// Login name echoed back by the backend
    pub username: String,

    /// Role name
    #[serde(default)]
    pub role: String,
}

/// Registration request body
///
/// Only presence is checked client-side; the backend owns every other rule.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Contact email
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Given name
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

/// Weak reference to a user embedded in other records
///
/// Only the ID is authoritative; the rest is a denormalized copy for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    /// User ID
    pub id: RecordId,

    /// Login name, when the backend embeds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Given name, when embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name, when embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserRef {
    /// Reference carrying only the ID (what forms send back)
    pub fn id_only(id: RecordId) -> Self {
        UserRef {
            id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Best available label for tables
    pub fn label(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        if !full.trim().is_empty() {
            full
        } else if let Some(username) = &self.username {
            username.clone()
        } else {
            format!("#{}", self.id)
        }
    }
}
