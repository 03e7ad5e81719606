//! Session store
//!
//! Owns the bearer token and the signed-in user, persists the token between
//! runs and publishes it to the [`SessionCredentials`] every [`ApiClient`]
//! reads from.
//!
//! # Lifecycle
//!
//! ```text
//!            initialize (no token)
//!   UNKNOWN ───────────────────────────────► ANONYMOUS ◄──┐
//!      │                                        │  ▲      │
//!      │ initialize (token found)      login ok │  │ logout / profile failure
//!      ▼                                        ▼  │      │
//!  VALIDATING ── profile ok ──────────────► AUTHENTICATED ┘
//!      │
//!      └── profile failure ──► ANONYMOUS (persisted token cleared)
//! ```
//!
//! The profile is fetched whenever a token becomes present: on start-up
//! restore and right after login. A failed fetch logs out; it is never
//! retried.

use std::sync::Arc;

use tasksphere_shared::auth::credentials::SessionCredentials;
use tasksphere_shared::auth::token_store::TokenStore;
use tasksphere_shared::models::user::{LoginRequest, LoginResponse, RegisterRequest, UserSummary};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::api::{to_body, ApiClient};
use crate::error::{ClientError, ClientResult};
use crate::transport::ApiRequest;

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const PROFILE_PATH: &str = "/api/users/profile";

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Start-up, persisted token not looked at yet
    #[default]
    Unknown,

    /// A restored token is being checked against the profile endpoint
    Validating,

    /// Token accepted
    Authenticated,

    /// No usable token
    Anonymous,
}

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub phase: SessionPhase,

    /// Opaque bearer token
    pub token: Option<String>,

    /// Signed-in user; only `username` and `role` are known until the
    /// profile fetch completes
    pub user: Option<UserSummary>,
}

impl Session {
    fn anonymous() -> Self {
        Session {
            phase: SessionPhase::Anonymous,
            token: None,
            user: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// Whether initial validation is still running
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Unknown | SessionPhase::Validating)
    }
}

/// Session store
pub struct SessionStore {
    api: ApiClient,
    credentials: SessionCredentials,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Creates a store in the `Unknown` phase
    ///
    /// `credentials` must be the provider `api` was built with, otherwise
    /// requests will not carry the session token.
    pub fn new(api: ApiClient, credentials: SessionCredentials, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _rx) = watch::channel(Session::default());
        SessionStore {
            api,
            credentials,
            tokens,
            state,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Restores a persisted token and validates it
    ///
    /// Storage that cannot be read counts as "no token".
    pub async fn initialize(&self, cancel: &CancellationToken) -> ClientResult<()> {
        let stored = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted token, starting anonymous");
                None
            }
        };

        let Some(token) = stored else {
            tracing::debug!("No persisted token");
            self.credentials.clear();
            self.state.send_replace(Session::anonymous());
            return Ok(());
        };

        tracing::debug!("Validating persisted token");
        self.credentials.set(token.clone());
        self.state.send_replace(Session {
            phase: SessionPhase::Validating,
            token: Some(token),
            user: None,
        });

        self.fetch_profile(cancel).await.map(|_| ())
    }

    /// Authenticates with username and password
    ///
    /// On rejection the previous state is kept and the server's message is
    /// returned (see [`ClientError::user_message`], fallback "Login failed").
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        let body = to_body(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let response: LoginResponse = self
            .api
            .fetch(ApiRequest::post(LOGIN_PATH, body), cancel)
            .await
            .map_err(|e| {
                if !e.is_cancelled() {
                    tracing::warn!(username, error = %e, "Login rejected");
                }
                e
            })?;

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        if let Err(e) = self.tokens.save(&response.token) {
            tracing::warn!(error = %e, "Could not persist session token");
        }

        let token = response.token.clone();
        self.credentials.set(token.clone());
        self.state.send_replace(Session {
            phase: SessionPhase::Authenticated,
            token: Some(token),
            user: Some(UserSummary::from(response)),
        });
        tracing::info!(username, "Logged in");

        match self.fetch_profile(cancel).await {
            Ok(_) | Err(ClientError::Cancelled) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Creates an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest, cancel: &CancellationToken) -> ClientResult<()> {
        request.validate()?;

        self.api
            .send(ApiRequest::post(REGISTER_PATH, to_body(request)?), cancel)
            .await
            .map_err(|e| {
                if !e.is_cancelled() {
                    tracing::warn!(username = %request.username, error = %e, "Registration rejected");
                }
                e
            })?;

        tracing::info!(username = %request.username, "Registered");
        Ok(())
    }

    /// Ends the session. Idempotent.
    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Could not clear persisted token");
        }
        self.credentials.clear();

        let previous = self.state.send_replace(Session::anonymous());
        if let Some(user) = previous.user {
            tracing::info!(username = %user.username, "Logged out");
        }
    }

    /// Loads the full profile for the current token
    ///
    /// Any failure other than cancellation ends the session. A response that
    /// arrives after the token changed is returned but not applied.
    pub async fn fetch_profile(&self, cancel: &CancellationToken) -> ClientResult<UserSummary> {
        let Some(token) = self.token() else {
            return Err(ClientError::Unauthorized("Not logged in".to_string()));
        };

        let result = self
            .api
            .fetch::<UserSummary>(ApiRequest::get(PROFILE_PATH), cancel)
            .await;

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let current = self.token();
        if current.as_deref() != Some(token.as_str()) {
            tracing::debug!("Session token changed during profile fetch, discarding result");
            return result;
        }

        match result {
            Ok(user) => {
                tracing::debug!(username = %user.username, "Profile loaded");
                self.state.send_modify(|s| {
                    s.phase = SessionPhase::Authenticated;
                    s.user = Some(user.clone());
                });
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed, logging out");
                self.logout();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpMethod, StubTransport, TransportError};
    use serde_json::json;
    use tasksphere_shared::auth::token_store::MemoryTokenStore;

    struct Fixture {
        stub: Arc<StubTransport>,
        tokens: Arc<MemoryTokenStore>,
        session: SessionStore,
        api: ApiClient,
    }

    fn fixture(tokens: MemoryTokenStore) -> Fixture {
        let stub = Arc::new(StubTransport::new());
        let tokens = Arc::new(tokens);
        let credentials = SessionCredentials::new();
        let api = ApiClient::new(stub.clone(), Arc::new(credentials.clone()));
        let session = SessionStore::new(api.clone(), credentials, tokens.clone());
        Fixture {
            stub,
            tokens,
            session,
            api,
        }
    }

    fn profile() -> serde_json::Value {
        json!({
            "id": 1,
            "username": "alice",
            "role": "USER",
            "firstName": "Alice",
            "lastName": "Liddell",
            "email": "alice@example.com"
        })
    }

    async fn script_login(stub: &StubTransport) {
        stub.respond_json(
            HttpMethod::Post,
            LOGIN_PATH,
            200,
            json!({"token": "t1", "username": "alice", "role": "USER"}),
        )
        .await;
        stub.respond_json(HttpMethod::Get, PROFILE_PATH, 200, profile()).await;
    }

    #[tokio::test]
    async fn test_starts_unknown_and_loading() {
        let f = fixture(MemoryTokenStore::new());
        assert_eq!(f.session.phase(), SessionPhase::Unknown);
        assert!(f.session.is_loading());
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_anonymous() {
        let f = fixture(MemoryTokenStore::new());
        f.session.initialize(&CancellationToken::new()).await.unwrap();

        assert_eq!(f.session.phase(), SessionPhase::Anonymous);
        assert!(!f.session.is_loading());
        assert_eq!(f.stub.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_initialize_restores_valid_token() {
        let f = fixture(MemoryTokenStore::with_token("saved"));
        f.stub.respond_json(HttpMethod::Get, PROFILE_PATH, 200, profile()).await;

        f.session.initialize(&CancellationToken::new()).await.unwrap();

        let snapshot = f.session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Authenticated);
        assert_eq!(snapshot.token.as_deref(), Some("saved"));
        assert_eq!(snapshot.user.unwrap().email.as_deref(), Some("alice@example.com"));

        let sent = f.stub.last_request().await.unwrap();
        assert_eq!(sent.bearer_token(), Some("saved"));
    }

    #[tokio::test]
    async fn test_initialize_with_rejected_token_clears_storage() {
        let f = fixture(MemoryTokenStore::with_token("stale"));
        f.stub.respond(HttpMethod::Get, PROFILE_PATH, 401, "").await;

        let result = f.session.initialize(&CancellationToken::new()).await;

        assert!(result.is_err());
        assert_eq!(f.session.phase(), SessionPhase::Anonymous);
        assert_eq!(f.tokens.load().unwrap(), None);
        assert_eq!(f.session.token(), None);
    }

    #[tokio::test]
    async fn test_login_success_attaches_bearer_afterwards() {
        let f = fixture(MemoryTokenStore::new());
        script_login(&f.stub).await;
        f.stub.respond_json(HttpMethod::Get, "/api/projects", 200, json!([])).await;
        let cancel = CancellationToken::new();

        f.session.login("alice", "secret", &cancel).await.unwrap();

        assert!(f.session.is_authenticated());
        assert_eq!(f.tokens.load().unwrap().as_deref(), Some("t1"));
        assert_eq!(f.session.user().unwrap().first_name.as_deref(), Some("Alice"));

        f.api.send(ApiRequest::get("/api/projects"), &cancel).await.unwrap();
        assert_eq!(f.stub.last_request().await.unwrap().bearer_token(), Some("t1"));

        let login = &f.stub.requests_to(HttpMethod::Post, LOGIN_PATH).await[0];
        assert_eq!(login.bearer_token(), None);
        assert_eq!(login.body.as_ref().unwrap()["username"], "alice");
    }

    #[tokio::test]
    async fn test_login_rejected_leaves_state() {
        let f = fixture(MemoryTokenStore::new());
        f.session.initialize(&CancellationToken::new()).await.unwrap();
        f.stub
            .respond(HttpMethod::Post, LOGIN_PATH, 400, "Invalid username or password")
            .await;

        let err = f
            .session
            .login("alice", "wrong", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Login failed"), "Invalid username or password");
        assert_eq!(f.session.phase(), SessionPhase::Anonymous);
        assert_eq!(f.tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_transport_failure_uses_fallback() {
        let f = fixture(MemoryTokenStore::new());
        f.stub.fail(HttpMethod::Post, LOGIN_PATH, TransportError::Timeout).await;

        let err = f
            .session
            .login("alice", "secret", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[tokio::test]
    async fn test_login_then_failed_profile_logs_out() {
        let f = fixture(MemoryTokenStore::new());
        f.stub
            .respond_json(
                HttpMethod::Post,
                LOGIN_PATH,
                200,
                json!({"token": "t1", "username": "alice", "role": "USER"}),
            )
            .await;
        f.stub.respond(HttpMethod::Get, PROFILE_PATH, 500, "").await;

        let result = f.session.login("alice", "secret", &CancellationToken::new()).await;

        assert!(result.is_err());
        assert_eq!(f.session.phase(), SessionPhase::Anonymous);
        assert_eq!(f.tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let f = fixture(MemoryTokenStore::new());
        script_login(&f.stub).await;
        f.session.login("alice", "secret", &CancellationToken::new()).await.unwrap();

        f.session.logout();
        assert_eq!(f.session.snapshot(), Session::anonymous());
        assert_eq!(f.tokens.load().unwrap(), None);

        f.session.logout();
        assert_eq!(f.session.snapshot(), Session::anonymous());
        assert_eq!(f.tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let f = fixture(MemoryTokenStore::new());
        f.session.initialize(&CancellationToken::new()).await.unwrap();
        f.stub
            .respond(HttpMethod::Post, REGISTER_PATH, 200, "User registered successfully!")
            .await;

        let request = RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Builder".to_string(),
        };
        f.session.register(&request, &CancellationToken::new()).await.unwrap();

        assert_eq!(f.session.phase(), SessionPhase::Anonymous);
        let body = f.stub.last_request().await.unwrap().body.unwrap();
        assert_eq!(body["firstName"], "Bob");
    }

    #[tokio::test]
    async fn test_register_missing_field_is_not_sent() {
        let f = fixture(MemoryTokenStore::new());
        let request = RegisterRequest {
            username: "bob".to_string(),
            email: String::new(),
            password: "pw".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Builder".to_string(),
        };

        let err = f
            .session
            .register(&request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Registration failed"), "Email is required");
        assert_eq!(f.stub.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_cancelled_login_changes_nothing() {
        let f = fixture(MemoryTokenStore::new());
        script_login(&f.stub).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = f.session.login("alice", "secret", &cancel).await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(f.session.phase(), SessionPhase::Unknown);
        assert_eq!(f.tokens.load().unwrap(), None);
    }
}
