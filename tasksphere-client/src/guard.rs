//! Route guard
//!
//! Decides what a protected view shows for the current session. The decision
//! is a pure function of the session snapshot.

use crate::session::{Session, SessionPhase, SessionStore};

/// Where anonymous visitors are sent
pub const LOGIN_PATH: &str = "/login";

/// Outcome of guarding a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session validation still running; show a loading indicator
    Loading,

    /// Not signed in; go to the given path instead
    Redirect(&'static str),

    /// Show the view
    Render,
}

/// Route guard
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(session: &Session) -> GuardDecision {
        match session.phase {
            SessionPhase::Unknown | SessionPhase::Validating => GuardDecision::Loading,
            SessionPhase::Anonymous => GuardDecision::Redirect(LOGIN_PATH),
            SessionPhase::Authenticated => GuardDecision::Render,
        }
    }

    /// Decision for the store's current state
    pub fn check(store: &SessionStore) -> GuardDecision {
        Self::decide(&store.snapshot())
    }
}
