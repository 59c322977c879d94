//! Auth collaborator contract — sessions, users, and the provider trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::AuthError;

/// Broadcast capacity for session-change subscribers.
pub const SESSION_CHANGE_CAPACITY: usize = 256;

/// Minimum password length the auth service accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The account behind a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    /// `None` while the confirmation email is still pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Optional account data attached to a registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResponse {
    pub session: Session,
    pub user: AuthUser,
}

/// Successful registration.
///
/// `session` is `None` when the service requires email confirmation;
/// no session-change event fires in that case.
#[derive(Debug, Clone)]
pub struct SignUpResponse {
    pub session: Option<Session>,
    pub user: AuthUser,
}

/// A session lifecycle event, broadcast to subscribers in arrival order.
#[derive(Debug, Clone)]
pub enum SessionChange {
    SignedIn(Session),
    SignedOut,
}

/// The auth service seam.
///
/// Implementations must broadcast [`SessionChange`] events in the same
/// order their internal session state changes — consumers treat the
/// subscription as authoritative and apply events last-writer-wins.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError>;

    /// Register a new account.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<SignUpResponse, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Ask the service to email a password-reset link.
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// The current session, if any. Never returns an expired session.
    async fn current_session(&self) -> Option<Session>;

    /// Subscribe to session lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}
