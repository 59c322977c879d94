//! Hosted auth adapter — talks to a GoTrue-compatible REST service.
//!
//! Endpoint shapes follow the hosted service the product runs on:
//! `token?grant_type=password`, `signup`, `logout`, `recover` under
//! `/auth/v1/`, with the project key in the `apikey` header.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::provider::{
    AuthProvider, AuthUser, SESSION_CHANGE_CAPACITY, Session, SessionChange, SignInResponse,
    SignUpMetadata, SignUpResponse,
};
use crate::config::AuthServiceConfig;
use crate::error::AuthError;

/// [`AuthProvider`] backed by the hosted auth service.
pub struct HttpAuthProvider {
    config: AuthServiceConfig,
    client: reqwest::Client,
    current: RwLock<Option<Session>>,
    tx: broadcast::Sender<SessionChange>,
}

impl HttpAuthProvider {
    pub fn new(config: AuthServiceConfig) -> Self {
        let (tx, _) = broadcast::channel(SESSION_CHANGE_CAPACITY);
        Self {
            config,
            client: reqwest::Client::new(),
            current: RwLock::new(None),
            tx,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.api_url(path))
            .header("apikey", self.config.api_key.expose_secret())
    }

    /// Store the session and broadcast while holding the lock, so event
    /// order always matches state order.
    async fn install_session(&self, session: Session) {
        let mut current = self.current.write().await;
        *current = Some(session.clone());
        let _ = self.tx.send(SessionChange::SignedIn(session));
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .post("token?grant_type=password")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_service_error(status.as_u16(), &body, email));
        }

        let wire: WireSession = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let session = wire.into_session();
        self.install_session(session.clone()).await;
        debug!(user_id = %session.user.id, "Signed in");

        let user = session.user.clone();
        Ok(SignInResponse { session, user })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<SignUpResponse, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": metadata,
        });
        let response = self
            .post("signup")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_service_error(status.as_u16(), &body, email));
        }

        let wire: SignUpWire = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match wire {
            SignUpWire::Confirmed(wire) => {
                let session = wire.into_session();
                self.install_session(session.clone()).await;
                debug!(user_id = %session.user.id, "Signed up with immediate session");
                let user = session.user.clone();
                Ok(SignUpResponse {
                    session: Some(session),
                    user,
                })
            }
            SignUpWire::Pending(wire) => {
                debug!(email = %email, "Sign-up pending email confirmation");
                Ok(SignUpResponse {
                    session: None,
                    user: wire.into_user(),
                })
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self
            .current
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone());
        let Some(token) = token else {
            return Ok(());
        };

        let response = self
            .post("logout")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        // 401 means the token is already dead; the local session still
        // has to go.
        if !status.is_success() && status.as_u16() != 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_service_error(status.as_u16(), &body, ""));
        }
        if status.as_u16() == 401 {
            warn!("Logout token already invalid; clearing local session");
        }

        let mut current = self.current.write().await;
        if current.take().is_some() {
            let _ = self.tx.send(SessionChange::SignedOut);
        }
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let body = serde_json::json!({ "email": email });
        let response = self
            .post("recover")
            .query(&[("redirect_to", &self.config.reset_redirect_url)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_service_error(status.as_u16(), &body, email));
        }
        debug!(email = %email, "Password reset requested");
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .await
            .clone()
            .filter(|session| !session.is_expired())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.tx.subscribe()
    }
}

// ── Wire payloads ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_confirmed_at: Option<DateTime<Utc>>,
}

impl WireUser {
    fn into_user(self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.unwrap_or_default(),
            email_confirmed_at: self.email_confirmed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    /// Unix seconds; preferred over `expires_in` when present.
    #[serde(default)]
    expires_at: Option<i64>,
    user: WireUser,
}

impl WireSession {
    fn into_session(self) -> Session {
        let expires_in = self.expires_in.unwrap_or(3600);
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(expires_in));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into_user(),
        }
    }
}

/// A sign-up response is session-shaped when the account is live, or a
/// bare user object while email confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpWire {
    Confirmed(WireSession),
    Pending(WireUser),
}

#[derive(Debug, Default, Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl WireError {
    fn into_message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Map a failed service response onto the error taxonomy.
fn parse_service_error(status: u16, body: &str, email: &str) -> AuthError {
    let wire: WireError = serde_json::from_str(body).unwrap_or_default();
    let code = wire.error_code.clone().unwrap_or_default();
    let legacy = wire.error.clone().unwrap_or_default();
    let message = wire.into_message();
    let lower = message.to_lowercase();

    if code == "user_already_exists" || lower.contains("already registered") {
        return AuthError::DuplicateRegistration {
            email: email.to_string(),
        };
    }
    if code == "weak_password" || lower.contains("password should be") {
        return AuthError::WeakPassword { reason: message };
    }
    if code == "invalid_credentials"
        || legacy == "invalid_grant"
        || lower.contains("invalid login credentials")
        || lower.contains("email not confirmed")
        || status == 401
    {
        return AuthError::InvalidCredentials;
    }
    AuthError::Service { status, message }
}
