//! In-memory auth provider — offline shells and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::auth::provider::{
    AuthProvider, AuthUser, MIN_PASSWORD_LEN, SESSION_CHANGE_CAPACITY, Session, SessionChange,
    SignInResponse, SignUpMetadata, SignUpResponse,
};
use crate::error::AuthError;

#[derive(Debug, Clone)]
struct StoredAccount {
    id: Uuid,
    email: String,
    password: String,
    name: Option<String>,
    confirmed_at: Option<chrono::DateTime<Utc>>,
}

/// Process-local [`AuthProvider`] with a real account table.
///
/// Mirrors the hosted service's observable behavior: duplicate emails are
/// rejected, short passwords are rejected, sign-ups can be held for email
/// confirmation, and session changes broadcast in state-change order.
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    current: RwLock<Option<Session>>,
    reset_requests: RwLock<Vec<String>>,
    tx: broadcast::Sender<SessionChange>,
    require_confirmation: bool,
    session_ttl: Duration,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SESSION_CHANGE_CAPACITY);
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            reset_requests: RwLock::new(Vec::new()),
            tx,
            require_confirmation: false,
            session_ttl: Duration::hours(1),
        }
    }

    /// Hold sign-ups for email confirmation (see [`Self::confirm_email`]).
    pub fn with_confirmation_required(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    /// Override the lifetime of issued sessions.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Create a confirmed account directly, bypassing sign-up.
    pub async fn seed_account(&self, email: &str, password: &str) -> Uuid {
        let account = StoredAccount {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            name: None,
            confirmed_at: Some(Utc::now()),
        };
        let id = account.id;
        self.accounts
            .write()
            .await
            .insert(account.email.clone(), account);
        id
    }

    /// Mark a pending registration as confirmed.
    pub async fn confirm_email(&self, email: &str) {
        let key = email.trim().to_lowercase();
        if let Some(account) = self.accounts.write().await.get_mut(&key) {
            account.confirmed_at = Some(Utc::now());
        }
    }

    /// Emails that asked for a password-reset link, in order.
    pub async fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.read().await.clone()
    }

    /// Display name recorded at registration, if any.
    pub async fn registered_name(&self, email: &str) -> Option<String> {
        let key = email.trim().to_lowercase();
        self.accounts
            .read()
            .await
            .get(&key)
            .and_then(|account| account.name.clone())
    }

    /// Live session-change receivers (teardown checks).
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn issue_session(&self, account: &StoredAccount) -> Session {
        Session {
            access_token: format!("tok-{}", Uuid::new_v4()),
            refresh_token: format!("ref-{}", Uuid::new_v4()),
            expires_at: Utc::now() + self.session_ttl,
            user: AuthUser {
                id: account.id,
                email: account.email.clone(),
                email_confirmed_at: account.confirmed_at,
            },
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError> {
        let key = email.trim().to_lowercase();
        let account = {
            let accounts = self.accounts.read().await;
            accounts.get(&key).cloned()
        };

        let account = account.ok_or(AuthError::InvalidCredentials)?;
        if account.password != password || account.confirmed_at.is_none() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.issue_session(&account);
        // Broadcast while holding the session lock so event order always
        // matches state order.
        let mut current = self.current.write().await;
        *current = Some(session.clone());
        let _ = self.tx.send(SessionChange::SignedIn(session.clone()));
        drop(current);

        let user = session.user.clone();
        Ok(SignInResponse { session, user })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<SignUpResponse, AuthError> {
        let key = email.trim().to_lowercase();
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                reason: format!("Password should be at least {MIN_PASSWORD_LEN} characters"),
            });
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::DuplicateRegistration { email: key });
        }

        let account = StoredAccount {
            id: Uuid::new_v4(),
            email: key.clone(),
            password: password.to_string(),
            name: metadata.name,
            confirmed_at: (!self.require_confirmation).then(Utc::now),
        };
        accounts.insert(key, account.clone());
        drop(accounts);

        if self.require_confirmation {
            return Ok(SignUpResponse {
                session: None,
                user: AuthUser {
                    id: account.id,
                    email: account.email,
                    email_confirmed_at: None,
                },
            });
        }

        let session = self.issue_session(&account);
        let mut current = self.current.write().await;
        *current = Some(session.clone());
        let _ = self.tx.send(SessionChange::SignedIn(session.clone()));
        drop(current);

        let user = session.user.clone();
        Ok(SignUpResponse {
            session: Some(session),
            user,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut current = self.current.write().await;
        if current.take().is_some() {
            let _ = self.tx.send(SessionChange::SignedOut);
        }
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        // Succeeds regardless of whether the account exists, like the
        // hosted service (no account enumeration).
        self.reset_requests
            .write()
            .await
            .push(email.trim().to_lowercase());
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
