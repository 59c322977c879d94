//! Auth screen form state — login, registration, and password reset.
//!
//! Each form owns its fields plus `loading` / `error` / `notice` render
//! state. Service failures are absorbed here and turned into inline
//! pt-BR messages; they never propagate and never move the route.

use crate::auth::provider::{AuthProvider, MIN_PASSWORD_LEN, SignUpMetadata};
use crate::error::{AuthError, ValidationError};

/// Inline messages rendered by the auth screen.
pub mod messages {
    pub const FILL_ALL_FIELDS: &str = "Preencha todos os campos.";
    pub const INVALID_EMAIL: &str = "Informe um e-mail válido.";
    pub const PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres.";
    pub const PASSWORD_MISMATCH: &str = "As senhas não coincidem.";
    pub const LOGIN_FAILED: &str = "Erro ao entrar. Verifique suas credenciais.";
    pub const REGISTER_FAILED: &str = "Erro ao criar a conta. Tente novamente.";
    pub const RESET_FAILED: &str = "Não foi possível enviar o link. Tente novamente.";
    pub const DUPLICATE_EMAIL: &str = "Este e-mail já está cadastrado.";
    pub const WEAK_PASSWORD: &str = "A senha é muito fraca. Use pelo menos 6 caracteres.";
    pub const NETWORK_FAILURE: &str = "Falha de conexão. Tente novamente.";
    pub const CONFIRMATION_SENT: &str =
        "Cadastro realizado! Verifique seu e-mail para confirmar a conta.";
    pub const RESET_SENT: &str = "Enviamos um link de recuperação para o seu e-mail.";
}

/// What a submit attempt produced, for pane switching in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Credentials accepted; the route moves via the session subscription.
    SignedIn,
    /// Account created, awaiting email confirmation. No session yet.
    ConfirmationPending,
    /// Reset link requested.
    ResetRequested,
    /// Validation or service failure; inline message set, pane stays.
    Rejected,
}

fn validation_message(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::EmptyField { .. } => messages::FILL_ALL_FIELDS,
        ValidationError::InvalidEmail { .. } => messages::INVALID_EMAIL,
        ValidationError::PasswordTooShort { .. } => messages::PASSWORD_TOO_SHORT,
        ValidationError::PasswordMismatch => messages::PASSWORD_MISMATCH,
    }
}

fn auth_error_message(err: &AuthError, fallback: &'static str) -> &'static str {
    match err {
        AuthError::DuplicateRegistration { .. } => messages::DUPLICATE_EMAIL,
        AuthError::WeakPassword { .. } => messages::WEAK_PASSWORD,
        AuthError::Network(_) => messages::NETWORK_FAILURE,
        _ => fallback,
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}

fn require_email_shape(email: &str) -> Result<(), ValidationError> {
    if email.trim().contains('@') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.trim().to_string(),
        })
    }
}

// ── Login ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require("password", &self.password)?;
        require_email_shape(&self.email)
    }

    pub async fn submit(&mut self, provider: &dyn AuthProvider) -> SubmitOutcome {
        self.error = None;
        if let Err(err) = self.validate() {
            self.error = Some(validation_message(&err).to_string());
            return SubmitOutcome::Rejected;
        }

        self.loading = true;
        let result = provider.sign_in(self.email.trim(), &self.password).await;
        self.loading = false;

        match result {
            Ok(_) => SubmitOutcome::SignedIn,
            Err(err) => {
                self.error = Some(auth_error_message(&err, messages::LOGIN_FAILED).to_string());
                SubmitOutcome::Rejected
            }
        }
    }
}

// ── Registration ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("confirm_password", &self.confirm_password)?;
        require_email_shape(&self.email)?;
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub async fn submit(&mut self, provider: &dyn AuthProvider) -> SubmitOutcome {
        self.error = None;
        self.notice = None;
        if let Err(err) = self.validate() {
            self.error = Some(validation_message(&err).to_string());
            return SubmitOutcome::Rejected;
        }

        let metadata = SignUpMetadata {
            name: Some(self.name.trim().to_string()),
        };
        self.loading = true;
        let result = provider
            .sign_up(self.email.trim(), &self.password, metadata)
            .await;
        self.loading = false;

        match result {
            Ok(response) if response.session.is_some() => SubmitOutcome::SignedIn,
            Ok(_) => {
                self.notice = Some(messages::CONFIRMATION_SENT.to_string());
                SubmitOutcome::ConfirmationPending
            }
            Err(err) => {
                self.error = Some(auth_error_message(&err, messages::REGISTER_FAILED).to_string());
                SubmitOutcome::Rejected
            }
        }
    }
}

// ── Password reset ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PasswordResetForm {
    pub email: String,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl PasswordResetForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require_email_shape(&self.email)
    }

    pub async fn submit(&mut self, provider: &dyn AuthProvider) -> SubmitOutcome {
        self.error = None;
        self.notice = None;
        if let Err(err) = self.validate() {
            self.error = Some(validation_message(&err).to_string());
            return SubmitOutcome::Rejected;
        }

        self.loading = true;
        let result = provider.request_password_reset(self.email.trim()).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.notice = Some(messages::RESET_SENT.to_string());
                SubmitOutcome::ResetRequested
            }
            Err(err) => {
                self.error = Some(auth_error_message(&err, messages::RESET_FAILED).to_string());
                SubmitOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::InMemoryAuthProvider;

    #[tokio::test]
    async fn login_rejects_empty_fields_before_the_provider() {
        let provider = InMemoryAuthProvider::new();
        let mut form = LoginForm::new();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        // Validation message, not the provider's credentials error —
        // the provider was never consulted.
        assert_eq!(form.error.as_deref(), Some(messages::FILL_ALL_FIELDS));
        assert!(!form.loading);
    }

    #[tokio::test]
    async fn login_failure_sets_inline_message_and_clears_loading() {
        let provider = InMemoryAuthProvider::new();
        provider.seed_account("ana@igreja.com", "secret123").await;

        let mut form = LoginForm::new();
        form.email = "ana@igreja.com".to_string();
        form.password = "errada".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(form.error.as_deref(), Some(messages::LOGIN_FAILED));
        assert!(!form.loading);
        assert!(provider.current_session().await.is_none());
    }

    #[tokio::test]
    async fn login_success_signs_in() {
        let provider = InMemoryAuthProvider::new();
        provider.seed_account("ana@igreja.com", "secret123").await;

        let mut form = LoginForm::new();
        form.email = "  ana@igreja.com ".to_string();
        form.password = "secret123".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::SignedIn);
        assert!(form.error.is_none());
        assert!(provider.current_session().await.is_some());
    }

    #[tokio::test]
    async fn register_validates_mismatch_and_length() {
        let provider = InMemoryAuthProvider::new();
        let mut form = RegisterForm::new();
        form.name = "Ana".to_string();
        form.email = "ana@igreja.com".to_string();
        form.password = "12345".to_string();
        form.confirm_password = "12345".to_string();

        form.submit(&provider).await;
        assert_eq!(form.error.as_deref(), Some(messages::PASSWORD_TOO_SHORT));

        form.password = "secret123".to_string();
        form.confirm_password = "secret124".to_string();
        form.submit(&provider).await;
        assert_eq!(form.error.as_deref(), Some(messages::PASSWORD_MISMATCH));
    }

    #[tokio::test]
    async fn register_rejects_bad_email_shape() {
        let provider = InMemoryAuthProvider::new();
        let mut form = RegisterForm::new();
        form.name = "Ana".to_string();
        form.email = "sem-arroba".to_string();
        form.password = "secret123".to_string();
        form.confirm_password = "secret123".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(form.error.as_deref(), Some(messages::INVALID_EMAIL));
    }

    #[tokio::test]
    async fn register_duplicate_renders_specific_message() {
        let provider = InMemoryAuthProvider::new();
        provider.seed_account("ana@igreja.com", "secret123").await;

        let mut form = RegisterForm::new();
        form.name = "Ana".to_string();
        form.email = "ana@igreja.com".to_string();
        form.password = "secret123".to_string();
        form.confirm_password = "secret123".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(form.error.as_deref(), Some(messages::DUPLICATE_EMAIL));
    }

    #[tokio::test]
    async fn register_pending_confirmation_sets_notice_and_stays() {
        let provider = InMemoryAuthProvider::new().with_confirmation_required();

        let mut form = RegisterForm::new();
        form.name = "Novo".to_string();
        form.email = "novo@igreja.com".to_string();
        form.password = "secret123".to_string();
        form.confirm_password = "secret123".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::ConfirmationPending);
        assert_eq!(form.notice.as_deref(), Some(messages::CONFIRMATION_SENT));
        assert!(form.error.is_none());
        assert!(provider.current_session().await.is_none());
    }

    #[tokio::test]
    async fn reset_request_sets_notice() {
        let provider = InMemoryAuthProvider::new();
        let mut form = PasswordResetForm::new();
        form.email = "ana@igreja.com".to_string();

        let outcome = form.submit(&provider).await;
        assert_eq!(outcome, SubmitOutcome::ResetRequested);
        assert_eq!(form.notice.as_deref(), Some(messages::RESET_SENT));
        assert_eq!(provider.reset_requests().await, vec!["ana@igreja.com"]);
    }
}
