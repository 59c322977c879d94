//! Error types for the Minify session core.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Flag store error: {0}")]
    FlagStore(#[from] FlagStoreError),

    #[error("Session gate error: {0}")]
    Gate(#[from] GateError),
}

/// Errors surfaced by the auth service collaborator.
///
/// These are recovered at the form boundary and rendered as inline
/// messages; they never tear down the session loop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered: {email}")]
    DuplicateRegistration { email: String },

    #[error("Password rejected by the auth service: {reason}")]
    WeakPassword { reason: String },

    #[error("Session expired or missing")]
    SessionMissing,

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Auth service returned {status}: {message}")]
    Service { status: u16, message: String },
}

/// Pre-submit form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required field is empty: {field}")]
    EmptyField { field: &'static str },

    #[error("Password shorter than {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Malformed email address: {email}")]
    InvalidEmail { email: String },
}

/// Durable flag-store errors.
#[derive(Debug, thiserror::Error)]
pub enum FlagStoreError {
    #[error("Failed to open flag store: {0}")]
    Open(String),

    #[error("Flag query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Session gate command errors.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("No active session")]
    NoActiveSession,

    #[error("Session gate is shut down")]
    Closed,

    #[error("Flag store error: {0}")]
    FlagStore(#[from] FlagStoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
