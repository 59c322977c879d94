//! Configuration types.

use secrecy::SecretString;

/// Default redirect target appended to password-reset emails.
pub const DEFAULT_RESET_REDIRECT: &str = "https://app.minify.app/reset";

/// Hosted auth service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Base URL of the auth service, without trailing slash
    /// (e.g. `https://xyz.supabase.co`).
    pub base_url: String,
    /// Project API key, sent as the `apikey` header on every request.
    pub api_key: SecretString,
    /// Where the password-reset email should send the user back to.
    pub reset_redirect_url: String,
}

impl AuthServiceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: SecretString::from(api_key.into()),
            reset_redirect_url: DEFAULT_RESET_REDIRECT.to_string(),
        }
    }

    /// Build config from environment variables.
    /// Returns `None` if `MINIFY_AUTH_URL` is not set (hosted auth disabled).
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("MINIFY_AUTH_URL").ok()?;
        let api_key = std::env::var("MINIFY_AUTH_KEY").unwrap_or_default();

        let mut config = Self::new(base_url, api_key);
        if let Ok(redirect) = std::env::var("MINIFY_RESET_REDIRECT") {
            config.reset_redirect_url = redirect;
        }
        Some(config)
    }

    pub fn with_reset_redirect(mut self, url: impl Into<String>) -> Self {
        self.reset_redirect_url = url.into();
        self
    }
}
