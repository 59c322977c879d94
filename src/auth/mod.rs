//! Auth collaborator — provider contract, backends, and screen forms.

pub mod forms;
pub mod http;
pub mod memory;
pub mod provider;

pub use forms::{LoginForm, PasswordResetForm, RegisterForm, SubmitOutcome, messages};
pub use http::HttpAuthProvider;
pub use memory::InMemoryAuthProvider;
pub use provider::*;
