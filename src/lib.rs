//! Minify core — session, onboarding, and routing engine for the
//! church management app.
//!
//! The crate is headless: it owns the authentication lifecycle, the
//! first-run onboarding and tutorial flows, and the view routing that
//! a frontend renders. All user-facing strings are pt-BR.
//!
//! The usual wiring is an [`auth::AuthProvider`] (HTTP against the
//! hosted auth service, or in-memory for tests), a
//! [`store::FlagRepository`] over a [`store::FlagStore`] backend, and
//! a [`session::SessionGate`] running the routing loop on top of both.

pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod onboarding;
pub mod session;
pub mod store;
pub mod tutorial;

pub use error::{Error, Result};
