//! View routing — immutable route state and its pure transitions.
//!
//! The state machine has three views plus an orthogonal tutorial bit:
//!
//! | From       | Event                                | To         |
//! |------------|--------------------------------------|------------|
//! | Login      | session observed, onboarding pending | Onboarding |
//! | Login      | session observed, onboarding done    | App        |
//! | Onboarding | wizard completed                     | App        |
//! | any        | session cleared                      | Login      |
//!
//! Every transition builds a fresh [`RouteState`]; nothing mutates in
//! place, and only the session gate applies these functions.

use serde::{Deserialize, Serialize};

use crate::identity::UserIdentity;
use crate::store::CompletionFlags;

/// Top-level surface the shell renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    Login,
    Onboarding,
    App,
}

impl Default for AppView {
    fn default() -> Self {
        Self::Login
    }
}

impl std::fmt::Display for AppView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Login => "login",
            Self::Onboarding => "onboarding",
            Self::App => "app",
        };
        write!(f, "{s}")
    }
}

/// What the shell renders right now.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteState {
    pub view: AppView,
    pub identity: Option<UserIdentity>,
    /// May only be `true` while `view == App`.
    pub tutorial_visible: bool,
}

impl RouteState {
    /// Before any session is known: login screen, nobody signed in.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// A session was observed (initial probe or subscription delivery).
    pub fn with_session(&self, identity: UserIdentity, flags: CompletionFlags) -> Self {
        if flags.onboarding_complete {
            Self {
                view: AppView::App,
                identity: Some(identity),
                tutorial_visible: !flags.tutorial_seen,
            }
        } else {
            Self {
                view: AppView::Onboarding,
                identity: Some(identity),
                tutorial_visible: false,
            }
        }
    }

    /// The session ended — sign-out, expiry, or revocation. Valid from
    /// every view.
    pub fn signed_out(&self) -> Self {
        Self::initial()
    }

    /// The onboarding wizard was completed for the signed-in user.
    pub fn onboarding_completed(&self, flags: CompletionFlags) -> Self {
        match &self.identity {
            Some(identity) => Self {
                view: AppView::App,
                identity: Some(identity.clone()),
                tutorial_visible: !flags.tutorial_seen,
            },
            None => Self::initial(),
        }
    }

    /// The tutorial overlay was dismissed for good.
    pub fn tutorial_finished(&self) -> Self {
        Self {
            tutorial_visible: false,
            ..self.clone()
        }
    }
}
