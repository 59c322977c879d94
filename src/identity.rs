//! Identity model — how an authenticated session becomes a product user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Session;

/// Single-tenant church id every account belongs to.
pub const DEFAULT_CHURCH_ID: &str = "hq";

/// Display name used when the email has no local part to derive one from.
pub const FALLBACK_DISPLAY_NAME: &str = "Usuário";

/// Product role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Member,
}

/// A signed-in product user, derived from the auth session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    /// Derived from the email local part (fallback: "Usuário").
    pub name: String,
    pub email: String,
    /// Fixed default until a real role source exists.
    pub role: UserRole,
    pub avatar_url: String,
    pub church_id: String,
}

/// Map an auth session to the product identity.
///
/// Every sign-in path (initial probe and subscription deliveries alike)
/// goes through this one function, so the derivation cannot drift.
pub fn session_to_identity(session: &Session) -> UserIdentity {
    let user = &session.user;
    UserIdentity {
        id: user.id,
        name: display_name(&user.email),
        email: user.email.clone(),
        role: UserRole::Admin,
        avatar_url: avatar_url(&user.email),
        church_id: DEFAULT_CHURCH_ID.to_string(),
    }
}

fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    if local.is_empty() {
        FALLBACK_DISPLAY_NAME.to_string()
    } else {
        local.to_string()
    }
}

fn avatar_url(email: &str) -> String {
    format!("https://ui-avatars.com/api/?name={email}&background=6366f1&color=fff")
}
