//! Session-driven view routing.
//!
//! `router` holds the pure state transitions; `gate` runs them behind
//! a single event loop fed by the auth provider's subscription.

pub mod gate;
pub mod router;

pub use gate::SessionGate;
pub use router::{AppView, RouteState};
