//! Onboarding — the first-run wizard configuring a new church account.
//!
//! Four linear steps (identity, departments, plan, summary) collect an
//! [`OnboardingProfile`]. Completion is reported to the session gate,
//! which persists the per-user flag and routes on to the app.

pub mod model;
pub mod wizard;

pub use model::{
    ChurchType, DEFAULT_PLAN_ID, DEPARTMENTS, Department, OnboardingDraft, OnboardingProfile,
    PLANS, Plan, is_known_department, is_known_plan,
};
pub use wizard::{OnboardingWizard, WizardError, WizardStep};
