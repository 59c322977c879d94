//! Onboarding wizard — four linear steps configuring the church.
//!
//! Progresses linearly: Identity → Departments → Plan → Summary.
//! Back never loses entered values; finishing produces the profile
//! exactly once.

use serde::{Deserialize, Serialize};

use crate::onboarding::model::{
    ChurchType, OnboardingDraft, OnboardingProfile, is_known_department, is_known_plan,
};

/// The wizard steps, indexed 1–4 for the progress header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Identity,
    Departments,
    Plan,
    Summary,
}

impl WizardStep {
    /// 1-based position shown in the step header.
    pub fn index(&self) -> usize {
        match self {
            Self::Identity => 1,
            Self::Departments => 2,
            Self::Plan => 3,
            Self::Summary => 4,
        }
    }

    pub const COUNT: usize = 4;

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::Identity => Some(Self::Departments),
            Self::Departments => Some(Self::Plan),
            Self::Plan => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// The previous step, if any.
    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            Self::Identity => None,
            Self::Departments => Some(Self::Identity),
            Self::Plan => Some(Self::Departments),
            Self::Summary => Some(Self::Plan),
        }
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Identity
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identity => "identity",
            Self::Departments => "departments",
            Self::Plan => "plan",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

/// Why a wizard action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Church name is required")]
    NameRequired,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Finish is only available on the summary step")]
    NotAtSummary,

    #[error("Wizard already submitted")]
    AlreadySubmitted,
}

/// The wizard state machine.
#[derive(Debug, Clone, Default)]
pub struct OnboardingWizard {
    step: WizardStep,
    draft: OnboardingDraft,
    submitted: bool,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &OnboardingDraft {
        &self.draft
    }

    // ── Field mutators ──────────────────────────────────────────────

    pub fn set_church_name(&mut self, name: impl Into<String>) {
        self.draft.church_name = name.into();
    }

    pub fn set_church_type(&mut self, church_type: ChurchType) {
        self.draft.church_type = church_type;
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.draft.address = address.into();
    }

    /// Add or remove a department from the selection.
    pub fn toggle_department(&mut self, id: &str) -> Result<bool, WizardError> {
        if !is_known_department(id) {
            return Err(WizardError::UnknownDepartment(id.to_string()));
        }
        if self.draft.departments.remove(id) {
            Ok(false)
        } else {
            self.draft.departments.insert(id.to_string());
            Ok(true)
        }
    }

    pub fn select_plan(&mut self, id: &str) -> Result<(), WizardError> {
        if !is_known_plan(id) {
            return Err(WizardError::UnknownPlan(id.to_string()));
        }
        self.draft.plan_id = id.to_string();
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Whether the current step's Continue action is enabled.
    pub fn can_continue(&self) -> bool {
        match self.step {
            WizardStep::Identity => !self.draft.church_name.trim().is_empty(),
            _ => true,
        }
    }

    /// Move forward one step.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if !self.can_continue() {
            return Err(WizardError::NameRequired);
        }
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        self.step = next;
        Ok(next)
    }

    /// Move back one step, keeping every entered value. No-op on step 1.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Submit the wizard from the summary step. Fires at most once per
    /// wizard instance; the profile goes to the session gate.
    pub fn finish(&mut self) -> Result<OnboardingProfile, WizardError> {
        if self.step != WizardStep::Summary {
            return Err(WizardError::NotAtSummary);
        }
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.draft.church_name.trim().is_empty() {
            return Err(WizardError::NameRequired);
        }
        self.submitted = true;
        Ok(self.draft.clone().into_profile())
    }
}
