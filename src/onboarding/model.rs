//! Church configuration data — catalogs, draft, and submitted profile.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the account manages the headquarters or a branch congregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurchType {
    Hq,
    Branch,
}

impl Default for ChurchType {
    fn default() -> Self {
        Self::Hq
    }
}

impl std::fmt::Display for ChurchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Hq => "hq",
            Self::Branch => "branch",
        };
        write!(f, "{s}")
    }
}

/// A selectable product module ("department") shown on onboarding step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Department {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// The fixed department catalog, matching the product's module set.
pub const DEPARTMENTS: &[Department] = &[
    Department {
        id: "calendar",
        label: "Calendário",
        description: "Agenda de eventos e programações da igreja",
    },
    Department {
        id: "services",
        label: "Cultos & Liturgia",
        description: "Planejamento de cultos e escalas de liturgia",
    },
    Department {
        id: "teaching",
        label: "Ensino / EBD",
        description: "Turmas, professores e materiais de ensino",
    },
    Department {
        id: "members",
        label: "Membros",
        description: "Cadastro e acompanhamento da membresia",
    },
    Department {
        id: "finance",
        label: "Financeiro",
        description: "Dízimos, ofertas e controle de despesas",
    },
];

/// A subscription plan shown on onboarding step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// The fixed plan catalog.
pub const PLANS: &[Plan] = &[
    Plan {
        id: "free",
        label: "Gratuito",
        description: "Para comunidades começando agora",
    },
    Plan {
        id: "pro",
        label: "Pro",
        description: "Módulos completos para igrejas em crescimento",
    },
    Plan {
        id: "premium",
        label: "Premium",
        description: "Multi-congregação e suporte dedicado",
    },
];

/// Plan pre-selected on a fresh wizard.
pub const DEFAULT_PLAN_ID: &str = "free";

pub fn is_known_department(id: &str) -> bool {
    DEPARTMENTS.iter().any(|d| d.id == id)
}

pub fn is_known_plan(id: &str) -> bool {
    PLANS.iter().any(|p| p.id == id)
}

/// Everything the wizard collects, mutable while the user walks the steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    pub church_name: String,
    pub church_type: ChurchType,
    /// Optional; step 1 accepts a blank address.
    pub address: String,
    /// Selected department ids, ordered for stable read-back.
    pub departments: BTreeSet<String>,
    pub plan_id: String,
}

impl OnboardingDraft {
    pub fn new() -> Self {
        Self {
            church_name: String::new(),
            church_type: ChurchType::default(),
            address: String::new(),
            departments: BTreeSet::new(),
            plan_id: DEFAULT_PLAN_ID.to_string(),
        }
    }

    /// Freeze the draft into the submitted profile.
    pub fn into_profile(self) -> OnboardingProfile {
        OnboardingProfile {
            church_name: self.church_name.trim().to_string(),
            church_type: self.church_type,
            address: self.address.trim().to_string(),
            departments: self.departments,
            plan_id: self.plan_id,
            completed_at: Utc::now(),
        }
    }
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// The immutable result of a completed wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProfile {
    pub church_name: String,
    pub church_type: ChurchType,
    pub address: String,
    pub departments: BTreeSet<String>,
    pub plan_id: String,
    pub completed_at: DateTime<Utc>,
}
