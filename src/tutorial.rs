//! First-run tutorial — a fixed, forward-only walkthrough of the app.
//!
//! The overlay is pure cursor state; persisting the `tutorial_seen` flag
//! and hiding the overlay is the session gate's job.

use serde::Serialize;

/// One tutorial card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorialStep {
    pub title: &'static str,
    pub body: &'static str,
}

/// The walkthrough, in presentation order.
pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        title: "Bem-vindo ao Minify",
        body: "Este é o painel da sua igreja. A Visão Geral reúne avisos, \
               eventos e os números mais importantes da semana.",
    },
    TutorialStep {
        title: "Calendário",
        body: "Acompanhe cultos, ensaios e eventos no Calendário. \
               Toque em um dia para ver a programação completa.",
    },
    TutorialStep {
        title: "Cultos & Liturgia",
        body: "Monte a ordem do culto e as escalas de cada equipe \
               em Cultos & Liturgia.",
    },
    TutorialStep {
        title: "Membros",
        body: "Em Membros você cadastra a membresia, organiza grupos \
               e acompanha aniversariantes.",
    },
    TutorialStep {
        title: "Financeiro",
        body: "Registre dízimos, ofertas e despesas no Financeiro. \
               Tudo pronto, bom trabalho!",
    },
];

/// Cursor over [`TUTORIAL_STEPS`]. Forward-only; the last step swaps the
/// Next action for Finish in the shell.
#[derive(Debug, Clone, Default)]
pub struct TutorialOverlay {
    index: usize,
}

impl TutorialOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static TutorialStep {
        &TUTORIAL_STEPS[self.index]
    }

    /// 0-based position of the cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of steps, for the "1 de 5" header.
    pub fn total_steps(&self) -> usize {
        TUTORIAL_STEPS.len()
    }

    /// Whether the shell should render Finish instead of Next.
    pub fn is_last(&self) -> bool {
        self.index == TUTORIAL_STEPS.len() - 1
    }

    /// Progress fraction for the bar: `index / (len - 1)`.
    pub fn progress(&self) -> f32 {
        self.index as f32 / (TUTORIAL_STEPS.len() - 1) as f32
    }

    /// Move to the next step. On the last step this is a no-op — the
    /// shell calls the gate's finish instead.
    pub fn advance(&mut self) -> &'static TutorialStep {
        if !self.is_last() {
            self.index += 1;
        }
        self.current()
    }
}
