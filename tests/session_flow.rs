//! Integration tests for the session-to-view routing flow.
//!
//! Each test wires the real stack — forms over an in-memory auth
//! provider, a flag repository, and the session gate's event loop —
//! and walks the journeys a frontend would drive.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;

use minify_core::auth::{
    AuthProvider, InMemoryAuthProvider, LoginForm, PasswordResetForm, RegisterForm,
    SubmitOutcome, messages,
};
use minify_core::onboarding::{OnboardingProfile, OnboardingWizard, WizardStep};
use minify_core::session::{AppView, RouteState, SessionGate};
use minify_core::store::{FlagRepository, LibSqlFlagStore, MemoryFlagStore};
use minify_core::tutorial::TutorialOverlay;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Wait until the route settles on the given view, then return it.
async fn wait_for_view(rx: &mut watch::Receiver<RouteState>, view: AppView) -> RouteState {
    timeout(TEST_TIMEOUT, rx.wait_for(|state| state.view == view))
        .await
        .expect("timed out waiting for view")
        .expect("route channel closed")
        .clone()
}

/// Drive a wizard through all four steps and submit it.
fn completed_wizard(church_name: &str) -> OnboardingProfile {
    let mut wizard = OnboardingWizard::new();
    wizard.set_church_name(church_name);
    wizard.advance().unwrap();
    wizard.toggle_department("members").unwrap();
    wizard.toggle_department("finance").unwrap();
    wizard.advance().unwrap();
    wizard.advance().unwrap();
    assert_eq!(wizard.step(), WizardStep::Summary);
    wizard.finish().unwrap()
}

fn memory_stack() -> (Arc<InMemoryAuthProvider>, FlagRepository, SessionGate) {
    let provider = Arc::new(InMemoryAuthProvider::new());
    let flags = FlagRepository::new(Arc::new(MemoryFlagStore::new()));
    let gate = SessionGate::start(provider.clone(), flags.clone());
    (provider, flags, gate)
}

// ── First-run journey ────────────────────────────────────────────────

#[tokio::test]
async fn fresh_user_walks_register_onboarding_and_tutorial() {
    timeout(TEST_TIMEOUT, async {
        let (provider, flags, gate) = memory_stack();
        let mut route = gate.watch();
        assert_eq!(gate.current().view, AppView::Login);

        // Register through the form; the route follows the broadcast.
        let mut form = RegisterForm::new();
        form.name = "Maria".to_string();
        form.email = "maria@igreja.com".to_string();
        form.password = "segredo1".to_string();
        form.confirm_password = "segredo1".to_string();
        let outcome = form.submit(provider.as_ref()).await;
        assert_eq!(outcome, SubmitOutcome::SignedIn);

        let state = wait_for_view(&mut route, AppView::Onboarding).await;
        let user_id = state.identity.as_ref().unwrap().id;
        assert!(!state.tutorial_visible);

        // Walk the four wizard steps and hand the profile to the gate.
        let mut wizard = OnboardingWizard::new();
        assert_eq!(wizard.step(), WizardStep::Identity);
        assert!(!wizard.can_continue(), "church name is required");
        wizard.set_church_name("Igreja Batista Central");
        wizard.set_address("Rua das Flores, 100");
        wizard.advance().unwrap();
        wizard.toggle_department("calendar").unwrap();
        wizard.toggle_department("members").unwrap();
        wizard.advance().unwrap();
        wizard.select_plan("free").unwrap();
        wizard.advance().unwrap();
        let profile = wizard.finish().unwrap();

        gate.complete_onboarding(profile).await.unwrap();
        let state = wait_for_view(&mut route, AppView::App).await;
        assert!(state.tutorial_visible, "first app entry shows the tutorial");

        // The submitted profile is durable under the user's key.
        let stored = flags.load_profile(user_id).await.unwrap().unwrap();
        assert_eq!(stored.church_name, "Igreja Batista Central");
        assert_eq!(stored.departments.len(), 2);

        // Walk the overlay to the end, then dismiss it for good.
        let mut overlay = TutorialOverlay::new();
        while !overlay.is_last() {
            overlay.advance();
        }
        assert_eq!(overlay.progress(), 1.0);
        gate.finish_tutorial().await.unwrap();

        let state = timeout(TEST_TIMEOUT, route.wait_for(|s| !s.tutorial_visible))
            .await
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(state.view, AppView::App);
        assert!(flags.load(user_id).await.unwrap().tutorial_seen);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn returning_user_goes_straight_to_the_app() {
    timeout(TEST_TIMEOUT, async {
        let (provider, _flags, gate) = memory_stack();
        let mut route = gate.watch();

        provider.seed_account("joao@igreja.com", "segredo1").await;
        provider.sign_in("joao@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.complete_onboarding(completed_wizard("Comunidade Vida")).await.unwrap();
        wait_for_view(&mut route, AppView::App).await;
        gate.finish_tutorial().await.unwrap();

        // Session ends and the same user comes back.
        gate.sign_out().await.unwrap();
        wait_for_view(&mut route, AppView::Login).await;
        provider.sign_in("joao@igreja.com", "segredo1").await.unwrap();

        let state = wait_for_view(&mut route, AppView::App).await;
        assert!(!state.tutorial_visible, "tutorial only shows once");
    })
    .await
    .expect("test timed out");
}

// ── Form boundary ────────────────────────────────────────────────────

#[tokio::test]
async fn login_form_moves_the_route_on_success_only() {
    timeout(TEST_TIMEOUT, async {
        let (provider, _flags, gate) = memory_stack();
        let mut route = gate.watch();
        provider.seed_account("ana@igreja.com", "segredo1").await;

        let mut form = LoginForm::new();
        form.email = "ana@igreja.com".to_string();
        form.password = "errada99".to_string();
        let outcome = form.submit(provider.as_ref()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(form.error.as_deref(), Some(messages::LOGIN_FAILED));
        assert_eq!(gate.current().view, AppView::Login);

        form.password = "segredo1".to_string();
        let outcome = form.submit(provider.as_ref()).await;
        assert_eq!(outcome, SubmitOutcome::SignedIn);
        assert!(form.error.is_none());

        wait_for_view(&mut route, AppView::Onboarding).await;
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unconfirmed_registration_keeps_the_login_view() {
    timeout(TEST_TIMEOUT, async {
        let provider = Arc::new(InMemoryAuthProvider::new().with_confirmation_required());
        let flags = FlagRepository::new(Arc::new(MemoryFlagStore::new()));
        let gate = SessionGate::start(provider.clone(), flags);
        let mut route = gate.watch();

        let mut form = RegisterForm::new();
        form.name = "Pedro".to_string();
        form.email = "pedro@igreja.com".to_string();
        form.password = "segredo1".to_string();
        form.confirm_password = "segredo1".to_string();
        let outcome = form.submit(provider.as_ref()).await;
        assert_eq!(outcome, SubmitOutcome::ConfirmationPending);
        assert_eq!(form.notice.as_deref(), Some(messages::CONFIRMATION_SENT));

        // No session was issued, so the route must not move.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gate.current().view, AppView::Login);
        assert!(gate.current().identity.is_none());

        // Once confirmed, the normal login path opens up.
        provider.confirm_email("pedro@igreja.com").await;
        let mut login = LoginForm::new();
        login.email = "pedro@igreja.com".to_string();
        login.password = "segredo1".to_string();
        assert_eq!(login.submit(provider.as_ref()).await, SubmitOutcome::SignedIn);
        wait_for_view(&mut route, AppView::Onboarding).await;
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn password_reset_request_never_touches_the_route() {
    timeout(TEST_TIMEOUT, async {
        let (provider, _flags, gate) = memory_stack();
        provider.seed_account("ana@igreja.com", "segredo1").await;

        let mut form = PasswordResetForm::new();
        form.email = "ana@igreja.com".to_string();
        let outcome = form.submit(provider.as_ref()).await;
        assert_eq!(outcome, SubmitOutcome::ResetRequested);
        assert_eq!(form.notice.as_deref(), Some(messages::RESET_SENT));

        assert_eq!(provider.reset_requests().await, vec!["ana@igreja.com".to_string()]);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gate.current().view, AppView::Login);
    })
    .await
    .expect("test timed out");
}

// ── Sign-out and reset ───────────────────────────────────────────────

#[tokio::test]
async fn sign_out_returns_to_login_from_onboarding_and_app() {
    timeout(TEST_TIMEOUT, async {
        let (provider, _flags, gate) = memory_stack();
        let mut route = gate.watch();
        provider.seed_account("ana@igreja.com", "segredo1").await;

        // From the onboarding view, mid-wizard.
        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.sign_out().await.unwrap();
        let state = wait_for_view(&mut route, AppView::Login).await;
        assert!(state.identity.is_none());

        // Flags were not touched, so the wizard greets them again.
        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.complete_onboarding(completed_wizard("Igreja da Paz")).await.unwrap();
        wait_for_view(&mut route, AppView::App).await;

        // And from inside the app.
        gate.sign_out().await.unwrap();
        let state = wait_for_view(&mut route, AppView::Login).await;
        assert!(!state.tutorial_visible);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn reset_experience_replays_the_whole_first_run() {
    timeout(TEST_TIMEOUT, async {
        let (provider, flags, gate) = memory_stack();
        let mut route = gate.watch();
        provider.seed_account("ana@igreja.com", "segredo1").await;

        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.complete_onboarding(completed_wizard("Igreja Nova")).await.unwrap();
        let state = wait_for_view(&mut route, AppView::App).await;
        let user_id = state.identity.as_ref().unwrap().id;
        gate.finish_tutorial().await.unwrap();

        gate.reset_experience().await.unwrap();
        wait_for_view(&mut route, AppView::Login).await;
        let cleared = flags.load(user_id).await.unwrap();
        assert!(!cleared.onboarding_complete);
        assert!(!cleared.tutorial_seen);
        assert!(flags.load_profile(user_id).await.unwrap().is_none());

        // The next sign-in starts from scratch, tutorial included.
        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.complete_onboarding(completed_wizard("Igreja Nova")).await.unwrap();
        let state = wait_for_view(&mut route, AppView::App).await;
        assert!(state.tutorial_visible);
    })
    .await
    .expect("test timed out");
}

// ── Durable backends ─────────────────────────────────────────────────

#[tokio::test]
async fn journey_runs_on_the_sqlite_backend() {
    timeout(TEST_TIMEOUT, async {
        let provider = Arc::new(InMemoryAuthProvider::new());
        let store = LibSqlFlagStore::new_memory().await.unwrap();
        let flags = FlagRepository::new(Arc::new(store));
        let gate = SessionGate::start(provider.clone(), flags.clone());
        let mut route = gate.watch();

        provider.seed_account("ana@igreja.com", "segredo1").await;
        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        wait_for_view(&mut route, AppView::Onboarding).await;
        gate.complete_onboarding(completed_wizard("Igreja Central")).await.unwrap();
        let state = wait_for_view(&mut route, AppView::App).await;
        let user_id = state.identity.as_ref().unwrap().id;

        let stored = flags.load(user_id).await.unwrap();
        assert!(stored.onboarding_complete);
        let profile = flags.load_profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.church_name, "Igreja Central");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn completion_survives_a_store_reopen() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("flags.db");
        let provider = Arc::new(InMemoryAuthProvider::new());
        let user_id = provider.seed_account("ana@igreja.com", "segredo1").await;

        // First run: complete everything, then tear the stack down.
        {
            let store = LibSqlFlagStore::new_local(&db_path).await.unwrap();
            let flags = FlagRepository::new(Arc::new(store));
            let gate = SessionGate::start(provider.clone(), flags);
            let mut route = gate.watch();

            provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
            wait_for_view(&mut route, AppView::Onboarding).await;
            gate.complete_onboarding(completed_wizard("Igreja Memorial")).await.unwrap();
            wait_for_view(&mut route, AppView::App).await;
            gate.finish_tutorial().await.unwrap();
            gate.sign_out().await.unwrap();
            wait_for_view(&mut route, AppView::Login).await;
            gate.shutdown().await;
        }

        // Second run over the same file: no onboarding, no tutorial.
        let store = LibSqlFlagStore::new_local(&db_path).await.unwrap();
        let flags = FlagRepository::new(Arc::new(store));
        assert!(flags.load(user_id).await.unwrap().onboarding_complete);

        let gate = SessionGate::start(provider.clone(), flags);
        let mut route = gate.watch();
        provider.sign_in("ana@igreja.com", "segredo1").await.unwrap();
        let state = wait_for_view(&mut route, AppView::App).await;
        assert!(!state.tutorial_visible);
    })
    .await
    .expect("test timed out");
}
