//! Session gate — the one place auth events become route state.
//!
//! A single spawned task consumes the provider's session-change
//! subscription and gate commands through one `select!` loop, so every
//! state write is serialized and last-writer-wins follows arrival
//! order. Consumers observe the state through a `watch` channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::{AuthProvider, Session, SessionChange};
use crate::error::GateError;
use crate::identity::session_to_identity;
use crate::onboarding::OnboardingProfile;
use crate::session::router::RouteState;
use crate::store::{CompletionFlags, FlagRepository};

/// Command channel depth. Commands are small and acked one by one.
const COMMAND_BUFFER: usize = 32;

enum GateCommand {
    CompleteOnboarding {
        profile: OnboardingProfile,
        ack: oneshot::Sender<Result<(), GateError>>,
    },
    FinishTutorial {
        ack: oneshot::Sender<Result<(), GateError>>,
    },
    ResetExperience {
        ack: oneshot::Sender<Result<(), GateError>>,
    },
}

/// Handle to the session routing loop.
///
/// Dropping the gate aborts the loop, which releases the provider
/// subscription.
pub struct SessionGate {
    provider: Arc<dyn AuthProvider>,
    commands: mpsc::Sender<GateCommand>,
    state_rx: watch::Receiver<RouteState>,
    task: JoinHandle<()>,
}

impl SessionGate {
    /// Subscribe to session changes, probe the current session, and
    /// start the routing loop.
    pub fn start(provider: Arc<dyn AuthProvider>, flags: FlagRepository) -> Self {
        let (state_tx, state_rx) = watch::channel(RouteState::initial());
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        // Subscribe here, not in the task, so no change can slip
        // between construction and the loop's first poll.
        let changes = provider.subscribe();
        let worker = GateWorker {
            provider: provider.clone(),
            flags,
            state: state_tx,
        };
        let task = tokio::spawn(worker.run(changes, cmd_rx));
        Self {
            provider,
            commands: cmd_tx,
            state_rx,
            task,
        }
    }

    /// Watch route-state changes. The receiver always holds the latest
    /// published state.
    pub fn watch(&self) -> watch::Receiver<RouteState> {
        self.state_rx.clone()
    }

    /// The current route state.
    pub fn current(&self) -> RouteState {
        self.state_rx.borrow().clone()
    }

    /// Persist the completed onboarding and move to the app view.
    ///
    /// The completion flag is durably written before the new state is
    /// published; a persistence failure leaves the route untouched.
    pub async fn complete_onboarding(&self, profile: OnboardingProfile) -> Result<(), GateError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(GateCommand::CompleteOnboarding { profile, ack })
            .await
            .map_err(|_| GateError::Closed)?;
        response.await.map_err(|_| GateError::Closed)?
    }

    /// Persist the tutorial flag and hide the overlay.
    pub async fn finish_tutorial(&self) -> Result<(), GateError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(GateCommand::FinishTutorial { ack })
            .await
            .map_err(|_| GateError::Closed)?;
        response.await.map_err(|_| GateError::Closed)?
    }

    /// Clear both completion flags for the signed-in user and sign out.
    /// The login transition arrives through the session subscription.
    pub async fn reset_experience(&self) -> Result<(), GateError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(GateCommand::ResetExperience { ack })
            .await
            .map_err(|_| GateError::Closed)?;
        response.await.map_err(|_| GateError::Closed)?
    }

    /// End the session. The route moves via the subscription, in order
    /// with any other in-flight session change.
    pub async fn sign_out(&self) -> Result<(), GateError> {
        self.provider.sign_out().await.map_err(GateError::from)
    }

    /// Stop the routing loop and wait for the subscription to be
    /// released.
    pub async fn shutdown(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ── Event loop ──────────────────────────────────────────────────────

struct GateWorker {
    provider: Arc<dyn AuthProvider>,
    flags: FlagRepository,
    state: watch::Sender<RouteState>,
}

impl GateWorker {
    async fn run(
        self,
        mut changes: broadcast::Receiver<SessionChange>,
        mut commands: mpsc::Receiver<GateCommand>,
    ) {
        // One-time probe; everything after it arrives on the
        // subscription, which already covers the gap since it was
        // opened before this task started.
        if let Some(session) = self.provider.current_session().await {
            self.apply_session(session).await;
        }

        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Ok(SessionChange::SignedIn(session)) => self.apply_session(session).await,
                    Ok(SessionChange::SignedOut) => self.apply_signed_out(),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "Session subscription lagged; re-syncing");
                        match self.provider.current_session().await {
                            Some(session) => self.apply_session(session).await,
                            None => self.apply_signed_out(),
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Session subscription closed");
                        break;
                    }
                },
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("Session gate handle dropped");
                        break;
                    }
                },
            }
        }
    }

    async fn apply_session(&self, session: Session) {
        let identity = session_to_identity(&session);
        let flags = match self.flags.load(identity.id).await {
            Ok(flags) => flags,
            Err(e) => {
                warn!(
                    user_id = %identity.id,
                    error = %e,
                    "Failed to load completion flags; treating as first run"
                );
                CompletionFlags::default()
            }
        };

        let next = self.state.borrow().with_session(identity, flags);
        if let Some(identity) = &next.identity {
            info!(user_id = %identity.id, view = %next.view, "Session observed");
        }
        self.state.send_replace(next);
    }

    fn apply_signed_out(&self) {
        let next = self.state.borrow().signed_out();
        info!("Session cleared");
        self.state.send_replace(next);
    }

    async fn handle_command(&self, command: GateCommand) {
        match command {
            GateCommand::CompleteOnboarding { profile, ack } => {
                let _ = ack.send(self.complete_onboarding(profile).await);
            }
            GateCommand::FinishTutorial { ack } => {
                let _ = ack.send(self.finish_tutorial().await);
            }
            GateCommand::ResetExperience { ack } => {
                let _ = ack.send(self.reset_experience().await);
            }
        }
    }

    fn signed_in_user(&self) -> Result<uuid::Uuid, GateError> {
        self.state
            .borrow()
            .identity
            .as_ref()
            .map(|identity| identity.id)
            .ok_or(GateError::NoActiveSession)
    }

    async fn complete_onboarding(&self, profile: OnboardingProfile) -> Result<(), GateError> {
        let user_id = self.signed_in_user()?;

        // Flag first: the app view must never be published for a user
        // whose completion is not durable.
        self.flags.mark_onboarding_complete(user_id).await?;
        if let Err(e) = self.flags.store_profile(user_id, &profile).await {
            warn!(user_id = %user_id, error = %e, "Failed to persist church profile");
        }

        let flags = self.flags.load(user_id).await?;
        let next = self.state.borrow().onboarding_completed(flags);
        info!(user_id = %user_id, church = %profile.church_name, "Onboarding completed");
        self.state.send_replace(next);
        Ok(())
    }

    async fn finish_tutorial(&self) -> Result<(), GateError> {
        let user_id = self.signed_in_user()?;
        self.flags.mark_tutorial_seen(user_id).await?;

        let next = self.state.borrow().tutorial_finished();
        debug!(user_id = %user_id, "Tutorial finished");
        self.state.send_replace(next);
        Ok(())
    }

    async fn reset_experience(&self) -> Result<(), GateError> {
        let user_id = self.signed_in_user()?;
        self.flags.clear(user_id).await?;
        info!(user_id = %user_id, "Experience flags reset; signing out");
        // The SignedOut broadcast drives the login transition.
        self.provider.sign_out().await?;
        Ok(())
    }
}
