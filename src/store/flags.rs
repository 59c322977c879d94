//! Typed repository over the flag store.
//!
//! The raw store speaks string keys; everything above it speaks users and
//! [`CompletionFlags`]. All key shapes live here and nowhere else.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::FlagStoreError;
use crate::onboarding::OnboardingProfile;
use crate::store::traits::FlagStore;

/// Marker value for a set boolean flag. Anything else reads as unset.
const FLAG_SET: &str = "true";

/// Per-user first-run completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionFlags {
    /// The onboarding wizard was completed at least once.
    pub onboarding_complete: bool,
    /// The app tutorial was finished (or will never be shown again).
    pub tutorial_seen: bool,
}

/// Typed access to per-user experience flags.
#[derive(Clone)]
pub struct FlagRepository {
    store: Arc<dyn FlagStore>,
}

impl FlagRepository {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }

    fn onboarding_key(user_id: Uuid) -> String {
        format!("onboarding_{user_id}")
    }

    fn tutorial_key(user_id: Uuid) -> String {
        format!("tutorial_seen_{user_id}")
    }

    fn profile_key(user_id: Uuid) -> String {
        format!("church_profile_{user_id}")
    }

    /// Load both completion flags for a user. Absent keys read as unset.
    pub async fn load(&self, user_id: Uuid) -> Result<CompletionFlags, FlagStoreError> {
        let onboarding = self.store.get(&Self::onboarding_key(user_id)).await?;
        let tutorial = self.store.get(&Self::tutorial_key(user_id)).await?;
        Ok(CompletionFlags {
            onboarding_complete: onboarding.as_deref() == Some(FLAG_SET),
            tutorial_seen: tutorial.as_deref() == Some(FLAG_SET),
        })
    }

    pub async fn mark_onboarding_complete(&self, user_id: Uuid) -> Result<(), FlagStoreError> {
        self.store
            .set(&Self::onboarding_key(user_id), FLAG_SET)
            .await
    }

    pub async fn mark_tutorial_seen(&self, user_id: Uuid) -> Result<(), FlagStoreError> {
        self.store.set(&Self::tutorial_key(user_id), FLAG_SET).await
    }

    /// Persist the submitted church configuration alongside the flag.
    pub async fn store_profile(
        &self,
        user_id: Uuid,
        profile: &OnboardingProfile,
    ) -> Result<(), FlagStoreError> {
        let json = serde_json::to_string(profile)
            .map_err(|e| FlagStoreError::Serialization(e.to_string()))?;
        self.store.set(&Self::profile_key(user_id), &json).await
    }

    pub async fn load_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<OnboardingProfile>, FlagStoreError> {
        match self.store.get(&Self::profile_key(user_id)).await? {
            Some(json) => {
                let profile = serde_json::from_str(&json)
                    .map_err(|e| FlagStoreError::Serialization(e.to_string()))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// Remove every record for the user (reset of the first-run experience).
    pub async fn clear(&self, user_id: Uuid) -> Result<(), FlagStoreError> {
        self.store.remove(&Self::onboarding_key(user_id)).await?;
        self.store.remove(&Self::tutorial_key(user_id)).await?;
        self.store.remove(&Self::profile_key(user_id)).await?;
        Ok(())
    }
}
