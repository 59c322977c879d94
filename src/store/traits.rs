//! `FlagStore` trait — durable key-value storage for per-user flags.

use async_trait::async_trait;

use crate::error::FlagStoreError;

/// Backend-agnostic key-value store for experience flags.
///
/// Keys are plain strings; values are short strings (`"true"` markers or
/// serialized JSON). Key shapes are owned by
/// [`FlagRepository`](crate::store::FlagRepository) — backends never
/// interpret them.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, FlagStoreError>;

    /// Write a value, replacing any existing one.
    async fn set(&self, key: &str, value: &str) -> Result<(), FlagStoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), FlagStoreError>;
}
