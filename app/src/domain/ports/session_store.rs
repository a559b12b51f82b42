//! Port for device-local session snapshot persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityRecord, CoinLedger, User};

/// Errors raised by session-state repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// Device storage could not be read or written.
    #[error("session storage io failed: {message}")]
    Io { message: String },
    /// A persisted entry could not be (de)serialized.
    #[error("session storage serialization failed: {message}")]
    Serialization { message: String },
}

impl SessionStoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// The durable copy of the session snapshot.
///
/// Adapters map the three entries to the device keys `user`, `coins`, and
/// `activities`; absent coins/activities hydrate to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: User,
    pub coins: CoinLedger,
    pub activities: Vec<ActivityRecord>,
}

/// Port for reading and writing the persisted session snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStateRepository: Send + Sync {
    /// Read the persisted snapshot; `None` when no identity is stored.
    async fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError>;

    /// Replace the persisted snapshot.
    async fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError>;

    /// Remove every persisted entry; succeeds when nothing is stored.
    async fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionStateRepository;

#[async_trait]
impl SessionStateRepository for FixtureSessionStateRepository {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
        Ok(None)
    }

    async fn save(&self, _session: &PersistedSession) -> Result<(), SessionStoreError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}
