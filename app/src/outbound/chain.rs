//! Simulated chain adapter.
//!
//! Stands in for a real blockchain client behind [`ChainService`]. Every
//! call sleeps for the configured latency to model network/consensus
//! round-trips; the latency value itself is not part of the contract.
//! Identities are synthesized locally, conversions follow the coin policy,
//! and spends/verifications always settle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ChainService, ChainServiceError, RegistrationDraft};
use crate::domain::{ActivityRecord, User, UserDraft, UserId, coins_for_calories};

/// Simulated chain settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedChainConfig {
    /// Artificial latency applied to every call.
    pub latency: Duration,
}

impl Default for SimulatedChainConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
        }
    }
}

/// Chain adapter that settles everything locally after an artificial delay.
pub struct SimulatedChain {
    config: SimulatedChainConfig,
    clock: Arc<dyn Clock>,
}

impl SimulatedChain {
    /// Build a simulated chain with the given latency settings.
    pub fn new(config: SimulatedChainConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    async fn settle(&self) {
        tokio::time::sleep(self.config.latency).await;
    }
}

/// Derive a fresh mock wallet address from a random UUID.
fn synthesize_wallet_address() -> String {
    let digest = Sha256::digest(Uuid::new_v4().as_bytes());
    format!("0x{}", hex::encode(digest))
}

#[async_trait]
impl ChainService for SimulatedChain {
    async fn register_user(&self, draft: RegistrationDraft) -> Result<User, ChainServiceError> {
        self.settle().await;
        let address = synthesize_wallet_address();
        debug!(address = %address, username = %draft.username, "synthesized chain identity");
        User::new(UserDraft {
            id: address.clone(),
            wallet_address: address,
            username: draft.username,
            full_name: draft.full_name,
            date_of_birth: draft.date_of_birth,
            height_cm: draft.height_cm,
            weight_kg: draft.weight_kg,
            fitness_goal: draft.fitness_goal,
            is_verified: false,
            created_at: self.clock.utc(),
        })
        .map_err(|err| ChainServiceError::rejected(err.to_string()))
    }

    async fn earn_coins(
        &self,
        user_id: &UserId,
        calories_burned: f64,
    ) -> Result<u64, ChainServiceError> {
        self.settle().await;
        let coins = coins_for_calories(calories_burned);
        debug!(user = %user_id, calories_burned, coins, "converted calories to coins");
        Ok(coins)
    }

    async fn spend_coins(&self, user_id: &UserId, amount: u64) -> Result<bool, ChainServiceError> {
        self.settle().await;
        debug!(user = %user_id, amount, "settled simulated spend");
        Ok(true)
    }

    async fn verify_activity(&self, record: &ActivityRecord) -> Result<bool, ChainServiceError> {
        self.settle().await;
        debug!(record = %record.id(), "verified simulated activity");
        Ok(true)
    }
}
