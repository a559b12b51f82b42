//! Port for the asynchronous chain collaborator.
//!
//! The chain stands in for a real blockchain/network backend. Every
//! operation is asynchronous and may carry latency; none of them consult or
//! mutate the local ledger — the balance check belongs to the session
//! service, not this collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActivityRecord, FitnessGoal, User, UserDraft, UserId, coins_for_calories,
};

/// Errors raised by chain service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainServiceError {
    /// The call did not resolve within the adapter's deadline.
    #[error("chain call timed out: {message}")]
    Timeout { message: String },
    /// The chain answered and denied the operation.
    #[error("chain rejected the operation: {message}")]
    Rejected { message: String },
}

impl ChainServiceError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Profile fields the user supplies at registration.
///
/// The chain synthesizes everything identity-shaped (wallet address, id,
/// verification state, creation time); this payload carries only what the
/// registration screen collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub username: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub fitness_goal: FitnessGoal,
}

/// Port for chain-side registration, conversion, and verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainService: Send + Sync {
    /// Synthesize an on-chain identity for the profile fields.
    async fn register_user(&self, draft: RegistrationDraft) -> Result<User, ChainServiceError>;

    /// Convert burned calories into a coin grant.
    ///
    /// Pure function of `calories_burned`: `floor(calories * 0.1)`. Does not
    /// read or write any balance.
    async fn earn_coins(
        &self,
        user_id: &UserId,
        calories_burned: f64,
    ) -> Result<u64, ChainServiceError>;

    /// Report whether a spend settled on chain.
    async fn spend_coins(&self, user_id: &UserId, amount: u64) -> Result<bool, ChainServiceError>;

    /// Report whether an activity record passed chain-side verification.
    async fn verify_activity(&self, record: &ActivityRecord) -> Result<bool, ChainServiceError>;
}

/// Fixture implementation for tests and doctests that need a compliant chain
/// without latency or randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChainService;

#[async_trait]
impl ChainService for FixtureChainService {
    async fn register_user(&self, draft: RegistrationDraft) -> Result<User, ChainServiceError> {
        // Deterministic address so repeated fixture registrations agree.
        let address = format!("0x{:0>64}", hex::encode(draft.username.as_bytes()));
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
            created_at: chrono::DateTime::UNIX_EPOCH,
        })
        .map_err(|err| ChainServiceError::rejected(err.to_string()))
    }

    async fn earn_coins(
        &self,
        _user_id: &UserId,
        calories_burned: f64,
    ) -> Result<u64, ChainServiceError> {
        Ok(coins_for_calories(calories_burned))
    }

    async fn spend_coins(
        &self,
        _user_id: &UserId,
        _amount: u64,
    ) -> Result<bool, ChainServiceError> {
        Ok(true)
    }

    async fn verify_activity(
        &self,
        _record: &ActivityRecord,
    ) -> Result<bool, ChainServiceError> {
        Ok(true)
    }
}
