//! Domain ports and supporting types for the hexagonal boundary.

mod chain_service;
mod session_store;

#[cfg(test)]
pub use chain_service::MockChainService;
pub use chain_service::{
    ChainService, ChainServiceError, FixtureChainService, RegistrationDraft,
};
#[cfg(test)]
pub use session_store::MockSessionStateRepository;
pub use session_store::{
    FixtureSessionStateRepository, PersistedSession, SessionStateRepository, SessionStoreError,
};
