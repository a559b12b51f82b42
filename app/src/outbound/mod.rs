//! Outbound adapters implementing the domain ports.

pub mod chain;
pub mod persistence;

pub use chain::{SimulatedChain, SimulatedChainConfig};
pub use persistence::FileSessionStateRepository;
