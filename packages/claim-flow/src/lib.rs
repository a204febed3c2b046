//! Off-chain core of the Ember creator-fee claim flow.
//!
//! The UI collaborator consumes three surfaces: the read API of
//! [`service::ClaimService`] (cached claimable resolution, allowance checks),
//! its [`claim`](service::ClaimService::claim) entry driving the orchestration
//! state machine, and the [`session`] bootstrap that selects a wallet signer
//! once per session. Everything chain-facing goes through the capability
//! traits in [`provider`], so the whole flow runs unmodified against a test
//! chain.

pub mod cache;
pub mod discovery;
pub mod error;
pub mod format;
pub mod gate;
pub mod ledger;
pub mod lock;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod service;
pub mod session;

pub use crate::{
    error::{DiscoveryError, FlowError, ProviderError, SessionError, SignerError},
    orchestrator::{ClaimOutcome, ClaimPhase},
    service::{ClaimService, FlowAddresses, FlowConfig},
};
