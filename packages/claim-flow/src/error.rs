use cosmwasm_std::{Addr, StdError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("chain query failed: {0}")]
    Query(String),

    #[error("transaction {tx_hash} was not confirmed in time")]
    Timeout {
        tx_hash: String,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignerError {
    #[error("user rejected the signature request")]
    Rejected,

    #[error("no wallet provider is available")]
    Unavailable,

    #[error("wallet error: {0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("token discovery failed: {0}")]
    Upstream(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("embedded frame provider unavailable")]
    NotInFrame,

    #[error("no wallet provider available")]
    NoProvider,
}

/// Failures of a claim orchestration. Every variant carries a message fit to
/// surface to the UI; none is fatal to the session, and a fresh attempt is
/// always possible once surfaced.
#[derive(Error, Debug, PartialEq)]
pub enum FlowError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("user rejected the signature request")]
    UserRejected,

    #[error("wallet signer failed: {0}")]
    Signer(String),

    #[error("chain read failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("approval transaction for {token} failed on chain")]
    ApprovalFailed {
        token: Addr,
    },

    #[error("claim transaction {tx_hash} reverted on chain")]
    ClaimReverted {
        tx_hash: String,
    },

    #[error("transaction {tx_hash} was not confirmed within the timeout")]
    ConfirmationTimeout {
        tx_hash: String,
    },

    #[error("claim {tx_hash} confirmed without a settlement transfer to {wallet}")]
    VerificationFailed {
        tx_hash: String,
        wallet: Addr,
    },

    #[error("failed to persist the claim ledger: {0}")]
    Ledger(String),
}

impl From<SignerError> for FlowError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Rejected => FlowError::UserRejected,
            other => FlowError::Signer(other.to_string()),
        }
    }
}
