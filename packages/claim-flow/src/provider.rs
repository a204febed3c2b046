//! Capability traits the claim core is written against. The UI host wires
//! real transports behind them; the test suites wire a `cw-multi-test` chain
//! and scripted signers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cosmwasm_std::{Addr, Binary, Event, Uint128};

use crate::error::{ProviderError, SignerError};

/// A transaction to be signed and broadcast by the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TxRequest {
    pub sender: Addr,
    pub contract: Addr,
    pub msg: Binary,
}

/// Observed result of a broadcast transaction. `success` mirrors the receipt
/// status; `events` carries the full event log for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub success: bool,
    pub events: Vec<Event>,
}

/// One read of an aggregated batch, `(target, allow_failure, calldata)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub target: Addr,
    pub allow_failure: bool,
    pub msg: Binary,
}

/// `(success, return data)` of one aggregated read.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub success: bool,
    pub data: Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Read path to the chain. Writes go through [`WalletSigner`]; reads and
/// confirmation waits live here so they can hit a different node than the
/// signer broadcasts to.
pub trait ChainClient {
    /// Current cw20 allowance of `owner` toward `spender`.
    fn allowance(
        &self,
        token: &Addr,
        owner: &Addr,
        spender: &Addr,
    ) -> Result<Uint128, ProviderError>;

    /// Direct read of the locker's per-owner available-fees accessor.
    fn available_fees(
        &self,
        locker: &Addr,
        fee_owner: &Addr,
        token: &Addr,
    ) -> Result<Uint128, ProviderError>;

    /// Batched reads through the call-aggregation contract. The result list
    /// aligns 1:1 with `calls`; individual failures are reported in-band
    /// when `allow_failure` is set.
    fn aggregate(&self, calls: &[AggregateCall]) -> Result<Vec<AggregateResult>, ProviderError>;

    fn token_metadata(&self, token: &Addr) -> Result<TokenMetadata, ProviderError>;

    /// Waits for one confirmation of `tx_hash`, bounded by `timeout`.
    fn await_confirmation(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<TxOutcome, ProviderError>;
}

/// The wallet capability: account discovery, chain selection and transaction
/// submission. Submission blocks until the signer responds or the user
/// cancels; the flow holds no active cancel once a transaction is broadcast.
pub trait WalletSigner {
    fn request_accounts(&self) -> Result<Vec<Addr>, SignerError>;

    fn chain_id(&self) -> Result<String, SignerError>;

    fn switch_chain(&self, chain_id: &str) -> Result<(), SignerError>;

    /// Returns the transaction hash once broadcast.
    fn send_transaction(&self, tx: &TxRequest) -> Result<String, SignerError>;
}

impl<T: WalletSigner + ?Sized> WalletSigner for Box<T> {
    fn request_accounts(&self) -> Result<Vec<Addr>, SignerError> {
        (**self).request_accounts()
    }

    fn chain_id(&self) -> Result<String, SignerError> {
        (**self).chain_id()
    }

    fn switch_chain(&self, chain_id: &str) -> Result<(), SignerError> {
        (**self).switch_chain(chain_id)
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<String, SignerError> {
        (**self).send_transaction(tx)
    }
}

/// Time source and delay capability, injected so the settle loop and cache
/// TTL are deterministic under test.
pub trait Clock {
    /// Unix seconds
    fn now(&self) -> u64;

    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
