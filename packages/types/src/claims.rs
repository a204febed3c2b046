//! Data model of the off-chain claim core: resolved reward balances, the
//! allowance-gate verdict, the client-local claim ledger and the wallet
//! session lifecycle.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};

/// One claimable reward balance, built fresh on every resolution.
#[cw_serde]
pub struct RewardAsset {
    pub address: Addr,
    pub symbol: String,
    pub decimals: u8,
    /// Raw amount in base units
    pub amount: Uint128,
    /// Human-oriented rendering of `amount`
    pub formatted: String,
}

/// Resolver output. `claimable_addresses` backs exactly the strictly
/// positive entries of `rewards`; passing anything else to a claim makes the
/// locker revert on a nothing-to-claim condition.
#[cw_serde]
#[derive(Default)]
pub struct TokensResponse {
    pub rewards: Vec<RewardAsset>,
    pub claimable_addresses: Vec<Addr>,
}

#[cw_serde]
pub struct AllowanceCheckResponse {
    pub allowance: Uint128,
    pub needs_approval: bool,
}

#[cw_serde]
pub enum ClaimKind {
    Batch,
    Single,
}

/// One confirmed claim, appended to the client-local ledger only after the
/// transaction confirmed and its settlement transfer was verified in the
/// logs. Entries are never mutated or removed.
#[cw_serde]
pub struct LedgerEntry {
    pub id: String,
    pub kind: ClaimKind,
    /// Rewards as resolved immediately before submission
    pub rewards: Vec<RewardAsset>,
    pub symbols: Vec<String>,
    pub token_addresses: Vec<Addr>,
    /// Unix seconds
    pub timestamp: u64,
    pub tx_hash: String,
}

/// Lifecycle of the wallet/session context, not of any single claim.
#[cw_serde]
#[derive(Copy)]
pub enum SessionStatus {
    Booting,
    Connecting,
    Ready,
    NotInFrame,
    Error,
}
