//! Claimable-balance resolution. Determines, for a fee owner, which reward
//! assets currently carry a strictly positive claimable balance. The
//! settlement asset is read directly from the locker's accessor; candidate
//! sets are batched through the call-aggregation interface. Read failures
//! degrade to zero for the affected asset only, which keeps the hard
//! invariant that no zero-balance address is ever offered for claiming.

use std::collections::HashSet;

use cosmwasm_std::{from_json, Addr, Binary, Uint128};
use ember_types::{
    adapters::FeeLocker,
    claims::{RewardAsset, TokensResponse},
};

use crate::{
    format::format_token_amount,
    provider::{AggregateCall, AggregateResult, ChainClient, TokenMetadata},
};

/// Fallback when a token's metadata cannot be read. A positive balance is
/// never dropped over missing metadata.
const FALLBACK_SYMBOL: &str = "UNKNOWN";
const FALLBACK_DECIMALS: u8 = 6;

pub struct Resolver<'a, C: ChainClient> {
    chain: &'a C,
    locker: FeeLocker,
    settlement: &'a Addr,
    max_batch_calls: usize,
}

impl<'a, C: ChainClient> Resolver<'a, C> {
    pub fn new(chain: &'a C, locker: &Addr, settlement: &'a Addr, max_batch_calls: usize) -> Self {
        Self {
            chain,
            locker: FeeLocker::new(locker.clone()),
            settlement,
            max_batch_calls,
        }
    }

    pub fn resolve(&self, fee_owner: &Addr, candidates: &[Addr]) -> TokensResponse {
        let mut balances: Vec<(Addr, Uint128)> = Vec::new();

        let settlement_fees = self
            .chain
            .available_fees(self.locker.addr(), fee_owner, self.settlement)
            .unwrap_or_default();
        balances.push((self.settlement.clone(), settlement_fees));

        let mut seen: HashSet<&Addr> = HashSet::new();
        let others: Vec<&Addr> = candidates
            .iter()
            .filter(|token| *token != self.settlement && seen.insert(*token))
            .collect();

        for chunk in others.chunks(self.max_batch_calls) {
            let calls: Vec<AggregateCall> = chunk
                .iter()
                .map(|token| AggregateCall {
                    target: self.locker.addr().clone(),
                    allow_failure: true,
                    msg: self
                        .locker
                        .available_fees_query(fee_owner, token)
                        .unwrap_or_default(),
                })
                .collect();

            // a failed round trip degrades every call of the chunk to zero
            let results = self.chain.aggregate(&calls).unwrap_or_else(|_| {
                vec![
                    AggregateResult {
                        success: false,
                        data: Binary::default(),
                    };
                    calls.len()
                ]
            });

            for (token, result) in chunk.iter().zip(results) {
                let amount = if result.success {
                    from_json(&result.data).unwrap_or_default()
                } else {
                    Uint128::zero()
                };
                balances.push(((*token).clone(), amount));
            }
        }

        let mut rewards = Vec::new();
        let mut claimable_addresses = Vec::new();
        for (address, amount) in balances {
            if amount.is_zero() {
                continue;
            }
            let metadata = self.chain.token_metadata(&address).unwrap_or_else(|_| TokenMetadata {
                symbol: FALLBACK_SYMBOL.to_string(),
                decimals: FALLBACK_DECIMALS,
            });
            rewards.push(RewardAsset {
                address: address.clone(),
                symbol: metadata.symbol,
                decimals: metadata.decimals,
                amount,
                formatted: format_token_amount(amount, metadata.decimals),
            });
            claimable_addresses.push(address);
        }

        TokensResponse {
            rewards,
            claimable_addresses,
        }
    }
}
