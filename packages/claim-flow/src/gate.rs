use cosmwasm_std::{Addr, Uint128};
use ember_types::claims::AllowanceCheckResponse;

use crate::provider::ChainClient;

/// Whether an approval transaction must precede a claim. With a known
/// required amount the allowance must cover it; without one, only a zero
/// allowance demands approval.
pub fn needs_approval(allowance: Uint128, required: Option<Uint128>) -> bool {
    match required {
        Some(required) => allowance < required,
        None => allowance.is_zero(),
    }
}

pub struct AllowanceGate<'a, C: ChainClient> {
    chain: &'a C,
}

impl<'a, C: ChainClient> AllowanceGate<'a, C> {
    pub fn new(chain: &'a C) -> Self {
        Self {
            chain,
        }
    }

    /// Read errors degrade to "approval needed": an approval the system
    /// cannot confirm is never skipped.
    pub fn check(
        &self,
        token: &Addr,
        owner: &Addr,
        spender: &Addr,
        required: Option<Uint128>,
    ) -> AllowanceCheckResponse {
        match self.chain.allowance(token, owner, spender) {
            Ok(allowance) => AllowanceCheckResponse {
                allowance,
                needs_approval: needs_approval(allowance, required),
            },
            Err(_) => AllowanceCheckResponse {
                allowance: Uint128::zero(),
                needs_approval: true,
            },
        }
    }
}
