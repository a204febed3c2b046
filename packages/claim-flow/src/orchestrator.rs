//! The claim orchestration state machine: one sequential flow per
//! invocation, `Idle → CheckingAllowances → Approving[0..n] →
//! SubmittingClaim → ConfirmingClaim → SettlingBalance → Done | Failed`.
//! Approvals are unbounded cw20 allowances so future claims skip the
//! approval leg; success is never inferred from receipt status alone but
//! re-verified against the settlement asset's transfer events.

use cosmwasm_std::{to_json_binary, Addr, Event, StdResult, Uint128};
use cw20::Cw20ExecuteMsg;
use ember_types::{
    claims::{ClaimKind, LedgerEntry, TokensResponse},
    fee_router,
};

use crate::{
    cache::TokensCache,
    discovery::TokenDiscovery,
    error::{FlowError, ProviderError},
    ledger::KeyValueStore,
    provider::{ChainClient, Clock, TxOutcome, TxRequest, WalletSigner},
    service::{ClaimService, FlowAddresses},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPhase {
    Idle,
    CheckingAllowances,
    Approving {
        current: usize,
        total: usize,
    },
    SubmittingClaim,
    ConfirmingClaim,
    SettlingBalance,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// Confirmed, verified and recorded in the ledger
    Completed(Box<LedgerEntry>),
    /// Another orchestration holds the flow lock; this invocation was
    /// dropped, not queued
    AlreadyInFlight,
    /// The resolved claimable set was empty
    NothingToClaim,
}

impl<C, S, D, K, St> ClaimService<C, S, D, K, St>
where
    C: ChainClient,
    S: WalletSigner,
    D: TokenDiscovery,
    K: Clock,
    St: KeyValueStore,
{
    /// Runs one claim orchestration for `wallet`. A second invocation while
    /// one is active is a no-op.
    pub fn claim(&self, wallet: &Addr) -> Result<ClaimOutcome, FlowError> {
        let Some(_guard) = self.lock.try_acquire() else {
            return Ok(ClaimOutcome::AlreadyInFlight);
        };

        match self.run_claim(wallet) {
            Ok(outcome) => {
                if let ClaimOutcome::Completed(_) = &outcome {
                    self.phase.set(ClaimPhase::Done);
                } else {
                    self.phase.set(ClaimPhase::Idle);
                }
                Ok(outcome)
            }
            Err(err) => {
                self.phase.set(ClaimPhase::Failed);
                Err(err)
            }
        }
    }

    fn run_claim(&self, wallet: &Addr) -> Result<ClaimOutcome, FlowError> {
        self.phase.set(ClaimPhase::CheckingAllowances);
        let candidates = self.discover(wallet);
        let resolved = self.resolver().resolve(wallet, &candidates);
        if resolved.claimable_addresses.is_empty() {
            return Ok(ClaimOutcome::NothingToClaim);
        }

        let needing_approval: Vec<Addr> = resolved
            .claimable_addresses
            .iter()
            .filter(|token| self.check_allowance(wallet, token, None).needs_approval)
            .cloned()
            .collect();

        let total = needing_approval.len();
        for (idx, token) in needing_approval.iter().enumerate() {
            self.phase.set(ClaimPhase::Approving {
                current: idx + 1,
                total,
            });
            let tx = approve_tx(wallet, token, &self.addresses.router)?;
            let tx_hash = self.signer.send_transaction(&tx)?;
            let outcome = self.await_confirmation(tx_hash)?;
            if !outcome.success {
                return Err(FlowError::ApprovalFailed {
                    token: token.clone(),
                });
            }
        }

        self.phase.set(ClaimPhase::SubmittingClaim);
        let claimable = &resolved.claimable_addresses;
        let tx = if claimable.len() == 1 && claimable[0] == self.addresses.settlement {
            // single settlement-asset claims skip list assembly entirely;
            // functionally equivalent, saves gas on the common case
            direct_claim_tx(wallet, &self.addresses)?
        } else {
            claim_tx(wallet, &self.addresses, claimable)?
        };
        let tx_hash = self.signer.send_transaction(&tx)?;

        self.phase.set(ClaimPhase::ConfirmingClaim);
        let outcome = self.await_confirmation(tx_hash)?;
        if !outcome.success {
            return Err(FlowError::ClaimReverted {
                tx_hash: outcome.tx_hash,
            });
        }
        let received =
            sum_settlement_transfers(&outcome.events, &self.addresses.settlement, wallet);
        if received.is_zero() {
            // a successful receipt with no matching transfer is a failed
            // claim: nothing was actually paid out
            return Err(FlowError::VerificationFailed {
                tx_hash: outcome.tx_hash,
                wallet: wallet.clone(),
            });
        }

        self.phase.set(ClaimPhase::SettlingBalance);
        let settled = self.settle_balance(wallet, &candidates);
        self.cache.borrow_mut().insert(&TokensCache::key(wallet), settled, self.clock.now());

        let entry = self.build_ledger_entry(&resolved, outcome.tx_hash);
        self.ledger
            .borrow_mut()
            .append(entry.clone())
            .map_err(|err| FlowError::Ledger(err.to_string()))?;

        Ok(ClaimOutcome::Completed(Box::new(entry)))
    }

    /// Re-resolves until the claimable set is observed empty or the poll
    /// budget runs out; either way the last observation becomes the new
    /// displayed state.
    fn settle_balance(&self, wallet: &Addr, candidates: &[Addr]) -> TokensResponse {
        let mut last = TokensResponse::default();
        for attempt in 0..self.config.max_settle_attempts {
            last = self.resolver().resolve(wallet, candidates);
            if last.claimable_addresses.is_empty() {
                break;
            }
            if attempt + 1 < self.config.max_settle_attempts {
                self.clock.sleep(self.config.poll_interval);
            }
        }
        last
    }

    fn await_confirmation(&self, tx_hash: String) -> Result<TxOutcome, FlowError> {
        self.chain.await_confirmation(&tx_hash, self.config.confirm_timeout).map_err(|err| {
            match err {
                ProviderError::Timeout {
                    ..
                } => FlowError::ConfirmationTimeout {
                    tx_hash,
                },
                other => FlowError::Provider(other),
            }
        })
    }

    fn build_ledger_entry(&self, resolved: &TokensResponse, tx_hash: String) -> LedgerEntry {
        let timestamp = self.clock.now();
        let kind = if resolved.claimable_addresses.len() > 1 {
            ClaimKind::Batch
        } else {
            ClaimKind::Single
        };
        LedgerEntry {
            id: format!("{timestamp}-{tx_hash}"),
            kind,
            rewards: resolved.rewards.clone(),
            symbols: resolved.rewards.iter().map(|reward| reward.symbol.clone()).collect(),
            token_addresses: resolved.claimable_addresses.clone(),
            timestamp,
            tx_hash,
        }
    }
}

/// Unbounded approval: one transaction covers every future claim's tax pull.
fn approve_tx(wallet: &Addr, token: &Addr, router: &Addr) -> StdResult<TxRequest> {
    Ok(TxRequest {
        sender: wallet.clone(),
        contract: token.clone(),
        msg: to_json_binary(&Cw20ExecuteMsg::IncreaseAllowance {
            spender: router.to_string(),
            amount: Uint128::MAX,
            expires: None,
        })?,
    })
}

fn claim_tx(wallet: &Addr, addresses: &FlowAddresses, tokens: &[Addr]) -> StdResult<TxRequest> {
    Ok(TxRequest {
        sender: wallet.clone(),
        contract: addresses.router.clone(),
        msg: to_json_binary(&fee_router::ExecuteMsg::Claim {
            distributor: addresses.locker.to_string(),
            tokens: tokens.iter().map(|token| token.to_string()).collect(),
        })?,
    })
}

fn direct_claim_tx(wallet: &Addr, addresses: &FlowAddresses) -> StdResult<TxRequest> {
    Ok(TxRequest {
        sender: wallet.clone(),
        contract: addresses.router.clone(),
        msg: to_json_binary(&fee_router::ExecuteMsg::Claim {
            distributor: addresses.locker.to_string(),
            tokens: vec![addresses.settlement.to_string()],
        })?,
    })
}

/// Sums the settlement-asset transfers paid to `recipient` in a confirmed
/// transaction. Only `wasm` events of the settlement contract with a
/// complete transfer attribute set count; anything else (other contracts,
/// other actions, other recipients, malformed amounts) is ignored.
pub fn sum_settlement_transfers(events: &[Event], settlement: &Addr, recipient: &Addr) -> Uint128 {
    events
        .iter()
        .filter(|event| event.ty == "wasm")
        .filter(|event| attribute(event, "_contract_address") == Some(settlement.as_str()))
        .filter_map(|event| {
            let action = attribute(event, "action")?;
            if action != "transfer" && action != "transfer_from" {
                return None;
            }
            let from = attribute(event, "from")?;
            let to = attribute(event, "to")?;
            let amount = attribute(event, "amount")?;
            if from.is_empty() || amount.is_empty() || to != recipient.as_str() {
                return None;
            }
            amount.parse::<Uint128>().ok()
        })
        .sum()
}

fn attribute<'a>(event: &'a Event, key: &str) -> Option<&'a str> {
    event.attributes.iter().find(|attr| attr.key == key).map(|attr| attr.value.as_str())
}
