//! The read API surface exposed to the UI collaborator, plus the wiring that
//! the claim orchestration runs on. All chain interactions of a session are
//! serialized through one [`FlowLock`]; the service itself is single-threaded
//! in the event-loop sense, so cache and ledger live behind `RefCell`.

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use cosmwasm_std::{Addr, Uint128};
use ember_types::claims::{AllowanceCheckResponse, LedgerEntry, TokensResponse};

use crate::{
    cache::TokensCache,
    discovery::{collect_deployed_tokens, TokenDiscovery},
    gate::AllowanceGate,
    ledger::{KeyValueStore, Ledger, LEDGER_KEY},
    lock::FlowLock,
    orchestrator::ClaimPhase,
    provider::{ChainClient, Clock, WalletSigner},
    resolver::Resolver,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    /// Bound on each confirmation wait
    pub confirm_timeout: Duration,
    /// Delay between balance-settlement polls
    pub poll_interval: Duration,
    /// Balance-settlement poll budget
    pub max_settle_attempts: u32,
    /// Freshness window of the resolve cache
    pub cache_ttl: Duration,
    /// Reads per aggregate round trip
    pub max_batch_calls: usize,
    /// Bound on discovery pagination
    pub max_discovery_pages: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(2_500),
            max_settle_attempts: 6,
            cache_ttl: Duration::from_secs(60),
            max_batch_calls: 500,
            max_discovery_pages: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowAddresses {
    /// The fee router this core claims through
    pub router: Addr,
    /// The upstream fee locker
    pub locker: Addr,
    /// The wrapped-native settlement asset
    pub settlement: Addr,
}

pub struct ClaimService<C, S, D, K, St>
where
    C: ChainClient,
    S: WalletSigner,
    D: TokenDiscovery,
    K: Clock,
    St: KeyValueStore,
{
    pub(crate) chain: C,
    pub(crate) signer: S,
    pub(crate) discovery: D,
    pub(crate) clock: K,
    pub(crate) addresses: FlowAddresses,
    pub(crate) config: FlowConfig,
    pub(crate) cache: RefCell<TokensCache>,
    pub(crate) ledger: RefCell<Ledger<St>>,
    pub(crate) lock: Arc<FlowLock>,
    pub(crate) phase: Cell<ClaimPhase>,
}

impl<C, S, D, K, St> ClaimService<C, S, D, K, St>
where
    C: ChainClient,
    S: WalletSigner,
    D: TokenDiscovery,
    K: Clock,
    St: KeyValueStore,
{
    pub fn new(
        chain: C,
        signer: S,
        discovery: D,
        clock: K,
        addresses: FlowAddresses,
        config: FlowConfig,
        store: St,
        lock: Arc<FlowLock>,
    ) -> Self {
        let cache = RefCell::new(TokensCache::new(config.cache_ttl));
        let ledger = RefCell::new(Ledger::load(store, LEDGER_KEY));
        Self {
            chain,
            signer,
            discovery,
            clock,
            addresses,
            config,
            cache,
            ledger,
            lock,
            phase: Cell::new(ClaimPhase::Idle),
        }
    }

    /// Read-through resolution of the wallet's claimable rewards. Repeated
    /// calls within the TTL return the identical cached payload unless
    /// `force_refresh` bypasses it.
    pub fn resolve_claimable(&self, wallet: &Addr, force_refresh: bool) -> TokensResponse {
        // a manual refresh may not run concurrently with an in-flight claim;
        // it degrades to the plain cached read path instead
        let force_refresh = force_refresh && !self.lock.is_locked();
        let key = TokensCache::key(wallet);
        if !force_refresh {
            let hit = self.cache.borrow().get(&key, self.clock.now());
            if let Some(found) = hit {
                return found;
            }
        }
        let resolved = self.resolve_fresh(wallet);
        self.cache.borrow_mut().insert(&key, resolved.clone(), self.clock.now());
        resolved
    }

    pub fn check_allowance(
        &self,
        wallet: &Addr,
        token: &Addr,
        amount: Option<Uint128>,
    ) -> AllowanceCheckResponse {
        AllowanceGate::new(&self.chain).check(token, wallet, &self.addresses.router, amount)
    }

    pub fn invalidate_cache(&self, wallet: &Addr) {
        self.cache.borrow_mut().invalidate(&TokensCache::key(wallet));
    }

    /// Confirmed claims, oldest first.
    pub fn history(&self) -> Vec<LedgerEntry> {
        self.ledger.borrow().entries().to_vec()
    }

    pub fn phase(&self) -> ClaimPhase {
        self.phase.get()
    }

    pub fn is_claiming(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn addresses(&self) -> &FlowAddresses {
        &self.addresses
    }

    pub(crate) fn resolve_fresh(&self, wallet: &Addr) -> TokensResponse {
        let candidates = self.discover(wallet);
        self.resolver().resolve(wallet, &candidates)
    }

    /// Discovery failures degrade to an empty candidate set; the settlement
    /// asset is still resolved directly.
    pub(crate) fn discover(&self, wallet: &Addr) -> Vec<Addr> {
        collect_deployed_tokens(&self.discovery, wallet, self.config.max_discovery_pages)
            .unwrap_or_default()
    }

    pub(crate) fn resolver(&self) -> Resolver<'_, C> {
        Resolver::new(
            &self.chain,
            &self.addresses.locker,
            &self.addresses.settlement,
            self.config.max_batch_calls,
        )
    }
}
