#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cosmwasm_std::{
    to_json_binary, Addr, Binary, Empty, QueryRequest, Uint128, WasmMsg, WasmQuery,
};
use cw20::{AllowanceResponse, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse, TokenInfoResponse};
use cw_multi_test::{App, BasicApp, Contract, ContractWrapper, Executor};
use ember_claim_flow::{
    discovery::{TokenDiscovery, TokenPage},
    error::{DiscoveryError, ProviderError, SignerError},
    ledger::MemoryStore,
    lock::FlowLock,
    provider::{
        AggregateCall, AggregateResult, ChainClient, Clock, TokenMetadata, TxOutcome, TxRequest,
        WalletSigner,
    },
    ClaimService, FlowAddresses, FlowConfig,
};
use ember_types::fee_router::{ExecuteMsg as RouterExecuteMsg, InstantiateMsg};

pub const TAX_BPS: u16 = 300;
pub const CHAIN_ID: &str = "ember-1";

type SharedApp = Rc<RefCell<BasicApp>>;
type SharedOutcomes = Rc<RefCell<HashMap<String, TxOutcome>>>;

fn router_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        ember_fee_router::contract::execute,
        ember_fee_router::contract::instantiate,
        ember_fee_router::contract::query,
    ))
}

fn locker_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        ember_mock_fee_locker::contract::execute,
        ember_mock_fee_locker::contract::instantiate,
        ember_mock_fee_locker::contract::query,
    ))
}

fn cw20_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

fn instantiate_cw20(
    app: &mut BasicApp,
    code_id: u64,
    minter: &Addr,
    symbol: &str,
    decimals: u8,
) -> Addr {
    app.instantiate_contract(
        code_id,
        minter.clone(),
        &cw20_base::msg::InstantiateMsg {
            name: format!("{symbol} token"),
            symbol: symbol.to_string(),
            decimals,
            initial_balances: vec![],
            mint: Some(MinterResponse {
                minter: minter.to_string(),
                cap: None,
            }),
            marketing: None,
        },
        &[],
        symbol,
        None,
    )
    .unwrap()
}

/// A deployed chain: router + locker + settlement token, with the wallet as
/// the claiming fee owner.
pub struct TestBed {
    pub app: SharedApp,
    pub outcomes: SharedOutcomes,
    pub wallet: Addr,
    pub owner: Addr,
    pub treasury: Addr,
    pub router: Addr,
    pub locker: Addr,
    pub settlement: Addr,
    cw20_code_id: u64,
}

impl TestBed {
    pub fn new() -> Self {
        let mut app = App::default();
        let owner = Addr::unchecked("owner");
        let treasury = Addr::unchecked("treasury");
        let wallet = Addr::unchecked("wallet");

        let router_code_id = app.store_code(router_contract());
        let locker_code_id = app.store_code(locker_contract());
        let cw20_code_id = app.store_code(cw20_contract());

        let locker = app
            .instantiate_contract(
                locker_code_id,
                owner.clone(),
                &Empty {},
                &[],
                "mock-fee-locker",
                None,
            )
            .unwrap();

        let router = app
            .instantiate_contract(
                router_code_id,
                owner.clone(),
                &InstantiateMsg {
                    owner: owner.to_string(),
                    treasury: treasury.to_string(),
                    tax_bps: TAX_BPS,
                },
                &[],
                "fee-router",
                None,
            )
            .unwrap();

        app.execute_contract(
            owner.clone(),
            router.clone(),
            &RouterExecuteMsg::SetDistributor {
                distributor: locker.to_string(),
                enabled: true,
            },
            &[],
        )
        .unwrap();

        let settlement = instantiate_cw20(&mut app, cw20_code_id, &owner, "WGAS", 18);

        TestBed {
            app: Rc::new(RefCell::new(app)),
            outcomes: Rc::new(RefCell::new(HashMap::new())),
            wallet,
            owner,
            treasury,
            router,
            locker,
            settlement,
            cw20_code_id,
        }
    }

    pub fn deploy_token(&self, symbol: &str, decimals: u8) -> Addr {
        instantiate_cw20(&mut self.app.borrow_mut(), self.cw20_code_id, &self.owner, symbol, decimals)
    }

    /// Seeds claimable fees for the wallet: mints the payout to the locker
    /// and records the accrual.
    pub fn accrue(&self, token: &Addr, amount: u128) {
        self.app
            .borrow_mut()
            .execute_contract(
                self.owner.clone(),
                token.clone(),
                &Cw20ExecuteMsg::Mint {
                    recipient: self.locker.to_string(),
                    amount: Uint128::new(amount),
                },
                &[],
            )
            .unwrap();
        self.app
            .borrow_mut()
            .execute_contract(
                self.owner.clone(),
                self.locker.clone(),
                &ember_mock_fee_locker::msg::ExecuteMsg::Accrue {
                    fee_owner: self.wallet.to_string(),
                    token: token.to_string(),
                    amount: Uint128::new(amount),
                },
                &[],
            )
            .unwrap();
    }

    /// On-chain approval outside the orchestrator, for read-API tests.
    pub fn approve(&self, token: &Addr, amount: Uint128) {
        self.app
            .borrow_mut()
            .execute_contract(
                self.wallet.clone(),
                token.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: self.router.to_string(),
                    amount,
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    pub fn balance(&self, token: &Addr, address: &Addr) -> Uint128 {
        let res: cw20::BalanceResponse = self
            .app
            .borrow()
            .wrap()
            .query_wasm_smart(
                token.clone(),
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    pub fn chain(&self) -> TestChain {
        TestChain {
            app: Rc::clone(&self.app),
            outcomes: Rc::clone(&self.outcomes),
            fees_reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn addresses(&self) -> FlowAddresses {
        FlowAddresses {
            router: self.router.clone(),
            locker: self.locker.clone(),
            settlement: self.settlement.clone(),
        }
    }

    pub fn harness(&self, discovery_pages: Vec<Vec<Addr>>) -> Harness<TestChain> {
        let chain = self.chain();
        self.harness_with_chain(chain.clone(), chain, discovery_pages)
    }

    /// Builds the service over an arbitrary chain client (e.g. a laggy
    /// wrapper), keeping the underlying [`TestChain`] handle for counters.
    pub fn harness_with_chain<C: ChainClient>(
        &self,
        chain: C,
        underlying: TestChain,
        discovery_pages: Vec<Vec<Addr>>,
    ) -> Harness<C> {
        let signer = TestSigner {
            app: Rc::clone(&self.app),
            outcomes: Rc::clone(&self.outcomes),
            wallet: self.wallet.clone(),
            sent: Rc::new(RefCell::new(Vec::new())),
            counter: Rc::new(Cell::new(0)),
            reject_next: Rc::new(Cell::new(false)),
        };
        let clock = TestClock {
            now: Rc::new(Cell::new(1_700_000_000)),
            sleeps: Rc::new(RefCell::new(Vec::new())),
        };
        let lock = Arc::new(FlowLock::new());
        let service = ClaimService::new(
            chain,
            signer.clone(),
            StaticDiscovery {
                pages: discovery_pages,
            },
            clock.clone(),
            self.addresses(),
            FlowConfig::default(),
            MemoryStore::new(),
            Arc::clone(&lock),
        );
        Harness {
            service,
            chain: underlying,
            signer,
            clock,
            lock,
        }
    }
}

pub struct Harness<C: ChainClient> {
    pub service: ClaimService<C, TestSigner, StaticDiscovery, TestClock, MemoryStore>,
    pub chain: TestChain,
    pub signer: TestSigner,
    pub clock: TestClock,
    pub lock: Arc<FlowLock>,
}

#[derive(Clone)]
pub struct TestChain {
    pub app: SharedApp,
    pub outcomes: SharedOutcomes,
    /// Direct locker reads, to observe cache hits vs upstream fetches
    pub fees_reads: Rc<Cell<usize>>,
}

impl ChainClient for TestChain {
    fn allowance(
        &self,
        token: &Addr,
        owner: &Addr,
        spender: &Addr,
    ) -> Result<Uint128, ProviderError> {
        let res: AllowanceResponse = self
            .app
            .borrow()
            .wrap()
            .query_wasm_smart(
                token.clone(),
                &Cw20QueryMsg::Allowance {
                    owner: owner.to_string(),
                    spender: spender.to_string(),
                },
            )
            .map_err(|err| ProviderError::Query(err.to_string()))?;
        Ok(res.allowance)
    }

    fn available_fees(
        &self,
        locker: &Addr,
        fee_owner: &Addr,
        token: &Addr,
    ) -> Result<Uint128, ProviderError> {
        self.fees_reads.set(self.fees_reads.get() + 1);
        self.app
            .borrow()
            .wrap()
            .query_wasm_smart(
                locker.clone(),
                &ember_types::fee_locker::QueryMsg::AvailableFees {
                    fee_owner: fee_owner.to_string(),
                    token: token.to_string(),
                },
            )
            .map_err(|err| ProviderError::Query(err.to_string()))
    }

    fn aggregate(&self, calls: &[AggregateCall]) -> Result<Vec<AggregateResult>, ProviderError> {
        calls
            .iter()
            .map(|call| {
                let res = self.app.borrow().wrap().query::<serde_json::Value>(
                    &QueryRequest::Wasm(WasmQuery::Smart {
                        contract_addr: call.target.to_string(),
                        msg: call.msg.clone(),
                    }),
                );
                match res {
                    Ok(value) => Ok(AggregateResult {
                        success: true,
                        data: to_json_binary(&value)
                            .map_err(|err| ProviderError::Query(err.to_string()))?,
                    }),
                    Err(_) if call.allow_failure => Ok(AggregateResult {
                        success: false,
                        data: Binary::default(),
                    }),
                    Err(err) => Err(ProviderError::Query(err.to_string())),
                }
            })
            .collect()
    }

    fn token_metadata(&self, token: &Addr) -> Result<TokenMetadata, ProviderError> {
        let res: TokenInfoResponse = self
            .app
            .borrow()
            .wrap()
            .query_wasm_smart(token.clone(), &Cw20QueryMsg::TokenInfo {})
            .map_err(|err| ProviderError::Query(err.to_string()))?;
        Ok(TokenMetadata {
            symbol: res.symbol,
            decimals: res.decimals,
        })
    }

    fn await_confirmation(
        &self,
        tx_hash: &str,
        _timeout: Duration,
    ) -> Result<TxOutcome, ProviderError> {
        self.outcomes.borrow().get(tx_hash).cloned().ok_or_else(|| ProviderError::Timeout {
            tx_hash: tx_hash.to_string(),
        })
    }
}

/// Broadcasts straight into the multi-test app; a scripted rejection stands
/// in for the user declining in the wallet.
#[derive(Clone)]
pub struct TestSigner {
    pub app: SharedApp,
    pub outcomes: SharedOutcomes,
    pub wallet: Addr,
    pub sent: Rc<RefCell<Vec<TxRequest>>>,
    pub counter: Rc<Cell<u64>>,
    pub reject_next: Rc<Cell<bool>>,
}

impl WalletSigner for TestSigner {
    fn request_accounts(&self) -> Result<Vec<Addr>, SignerError> {
        Ok(vec![self.wallet.clone()])
    }

    fn chain_id(&self) -> Result<String, SignerError> {
        Ok(CHAIN_ID.to_string())
    }

    fn switch_chain(&self, _chain_id: &str) -> Result<(), SignerError> {
        Ok(())
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<String, SignerError> {
        if self.reject_next.replace(false) {
            return Err(SignerError::Rejected);
        }
        self.sent.borrow_mut().push(tx.clone());

        let tx_hash = format!("tx-{}", self.counter.get() + 1);
        self.counter.set(self.counter.get() + 1);

        let result = self.app.borrow_mut().execute(
            tx.sender.clone(),
            WasmMsg::Execute {
                contract_addr: tx.contract.to_string(),
                msg: tx.msg.clone(),
                funds: vec![],
            }
            .into(),
        );
        let outcome = match result {
            Ok(res) => TxOutcome {
                tx_hash: tx_hash.clone(),
                success: true,
                events: res.events,
            },
            Err(_) => TxOutcome {
                tx_hash: tx_hash.clone(),
                success: false,
                events: vec![],
            },
        };
        self.outcomes.borrow_mut().insert(tx_hash.clone(), outcome);
        Ok(tx_hash)
    }
}

#[derive(Clone)]
pub struct TestClock {
    pub now: Rc<Cell<u64>>,
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl TestClock {
    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for TestClock {
    fn now(&self) -> u64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration.as_secs());
    }
}

pub struct StaticDiscovery {
    pub pages: Vec<Vec<Addr>>,
}

impl TokenDiscovery for StaticDiscovery {
    fn deployed_tokens_page(
        &self,
        _wallet: &Addr,
        cursor: Option<&str>,
    ) -> Result<TokenPage, DiscoveryError> {
        let idx: usize = match cursor {
            None => 0,
            Some(raw) => raw
                .parse()
                .map_err(|_| DiscoveryError::Upstream(format!("bad cursor {raw}")))?,
        };
        let tokens = self.pages.get(idx).cloned().unwrap_or_default();
        let next = if idx + 1 < self.pages.len() {
            Some((idx + 1).to_string())
        } else {
            None
        };
        Ok(TokenPage {
            tokens,
            next,
        })
    }
}

/// Serves stale positive settlement fees for the first `stale_resolves`
/// reads, emulating the propagation lag between the write node and the read
/// path.
#[derive(Clone)]
pub struct LagChain {
    pub inner: TestChain,
    pub stale_resolves: Rc<Cell<u32>>,
    pub stale_fees: Uint128,
}

impl ChainClient for LagChain {
    fn allowance(
        &self,
        token: &Addr,
        owner: &Addr,
        spender: &Addr,
    ) -> Result<Uint128, ProviderError> {
        self.inner.allowance(token, owner, spender)
    }

    fn available_fees(
        &self,
        locker: &Addr,
        fee_owner: &Addr,
        token: &Addr,
    ) -> Result<Uint128, ProviderError> {
        let remaining = self.stale_resolves.get();
        if remaining > 0 {
            self.stale_resolves.set(remaining - 1);
            return Ok(self.stale_fees);
        }
        self.inner.available_fees(locker, fee_owner, token)
    }

    fn aggregate(&self, calls: &[AggregateCall]) -> Result<Vec<AggregateResult>, ProviderError> {
        self.inner.aggregate(calls)
    }

    fn token_metadata(&self, token: &Addr) -> Result<TokenMetadata, ProviderError> {
        self.inner.token_metadata(token)
    }

    fn await_confirmation(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<TxOutcome, ProviderError> {
        self.inner.await_confirmation(tx_hash, timeout)
    }
}
