use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, Api, CosmosMsg, Env, StdResult, Uint128, WasmMsg};
use mars_owner::OwnerUpdate;

/// Hard cap on the claim tax. Any attempt to configure a rate above this
/// fails and leaves the previous rate unchanged.
pub const MAX_TAX_BPS: u16 = 500;

/// Basis-point denominator used by the tax arithmetic.
pub const BPS_DENOMINATOR: u64 = 10_000;

#[cw_serde]
pub struct InstantiateMsg {
    /// The contract's owner
    pub owner: String,
    /// Receives half of every collected tax. Fixed at instantiation.
    pub treasury: String,
    /// Claim tax in basis points, at most [`MAX_TAX_BPS`]
    pub tax_bps: u16,
}

#[cw_serde]
pub struct Config {
    /// Receives the treasury share of collected taxes
    pub treasury: Addr,
    /// Claim tax in basis points
    pub tax_bps: u16,
    /// When true, the claim entry point is disabled for all callers
    pub paused: bool,
}

impl Config {
    pub fn checked(api: &dyn Api, msg: &InstantiateMsg) -> StdResult<Config> {
        Ok(Config {
            treasury: api.addr_validate(&msg.treasury)?,
            tax_bps: msg.tax_bps,
            paused: false,
        })
    }
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Claim accrued creator fees for the sender: forwards one claim per
    /// reward token to the given distributor, measures what the distributor
    /// paid the sender, and pulls the tax back via pre-approved cw20
    /// allowances. The sender must have approved the router for at least the
    /// tax beforehand.
    Claim {
        distributor: String,
        /// Reward tokens to claim, in order. Must be non-empty.
        tokens: Vec<String>,
    },

    /// Internal continuations of a claim. Only the contract itself may
    /// invoke these.
    Callback(CallbackMsg),

    /// Manages owner role state
    UpdateOwner(OwnerUpdate),

    /// Set the claim tax rate in basis points, at most [`MAX_TAX_BPS`]
    SetTaxBps {
        tax_bps: u16,
    },

    /// Add a distributor to, or remove it from, the allowlist
    SetDistributor {
        distributor: String,
        enabled: bool,
    },

    /// Withdraw retained rebate reserve held by the router itself
    WithdrawReserve {
        token: String,
        /// Amount to withdraw; `None` withdraws the full held balance
        amount: Option<Uint128>,
        /// Defaults to the owner
        recipient: Option<String>,
    },

    /// Disable or re-enable the claim entry point. Callable by the owner or
    /// the emergency owner.
    SetPaused {
        paused: bool,
    },
}

#[cw_serde]
pub enum CallbackMsg {
    /// Claim the next token of the list, then settle it
    ClaimNext {
        fee_owner: Addr,
        distributor: Addr,
        tokens: Vec<Addr>,
    },
    /// Measure the balance delta produced by the distributor call for one
    /// token and pull the tax
    SettleToken {
        fee_owner: Addr,
        distributor: Addr,
        token: Addr,
        balance_before: Uint128,
    },
}

impl CallbackMsg {
    pub fn into_cosmos_msg(self, env: &Env) -> StdResult<CosmosMsg> {
        Ok(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: env.contract.address.to_string(),
            msg: to_json_binary(&ExecuteMsg::Callback(self))?,
            funds: vec![],
        }))
    }
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get contract config
    #[returns(ConfigResponse)]
    Config {},
    /// Get owner role state
    #[returns(mars_owner::OwnerResponse)]
    Owner {},
    /// Whether a single distributor is allowlisted
    #[returns(DistributorResponse)]
    Distributor {
        distributor: String,
    },
    /// Enumerate allowlisted distributors
    #[returns(Vec<DistributorResponse>)]
    Distributors {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Rebate reserve held by the router for a token
    #[returns(ReserveResponse)]
    Reserve {
        token: String,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub treasury: String,
    pub tax_bps: u16,
    pub paused: bool,
}

#[cw_serde]
pub struct DistributorResponse {
    pub distributor: String,
    pub enabled: bool,
}

#[cw_serde]
pub struct ReserveResponse {
    pub token: String,
    pub amount: Uint128,
}
