#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdResult,
};
use cw_storage_plus::Bound;
use cw_utils::maybe_addr;
use ember_types::fee_router::{
    Config, ConfigResponse, DistributorResponse, ExecuteMsg, InstantiateMsg, QueryMsg,
    ReserveResponse,
};
use mars_owner::OwnerInit::SetInitialOwner;

use crate::{
    admin,
    claim::{self, query_cw20_balance},
    error::ContractResult,
    state::{CLAIM_LOCK, CONFIG, DISTRIBUTORS, OWNER},
};

pub const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// INIT

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    cw2::set_contract_version(
        deps.storage,
        format!("crates.io:{CONTRACT_NAME}"),
        CONTRACT_VERSION,
    )?;

    admin::assert_valid_tax_bps(msg.tax_bps)?;

    OWNER.initialize(
        deps.storage,
        deps.api,
        SetInitialOwner {
            owner: msg.owner.clone(),
        },
    )?;

    let config = Config::checked(deps.api, &msg)?;
    CONFIG.save(deps.storage, &config)?;
    CLAIM_LOCK.save(deps.storage, &false)?;

    Ok(Response::default())
}

// EXECUTE

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::Claim {
            distributor,
            tokens,
        } => claim::claim(deps, env, info, distributor, tokens),
        ExecuteMsg::Callback(callback) => claim::execute_callback(deps, env, info, callback),
        ExecuteMsg::UpdateOwner(update) => admin::update_owner(deps, info, update),
        ExecuteMsg::SetTaxBps {
            tax_bps,
        } => admin::set_tax_bps(deps, info, tax_bps),
        ExecuteMsg::SetDistributor {
            distributor,
            enabled,
        } => admin::set_distributor(deps, info, distributor, enabled),
        ExecuteMsg::WithdrawReserve {
            token,
            amount,
            recipient,
        } => admin::withdraw_reserve(deps, env, info, token, amount, recipient),
        ExecuteMsg::SetPaused {
            paused,
        } => admin::set_paused(deps, info, paused),
    }
}

// QUERIES

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Owner {} => to_json_binary(&OWNER.query(deps.storage)?),
        QueryMsg::Distributor {
            distributor,
        } => to_json_binary(&query_distributor(deps, distributor)?),
        QueryMsg::Distributors {
            start_after,
            limit,
        } => to_json_binary(&query_distributors(deps, start_after, limit)?),
        QueryMsg::Reserve {
            token,
        } => to_json_binary(&query_reserve(deps, env, token)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        treasury: config.treasury.into(),
        tax_bps: config.tax_bps,
        paused: config.paused,
    })
}

fn query_distributor(deps: Deps, distributor: String) -> StdResult<DistributorResponse> {
    let addr = deps.api.addr_validate(&distributor)?;
    Ok(DistributorResponse {
        distributor,
        enabled: DISTRIBUTORS.has(deps.storage, &addr),
    })
}

fn query_distributors(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<DistributorResponse>> {
    let addr = maybe_addr(deps.api, start_after)?;
    let start = addr.as_ref().map(Bound::exclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    DISTRIBUTORS
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            Ok(DistributorResponse {
                distributor: item?.into(),
                enabled: true,
            })
        })
        .collect()
}

fn query_reserve(deps: Deps, env: Env, token: String) -> StdResult<ReserveResponse> {
    let addr = deps.api.addr_validate(&token)?;
    let amount = query_cw20_balance(&deps.querier, &addr, &env.contract.address)?;
    Ok(ReserveResponse {
        token,
        amount,
    })
}
