#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdError,
    StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use ember_types::fee_locker::QueryMsg;

use crate::{msg::ExecuteMsg, state::ACCRUED_FEES};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ExecuteMsg::Claim {
            fee_owner,
            token,
        } => claim(deps, fee_owner, token),
        ExecuteMsg::Accrue {
            fee_owner,
            token,
            amount,
        } => accrue(deps, fee_owner, token, amount),
    }
}

/// Pays out the accrued fees directly to the fee owner, like the real
/// locker, and errors when nothing is claimable.
fn claim(deps: DepsMut, fee_owner: String, token: String) -> StdResult<Response> {
    let fee_owner = deps.api.addr_validate(&fee_owner)?;
    let token = deps.api.addr_validate(&token)?;

    let accrued = ACCRUED_FEES
        .may_load(deps.storage, (&fee_owner, &token))?
        .unwrap_or_default();
    if accrued.is_zero() {
        return Err(StdError::generic_err("nothing to claim"));
    }
    ACCRUED_FEES.remove(deps.storage, (&fee_owner, &token));

    let payout_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: fee_owner.to_string(),
            amount: accrued,
        })?,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(payout_msg)
        .add_attribute("action", "claim")
        .add_attribute("fee_owner", fee_owner)
        .add_attribute("token", token)
        .add_attribute("amount", accrued))
}

fn accrue(deps: DepsMut, fee_owner: String, token: String, amount: Uint128) -> StdResult<Response> {
    let fee_owner = deps.api.addr_validate(&fee_owner)?;
    let token = deps.api.addr_validate(&token)?;

    ACCRUED_FEES.update(deps.storage, (&fee_owner, &token), |accrued| -> StdResult<Uint128> {
        Ok(accrued.unwrap_or_default() + amount)
    })?;

    Ok(Response::new().add_attribute("action", "accrue"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::AvailableFees {
            fee_owner,
            token,
        } => to_json_binary(&query_available_fees(deps, fee_owner, token)?),
    }
}

fn query_available_fees(deps: Deps, fee_owner: String, token: String) -> StdResult<Uint128> {
    let fee_owner = deps.api.addr_validate(&fee_owner)?;
    let token = deps.api.addr_validate(&token)?;
    Ok(ACCRUED_FEES.may_load(deps.storage, (&fee_owner, &token))?.unwrap_or_default())
}
