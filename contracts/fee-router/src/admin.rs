use cosmwasm_std::{
    to_json_binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use ember_types::fee_router::MAX_TAX_BPS;
use mars_owner::{OwnerError, OwnerUpdate};

use crate::{
    claim::query_cw20_balance,
    error::{ContractError, ContractResult},
    state::{CONFIG, DISTRIBUTORS, OWNER},
};

pub fn update_owner(
    deps: DepsMut,
    info: MessageInfo,
    update: OwnerUpdate,
) -> ContractResult<Response> {
    Ok(OWNER.update(deps, info, update)?)
}

pub fn assert_valid_tax_bps(tax_bps: u16) -> Result<(), ContractError> {
    if tax_bps > MAX_TAX_BPS {
        return Err(ContractError::TaxRateExceedsCap {
            tax_bps,
            max_bps: MAX_TAX_BPS,
        });
    }
    Ok(())
}

pub fn set_tax_bps(deps: DepsMut, info: MessageInfo, tax_bps: u16) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;
    assert_valid_tax_bps(tax_bps)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.tax_bps = tax_bps;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_tax_bps")
        .add_attribute("tax_bps", tax_bps.to_string()))
}

pub fn set_distributor(
    deps: DepsMut,
    info: MessageInfo,
    distributor: String,
    enabled: bool,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    let addr = deps.api.addr_validate(&distributor)?;
    if enabled {
        DISTRIBUTORS.save(deps.storage, &addr, &cosmwasm_std::Empty {})?;
    } else {
        DISTRIBUTORS.remove(deps.storage, &addr);
    }

    Ok(Response::new()
        .add_attribute("action", "set_distributor")
        .add_attribute("distributor", distributor)
        .add_attribute("enabled", enabled.to_string()))
}

/// Moves rebate reserve out of the router. The reserve is simply the
/// router's own token balance, so the withdrawable amount is bounded by it.
pub fn withdraw_reserve(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    amount: Option<Uint128>,
    recipient: Option<String>,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    let token_addr = deps.api.addr_validate(&token)?;
    let available = query_cw20_balance(&deps.querier, &token_addr, &env.contract.address)?;
    let requested = amount.unwrap_or(available);
    if requested.is_zero() || requested > available {
        return Err(ContractError::InsufficientReserve {
            token,
            requested,
            available,
        });
    }

    let recipient = match recipient {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender,
    };

    let transfer_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token_addr.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount: requested,
        })?,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(transfer_msg)
        .add_attribute("action", "withdraw_reserve")
        .add_attribute("token", token)
        .add_attribute("amount", requested)
        .add_attribute("recipient", recipient))
}

/// Global circuit breaker. The emergency owner may flip it as well as the
/// owner.
pub fn set_paused(deps: DepsMut, info: MessageInfo, paused: bool) -> ContractResult<Response> {
    if !OWNER.is_owner(deps.storage, &info.sender)?
        && !OWNER.is_emergency_owner(deps.storage, &info.sender)?
    {
        return Err(OwnerError::NotOwner {}.into());
    }

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_paused")
        .add_attribute("paused", paused.to_string()))
}
