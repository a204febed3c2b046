use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, DepsMut, Env, Event, MessageInfo, QuerierWrapper, Response,
    StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use cw_utils::nonpayable;
use ember_types::{
    adapters::FeeLocker,
    fee_router::{CallbackMsg, BPS_DENOMINATOR},
};

use crate::{
    error::{ContractError, ContractResult},
    state::{CLAIM_LOCK, CONFIG, DISTRIBUTORS},
};

/// Entry point of a claim. Validates the request, takes the claim lock and
/// kicks off the per-token callback chain. The upstream locker pays the fee
/// owner directly, so the tax is measured from the fee owner's balance delta
/// and pulled back afterwards; the router never holds user funds ahead of
/// time.
pub fn claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    distributor: String,
    tokens: Vec<String>,
) -> ContractResult<Response> {
    nonpayable(&info)?;

    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused {});
    }

    if tokens.is_empty() {
        return Err(ContractError::NoRewardTokens {});
    }

    // only direct externally-initiated calls may claim; a sender with code
    // on chain is rejected outright
    if deps.querier.query_wasm_contract_info(info.sender.to_string()).is_ok() {
        return Err(ContractError::CallerIsContract {});
    }

    let distributor = deps.api.addr_validate(&distributor)?;
    if !DISTRIBUTORS.has(deps.storage, &distributor) {
        return Err(ContractError::DistributorNotAllowlisted {
            distributor: distributor.into(),
        });
    }
    if deps.querier.query_wasm_contract_info(distributor.to_string()).is_err() {
        return Err(ContractError::DistributorNotContract {
            distributor: distributor.into(),
        });
    }

    let tokens = tokens
        .iter()
        .map(|token| deps.api.addr_validate(token))
        .collect::<StdResult<Vec<_>>>()?;

    if CLAIM_LOCK.load(deps.storage)? {
        return Err(ContractError::ClaimInProgress {});
    }
    CLAIM_LOCK.save(deps.storage, &true)?;

    let next = CallbackMsg::ClaimNext {
        fee_owner: info.sender.clone(),
        distributor: distributor.clone(),
        tokens,
    }
    .into_cosmos_msg(&env)?;

    Ok(Response::new()
        .add_message(next)
        .add_attribute("action", "claim")
        .add_attribute("fee_owner", info.sender)
        .add_attribute("distributor", distributor))
}

pub fn execute_callback(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    callback: CallbackMsg,
) -> ContractResult<Response> {
    if info.sender != env.contract.address {
        return Err(ContractError::ExternalInvocation {});
    }
    match callback {
        CallbackMsg::ClaimNext {
            fee_owner,
            distributor,
            tokens,
        } => claim_next(deps, env, fee_owner, distributor, tokens),
        CallbackMsg::SettleToken {
            fee_owner,
            distributor,
            token,
            balance_before,
        } => settle_token(deps, env, fee_owner, distributor, token, balance_before),
    }
}

/// Processes one token of the claim: snapshot the fee owner's balance,
/// forward the claim to the distributor, then settle the delta before the
/// chain advances to the next token. An empty remainder releases the claim
/// lock.
fn claim_next(
    deps: DepsMut,
    env: Env,
    fee_owner: Addr,
    distributor: Addr,
    mut tokens: Vec<Addr>,
) -> ContractResult<Response> {
    if tokens.is_empty() {
        CLAIM_LOCK.save(deps.storage, &false)?;
        return Ok(Response::new()
            .add_attribute("action", "claim_completed")
            .add_attribute("fee_owner", fee_owner));
    }

    let token = tokens.remove(0);
    let balance_before = query_cw20_balance(&deps.querier, &token, &fee_owner)?;

    let locker = FeeLocker::new(distributor.clone());
    let claim_msg = locker.claim_msg(&fee_owner, &token)?;

    let settle = CallbackMsg::SettleToken {
        fee_owner: fee_owner.clone(),
        distributor: distributor.clone(),
        token: token.clone(),
        balance_before,
    }
    .into_cosmos_msg(&env)?;

    let next = CallbackMsg::ClaimNext {
        fee_owner,
        distributor,
        tokens,
    }
    .into_cosmos_msg(&env)?;

    Ok(Response::new()
        .add_message(claim_msg)
        .add_message(settle)
        .add_message(next)
        .add_attribute("action", "claim_token")
        .add_attribute("token", token))
}

/// Measures what the distributor actually paid the fee owner and pulls the
/// tax via pre-approved transfers: half to the treasury, the rest (absorbing
/// the odd unit) into the router's rebate reserve. A zero delta is skipped
/// rather than taxed.
fn settle_token(
    deps: DepsMut,
    env: Env,
    fee_owner: Addr,
    distributor: Addr,
    token: Addr,
    balance_before: Uint128,
) -> ContractResult<Response> {
    let balance_after = query_cw20_balance(&deps.querier, &token, &fee_owner)?;
    let claimed = balance_after.saturating_sub(balance_before);

    let mut res = Response::new()
        .add_attribute("action", "settle_token")
        .add_attribute("token", token.clone())
        .add_attribute("claimed", claimed);

    if claimed.is_zero() {
        return Ok(res);
    }

    let config = CONFIG.load(deps.storage)?;
    let (tax, treasury_share, rebate_share) = compute_tax_split(claimed, config.tax_bps)?;

    if !treasury_share.is_zero() {
        res = res.add_message(transfer_from_msg(
            &token,
            &fee_owner,
            &config.treasury,
            treasury_share,
        )?);
    }
    if !rebate_share.is_zero() {
        res = res.add_message(transfer_from_msg(
            &token,
            &fee_owner,
            &env.contract.address,
            rebate_share,
        )?);
    }

    Ok(res
        .add_event(
            Event::new("fees_claimed")
                .add_attribute("fee_owner", fee_owner)
                .add_attribute("distributor", distributor)
                .add_attribute("token", token)
                .add_attribute("claimed", claimed)
                .add_attribute("tax", tax),
        )
        .add_attribute("tax", tax))
}

/// `tax = floor(claimed * bps / 10000)`, split as
/// `treasury_share = floor(tax / 2)` and `rebate_share = tax - treasury_share`.
pub fn compute_tax_split(
    claimed: Uint128,
    tax_bps: u16,
) -> ContractResult<(Uint128, Uint128, Uint128)> {
    let tax = claimed.checked_multiply_ratio(tax_bps, BPS_DENOMINATOR)?;
    let treasury_share = tax.multiply_ratio(1u128, 2u128);
    let rebate_share = tax.checked_sub(treasury_share)?;
    Ok((tax, treasury_share, rebate_share))
}

pub fn query_cw20_balance(
    querier: &QuerierWrapper,
    token: &Addr,
    address: &Addr,
) -> StdResult<Uint128> {
    let res: cw20::BalanceResponse = querier.query_wasm_smart(
        token.clone(),
        &cw20::Cw20QueryMsg::Balance {
            address: address.to_string(),
        },
    )?;
    Ok(res.balance)
}

fn transfer_from_msg(
    token: &Addr,
    owner: &Addr,
    recipient: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: owner.to_string(),
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    }))
}
