use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, QuerierWrapper, QueryRequest, StdResult, Uint128,
    WasmMsg, WasmQuery,
};

use crate::fee_locker::{ExecuteMsg, QueryMsg};

/// Thin wrapper around a validated fee-locker address that knows how to
/// build the locker's messages and run its queries.
#[cw_serde]
pub struct FeeLocker(Addr);

impl FeeLocker {
    pub fn new(addr: Addr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> &Addr {
        &self.0
    }

    pub fn available_fees(
        &self,
        querier: &QuerierWrapper,
        fee_owner: &Addr,
        token: &Addr,
    ) -> StdResult<Uint128> {
        querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.0.to_string(),
            msg: self.available_fees_query(fee_owner, token)?,
        }))
    }

    /// The raw query payload, usable as the calldata of an aggregated read.
    pub fn available_fees_query(&self, fee_owner: &Addr, token: &Addr) -> StdResult<Binary> {
        to_json_binary(&QueryMsg::AvailableFees {
            fee_owner: fee_owner.to_string(),
            token: token.to_string(),
        })
    }

    pub fn claim_msg(&self, fee_owner: &Addr, token: &Addr) -> StdResult<CosmosMsg> {
        Ok(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: self.0.to_string(),
            msg: to_json_binary(&ExecuteMsg::Claim {
                fee_owner: fee_owner.to_string(),
                token: token.to_string(),
            })?,
            funds: vec![],
        }))
    }
}
