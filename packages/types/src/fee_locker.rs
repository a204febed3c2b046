//! Interface of the upstream fee locker, the token-launch protocol contract
//! that accrues creator fees and pays them out to the fee owner directly.
//! The locker is a collaborator, not part of this codebase; the router
//! depends on exact signature compatibility with these messages.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub enum ExecuteMsg {
    /// Pay out the fee owner's accrued fees in `token`, directly to the fee
    /// owner. Reverts when nothing is claimable.
    Claim {
        fee_owner: String,
        token: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Accrued claimable fees of `fee_owner` in `token`
    #[returns(Uint128)]
    AvailableFees {
        fee_owner: String,
        token: String,
    },
}
