use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Superset of the real locker interface: `Claim` matches
/// `ember_types::fee_locker::ExecuteMsg::Claim` on the wire, `Accrue` exists
/// only to seed fees in tests.
#[cw_serde]
pub enum ExecuteMsg {
    Claim {
        fee_owner: String,
        token: String,
    },
    Accrue {
        fee_owner: String,
        token: String,
        amount: Uint128,
    },
}
