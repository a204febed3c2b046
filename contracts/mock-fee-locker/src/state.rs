use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::Map;

// Map<(fee owner, reward token), accrued fees>
pub const ACCRUED_FEES: Map<(&Addr, &Addr), Uint128> = Map::new("accrued_fees");
