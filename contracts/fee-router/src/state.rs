use cosmwasm_std::{Addr, Empty};
use cw_storage_plus::{Item, Map};
use ember_types::fee_router::Config;
use mars_owner::Owner;

pub const OWNER: Owner = Owner::new("owner");

pub const CONFIG: Item<Config> = Item::new("config");

/// Distributors the router is permitted to forward claims to
pub const DISTRIBUTORS: Map<&Addr, Empty> = Map::new("distributors");

/// Reentrancy guard held for the duration of a claim's message tree
pub const CLAIM_LOCK: Item<bool> = Item::new("claim_lock");
