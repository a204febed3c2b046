pub mod admin;
pub mod claim;
pub mod contract;
pub mod error;
pub mod state;

pub use crate::error::{ContractError, ContractResult};
