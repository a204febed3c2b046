use cosmwasm_std::{CheckedMultiplyRatioError, OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use mars_owner::OwnerError;
use thiserror::Error;

pub type ContractResult<T> = Result<T, ContractError>;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Owner(#[from] OwnerError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    CheckedMultiplyRatio(#[from] CheckedMultiplyRatioError),

    #[error("Claiming is paused")]
    Paused {},

    #[error("Reward token list must not be empty")]
    NoRewardTokens {},

    #[error("Only externally owned accounts may claim")]
    CallerIsContract {},

    #[error("Distributor is not allowlisted: {distributor}")]
    DistributorNotAllowlisted {
        distributor: String,
    },

    #[error("Distributor has no code on chain: {distributor}")]
    DistributorNotContract {
        distributor: String,
    },

    #[error("A claim is already in progress")]
    ClaimInProgress {},

    #[error("Callbacks can only be invoked by the contract itself")]
    ExternalInvocation {},

    #[error("Tax rate {tax_bps} bps exceeds the hard cap of {max_bps} bps")]
    TaxRateExceedsCap {
        tax_bps: u16,
        max_bps: u16,
    },

    #[error("Amount to withdraw {requested} is larger than the held {token} reserve {available}")]
    InsufficientReserve {
        token: String,
        requested: Uint128,
        available: Uint128,
    },
}
