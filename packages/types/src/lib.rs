pub mod adapters;
pub mod claims;
pub mod fee_locker;
pub mod fee_router;
