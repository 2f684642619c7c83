//! Domain types of the list core and the payout ledger.

pub mod collection;
pub mod payout;
pub mod query;
pub mod types;
