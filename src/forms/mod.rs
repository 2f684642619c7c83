//! Form definitions backing the payout API routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod payouts;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid seller id")]
    InvalidSellerId,

    #[error("invalid payout id")]
    InvalidPayoutId,
}
