//! Forms for requesting payouts and bulk status changes.

use serde::Deserialize;
use validator::Validate;

use crate::domain::payout::{NewPayout, PayoutMethod, PayoutStatus};
use crate::domain::types::{PayoutId, SellerId};
use crate::forms::FormError;

/// JSON body of `POST /api/v1/payouts`.
#[derive(Debug, Deserialize, Validate)]
pub struct RequestPayoutForm {
    #[validate(range(min = 1))]
    pub seller_id: i32,
    /// Amount in minor currency units.
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(equal = 3))]
    pub currency: String,
    pub method: PayoutMethod,
}

impl TryFrom<RequestPayoutForm> for NewPayout {
    type Error = FormError;

    fn try_from(form: RequestPayoutForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let seller_id = SellerId::new(form.seller_id).map_err(|_| FormError::InvalidSellerId)?;

        Ok(NewPayout {
            seller_id,
            amount: form.amount,
            currency: form.currency.trim().to_uppercase(),
            method: form.method,
        })
    }
}

/// JSON body of `POST /api/v1/payouts/status`, raised by the bulk actions of
/// the payouts table.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkStatusForm {
    #[validate(length(min = 1))]
    pub ids: Vec<i32>,
    pub status: PayoutStatus,
}

/// Validated payload of [`BulkStatusForm`].
#[derive(Debug)]
pub struct BulkStatusPayload {
    pub ids: Vec<PayoutId>,
    pub status: PayoutStatus,
}

impl TryFrom<BulkStatusForm> for BulkStatusPayload {
    type Error = FormError;

    fn try_from(form: BulkStatusForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mut ids = form
            .ids
            .into_iter()
            .map(|id| PayoutId::new(id).map_err(|_| FormError::InvalidPayoutId))
            .collect::<Result<Vec<_>, _>>()?;
        ids.sort_unstable();
        ids.dedup();

        Ok(Self {
            ids,
            status: form.status,
        })
    }
}
