//! Payout ledger entities backing the seller payouts pages during local
//! development.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PayoutId, SellerId, TypeConstraintError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Paid,
    Failed,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Paid => "paid",
            PayoutStatus::Failed => "failed",
        }
    }

    /// Whether the payout still holds funds that are not yet paid out.
    pub fn is_open(self) -> bool {
        matches!(self, PayoutStatus::Pending | PayoutStatus::Processing)
    }

    /// Paid and failed payouts are final; only open payouts change status.
    pub fn can_move_to(self, next: PayoutStatus) -> bool {
        self == next || self.is_open()
    }
}

impl Display for PayoutStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(PayoutStatus::Pending),
            "processing" => Ok(PayoutStatus::Processing),
            "paid" => Ok(PayoutStatus::Paid),
            "failed" => Ok(PayoutStatus::Failed),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PayoutMethod {
    Bank,
    Card,
    Wallet,
}

impl PayoutMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutMethod::Bank => "bank",
            PayoutMethod::Card => "card",
            PayoutMethod::Wallet => "wallet",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    pub id: PayoutId,
    pub seller_id: SellerId,
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: PayoutStatus,
    pub method: PayoutMethod,
    pub reference: String,
    pub requested_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewPayout {
    pub seller_id: SellerId,
    pub amount: i64,
    pub currency: String,
    pub method: PayoutMethod,
}

/// Seller revenue credited by a completed order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Earning {
    pub seller_id: SellerId,
    pub order_ref: String,
    pub amount: i64,
    pub earned_at: NaiveDateTime,
}

/// Derived bookkeeping totals for one seller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub seller_id: i32,
    pub lifetime_earnings: i64,
    /// Funds held by pending and processing payouts.
    pub pending: i64,
    pub paid_out: i64,
    pub available: i64,
}

impl Balance {
    /// Computes the totals from the seller's earnings and payouts.
    pub fn compute<'a>(
        seller_id: SellerId,
        earnings: impl IntoIterator<Item = &'a Earning>,
        payouts: impl IntoIterator<Item = &'a Payout>,
    ) -> Self {
        let lifetime_earnings = earnings
            .into_iter()
            .filter(|e| e.seller_id == seller_id)
            .map(|e| e.amount)
            .sum();

        let (mut pending, mut paid_out) = (0, 0);
        for payout in payouts.into_iter().filter(|p| p.seller_id == seller_id) {
            match payout.status {
                PayoutStatus::Pending | PayoutStatus::Processing => pending += payout.amount,
                PayoutStatus::Paid => paid_out += payout.amount,
                PayoutStatus::Failed => {}
            }
        }

        Self {
            seller_id: seller_id.get(),
            lifetime_earnings,
            pending,
            paid_out,
            available: lifetime_earnings - pending - paid_out,
        }
    }
}
