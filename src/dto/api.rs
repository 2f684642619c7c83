//! DTOs exposed by the payout API endpoints.

use serde::Serialize;

use crate::domain::payout::Payout;

/// Envelope shared by every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Result payload returned by [`crate::services::payouts::list_payouts`].
#[derive(Debug, Serialize)]
pub struct PayoutsPage {
    /// Total number of payouts matching the filter.
    pub total: usize,
    /// Page of payouts requested by the caller.
    pub payouts: Vec<Payout>,
}

/// Result of a bulk status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub updated: usize,
}
