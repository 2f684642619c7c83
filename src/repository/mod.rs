use std::collections::BTreeSet;

use crate::domain::payout::{Balance, Earning, NewPayout, Payout, PayoutStatus};
use crate::domain::types::{PayoutId, SellerId, SortDirection};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use memory::InMemoryLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayoutSortField {
    #[default]
    Id,
    Amount,
    Status,
    RequestedAt,
}

impl PayoutSortField {
    /// Maps a column key used by the list pages.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(PayoutSortField::Id),
            "amount" => Some(PayoutSortField::Amount),
            "status" => Some(PayoutSortField::Status),
            "requested_at" | "requestedAt" => Some(PayoutSortField::RequestedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutListQuery {
    pub seller_id: Option<SellerId>,
    pub statuses: BTreeSet<PayoutStatus>,
    pub search: Option<String>,
    pub sort: PayoutSortField,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl Default for PayoutListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl PayoutListQuery {
    pub fn new() -> Self {
        Self {
            seller_id: None,
            statuses: BTreeSet::new(),
            search: None,
            sort: PayoutSortField::default(),
            direction: SortDirection::Asc,
            pagination: None,
        }
    }

    pub fn seller(mut self, seller_id: SellerId) -> Self {
        self.seller_id = Some(seller_id);
        self
    }

    pub fn status(mut self, status: PayoutStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, field: PayoutSortField, direction: SortDirection) -> Self {
        self.sort = field;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait PayoutReader {
    fn get_payout_by_id(&self, id: PayoutId) -> RepositoryResult<Option<Payout>>;
    /// Returns the total number of matches and the requested page.
    fn list_payouts(&self, query: PayoutListQuery) -> RepositoryResult<(usize, Vec<Payout>)>;
    fn get_balance(&self, seller_id: SellerId) -> RepositoryResult<Balance>;
}

pub trait PayoutWriter {
    fn create_payout(&self, new_payout: &NewPayout) -> RepositoryResult<Payout>;
    /// Moves every listed payout to `status`; returns the number updated.
    fn update_payout_status(
        &self,
        ids: &[PayoutId],
        status: PayoutStatus,
    ) -> RepositoryResult<usize>;
    fn delete_payout(&self, id: PayoutId) -> RepositoryResult<()>;
}

pub trait EarningWriter {
    fn record_earning(&self, earning: &Earning) -> RepositoryResult<()>;
}
