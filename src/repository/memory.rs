//! In-memory payout ledger used as the development backend.
//!
//! Records live in plain vectors behind a `RwLock` and every query is a
//! linear scan. Nothing is persisted.

use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::payout::{
    Balance, Earning, NewPayout, Payout, PayoutMethod, PayoutStatus,
};
use crate::domain::types::{PayoutId, SellerId, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    EarningWriter, PayoutListQuery, PayoutReader, PayoutSortField, PayoutWriter,
};

/// 2024-06-01T00:00:00Z, the start of the fixture timeline.
const FIXTURE_EPOCH: i64 = 1_717_200_000;
const DAY: i64 = 86_400;

#[derive(Default)]
struct LedgerData {
    payouts: Vec<Payout>,
    earnings: Vec<Earning>,
    last_id: i32,
}

impl LedgerData {
    fn next_id(&mut self) -> RepositoryResult<PayoutId> {
        self.last_id += 1;
        PayoutId::new(self.last_id).map_err(RepositoryError::from)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLedger {
    data: Arc<RwLock<LedgerData>>,
}

fn fixture_time(offset_secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(FIXTURE_EPOCH + offset_secs, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

fn payout_matches(payout: &Payout, query: &PayoutListQuery) -> bool {
    if query.seller_id.is_some_and(|seller| seller != payout.seller_id) {
        return false;
    }
    if !query.statuses.is_empty() && !query.statuses.contains(&payout.status) {
        return false;
    }
    match query.search.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(term) => {
            let term = term.to_lowercase();
            payout.reference.to_lowercase().contains(&term)
                || payout.method.as_str().contains(&term)
                || payout.status.as_str().contains(&term)
                || payout.id.to_string() == term
        }
    }
}

fn compare(a: &Payout, b: &Payout, field: PayoutSortField) -> Ordering {
    let primary = match field {
        PayoutSortField::Id => Ordering::Equal,
        PayoutSortField::Amount => a.amount.cmp(&b.amount),
        PayoutSortField::Status => a.status.cmp(&b.status),
        PayoutSortField::RequestedAt => a.requested_at.cmp(&b.requested_at),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-filled with three sellers, their earnings and a mix of
    /// payouts in every status.
    pub fn seeded() -> Self {
        let ledger = Self::new();
        {
            let mut data = ledger.data.write().unwrap_or_else(PoisonError::into_inner);

            for (seller, total) in [(1, 250_000), (2, 120_000), (3, 60_000)] {
                let Ok(seller_id) = SellerId::new(seller) else {
                    continue;
                };
                for n in 0..5 {
                    data.earnings.push(Earning {
                        seller_id,
                        order_ref: format!("ORD-{seller}{n:03}"),
                        amount: total / 5,
                        earned_at: fixture_time(n * DAY),
                    });
                }
            }

            const STATUSES: [PayoutStatus; 6] = [
                PayoutStatus::Paid,
                PayoutStatus::Pending,
                PayoutStatus::Paid,
                PayoutStatus::Processing,
                PayoutStatus::Failed,
                PayoutStatus::Paid,
            ];
            const METHODS: [PayoutMethod; 3] =
                [PayoutMethod::Bank, PayoutMethod::Card, PayoutMethod::Wallet];

            for n in 0..24_i64 {
                let Ok(seller_id) = SellerId::new((n % 3 + 1) as i32) else {
                    continue;
                };
                let Ok(id) = data.next_id() else {
                    continue;
                };
                data.payouts.push(Payout {
                    id,
                    seller_id,
                    amount: 1_000 + (n * 750) % 9_000,
                    currency: "USD".to_string(),
                    status: STATUSES[(n % 6) as usize],
                    method: METHODS[((n / 3) % 3) as usize],
                    reference: format!("PO-{:05}", id.get()),
                    requested_at: fixture_time(5 * DAY + n * 3_600),
                });
            }
        }
        ledger
    }
}

impl PayoutReader for InMemoryLedger {
    fn get_payout_by_id(&self, id: PayoutId) -> RepositoryResult<Option<Payout>> {
        let data = self.data.read()?;
        Ok(data.payouts.iter().find(|p| p.id == id).cloned())
    }

    fn list_payouts(&self, query: PayoutListQuery) -> RepositoryResult<(usize, Vec<Payout>)> {
        let data = self.data.read()?;

        let mut matching: Vec<&Payout> =
            data.payouts.iter().filter(|p| payout_matches(p, &query)).collect();
        matching.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort);
            match query.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len();
        let items = match &query.pagination {
            Some(pagination) => {
                let offset = pagination.page.max(1).saturating_sub(1) * pagination.per_page;
                matching
                    .into_iter()
                    .skip(offset)
                    .take(pagination.per_page)
                    .cloned()
                    .collect()
            }
            None => matching.into_iter().cloned().collect(),
        };

        Ok((total, items))
    }

    fn get_balance(&self, seller_id: SellerId) -> RepositoryResult<Balance> {
        let data = self.data.read()?;
        Ok(Balance::compute(seller_id, &data.earnings, &data.payouts))
    }
}

impl PayoutWriter for InMemoryLedger {
    fn create_payout(&self, new_payout: &NewPayout) -> RepositoryResult<Payout> {
        if new_payout.amount <= 0 {
            return Err(RepositoryError::ValidationError(
                "payout amount must be positive".to_string(),
            ));
        }

        let mut data = self.data.write()?;
        let balance = Balance::compute(new_payout.seller_id, &data.earnings, &data.payouts);
        if new_payout.amount > balance.available {
            return Err(RepositoryError::ConstraintViolation(format!(
                "insufficient balance: requested {}, available {}",
                new_payout.amount, balance.available
            )));
        }

        let id = data.next_id()?;
        let payout = Payout {
            id,
            seller_id: new_payout.seller_id,
            amount: new_payout.amount,
            currency: new_payout.currency.clone(),
            status: PayoutStatus::Pending,
            method: new_payout.method,
            reference: format!("PO-{:05}", id.get()),
            requested_at: Utc::now().naive_utc(),
        };
        data.payouts.push(payout.clone());

        Ok(payout)
    }

    fn update_payout_status(
        &self,
        ids: &[PayoutId],
        status: PayoutStatus,
    ) -> RepositoryResult<usize> {
        let mut data = self.data.write()?;
        if let Some(payout) = data
            .payouts
            .iter()
            .find(|p| ids.contains(&p.id) && !p.status.can_move_to(status))
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "payout {} is {} and cannot become {status}",
                payout.id, payout.status
            )));
        }

        let mut updated = 0;
        for payout in data.payouts.iter_mut().filter(|p| ids.contains(&p.id)) {
            payout.status = status;
            updated += 1;
        }
        Ok(updated)
    }

    fn delete_payout(&self, id: PayoutId) -> RepositoryResult<()> {
        let mut data = self.data.write()?;
        let index = data
            .payouts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        data.payouts.remove(index);
        Ok(())
    }
}

impl EarningWriter for InMemoryLedger {
    fn record_earning(&self, earning: &Earning) -> RepositoryResult<()> {
        if earning.amount <= 0 {
            return Err(RepositoryError::ValidationError(
                "earning amount must be positive".to_string(),
            ));
        }
        self.data.write()?.earnings.push(earning.clone());
        Ok(())
    }
}
