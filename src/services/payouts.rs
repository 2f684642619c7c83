use crate::domain::payout::{Balance, NewPayout, Payout, PayoutStatus};
use crate::domain::query::Query;
use crate::domain::types::{PayoutId, SellerId};
use crate::dto::api::PayoutsPage;
use crate::dto::query::SerializedQuery;
use crate::forms::payouts::{BulkStatusForm, BulkStatusPayload, RequestPayoutForm};
use crate::repository::{PayoutListQuery, PayoutReader, PayoutSortField, PayoutWriter};
use crate::services::{ServiceError, ServiceResult};

/// Filter key selecting one or more payout statuses.
pub const STATUS_FILTER: &str = "status";
/// Filter key restricting the list to one seller.
pub const SELLER_FILTER: &str = "seller_id";

/// Maps a decoded list query onto the ledger query, rejecting filter and
/// sort keys the payouts list does not know.
fn to_list_query(query: &Query) -> ServiceResult<PayoutListQuery> {
    let mut list_query = PayoutListQuery::new().paginate(
        query.page.get() as usize,
        query.page_size.get() as usize,
    );

    let search = query.search.trim();
    if !search.is_empty() {
        list_query = list_query.search(search);
    }

    for (key, value) in &query.filters {
        match key.as_str() {
            STATUS_FILTER => {
                for status in value.values() {
                    list_query = list_query.status(status.parse::<PayoutStatus>()?);
                }
            }
            SELLER_FILTER => {
                let mut values = value.values();
                match (values.next(), values.next()) {
                    (Some(seller), None) => {
                        list_query = list_query.seller(seller.parse::<SellerId>()?);
                    }
                    _ => {
                        return Err(ServiceError::Form(format!(
                            "`{SELLER_FILTER}` filter takes exactly one value"
                        )));
                    }
                }
            }
            other => return Err(ServiceError::Form(format!("unknown filter `{other}`"))),
        }
    }

    if let Some(sort) = &query.sort {
        let field = PayoutSortField::from_key(&sort.key)
            .ok_or_else(|| ServiceError::Form(format!("unknown sort key `{}`", sort.key)))?;
        list_query = list_query.sort(field, sort.direction);
    }

    Ok(list_query)
}

/// Returns the page of payouts described by the serialized list query.
pub fn list_payouts<R>(repo: &R, params: &SerializedQuery) -> ServiceResult<PayoutsPage>
where
    R: PayoutReader + ?Sized,
{
    let query = params.decode().map_err(|err| {
        log::warn!("Rejected payouts query: {err}");
        ServiceError::from(err)
    })?;
    let list_query = to_list_query(&query)?;

    let (total, payouts) = repo.list_payouts(list_query).map_err(|err| {
        log::error!("Failed to list payouts: {err}");
        ServiceError::from(err)
    })?;

    Ok(PayoutsPage { total, payouts })
}

/// Returns the bookkeeping totals of one seller.
pub fn get_balance<R>(repo: &R, seller_id: i32) -> ServiceResult<Balance>
where
    R: PayoutReader + ?Sized,
{
    let seller_id = SellerId::new(seller_id)?;
    repo.get_balance(seller_id).map_err(|err| {
        log::error!("Failed to compute balance for seller {seller_id}: {err}");
        ServiceError::from(err)
    })
}

/// Validates the form and books a new pending payout.
pub fn request_payout<R>(repo: &R, form: RequestPayoutForm) -> ServiceResult<Payout>
where
    R: PayoutWriter + ?Sized,
{
    let new_payout = NewPayout::try_from(form).map_err(|err| {
        log::warn!("Failed to validate payout form: {err}");
        ServiceError::Form(err.to_string())
    })?;

    repo.create_payout(&new_payout).map_err(|err| {
        log::error!("Failed to create payout: {err}");
        ServiceError::from(err)
    })
}

/// Applies a bulk status change selected in the payouts table.
pub fn update_payout_status<R>(repo: &R, form: BulkStatusForm) -> ServiceResult<usize>
where
    R: PayoutWriter + ?Sized,
{
    let payload = BulkStatusPayload::try_from(form).map_err(|err| {
        log::warn!("Failed to validate status form: {err}");
        ServiceError::Form(err.to_string())
    })?;

    let updated = repo
        .update_payout_status(&payload.ids, payload.status)
        .map_err(|err| {
            log::error!("Failed to update payout status: {err}");
            ServiceError::from(err)
        })?;

    if updated == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(updated)
}

pub fn delete_payout<R>(repo: &R, payout_id: i32) -> ServiceResult<()>
where
    R: PayoutWriter + ?Sized,
{
    let payout_id = PayoutId::new(payout_id)?;
    repo.delete_payout(payout_id).map_err(|err| {
        log::error!("Failed to delete payout {payout_id}: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::payout::PayoutMethod;
    use crate::domain::query::{FilterValue, Sort};
    use crate::domain::types::SortDirection;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn serialized(query: &Query) -> SerializedQuery {
        SerializedQuery::encode(query).expect("encodes")
    }

    fn sample_payout(id: i32) -> Payout {
        Payout {
            id: PayoutId::new(id).expect("valid payout id"),
            seller_id: SellerId::new(1).expect("valid seller id"),
            amount: 2_500,
            currency: "USD".to_string(),
            status: PayoutStatus::Pending,
            method: PayoutMethod::Bank,
            reference: format!("PO-{id:05}"),
            requested_at: NaiveDateTime::default(),
        }
    }

    /// Confirms filters, search, sort and pagination reach the repository.
    #[test]
    fn list_maps_query_onto_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_payouts()
            .withf(|q| {
                q.seller_id.map(SellerId::get) == Some(2)
                    && q.statuses.len() == 2
                    && q.statuses.contains(&PayoutStatus::Paid)
                    && q.search.as_deref() == Some("bank")
                    && q.sort == PayoutSortField::Amount
                    && q.direction == SortDirection::Desc
                    && q.pagination.as_ref().map(|p| (p.page, p.per_page)) == Some((3, 20))
            })
            .times(1)
            .returning(|_| Ok((41, vec![sample_payout(1)])));

        let query = Query::default()
            .with_filter(SELLER_FILTER, FilterValue::One("2".into()))
            .with_filter_toggled(STATUS_FILTER, "paid")
            .with_filter_toggled(STATUS_FILTER, "failed")
            .with_sort(Some(Sort::desc("amount")))
            .with_search("  bank ")
            .with_page(3);

        let page = list_payouts(&repo, &serialized(&query)).expect("lists payouts");

        assert_eq!(page.total, 41);
        assert_eq!(page.payouts.len(), 1);
    }

    /// Ensures unknown filter keys never reach the repository.
    #[test]
    fn list_rejects_unknown_filter() {
        let mut repo = MockRepository::new();
        repo.expect_list_payouts().times(0);
        let query = Query::default().with_filter("colour", FilterValue::One("red".into()));

        let result = list_payouts(&repo, &serialized(&query));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn list_rejects_unknown_sort_and_bad_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_payouts().times(0);

        let bad_sort = Query::default().with_sort(Some(Sort::asc("colour")));
        assert!(matches!(
            list_payouts(&repo, &serialized(&bad_sort)),
            Err(ServiceError::Form(_))
        ));

        let bad_status = Query::default().with_filter(STATUS_FILTER, "lost".into());
        assert!(matches!(
            list_payouts(&repo, &serialized(&bad_status)),
            Err(ServiceError::TypeConstraint(_))
        ));
    }

    #[test]
    fn list_rejects_malformed_serialized_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_payouts().times(0);
        let mut params = serialized(&Query::default());
        params.filters = "{not json".to_string();

        let result = list_payouts(&repo, &params);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn request_payout_surfaces_insufficient_balance() {
        let mut repo = MockRepository::new();
        repo.expect_create_payout()
            .times(1)
            .returning(|_| Err(RepositoryError::ConstraintViolation("insufficient".into())));
        let form = RequestPayoutForm {
            seller_id: 1,
            amount: 10_000,
            currency: "USD".into(),
            method: PayoutMethod::Wallet,
        };

        let result = request_payout(&repo, form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn update_status_reports_missing_payouts() {
        let mut repo = MockRepository::new();
        repo.expect_update_payout_status()
            .withf(|ids, status| ids.len() == 2 && *status == PayoutStatus::Paid)
            .times(1)
            .returning(|_, _| Ok(0));
        let form = BulkStatusForm {
            ids: vec![7, 8],
            status: PayoutStatus::Paid,
        };

        let result = update_payout_status(&repo, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn delete_rejects_invalid_id_without_touching_repository() {
        let mut repo = MockRepository::new();
        repo.expect_delete_payout().times(0);

        let result = delete_payout(&repo, 0);

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn balance_is_loaded_for_seller() {
        let mut repo = MockRepository::new();
        repo.expect_get_balance()
            .withf(|seller| seller.get() == 3)
            .times(1)
            .returning(|seller| {
                Ok(Balance {
                    seller_id: seller.get(),
                    available: 100,
                    ..Balance::default()
                })
            });

        let balance = get_balance(&repo, 3).expect("loads balance");

        assert_eq!(balance.available, 100);
    }
}
