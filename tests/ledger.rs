use chrono::NaiveDateTime;

use pushkind_market::domain::payout::{Earning, NewPayout, PayoutMethod, PayoutStatus};
use pushkind_market::domain::types::{PayoutId, SellerId};
use pushkind_market::repository::errors::RepositoryError;
use pushkind_market::repository::{
    EarningWriter, InMemoryLedger, PayoutListQuery, PayoutReader, PayoutWriter,
};

fn seller(id: i32) -> SellerId {
    SellerId::new(id).unwrap()
}

fn earning(seller_id: i32, amount: i64) -> Earning {
    Earning {
        seller_id: seller(seller_id),
        order_ref: format!("ORD-{seller_id}-{amount}"),
        amount,
        earned_at: NaiveDateTime::default(),
    }
}

fn new_payout(seller_id: i32, amount: i64) -> NewPayout {
    NewPayout {
        seller_id: seller(seller_id),
        amount,
        currency: "EUR".into(),
        method: PayoutMethod::Card,
    }
}

#[test]
fn test_payout_lifecycle_bookkeeping() {
    let ledger = InMemoryLedger::new();
    ledger.record_earning(&earning(1, 7_000)).unwrap();
    ledger.record_earning(&earning(1, 3_000)).unwrap();
    ledger.record_earning(&earning(2, 500)).unwrap();

    let balance = ledger.get_balance(seller(1)).unwrap();
    assert_eq!(balance.lifetime_earnings, 10_000);
    assert_eq!(balance.available, 10_000);

    let payout = ledger.create_payout(&new_payout(1, 6_000)).unwrap();
    assert_eq!(payout.status, PayoutStatus::Pending);
    assert_eq!(payout.reference, format!("PO-{:05}", payout.id.get()));
    assert_eq!(
        ledger.get_payout_by_id(payout.id).unwrap().map(|p| p.amount),
        Some(6_000)
    );

    let balance = ledger.get_balance(seller(1)).unwrap();
    assert_eq!(balance.pending, 6_000);
    assert_eq!(balance.available, 4_000);

    assert!(matches!(
        ledger.create_payout(&new_payout(1, 5_000)),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    ledger
        .update_payout_status(&[payout.id], PayoutStatus::Processing)
        .unwrap();
    assert_eq!(ledger.get_balance(seller(1)).unwrap().pending, 6_000);

    ledger
        .update_payout_status(&[payout.id], PayoutStatus::Paid)
        .unwrap();
    let balance = ledger.get_balance(seller(1)).unwrap();
    assert_eq!(balance.pending, 0);
    assert_eq!(balance.paid_out, 6_000);
    assert_eq!(balance.available, 4_000);

    let failed = ledger.create_payout(&new_payout(1, 4_000)).unwrap();
    assert_eq!(ledger.get_balance(seller(1)).unwrap().available, 0);
    ledger
        .update_payout_status(&[failed.id], PayoutStatus::Failed)
        .unwrap();
    assert_eq!(ledger.get_balance(seller(1)).unwrap().available, 4_000);

    // Other sellers are untouched.
    assert_eq!(ledger.get_balance(seller(2)).unwrap().available, 500);
}

#[test]
fn test_failed_payout_cannot_be_reopened() {
    let ledger = InMemoryLedger::new();
    ledger.record_earning(&earning(1, 10_000)).unwrap();

    let first = ledger.create_payout(&new_payout(1, 10_000)).unwrap();
    ledger
        .update_payout_status(&[first.id], PayoutStatus::Failed)
        .unwrap();
    let second = ledger.create_payout(&new_payout(1, 10_000)).unwrap();

    for status in [
        PayoutStatus::Paid,
        PayoutStatus::Pending,
        PayoutStatus::Processing,
    ] {
        assert!(matches!(
            ledger.update_payout_status(&[first.id], status),
            Err(RepositoryError::ConstraintViolation(_))
        ));
    }

    // A rejected batch leaves every listed payout untouched.
    assert!(matches!(
        ledger.update_payout_status(&[second.id, first.id], PayoutStatus::Paid),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    assert_eq!(
        ledger.get_payout_by_id(second.id).unwrap().map(|p| p.status),
        Some(PayoutStatus::Pending)
    );

    ledger
        .update_payout_status(&[second.id], PayoutStatus::Paid)
        .unwrap();
    assert!(matches!(
        ledger.update_payout_status(&[second.id], PayoutStatus::Failed),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let balance = ledger.get_balance(seller(1)).unwrap();
    assert_eq!(balance.paid_out, 10_000);
    assert_eq!(balance.pending, 0);
    assert_eq!(balance.available, 0);
}

#[test]
fn test_ledger_rejects_invalid_writes() {
    let ledger = InMemoryLedger::new();

    assert!(matches!(
        ledger.record_earning(&earning(1, 0)),
        Err(RepositoryError::ValidationError(_))
    ));
    assert!(matches!(
        ledger.create_payout(&new_payout(1, -10)),
        Err(RepositoryError::ValidationError(_))
    ));
    assert!(matches!(
        ledger.create_payout(&new_payout(1, 10)),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    assert!(matches!(
        ledger.delete_payout(PayoutId::new(1).unwrap()),
        Err(RepositoryError::NotFound)
    ));
    assert_eq!(
        ledger
            .update_payout_status(&[PayoutId::new(1).unwrap()], PayoutStatus::Paid)
            .unwrap(),
        0
    );
}

#[test]
fn test_list_filters_by_seller_and_status_set() {
    let ledger = InMemoryLedger::seeded();

    let (total, items) = ledger
        .list_payouts(
            PayoutListQuery::new()
                .seller(seller(2))
                .status(PayoutStatus::Pending)
                .status(PayoutStatus::Failed),
        )
        .unwrap();

    assert_eq!(total, items.len());
    assert!(total > 0);
    assert!(items.iter().all(|p| p.seller_id == seller(2)
        && matches!(p.status, PayoutStatus::Pending | PayoutStatus::Failed)));

    let (total, _) = ledger
        .list_payouts(PayoutListQuery::new().search("wallet"))
        .unwrap();
    assert_eq!(total, 6);
}
