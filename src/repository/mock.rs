//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::payout::{Balance, Earning, NewPayout, Payout, PayoutStatus};
use crate::domain::types::{PayoutId, SellerId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{EarningWriter, PayoutListQuery, PayoutReader, PayoutWriter};

mock! {
    pub Repository {}

    impl PayoutReader for Repository {
        fn get_payout_by_id(&self, id: PayoutId) -> RepositoryResult<Option<Payout>>;
        fn list_payouts(&self, query: PayoutListQuery) -> RepositoryResult<(usize, Vec<Payout>)>;
        fn get_balance(&self, seller_id: SellerId) -> RepositoryResult<Balance>;
    }

    impl PayoutWriter for Repository {
        fn create_payout(&self, new_payout: &NewPayout) -> RepositoryResult<Payout>;
        fn update_payout_status(
            &self,
            ids: &[PayoutId],
            status: PayoutStatus,
        ) -> RepositoryResult<usize>;
        fn delete_payout(&self, id: PayoutId) -> RepositoryResult<()>;
    }

    impl EarningWriter for Repository {
        fn record_earning(&self, earning: &Earning) -> RepositoryResult<()>;
    }
}
