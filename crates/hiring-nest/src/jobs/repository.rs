use std::future::Future;

use crate::domain::{JobId, JobListing};
use crate::store::RepositoryError;

use super::query::{JobQuery, SearchFilter};

/// Read side of the posting catalogue, projected with each posting's company summary.
///
/// `search` must apply [`SearchFilter`] semantics (ACTIVE only), order by `posted_at`
/// descending then id ascending, and return at most `window.limit` rows from
/// `window.offset()`. `count` ignores the window.
pub trait JobRepository: Send + Sync {
    fn search(
        &self,
        query: &JobQuery,
    ) -> impl Future<Output = Result<Vec<JobListing>, RepositoryError>> + Send;

    fn count(
        &self,
        filter: &SearchFilter,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Point read regardless of posting status.
    fn fetch(
        &self,
        id: &JobId,
    ) -> impl Future<Output = Result<Option<JobListing>, RepositoryError>> + Send;
}
