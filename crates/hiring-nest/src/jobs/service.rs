use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{SearchConfig, StoreConfig};
use crate::domain::JobListing;
use crate::store::{with_timeout, RepositoryError};

use super::query::{JobQuery, PageInfo, QueryBuilder, SearchParams};
use super::repository::JobRepository;

/// A page of postings plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub jobs: Vec<JobListing>,
    pub pagination: PageInfo,
}

/// Service composing the query builder with the catalogue repository.
pub struct JobSearchService<J> {
    repository: Arc<J>,
    builder: QueryBuilder,
    store_timeout: Duration,
}

impl<J> JobSearchService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(repository: Arc<J>, search: SearchConfig, store: StoreConfig) -> Self {
        Self {
            repository,
            builder: QueryBuilder::new(search),
            store_timeout: store.timeout,
        }
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Search with raw parameters, evaluating date windows against the current time.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResults, JobSearchError> {
        self.search_at(params, Utc::now()).await
    }

    pub async fn search_at(
        &self,
        params: &SearchParams,
        now: DateTime<Utc>,
    ) -> Result<SearchResults, JobSearchError> {
        let query = self.builder.build(params, now);
        self.execute(&query).await
    }

    /// Run an already validated query. The page and the count are fetched concurrently.
    pub async fn execute(&self, query: &JobQuery) -> Result<SearchResults, JobSearchError> {
        let page = with_timeout(self.store_timeout, self.repository.search(query));
        let count = with_timeout(self.store_timeout, self.repository.count(&query.filter));

        let (mut jobs, total) = tokio::try_join!(page, count).map_err(|err| {
            warn!(error = %err, "job search failed");
            JobSearchError::Infrastructure(err)
        })?;

        // Never hand back more than a page, whatever the store returned.
        jobs.truncate(usize::try_from(query.window.limit).unwrap_or(usize::MAX));

        let pagination = PageInfo::new(query.window, total);
        debug!(
            page = pagination.page,
            limit = pagination.limit,
            total = pagination.total,
            returned = jobs.len(),
            "job search executed"
        );

        Ok(SearchResults { jobs, pagination })
    }
}

/// Search never fails on input; only the store can make it fail.
#[derive(Debug, thiserror::Error)]
pub enum JobSearchError {
    #[error("job catalogue unavailable: {0}")]
    Infrastructure(#[source] RepositoryError),
}
