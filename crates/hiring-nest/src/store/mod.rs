//! Persistence boundary shared by the search and application services.

use std::future::Future;
use std::time::Duration;

pub mod memory;

pub use memory::MemoryStore;

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed since it was read")]
    StaleState,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("repository call exceeded {0:?}")]
    Timeout(Duration),
}

impl RepositoryError {
    /// Infrastructure failures a caller may retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Bound a store call by `limit`, reporting expiry as [`RepositoryError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RepositoryError::Timeout(limit)),
    }
}
