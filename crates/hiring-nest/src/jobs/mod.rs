//! Job search: query building, the catalogue repository seam, and the HTTP endpoint.

pub mod query;
pub mod repository;
pub mod router;
pub mod service;

pub use query::{
    listing_order, JobQuery, PageInfo, PageWindow, QueryBuilder, SearchFilter, SearchParams,
    DATE_POSTED_WINDOWS,
};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::{JobSearchError, JobSearchService, SearchResults};
