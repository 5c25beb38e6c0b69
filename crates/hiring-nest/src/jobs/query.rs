//! Query builder turning untrusted search parameters into a bounded [`JobQuery`].
//!
//! Malformed values never fail the request: each dimension that does not validate is dropped
//! and the search runs as if it had not been supplied.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::domain::{JobListing, JobPosting, JobType, WorkMode};

/// Day windows offered by the "date posted" facet.
pub const DATE_POSTED_WINDOWS: [i64; 4] = [1, 7, 14, 30];

/// Raw search input exactly as the presentation layer received it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub date_posted: Option<String>,
}

impl SearchParams {
    /// Collect decoded query pairs. The first value of a repeated key wins; unknown keys are
    /// ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "location" => &mut params.location,
                "jobType" => &mut params.job_type,
                "workMode" => &mut params.work_mode,
                "datePosted" => &mut params.date_posted,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Validated filter dimensions. `None` means "no filter" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub text: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub work_mode: Option<WorkMode>,
    pub posted_since: Option<DateTime<Utc>>,
}

impl SearchFilter {
    /// True when the posting is visible to search and satisfies every active dimension.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        if !posting.is_active() {
            return false;
        }

        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_title = posting.title.to_lowercase().contains(&needle);
            let in_description = posting.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !posting
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if self.job_type.is_some_and(|kind| kind != posting.job_type) {
            return false;
        }

        if self.work_mode.is_some_and(|mode| mode != posting.work_mode) {
            return false;
        }

        if self.posted_since.is_some_and(|since| posting.posted_at < since) {
            return false;
        }

        true
    }
}

/// One page of results: `limit` rows starting at `(page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobQuery {
    pub filter: SearchFilter,
    pub window: PageWindow,
}

/// Pagination metadata returned alongside a page of postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PageInfo {
    pub fn new(window: PageWindow, total: u64) -> Self {
        Self {
            page: window.page,
            limit: window.limit,
            total,
            pages: total.div_ceil(window.limit.max(1)),
        }
    }
}

/// Most recent first; identical timestamps fall back to ascending id.
pub fn listing_order(left: &JobListing, right: &JobListing) -> Ordering {
    right
        .posting
        .posted_at
        .cmp(&left.posting.posted_at)
        .then_with(|| left.posting.id.cmp(&right.posting.id))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder {
    config: SearchConfig,
}

impl QueryBuilder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn build(&self, params: &SearchParams, now: DateTime<Utc>) -> JobQuery {
        let page = parse_positive(params.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(params.limit.as_deref())
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit);

        let filter = SearchFilter {
            text: non_empty(params.search.as_deref()),
            location: non_empty(params.location.as_deref()),
            job_type: params.job_type.as_deref().and_then(JobType::parse_lenient),
            work_mode: params.work_mode.as_deref().and_then(WorkMode::parse_lenient),
            posted_since: params
                .date_posted
                .as_deref()
                .and_then(parse_posted_window)
                .map(|days| now - Duration::days(days)),
        };

        JobQuery {
            filter,
            window: PageWindow { page, limit },
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value >= 1)
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_posted_window(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|days| DATE_POSTED_WINDOWS.contains(days))
}
