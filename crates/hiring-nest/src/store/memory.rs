use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::applications::domain::{Application, ApplicationId, ApplicationStatus, StatusChange};
use crate::applications::repository::ApplicationRepository;
use crate::domain::{Company, CompanyId, JobId, JobListing, JobPosting, UserId};
use crate::jobs::query::{listing_order, JobQuery, SearchFilter};
use crate::jobs::repository::JobRepository;

use super::RepositoryError;

#[derive(Debug, Default)]
struct MemoryState {
    companies: HashMap<CompanyId, Company>,
    jobs: HashMap<JobId, JobPosting>,
    applications: HashMap<ApplicationId, Application>,
    // Uniqueness index on (seeker, posting).
    application_pairs: HashMap<(UserId, JobId), ApplicationId>,
}

impl MemoryState {
    fn listing(&self, posting: &JobPosting) -> Option<JobListing> {
        self.companies
            .get(&posting.company_id)
            .map(|company| JobListing {
                posting: posting.clone(),
                company: company.summary(),
            })
    }

    fn matching(&self, filter: &SearchFilter) -> impl Iterator<Item = &JobPosting> + '_ {
        let filter = filter.clone();
        self.jobs.values().filter(move |posting| filter.matches(posting))
    }
}

/// Process-local store backing both repositories. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    /// Register a company; slugs must be unique.
    pub fn add_company(&self, company: Company) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slug_taken = state
            .companies
            .values()
            .any(|existing| existing.slug == company.slug && existing.id != company.id);
        if slug_taken {
            return Err(RepositoryError::Conflict);
        }
        state.companies.insert(company.id.clone(), company);
        Ok(())
    }

    /// Insert or replace a posting. The owning company must already exist.
    pub fn add_job(&self, posting: JobPosting) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if !state.companies.contains_key(&posting.company_id) {
            return Err(RepositoryError::NotFound);
        }
        state.jobs.insert(posting.id.clone(), posting);
        Ok(())
    }

    pub fn application_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.applications.len())
    }
}

impl JobRepository for MemoryStore {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobListing>, RepositoryError> {
        let state = self.lock()?;
        let mut listings: Vec<JobListing> = state
            .matching(&query.filter)
            .filter_map(|posting| state.listing(posting))
            .collect();
        listings.sort_by(listing_order);

        let offset = usize::try_from(query.window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.window.limit).unwrap_or(usize::MAX);
        Ok(listings.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &SearchFilter) -> Result<u64, RepositoryError> {
        let state = self.lock()?;
        let count = state
            .matching(filter)
            .filter(|posting| state.companies.contains_key(&posting.company_id))
            .count();
        Ok(count as u64)
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<JobListing>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.jobs.get(id).and_then(|posting| state.listing(posting)))
    }
}

impl ApplicationRepository for MemoryStore {
    async fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let pair = (application.seeker_id.clone(), application.job_id.clone());
        if state.application_pairs.contains_key(&pair)
            || state.applications.contains_key(&application.id)
        {
            return Err(RepositoryError::Conflict);
        }
        state.application_pairs.insert(pair, application.id.clone());
        state
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        change: StatusChange,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let application = state
            .applications
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
        if application.status != expected {
            return Err(RepositoryError::StaleState);
        }
        application.status = change.to;
        application.history.push(change);
        Ok(application.clone())
    }

    async fn for_seeker(&self, seeker_id: &UserId) -> Result<Vec<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .filter(|application| &application.seeker_id == seeker_id)
            .cloned()
            .collect())
    }

    async fn for_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .filter(|application| &application.job_id == job_id)
            .cloned()
            .collect())
    }
}
