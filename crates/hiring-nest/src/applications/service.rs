use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    newest_first, Application, ApplicationId, ApplicationStatus, ApplicationSummary,
    ApplicationView, StatusChange, TransitionAuthority,
};
use super::repository::{
    ApplicationEvent, ApplicationEventKind, ApplicationRepository, EventPublisher,
};
use crate::config::StoreConfig;
use crate::domain::{JobId, JobListing, UserId};
use crate::identity::{Actor, ActorRole};
use crate::jobs::JobRepository;
use crate::store::{with_timeout, RepositoryError};

/// Service enforcing the application lifecycle and its access rules.
pub struct ApplicationService<A, J, E> {
    applications: Arc<A>,
    jobs: Arc<J>,
    events: Arc<E>,
    store_timeout: Duration,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<A, J, E> ApplicationService<A, J, E>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    E: EventPublisher + 'static,
{
    pub fn new(applications: Arc<A>, jobs: Arc<J>, events: Arc<E>, store: StoreConfig) -> Self {
        Self {
            applications,
            jobs,
            events,
            store_timeout: store.timeout,
        }
    }

    /// Apply to an active posting as the calling seeker.
    pub async fn create(
        &self,
        seeker: &Actor,
        job_id: &JobId,
    ) -> Result<Application, ApplicationServiceError> {
        self.create_at(seeker, job_id, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        seeker: &Actor,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationServiceError> {
        if seeker.role != ActorRole::JobSeeker {
            return Err(ApplicationServiceError::Forbidden {
                action: "apply to postings",
            });
        }

        let listing = self.posting(job_id).await?;
        if !listing.posting.is_active() {
            return Err(ApplicationServiceError::not_found("job posting", &job_id.0));
        }

        let application = Application::new(
            next_application_id(),
            seeker.user_id.clone(),
            job_id.clone(),
            now,
        );

        let stored = with_timeout(self.store_timeout, self.applications.insert(application))
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => ApplicationServiceError::Conflict,
                other => ApplicationServiceError::Infrastructure(other),
            })?;

        info!(
            application_id = %stored.id,
            job_id = %job_id.0,
            seeker_id = %seeker.user_id.0,
            "application created"
        );
        self.emit(ApplicationEvent {
            application_id: stored.id.clone(),
            job_id: stored.job_id.clone(),
            seeker_id: stored.seeker_id.clone(),
            actor: seeker.user_id.clone(),
            at: now,
            kind: ApplicationEventKind::Created,
        });

        Ok(stored)
    }

    /// Move an application to `next`, enforcing ownership and the state machine.
    pub async fn transition(
        &self,
        application_id: &ApplicationId,
        actor: &Actor,
        next: ApplicationStatus,
    ) -> Result<Application, ApplicationServiceError> {
        self.transition_at(application_id, actor, next, Utc::now())
            .await
    }

    pub async fn transition_at(
        &self,
        application_id: &ApplicationId,
        actor: &Actor,
        next: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationServiceError> {
        let current = self.application(application_id).await?;

        if current.status.is_terminal() {
            return Err(self.rejected_transition(&current, actor, next));
        }

        let authority = if actor.user_id == current.seeker_id {
            TransitionAuthority::Seeker
        } else {
            let listing = self.posting(&current.job_id).await?;
            if actor.represents(&listing.posting.company_id) {
                TransitionAuthority::Company
            } else {
                return Err(ApplicationServiceError::Forbidden {
                    action: "change this application",
                });
            }
        };

        if !authority.permits(next) {
            return Err(ApplicationServiceError::Forbidden {
                action: match authority {
                    TransitionAuthority::Seeker => "move an application anywhere but Withdrawn",
                    TransitionAuthority::Company => "withdraw on behalf of the applicant",
                },
            });
        }

        if !current.status.can_transition_to(next) {
            return Err(self.rejected_transition(&current, actor, next));
        }

        let change = StatusChange {
            from: current.status,
            to: next,
            at: now,
            actor: actor.user_id.clone(),
        };
        let updated = with_timeout(
            self.store_timeout,
            self.applications
                .update_status(application_id, current.status, change),
        )
        .await
        .map_err(|err| match err {
            // Another request moved the record between our read and the conditional write.
            RepositoryError::StaleState => ApplicationServiceError::InvalidTransition {
                from: current.status,
                to: next,
            },
            RepositoryError::NotFound => {
                ApplicationServiceError::not_found("application", &application_id.0)
            }
            other => ApplicationServiceError::Infrastructure(other),
        })?;

        info!(
            application_id = %updated.id,
            from = %current.status,
            to = %next,
            actor = %actor.user_id.0,
            "application status changed"
        );
        self.emit(ApplicationEvent {
            application_id: updated.id.clone(),
            job_id: updated.job_id.clone(),
            seeker_id: updated.seeker_id.clone(),
            actor: actor.user_id.clone(),
            at: now,
            kind: ApplicationEventKind::StatusChanged {
                from: current.status,
                to: next,
            },
        });

        Ok(updated)
    }

    /// Fetch a single application under the read rules.
    pub async fn get(
        &self,
        application_id: &ApplicationId,
        actor: &Actor,
    ) -> Result<ApplicationView, ApplicationServiceError> {
        let application = self.application(application_id).await?;
        let listing = self.posting(&application.job_id).await?;

        let readable = actor.is_admin()
            || actor.user_id == application.seeker_id
            || actor.represents(&listing.posting.company_id);
        if !readable {
            return Err(ApplicationServiceError::Forbidden {
                action: "read this application",
            });
        }

        Ok(view(application, &listing))
    }

    /// The seeker's own applications, newest first.
    pub async fn list(
        &self,
        seeker_id: &UserId,
        actor: &Actor,
    ) -> Result<Vec<ApplicationView>, ApplicationServiceError> {
        let applications = self.seeker_applications(seeker_id, actor).await?;
        self.views(applications).await
    }

    /// Applicants for a posting, visible to the owning company.
    pub async fn list_for_posting(
        &self,
        job_id: &JobId,
        actor: &Actor,
    ) -> Result<Vec<ApplicationView>, ApplicationServiceError> {
        let listing = self.posting(job_id).await?;
        if !actor.is_admin() && !actor.represents(&listing.posting.company_id) {
            return Err(ApplicationServiceError::Forbidden {
                action: "list applicants for this posting",
            });
        }

        let mut applications = with_timeout(self.store_timeout, self.applications.for_job(job_id))
            .await
            .map_err(ApplicationServiceError::Infrastructure)?;
        applications.sort_by(newest_first);

        Ok(applications
            .into_iter()
            .map(|application| view(application, &listing))
            .collect())
    }

    /// Per-status counts for the seeker dashboard.
    pub async fn summary(
        &self,
        seeker_id: &UserId,
        actor: &Actor,
    ) -> Result<ApplicationSummary, ApplicationServiceError> {
        let applications = self.seeker_applications(seeker_id, actor).await?;
        Ok(ApplicationSummary::from_applications(&applications))
    }

    async fn seeker_applications(
        &self,
        seeker_id: &UserId,
        actor: &Actor,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        if !actor.is_admin() && &actor.user_id != seeker_id {
            return Err(ApplicationServiceError::Forbidden {
                action: "read another seeker's applications",
            });
        }

        let mut applications =
            with_timeout(self.store_timeout, self.applications.for_seeker(seeker_id))
                .await
                .map_err(ApplicationServiceError::Infrastructure)?;
        applications.sort_by(newest_first);
        Ok(applications)
    }

    async fn views(
        &self,
        applications: Vec<Application>,
    ) -> Result<Vec<ApplicationView>, ApplicationServiceError> {
        let mut postings: HashMap<JobId, Option<JobListing>> = HashMap::new();
        let mut views = Vec::with_capacity(applications.len());

        for application in applications {
            if !postings.contains_key(&application.job_id) {
                let fetch = self.jobs.fetch(&application.job_id);
                let listing = with_timeout(self.store_timeout, fetch)
                    .await
                    .map_err(ApplicationServiceError::Infrastructure)?;
                postings.insert(application.job_id.clone(), listing);
            }

            match postings.get(&application.job_id).and_then(Option::as_ref) {
                Some(listing) => views.push(view(application, listing)),
                None => warn!(
                    application_id = %application.id,
                    job_id = %application.job_id.0,
                    "application references a missing posting"
                ),
            }
        }

        Ok(views)
    }

    async fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        with_timeout(self.store_timeout, self.applications.fetch(application_id))
            .await
            .map_err(ApplicationServiceError::Infrastructure)?
            .ok_or_else(|| ApplicationServiceError::not_found("application", &application_id.0))
    }

    async fn posting(&self, job_id: &JobId) -> Result<JobListing, ApplicationServiceError> {
        with_timeout(self.store_timeout, self.jobs.fetch(job_id))
            .await
            .map_err(ApplicationServiceError::Infrastructure)?
            .ok_or_else(|| ApplicationServiceError::not_found("job posting", &job_id.0))
    }

    fn rejected_transition(
        &self,
        current: &Application,
        actor: &Actor,
        next: ApplicationStatus,
    ) -> ApplicationServiceError {
        info!(
            application_id = %current.id,
            from = %current.status,
            to = %next,
            actor = %actor.user_id.0,
            "application transition refused"
        );
        ApplicationServiceError::InvalidTransition {
            from: current.status,
            to: next,
        }
    }

    fn emit(&self, event: ApplicationEvent) {
        let application_id = event.application_id.clone();
        if let Err(err) = self.events.publish(event) {
            warn!(application_id = %application_id, error = %err, "application event dropped");
        }
    }
}

fn view(application: Application, listing: &JobListing) -> ApplicationView {
    ApplicationView {
        application,
        posting_title: listing.posting.title.clone(),
        company: listing.company.clone(),
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("already applied to this posting")]
    Conflict,
    #[error("not authorized to {action}")]
    Forbidden { action: &'static str },
    #[error("cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("application store unavailable: {0}")]
    Infrastructure(#[source] RepositoryError),
}

impl ApplicationServiceError {
    fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Only infrastructure failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(err) if err.is_transient())
    }
}
