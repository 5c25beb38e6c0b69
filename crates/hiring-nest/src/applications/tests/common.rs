use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::applications::domain::{Application, ApplicationId, ApplicationStatus, StatusChange};
use crate::applications::repository::{
    ApplicationEvent, ApplicationRepository, EventPublisher, PublishError,
};
use crate::applications::ApplicationService;
use crate::config::StoreConfig;
use crate::domain::{
    Company, CompanyId, JobId, JobPosting, JobStatus, JobType, SalaryRange, UserId, WorkMode,
};
use crate::identity::Actor;
use crate::seed::{self, DemoCatalogue};
use crate::store::{MemoryStore, RepositoryError};

pub(super) const RIVAL_COMPANY_ID: &str = "company-rival";
pub(super) const PAUSED_JOB_ID: &str = "paused-designer-tech-innovations";

pub(super) type MemoryService = ApplicationService<MemoryStore, MemoryStore, RecordingEvents>;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
        .single()
        .expect("valid time")
}

pub(super) fn other_seeker() -> Actor {
    Actor::seeker("priya@example.com")
}

pub(super) fn rival_recruiter() -> Actor {
    Actor::employer("hr@rival.example", RIVAL_COMPANY_ID)
}

/// Demo catalogue plus a rival company and a paused posting.
pub(super) fn seeded_store() -> (Arc<MemoryStore>, DemoCatalogue) {
    let store = MemoryStore::default();
    let catalogue = seed::seed_store(&store, now()).expect("seed succeeds");

    store
        .add_company(Company {
            id: CompanyId(RIVAL_COMPANY_ID.to_string()),
            name: "Rival Systems".to_string(),
            logo: None,
            slug: "rival-systems".to_string(),
        })
        .expect("rival company");
    store
        .add_job(JobPosting {
            id: JobId(PAUSED_JOB_ID.to_string()),
            company_id: catalogue.company.id.clone(),
            title: "Product Designer".to_string(),
            description: "Paused while the team reorganises.".to_string(),
            location: "Pune, Maharashtra".to_string(),
            job_type: JobType::Contract,
            work_mode: WorkMode::Onsite,
            salary: SalaryRange::inr(None, None),
            status: JobStatus::Paused,
            posted_at: now() - Duration::days(5),
        })
        .expect("paused posting");

    (Arc::new(store), catalogue)
}

pub(super) struct Fixture {
    pub(super) service: Arc<MemoryService>,
    pub(super) store: Arc<MemoryStore>,
    pub(super) events: Arc<RecordingEvents>,
    pub(super) catalogue: DemoCatalogue,
}

impl Fixture {
    pub(super) fn job(&self, title: &str) -> JobId {
        self.catalogue.job_id(title).expect("seeded posting")
    }

    pub(super) async fn stored(&self, id: &ApplicationId) -> Application {
        ApplicationRepository::fetch(self.store.as_ref(), id)
            .await
            .expect("fetch succeeds")
            .expect("application present")
    }
}

pub(super) fn build_service() -> Fixture {
    let (store, catalogue) = seeded_store();
    let events = Arc::new(RecordingEvents::default());
    let service = Arc::new(ApplicationService::new(
        store.clone(),
        store.clone(),
        events.clone(),
        StoreConfig::default(),
    ));
    Fixture {
        service,
        store,
        events,
        catalogue,
    }
}

#[derive(Default)]
pub(super) struct RecordingEvents {
    events: Mutex<Vec<ApplicationEvent>>,
}

impl RecordingEvents {
    pub(super) fn events(&self) -> Vec<ApplicationEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventPublisher for RecordingEvents {
    fn publish(&self, event: ApplicationEvent) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct FailingEvents;

impl EventPublisher for FailingEvents {
    fn publish(&self, _event: ApplicationEvent) -> Result<(), PublishError> {
        Err(PublishError::Transport("smtp relay down".to_string()))
    }
}

pub(super) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    async fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn update_status(
        &self,
        _id: &ApplicationId,
        _expected: ApplicationStatus,
        _change: StatusChange,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn for_seeker(&self, _seeker_id: &UserId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn for_job(&self, _job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn application(
    id: &str,
    status: ApplicationStatus,
    applied_at: DateTime<Utc>,
) -> Application {
    let mut application = Application::new(
        ApplicationId(id.to_string()),
        UserId(seed::DEMO_SEEKER_ID.to_string()),
        JobId("job".to_string()),
        applied_at,
    );
    application.status = status;
    application
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
