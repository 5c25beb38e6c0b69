use chrono::Utc;
use hiring_nest::applications::{
    ApplicationEvent, ApplicationService, EventPublisher, PublishError,
};
use hiring_nest::config::{AppConfig, SearchConfig, StoreConfig};
use hiring_nest::error::AppError;
use hiring_nest::jobs::JobSearchService;
use hiring_nest::seed;
use hiring_nest::store::MemoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type SearchService = JobSearchService<MemoryStore>;
pub(crate) type LifecycleService =
    ApplicationService<MemoryStore, MemoryStore, TracingEventPublisher>;

/// Both services wired to one shared store.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) search: Arc<SearchService>,
    pub(crate) applications: Arc<LifecycleService>,
}

impl Services {
    pub(crate) fn new(
        store: Arc<MemoryStore>,
        search: SearchConfig,
        timeouts: StoreConfig,
    ) -> Self {
        Self {
            search: Arc::new(JobSearchService::new(store.clone(), search, timeouts)),
            applications: Arc::new(ApplicationService::new(
                store.clone(),
                store,
                Arc::new(TracingEventPublisher),
                timeouts,
            )),
        }
    }

    pub(crate) fn from_config(store: Arc<MemoryStore>, config: &AppConfig) -> Self {
        Self::new(store, config.search, config.store)
    }
}

/// Open the in-memory store, loading the demo catalogue when configured to.
pub(crate) fn open_store(config: &AppConfig) -> Result<Arc<MemoryStore>, AppError> {
    let store = MemoryStore::default();
    if config.seed_demo {
        let catalogue = seed::seed_store(&store, Utc::now())?;
        info!(
            company = %catalogue.company.slug,
            postings = catalogue.jobs.len(),
            "demo catalogue seeded"
        );
    }
    Ok(Arc::new(store))
}

/// Notification sink that records each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: ApplicationEvent) -> Result<(), PublishError> {
        let payload =
            serde_json::to_string(&event).map_err(|err| PublishError::Transport(err.to_string()))?;
        info!(
            template = event.template(),
            application_id = %event.application_id,
            %payload,
            "application event"
        );
        Ok(())
    }
}
