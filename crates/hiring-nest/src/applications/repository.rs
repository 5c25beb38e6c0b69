use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, ApplicationStatus, StatusChange};
use crate::domain::{JobId, UserId};
use crate::store::RepositoryError;

/// Storage abstraction so the lifecycle service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    /// Must fail with [`RepositoryError::Conflict`] when the (seeker, posting) pair exists.
    fn insert(
        &self,
        application: Application,
    ) -> impl Future<Output = Result<Application, RepositoryError>> + Send;

    fn fetch(
        &self,
        id: &ApplicationId,
    ) -> impl Future<Output = Result<Option<Application>, RepositoryError>> + Send;

    /// Conditional update: applies `change` only while the stored status equals `expected`,
    /// otherwise fails with [`RepositoryError::StaleState`].
    fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        change: StatusChange,
    ) -> impl Future<Output = Result<Application, RepositoryError>> + Send;

    fn for_seeker(
        &self,
        seeker_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Application>, RepositoryError>> + Send;

    fn for_job(
        &self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<Vec<Application>, RepositoryError>> + Send;
}

/// Outbound hook for notification collaborators (e-mail, employer inbox, audit sinks).
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: ApplicationEvent) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApplicationEventKind {
    Created,
    StatusChanged {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

/// Change notification emitted after a successful create or transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub seeker_id: UserId,
    pub actor: UserId,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: ApplicationEventKind,
}

impl ApplicationEvent {
    pub fn template(&self) -> &'static str {
        match &self.kind {
            ApplicationEventKind::Created => "application_received",
            ApplicationEventKind::StatusChanged { to, .. } => match to {
                ApplicationStatus::Withdrawn => "application_withdrawn",
                ApplicationStatus::Rejected => "application_rejected",
                ApplicationStatus::Offered => "offer_extended",
                _ => "application_status_changed",
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}
