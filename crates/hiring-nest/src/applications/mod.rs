//! Application lifecycle: the status state machine, ownership rules, and HTTP endpoints.
//!
//! Creation relies on the store's (seeker, posting) uniqueness constraint and transitions on
//! a conditional update keyed on the status that was read, so concurrent requests resolve to
//! exactly one winner without in-process locking.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSummary, ApplicationView,
    StatusChange, StatusCount, TransitionAuthority,
};
pub use repository::{
    ApplicationEvent, ApplicationEventKind, ApplicationRepository, EventPublisher, PublishError,
};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
