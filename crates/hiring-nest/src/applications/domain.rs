use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CompanySummary, JobId, UserId};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an application.
///
/// ```text
/// Applied -> Viewed -> Shortlisted -> Interview -> Offered
///    \__________\___________\_____________\______> Rejected | Withdrawn
/// ```
///
/// Forward moves may skip steps. `Offered`, `Rejected` and `Withdrawn` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Viewed,
    Shortlisted,
    Interview,
    Offered,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Viewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Viewed => "Viewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Case-insensitive match on the label (`shortlisted`, `SHORTLISTED`).
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Offered | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// Position on the forward progression; `None` for the two exits.
    const fn forward_rank(self) -> Option<u8> {
        match self {
            ApplicationStatus::Applied => Some(0),
            ApplicationStatus::Viewed => Some(1),
            ApplicationStatus::Shortlisted => Some(2),
            ApplicationStatus::Interview => Some(3),
            ApplicationStatus::Offered => Some(4),
            ApplicationStatus::Rejected | ApplicationStatus::Withdrawn => None,
        }
    }

    /// Whether the state machine allows `self -> next`, independent of who asks.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.forward_rank(), next.forward_rank()) {
            (Some(current), Some(target)) => target > current,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the application an actor speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAuthority {
    /// The applicant; may only withdraw.
    Seeker,
    /// A representative of the posting's company; may advance or reject.
    Company,
}

impl TransitionAuthority {
    pub fn permits(self, next: ApplicationStatus) -> bool {
        match self {
            TransitionAuthority::Seeker => next == ApplicationStatus::Withdrawn,
            TransitionAuthority::Company => next != ApplicationStatus::Withdrawn,
        }
    }
}

/// One recorded move through the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    pub at: DateTime<Utc>,
    pub actor: UserId,
}

/// A seeker's application to a posting. Never deleted; `Withdrawn` is the tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub seeker_id: UserId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<StatusChange>,
}

impl Application {
    /// A fresh application always starts in `Applied`.
    pub fn new(
        id: ApplicationId,
        seeker_id: UserId,
        job_id: JobId,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            seeker_id,
            job_id,
            status: ApplicationStatus::Applied,
            applied_at,
            history: Vec::new(),
        }
    }

    pub fn last_transition_at(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|change| change.at)
    }
}

/// Application joined with the posting title and company summary for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub application: Application,
    pub posting_title: String,
    pub company: CompanySummary,
}

/// Count of applications in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

/// Dashboard tally of a seeker's applications, one entry per status in lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub active: usize,
    pub by_status: Vec<StatusCount>,
}

impl ApplicationSummary {
    pub fn from_applications<'a>(applications: impl IntoIterator<Item = &'a Application>) -> Self {
        let mut by_status: Vec<StatusCount> = ApplicationStatus::ALL
            .into_iter()
            .map(|status| StatusCount { status, count: 0 })
            .collect();
        let mut total = 0;
        let mut active = 0;
        for application in applications {
            total += 1;
            if !application.status.is_terminal() {
                active += 1;
            }
            if let Some(entry) = by_status
                .iter_mut()
                .find(|entry| entry.status == application.status)
            {
                entry.count += 1;
            }
        }
        Self {
            total,
            active,
            by_status,
        }
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}

/// Ordering for listings: newest application first, ties by ascending id.
pub fn newest_first(left: &Application, right: &Application) -> std::cmp::Ordering {
    right
        .applied_at
        .cmp(&left.applied_at)
        .then_with(|| left.id.cmp(&right.id))
}
