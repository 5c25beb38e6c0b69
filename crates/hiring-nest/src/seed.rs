//! Demo catalogue: one verified company with three active postings, plus the three demo
//! accounts (seeker, recruiter, admin).

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    slugify, Company, CompanyId, JobId, JobPosting, JobStatus, JobType, SalaryRange, WorkMode,
};
use crate::identity::Actor;
use crate::store::{MemoryStore, RepositoryError};

pub const DEMO_COMPANY_ID: &str = "company-tech-innovations";
pub const DEMO_SEEKER_ID: &str = "seeker@example.com";
pub const DEMO_RECRUITER_ID: &str = "recruiter@techinnovations.com";
pub const DEMO_ADMIN_ID: &str = "admin@hiringnest.com";

#[derive(Debug, Clone)]
pub struct DemoCatalogue {
    pub company: Company,
    pub jobs: Vec<JobPosting>,
}

impl DemoCatalogue {
    pub fn job_id(&self, title: &str) -> Option<JobId> {
        self.jobs
            .iter()
            .find(|job| job.title == title)
            .map(|job| job.id.clone())
    }
}

pub fn demo_seeker() -> Actor {
    Actor::seeker(DEMO_SEEKER_ID)
}

pub fn demo_recruiter() -> Actor {
    Actor::employer(DEMO_RECRUITER_ID, DEMO_COMPANY_ID)
}

pub fn demo_admin() -> Actor {
    Actor::admin(DEMO_ADMIN_ID)
}

/// Build the catalogue with postings dated relative to `now`, newest first.
pub fn demo_catalogue(now: DateTime<Utc>) -> DemoCatalogue {
    let company = Company {
        id: CompanyId(DEMO_COMPANY_ID.to_string()),
        name: "Tech Innovations Pvt Ltd".to_string(),
        logo: None,
        slug: "tech-innovations".to_string(),
    };

    let posting = |title: &str,
                   description: &str,
                   location: &str,
                   work_mode: WorkMode,
                   salary: (u64, u64),
                   age: Duration| JobPosting {
        id: JobId(format!("{}-{}", slugify(title), company.slug)),
        company_id: company.id.clone(),
        title: title.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        job_type: JobType::FullTime,
        work_mode,
        salary: SalaryRange::inr(Some(salary.0), Some(salary.1)),
        status: JobStatus::Active,
        posted_at: now - age,
    };

    let jobs = vec![
        posting(
            "Senior Full Stack Developer",
            "We are looking for an experienced Full Stack Developer to join our dynamic team.",
            "Bangalore, Karnataka",
            WorkMode::Hybrid,
            (1_200_000, 1_800_000),
            Duration::hours(2),
        ),
        posting(
            "Frontend Developer (React)",
            "Join our team as a Frontend Developer specializing in React.",
            "Remote",
            WorkMode::Remote,
            (800_000, 1_400_000),
            Duration::days(1),
        ),
        posting(
            "Digital Marketing Manager",
            "Seeking an experienced Digital Marketing Manager to lead our marketing initiatives.",
            "Mumbai, Maharashtra",
            WorkMode::Hybrid,
            (1_000_000, 1_600_000),
            Duration::days(3),
        ),
    ];

    DemoCatalogue { company, jobs }
}

/// Load the demo catalogue into `store`.
pub fn seed_store(
    store: &MemoryStore,
    now: DateTime<Utc>,
) -> Result<DemoCatalogue, RepositoryError> {
    let catalogue = demo_catalogue(now);
    store.add_company(catalogue.company.clone())?;
    for job in &catalogue.jobs {
        store.add_job(job.clone())?;
    }
    Ok(catalogue)
}
