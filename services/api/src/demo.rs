use crate::infra::Services;
use chrono::Utc;
use clap::Args;
use hiring_nest::applications::{ApplicationId, ApplicationServiceError, ApplicationStatus};
use hiring_nest::config::{AppConfig, SearchConfig, StoreConfig};
use hiring_nest::error::AppError;
use hiring_nest::identity::Actor;
use hiring_nest::jobs::{JobSearchError, SearchParams, SearchResults};
use hiring_nest::seed::{self, demo_recruiter, demo_seeker, DemoCatalogue};
use hiring_nest::store::MemoryStore;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Case-insensitive text matched against title and description
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Case-insensitive substring of the posting location
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// FULL_TIME, PART_TIME, CONTRACT, INTERNSHIP or FREELANCE
    #[arg(long)]
    pub(crate) job_type: Option<String>,
    /// REMOTE, ONSITE or HYBRID
    #[arg(long)]
    pub(crate) work_mode: Option<String>,
    /// Only postings from the last 1, 7, 14 or 30 days
    #[arg(long)]
    pub(crate) date_posted: Option<String>,
    /// 1-based page number
    #[arg(long)]
    pub(crate) page: Option<String>,
    /// Page size, capped by APP_SEARCH_MAX_LIMIT
    #[arg(long)]
    pub(crate) limit: Option<String>,
}

impl From<SearchArgs> for SearchParams {
    fn from(args: SearchArgs) -> Self {
        SearchParams {
            page: args.page,
            limit: args.limit,
            search: args.search,
            location: args.location,
            job_type: args.job_type,
            work_mode: args.work_mode,
            date_posted: args.date_posted,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Title of the demo posting to apply to.
    #[arg(long, default_value = "Senior Full Stack Developer")]
    pub(crate) job: String,
    /// Skip the search portion of the demo.
    #[arg(long)]
    pub(crate) skip_search: bool,
}

fn demo_services(
    search: SearchConfig,
    store: StoreConfig,
) -> Result<(Services, DemoCatalogue), AppError> {
    let memory = MemoryStore::default();
    let catalogue = seed::seed_store(&memory, Utc::now())?;
    Ok((Services::new(Arc::new(memory), search, store), catalogue))
}

fn search_failure(error: JobSearchError) -> AppError {
    match error {
        JobSearchError::Infrastructure(err) => AppError::Store(err),
    }
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (services, _) = demo_services(config.search, config.store)?;

    let results = services
        .search
        .search(&SearchParams::from(args))
        .await
        .map_err(search_failure)?;
    let json = serde_json::to_string_pretty(&results).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (services, catalogue) = demo_services(config.search, config.store)?;

    println!("Hiring Nest demo");
    println!(
        "Catalogue: {} ({} active postings)",
        catalogue.company.name,
        catalogue.jobs.len()
    );

    if !args.skip_search {
        let params = SearchParams {
            search: Some("Developer".to_string()),
            location: Some("Bangalore".to_string()),
            job_type: Some("FULL_TIME".to_string()),
            ..SearchParams::default()
        };
        let results = services.search.search(&params).await.map_err(search_failure)?;
        render_search("Developer roles in Bangalore", &results);
    }

    let Some(job_id) = catalogue.job_id(&args.job) else {
        println!("\nNo demo posting titled '{}'", args.job);
        return Ok(());
    };

    println!("\nApplication lifecycle for '{}'", args.job);
    let seeker = demo_seeker();
    let recruiter = demo_recruiter();

    let application = match services.applications.create(&seeker, &job_id).await {
        Ok(application) => application,
        Err(err) => {
            println!("  Application refused: {err}");
            return Ok(());
        }
    };
    println!(
        "  {} applied as {} -> {}",
        seeker.user_id.0, application.id, application.status
    );

    let steps = [
        (&recruiter, ApplicationStatus::Shortlisted),
        (&seeker, ApplicationStatus::Offered),
        (&seeker, ApplicationStatus::Withdrawn),
        (&recruiter, ApplicationStatus::Interview),
    ];
    for (actor, next) in steps {
        step(&services, &application.id, actor, next).await;
    }

    match services.applications.summary(&seeker.user_id, &seeker).await {
        Ok(summary) => {
            println!("\nDashboard: {} total, {} active", summary.total, summary.active);
            for entry in summary.by_status.iter().filter(|entry| entry.count > 0) {
                println!("  {:<12} {}", entry.status.label(), entry.count);
            }
        }
        Err(err) => println!("\nDashboard unavailable: {err}"),
    }

    Ok(())
}

async fn step(services: &Services, id: &ApplicationId, actor: &Actor, next: ApplicationStatus) {
    match services.applications.transition(id, actor, next).await {
        Ok(application) => println!("  {} moved it to {}", actor.user_id.0, application.status),
        Err(err @ ApplicationServiceError::Forbidden { .. })
        | Err(err @ ApplicationServiceError::InvalidTransition { .. }) => {
            println!("  {} -> {next} refused: {err}", actor.user_id.0)
        }
        Err(err) => println!("  {} -> {next} failed: {err}", actor.user_id.0),
    }
}

fn render_search(heading: &str, results: &SearchResults) {
    println!(
        "\n{heading}: {} of {} (page {}/{})",
        results.jobs.len(),
        results.pagination.total,
        results.pagination.page,
        results.pagination.pages
    );
    for listing in &results.jobs {
        println!(
            "  {} | {} | {} | {}",
            listing.posting.title,
            listing.company.name,
            listing.posting.location,
            listing.posting.salary.display()
        );
    }
}
