//! Catalogue types shared by search and the application lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for companies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for authenticated users (seekers, recruiters, admins).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Folds `Full-time`, `full_time` and `FULL TIME` onto the same key.
fn enum_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Freelance,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Internship => "INTERNSHIP",
            JobType::Freelance => "FREELANCE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Freelance => "Freelance",
        }
    }

    /// Accepts either the stored code or the display label, case-insensitively.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let key = enum_key(raw);
        Self::ALL
            .into_iter()
            .find(|kind| enum_key(kind.code()) == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

impl WorkMode {
    pub const ALL: [WorkMode; 3] = [WorkMode::Remote, WorkMode::Onsite, WorkMode::Hybrid];

    pub const fn code(self) -> &'static str {
        match self {
            WorkMode::Remote => "REMOTE",
            WorkMode::Onsite => "ONSITE",
            WorkMode::Hybrid => "HYBRID",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Onsite => "On-site",
            WorkMode::Hybrid => "Hybrid",
        }
    }

    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let key = enum_key(raw);
        Self::ALL.into_iter().find(|mode| mode.code() == key)
    }
}

/// Publication state of a posting. Only `Active` postings are searchable or open to applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    Active,
    Paused,
    Closed,
    Expired,
}

/// Advertised compensation. Both bounds are optional ("not disclosed").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub currency: String,
}

impl SalaryRange {
    pub fn inr(min: Option<u64>, max: Option<u64>) -> Self {
        Self {
            min,
            max,
            currency: "INR".to_string(),
        }
    }

    pub fn display(&self) -> String {
        let min = self.min.filter(|amount| *amount > 0);
        let max = self.max.filter(|amount| *amount > 0);
        match (min, max) {
            (Some(min), Some(max)) => format!(
                "{} - {}",
                format_amount(min, &self.currency),
                format_amount(max, &self.currency)
            ),
            (Some(min), None) => format!("From {}", format_amount(min, &self.currency)),
            (None, Some(max)) => format!("Up to {}", format_amount(max, &self.currency)),
            (None, None) => "Not disclosed".to_string(),
        }
    }
}

fn format_amount(amount: u64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("INR") {
        format!("₹{}", group_indian(amount))
    } else {
        format!("{} {}", currency.to_ascii_uppercase(), group_thousands(amount))
    }
}

/// Lakh/crore grouping: last three digits, then pairs (12,00,000).
fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Employer profile; the slug is unique and used in public URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub logo: Option<String>,
    pub slug: String,
}

impl Company {
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            name: self.name.clone(),
            logo: self.logo.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Company projection attached to search results and application listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    pub logo: Option<String>,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub work_mode: WorkMode,
    pub salary: SalaryRange,
    pub status: JobStatus,
    pub posted_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }
}

/// A posting together with its owning company's public summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub company: CompanySummary,
}

/// URL slug derivation used for company and posting slugs.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_dash = false;
    for ch in cleaned.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(ch);
    }
    slug
}
