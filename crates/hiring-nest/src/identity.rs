//! Typed identity handed over by the authentication collaborator.
//!
//! The core never inspects sessions; it trusts the `{user id, role}` pair resolved upstream.
//! Over HTTP the pair travels in `x-user-id`, `x-user-role` and, for employers, `x-company-id`.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::domain::{CompanyId, UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const COMPANY_ID_HEADER: &str = "x-company-id";

/// Role of the caller. Employers act on behalf of exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    JobSeeker,
    Employer { company_id: CompanyId },
    Admin,
}

/// The authenticated caller of a core operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    #[serde(flatten)]
    pub role: ActorRole,
}

impl Actor {
    pub fn seeker(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: ActorRole::JobSeeker,
        }
    }

    pub fn employer(user_id: impl Into<String>, company_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: ActorRole::Employer {
                company_id: CompanyId(company_id.into()),
            },
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: ActorRole::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }

    /// True when the caller represents the given company.
    pub fn represents(&self, company_id: &CompanyId) -> bool {
        matches!(&self.role, ActorRole::Employer { company_id: own } if own == company_id)
    }

    /// Resolve the caller from the identity headers set by the auth layer.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, IdentityError> {
        let user_id = header_value(headers, USER_ID_HEADER).ok_or(IdentityError::MissingUser)?;
        let role = header_value(headers, USER_ROLE_HEADER).ok_or(IdentityError::MissingRole)?;

        let role = match role.to_ascii_uppercase().as_str() {
            "JOB_SEEKER" | "SEEKER" => ActorRole::JobSeeker,
            "EMPLOYER" | "RECRUITER" => {
                let company_id = header_value(headers, COMPANY_ID_HEADER)
                    .ok_or(IdentityError::MissingCompany)?;
                ActorRole::Employer {
                    company_id: CompanyId(company_id.to_string()),
                }
            }
            "ADMIN" => ActorRole::Admin,
            _ => return Err(IdentityError::UnknownRole(role.to_string())),
        };

        Ok(Self {
            user_id: UserId(user_id.to_string()),
            role,
        })
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The request carried no usable identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("missing x-user-id header")]
    MissingUser,
    #[error("missing x-user-role header")]
    MissingRole,
    #[error("employers must send x-company-id")]
    MissingCompany,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}
