//! Profile and vacancy models plus the lookup queries the matching engine
//! consumes.
//!
//! Profiles are a single row with a role tag and a role-specific JSON
//! payload (`RoleDetails`) — there is no base-user/subclass hierarchy, and no
//! ambient current-user context; callers pass identifiers explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

/// Role-specific payload stored alongside the shared profile columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleDetails {
    Candidate {
        skills_text: Option<String>,
        experience_years: Option<i32>,
        headline: Option<String>,
    },
    Recruiter {
        company: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// "candidate" | "recruiter" — discriminates `details`.
    pub role: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VacancyRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub skills_text: Option<String>,
    pub min_experience_years: i32,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching-engine views
// ────────────────────────────────────────────────────────────────────────────

/// Candidate attributes the matching engine reads. Years default to 0 when
/// the profile leaves them unset.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub skills_text: Option<String>,
    pub experience_years: u32,
}

/// Vacancy attributes the matching engine reads.
#[derive(Debug, Clone, Serialize)]
pub struct VacancyProfile {
    pub id: Uuid,
    pub title: String,
    pub skills_text: Option<String>,
    pub min_experience_years: u32,
}

impl ProfileRow {
    /// Converts a candidate-role row into the matching view.
    /// Fails if the role tag and payload disagree (data corruption).
    pub fn into_candidate(self) -> Result<CandidateProfile, AppError> {
        let details: RoleDetails = serde_json::from_value(self.details).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Profile {} has malformed details payload: {e}",
                self.id
            ))
        })?;

        match details {
            RoleDetails::Candidate {
                skills_text,
                experience_years,
                ..
            } => Ok(CandidateProfile {
                id: self.id,
                full_name: self.full_name,
                skills_text,
                experience_years: experience_years.unwrap_or(0).max(0) as u32,
            }),
            RoleDetails::Recruiter { .. } => Err(AppError::Internal(anyhow::anyhow!(
                "Profile {} is tagged candidate but carries recruiter details",
                self.id
            ))),
        }
    }
}

impl From<VacancyRow> for VacancyProfile {
    fn from(row: VacancyRow) -> Self {
        VacancyProfile {
            id: row.id,
            title: row.title,
            skills_text: row.skills_text,
            min_experience_years: row.min_experience_years.max(0) as u32,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lookups
// ────────────────────────────────────────────────────────────────────────────

/// Loads a candidate profile or fails with `NotFound`.
pub async fn get_candidate(pool: &PgPool, id: Uuid) -> Result<CandidateProfile, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT * FROM profiles WHERE id = $1 AND role = 'candidate'",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    row.into_candidate()
}

/// Loads a vacancy or fails with `NotFound`.
pub async fn get_vacancy(pool: &PgPool, id: Uuid) -> Result<VacancyProfile, AppError> {
    let row = sqlx::query_as::<_, VacancyRow>("SELECT * FROM vacancies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {id} not found")))?;

    Ok(row.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate_row(details: serde_json::Value) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            role: "candidate".to_string(),
            details,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_candidate_details_round_trip() {
        let row = candidate_row(json!({
            "kind": "candidate",
            "skills_text": "rust, sql",
            "experience_years": 6,
            "headline": "Backend engineer"
        }));
        let candidate = row.into_candidate().unwrap();
        assert_eq!(candidate.skills_text.as_deref(), Some("rust, sql"));
        assert_eq!(candidate.experience_years, 6);
    }

    #[test]
    fn test_missing_experience_defaults_to_zero() {
        let row = candidate_row(json!({
            "kind": "candidate",
            "skills_text": null,
            "experience_years": null,
            "headline": null
        }));
        let candidate = row.into_candidate().unwrap();
        assert_eq!(candidate.experience_years, 0);
        assert!(candidate.skills_text.is_none());
    }

    #[test]
    fn test_negative_experience_clamps_to_zero() {
        let row = candidate_row(json!({
            "kind": "candidate",
            "skills_text": "rust",
            "experience_years": -3,
            "headline": null
        }));
        assert_eq!(row.into_candidate().unwrap().experience_years, 0);
    }

    #[test]
    fn test_recruiter_payload_on_candidate_row_is_rejected() {
        let row = candidate_row(json!({"kind": "recruiter", "company": "Acme"}));
        assert!(row.into_candidate().is_err());
    }

    #[test]
    fn test_malformed_details_is_rejected() {
        let row = candidate_row(json!({"kind": "astronaut"}));
        assert!(row.into_candidate().is_err());
    }

    #[test]
    fn test_vacancy_view_clamps_negative_minimum() {
        let row = VacancyRow {
            id: Uuid::new_v4(),
            recruiter_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: None,
            skills_text: Some("rust, tokio".to_string()),
            min_experience_years: -1,
            created_at: Utc::now(),
        };
        let vacancy: VacancyProfile = row.into();
        assert_eq!(vacancy.min_experience_years, 0);
    }
}
