//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::assessor::CompatibilityAssessment;
use crate::models::profile::{get_candidate, get_vacancy};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub candidate_id: Uuid,
    pub vacancy_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub assessment: CompatibilityAssessment,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub candidate_id: Uuid,
    pub vacancy_ids: Vec<Uuid>,
    /// Defaults to the configured batch limit when omitted.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub assessments: Vec<CompatibilityAssessment>,
    /// Pairs submitted after truncation to the limit.
    pub requested: usize,
    /// Pairs dropped by timeouts or task failures.
    pub dropped: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/assess
///
/// Scores one candidate against one vacancy. Missing entities surface as 404;
/// augmentation problems never do — the assessment degrades instead.
pub async fn handle_assess(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<AssessResponse>, AppError> {
    let candidate = get_candidate(&state.db, request.candidate_id).await?;
    let vacancy = get_vacancy(&state.db, request.vacancy_id).await?;

    let assessment = state.assessor.assess(&candidate, &vacancy).await;

    Ok(Json(AssessResponse { assessment }))
}

/// POST /api/v1/match/batch
///
/// Scores one candidate against many vacancies concurrently. Vacancy lookups
/// resolve before fan-out, so an unknown id fails the request; scoring
/// failures inside the batch only shrink the result set.
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if request.vacancy_ids.is_empty() {
        return Ok(Json(BatchResponse {
            assessments: Vec::new(),
            requested: 0,
            dropped: 0,
        }));
    }

    let limit = request
        .limit
        .unwrap_or(state.config.batch_limit)
        .min(state.config.batch_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let candidate = get_candidate(&state.db, request.candidate_id).await?;

    // Truncate before lookups: ids beyond the limit are never touched.
    let mut vacancies = Vec::with_capacity(limit.min(request.vacancy_ids.len()));
    for vacancy_id in request.vacancy_ids.iter().take(limit) {
        vacancies.push(get_vacancy(&state.db, *vacancy_id).await?);
    }

    let requested = vacancies.len();
    let assessments = state
        .orchestrator
        .score_against_many(candidate, vacancies, limit)
        .await;
    let dropped = requested - assessments.len();

    Ok(Json(BatchResponse {
        assessments,
        requested,
        dropped,
    }))
}
