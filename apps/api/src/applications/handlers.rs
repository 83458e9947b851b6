//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::status::{is_valid_transition, valid_next, ApplicationStatus};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application: ApplicationRow,
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = fetch_application(&state, application_id).await?;
    Ok(Json(ApplicationResponse { application }))
}

/// PATCH /api/v1/applications/:id/status
///
/// Applies a lifecycle transition. Writing the current status again is an
/// accepted no-op; an invalid move is rejected with the permitted successors
/// named in the message.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = fetch_application(&state, application_id).await?;

    let current: ApplicationStatus = application.status.parse().map_err(|e: String| {
        AppError::Internal(anyhow::anyhow!(
            "Application {application_id} has corrupt status: {e}"
        ))
    })?;
    let next = request.status;

    if !is_valid_transition(current, next) {
        let allowed = valid_next(current)
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::UnprocessableEntity(format!(
            "Cannot move application from {current} to {next}. Valid next statuses: [{allowed}]"
        )));
    }

    if current == next {
        // No-op write; nothing to persist.
        return Ok(Json(ApplicationResponse { application }));
    }

    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(next.as_str())
    .bind(application_id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("application {application_id} moved {current} -> {next}");

    Ok(Json(ApplicationResponse { application: updated }))
}

async fn fetch_application(
    state: &AppState,
    application_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))
}
