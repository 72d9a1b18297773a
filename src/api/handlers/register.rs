use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use chrono::Utc;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::registration::value_objects::TeamId;
use crate::domain::registration::{validate_submission, SubmissionResponse};

pub const MSG_REGISTERED: &str = "Registration completed successfully";

/// Register a team
///
/// POST /api/register
///
/// Validates the body without trusting the wizard, relays the row to the
/// spreadsheet webhook and only then reports success.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let body = body.map_err(|e| {
        tracing::error!(error = %e, status = e.status().as_u16(), "registration body unreadable");
        ApiError::internal()
    })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "registration body is not JSON");
        ApiError::internal()
    })?;

    let registration = validate_submission(&payload).map_err(|errors| {
        tracing::warn!(errors = %errors, "registration rejected");
        ApiError::validation(errors)
    })?;

    let submitted_at = Utc::now();
    let team_id = TeamId::mint(&state.event_prefix, submitted_at);
    let record = registration.to_sheet_record(submitted_at);

    let ack = state.sink.submit(&record).await.map_err(|e| {
        tracing::error!(error = %e, team_name = %record.team_name, "relay to spreadsheet failed");
        ApiError::relay_failed()
    })?;

    tracing::info!(
        team_id = %team_id,
        team_name = registration.team_name(),
        team_size = registration.team_size().get(),
        via_redirect = ack.via_redirect,
        "registration relayed"
    );

    Ok(Json(SubmissionResponse {
        success: true,
        message: Some(MSG_REGISTERED.to_string()),
        team_id: Some(team_id.to_string()),
        errors: None,
    }))
}
