use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::domain::registration::ProblemTracksResponse;

/// List the problem tracks a team can pick from
///
/// GET /api/problem-tracks
pub async fn list_problem_tracks(State(state): State<AppState>) -> Json<ProblemTracksResponse> {
    Json(ProblemTracksResponse::from(state.catalog.as_ref()))
}
