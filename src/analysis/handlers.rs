use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{instrument, warn};

use super::dto::AnalysisQuery;
use crate::{auth::AuthUser, nutrition::AnalysisResult, state::AppState};

pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/analysis", get(get_analysis))
}

#[instrument(skip(state))]
pub async fn get_analysis(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResult>, (StatusCode, String)> {
    let limits = state.config.analysis;
    let days = query.days.unwrap_or(limits.default_days);
    if days < 1 || days > limits.max_days {
        warn!(%user_id, days, "analysis window out of bounds");
        return Err((
            StatusCode::BAD_REQUEST,
            format!("days must be between 1 and {}", limits.max_days),
        ));
    }

    let result = state
        .analyzer
        .analyze(user_id, days, OffsetDateTime::now_utc())
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(result))
}
