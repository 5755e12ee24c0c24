use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument, warn};

use super::services::prepare_preferences;
use crate::{auth::AuthUser, nutrition::UserPreferences, state::AppState};

pub fn preferences_routes() -> Router<AppState> {
    Router::new().route("/preferences", get(get_preferences).put(put_preferences))
}

/// Stored preferences, or the defaults when the user never saved any.
#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserPreferences>, (StatusCode, String)> {
    let prefs = state
        .preferences
        .fetch_preferences(user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "get_preferences failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load preferences".to_string(),
            )
        })?;
    Ok(Json(prefs.unwrap_or_default()))
}

#[instrument(skip(state, payload))]
pub async fn put_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UserPreferences>,
) -> Result<Json<UserPreferences>, (StatusCode, String)> {
    let prefs = prepare_preferences(payload).map_err(|e| {
        warn!(error = %e, %user_id, "rejected preferences");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    state
        .preferences
        .save_preferences(user_id, &prefs)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "put_preferences failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save preferences".to_string(),
            )
        })?;

    info!(%user_id, "preferences updated");
    Ok(Json(prefs))
}
