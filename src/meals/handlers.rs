use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::dto::{CreateMealRequest, MealRangeQuery};
use super::services::prepare_meal_log;
use crate::{auth::AuthUser, nutrition::MealRecord, state::AppState};

pub fn meal_routes() -> Router<AppState> {
    Router::new().route("/meals", get(list_meals).post(log_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(range): Query<MealRangeQuery>,
) -> Result<Json<Vec<MealRecord>>, (StatusCode, String)> {
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err((StatusCode::BAD_REQUEST, "start must not be after end".into()));
        }
    }

    let records = state
        .meal_logs
        .fetch_meal_records(user_id, range.start, range.end)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list_meals failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load meals".to_string())
        })?;
    Ok(Json(records))
}

#[instrument(skip(state, payload))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealRecord>), (StatusCode, String)> {
    let meal = prepare_meal_log(payload, OffsetDateTime::now_utc()).map_err(|e| {
        warn!(error = %e, %user_id, "rejected meal log");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let record = state
        .meal_logs
        .insert_meal_log(user_id, meal)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "log_meal failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to log meal".to_string())
        })?;

    info!(%user_id, meal_log_id = record.id, meal_type = record.meal_type.as_str(), "meal logged");
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{build_app, test_support::*};
    use crate::nutrition::memory::{InMemoryPreferencesStore, UnavailableStore};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn oatmeal(date: &str) -> serde_json::Value {
        json!({
            "date": date,
            "mealType": "Breakfast",
            "foods": [
                { "name": "Oats", "nutrition": { "calories": 150.0, "protein": 5.0, "carbs": 27.0, "fat": 3.0 } },
                { "name": "Milk", "nutrition": { "calories": 100.0, "protein": 8.0, "carbs": 12.0, "fat": 2.5, "sugar": 12.0 } }
            ]
        })
    }

    #[tokio::test]
    async fn logging_sums_totals_from_foods() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let res = build_app(state)
            .oneshot(send_json("POST", "/api/v1/meals", &auth, oatmeal("2024-05-01T08:00:00Z")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = json_body(res).await;
        assert_eq!(body["mealType"], "breakfast");
        assert_eq!(body["totalCalories"], 250.0);
        assert_eq!(body["totalProtein"], 13.0);
        assert_eq!(body["totalCarbs"], 39.0);
        assert_eq!(body["totalFat"], 5.5);
        assert_eq!(body["date"], "2024-05-01T08:00:00Z");
    }

    #[tokio::test]
    async fn empty_foods_is_bad_request() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let res = build_app(state)
            .oneshot(send_json(
                "POST",
                "/api/v1/meals",
                &auth,
                json!({ "mealType": "lunch", "foods": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_caller_and_range() {
        let state = AppState::fake();
        let me = bearer(&state, Uuid::new_v4());
        let someone_else = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        for (auth, date) in [
            (&me, "2024-05-01T08:00:00Z"),
            (&me, "2024-05-03T08:00:00Z"),
            (&someone_else, "2024-05-02T08:00:00Z"),
        ] {
            let res = app
                .clone()
                .oneshot(send_json("POST", "/api/v1/meals", auth, oatmeal(date)))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = app
            .clone()
            .oneshot(get_req("/api/v1/meals", Some(&me)))
            .await
            .unwrap();
        assert_eq!(json_body(res).await.as_array().map(Vec::len), Some(2));

        let res = app
            .oneshot(get_req("/api/v1/meals?start=2024-05-02T00:00:00Z", Some(&me)))
            .await
            .unwrap();
        let body = json_body(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["date"], "2024-05-03T08:00:00Z");
    }

    #[tokio::test]
    async fn inverted_range_is_bad_request() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let res = build_app(state)
            .oneshot(get_req(
                "/api/v1/meals?start=2024-05-03T00:00:00Z&end=2024-05-01T00:00:00Z",
                Some(&auth),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let fake = AppState::fake();
        let state = AppState::from_parts(
            fake.config.clone(),
            Arc::new(UnavailableStore),
            Arc::new(InMemoryPreferencesStore::new()),
        );
        let auth = bearer(&state, Uuid::new_v4());
        let res = build_app(state)
            .oneshot(get_req("/api/v1/meals", Some(&auth)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
