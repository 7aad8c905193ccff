use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    models::{CheckRated, ErrorBody, OverallAverage, Review, SubmitPayload},
    state::AppState,
};

type ErrorResponse = (StatusCode, Json<ErrorBody>);

pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ErrorResponse> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Rejected /submit body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(rejection.body_text())),
        )
    })?;

    let review = payload.into_new_review().map_err(|err| {
        tracing::warn!("Invalid submission: {}", err);
        let (status, msg) = err.to_response();
        (status, Json(ErrorBody::new(msg)))
    })?;

    match state.store.insert(review).await {
        Ok(stored) => {
            tracing::info!(
                "Stored rating for {} (average {})",
                stored.user_rating_id,
                stored.average
            );
            Ok((StatusCode::CREATED, Json(stored)))
        }
        Err(err) => {
            tracing::error!("Error in /submit: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Submit failed")),
            ))
        }
    }
}

pub async fn overall_average_handler(
    State(state): State<AppState>,
) -> Result<Json<OverallAverage>, ErrorResponse> {
    let overall_average = state.store.overall_average().await.map_err(|e| {
        tracing::error!("Error fetching overall average: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Failed to fetch overall average.")),
        )
    })?;

    Ok(Json(OverallAverage { overall_average }))
}

#[derive(Debug, Deserialize)]
pub struct CheckRatedQuery {
    pub user_rating_id: Option<String>,
}

pub async fn check_rated_handler(
    State(state): State<AppState>,
    query: Result<Query<CheckRatedQuery>, QueryRejection>,
) -> (StatusCode, Json<CheckRated>) {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!("Rejected check-rated query: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(CheckRated::not_rated()));
        }
    };

    let Some(user_rating_id) = query.user_rating_id.filter(|id| !id.trim().is_empty()) else {
        tracing::info!("check-rated called without user_rating_id");
        return (StatusCode::BAD_REQUEST, Json(CheckRated::not_rated()));
    };

    match state.store.find_by_user_rating_id(&user_rating_id).await {
        Ok(review) => {
            tracing::debug!("check-rated {}: found={}", user_rating_id, review.is_some());
            (StatusCode::OK, Json(CheckRated::from(review)))
        }
        Err(err) => {
            tracing::error!("Error in check-rated: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckRated::not_rated()),
            )
        }
    }
}
