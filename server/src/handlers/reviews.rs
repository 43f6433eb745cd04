use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::extract::{JsonBody, ResourceId};
use crate::models::review::{ReviewSummary, SubmitReviewRequest, SubmittedReview};
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Serialize)]
pub struct CanReview {
    pub can_review: bool,
}

pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(event_id): ResourceId,
    JsonBody(payload): JsonBody<SubmitReviewRequest>,
) -> Result<Json<SubmittedReview>, AppError> {
    let review = state.reviews.submit(event_id, user.user_id, payload).await?;
    Ok(Json(SubmittedReview {
        message: "Review submitted successfully",
        review,
    }))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    _user: AuthUser,
    ResourceId(event_id): ResourceId,
) -> Result<Json<ReviewSummary>, AppError> {
    Ok(Json(state.reviews.list(event_id).await?))
}

pub async fn can_review(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(event_id): ResourceId,
) -> Result<Json<CanReview>, AppError> {
    let can_review = state.reviews.can_review(event_id, user.user_id).await?;
    Ok(Json(CanReview { can_review }))
}
