use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::AuthUser;
use crate::extract::ResourceId;
use crate::models::registration::{RegistrationCheck, RegistrationReceipt};
use crate::models::ticket::RegisteredEvent;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::message;

pub async fn check_registration(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(event_id): ResourceId,
) -> Result<Json<RegistrationCheck>, AppError> {
    let check = state
        .registrations
        .check_status(event_id, user.user_id)
        .await?;
    Ok(Json(check))
}

pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(event_id): ResourceId,
) -> Result<Json<RegistrationReceipt>, AppError> {
    let receipt = state.registrations.register(event_id, user.user_id).await?;
    Ok(Json(receipt))
}

pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(event_id): ResourceId,
) -> Result<Response, AppError> {
    state.registrations.cancel(event_id, user.user_id).await?;
    Ok(message("Registration cancelled successfully").into_response())
}

pub async fn registered_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<RegisteredEvent>>, AppError> {
    let events = state.registrations.registered_events(user.user_id).await?;
    Ok(Json(events))
}
