//! Event catalog: public reads, admin-only writes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use validator::Validate;

use crate::auth::AdminUser;
use crate::extract::{JsonBody, ResourceId};
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::repositories::events;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::message;

const SCHEDULE_ERROR: &str = "The end date must be a date after the start date.";

fn not_found(id: uuid::Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(events::list(&state.pool).await?))
}

pub async fn show_event(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<Event>, AppError> {
    let event = events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    payload.validate()?;
    if !payload.has_valid_schedule() {
        return Err(AppError::ValidationError(SCHEDULE_ERROR.into()));
    }

    let event = events::insert(&state.pool, &payload).await?;
    tracing::info!(event_id = %event.id, admin_id = %admin.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ResourceId(id): ResourceId,
    JsonBody(payload): JsonBody<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    payload.validate()?;

    let mut event = events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    event.apply(payload);
    if !event.has_valid_schedule() {
        return Err(AppError::ValidationError(SCHEDULE_ERROR.into()));
    }

    let event = events::update(&state.pool, &event)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(event_id = %id, admin_id = %admin.user_id, "Event updated");
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ResourceId(id): ResourceId,
) -> Result<Response, AppError> {
    if !events::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(event_id = %id, admin_id = %admin.user_id, "Event deleted");
    Ok(message("Event deleted successfully").into_response())
}
