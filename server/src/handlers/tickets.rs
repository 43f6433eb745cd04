use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::auth::AuthUser;
use crate::extract::ResourceId;
use crate::repositories::tickets;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let tickets = tickets::list_for_user(&state.pool, user.user_id).await?;
    Ok(success(tickets, "Tickets retrieved").into_response())
}

pub async fn show_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(ticket_id): ResourceId,
) -> Result<Response, AppError> {
    let ticket = tickets::find_for_user(&state.pool, ticket_id, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket with id '{}' was not found", ticket_id)))?;
    Ok(success(ticket, "Ticket retrieved").into_response())
}
