use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::repositories::users;
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CurrentUser>, AppError> {
    let record = users::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(CurrentUser {
        id: record.id,
        name: record.name,
        email: record.email,
        is_admin: record.is_admin,
    }))
}
