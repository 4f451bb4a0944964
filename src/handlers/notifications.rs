use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::notification::Notification;
use crate::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Json<Vec<Notification>> {
    Json(state.notifications.for_user(user.id).await)
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    state
        .notifications
        .mark_read(user.id, id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Notification not found".into()))
}
