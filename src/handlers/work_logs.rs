use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    CreateWorkLogRequest, DeleteResponse, ExportQuery, ReviewRequest, UpdateWorkLogRequest,
};
use crate::error::AppResult;
use crate::handlers::reports::artifact_response;
use crate::handlers::today;
use crate::models::work_log::WorkLog;
use crate::services::aggregate::{self, LogListItem, MonthGroup};
use crate::services::query::LogQuery;
use crate::services::{report, work_logs};
use crate::AppState;

pub async fn list_logs(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<LogListItem>>> {
    let mut logs = work_logs::list_visible(state.store.as_ref(), &user, query).await?;
    aggregate::newest_first(&mut logs);
    Ok(Json(logs.into_iter().map(LogListItem::from).collect()))
}

pub async fn list_grouped(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<MonthGroup>>> {
    let logs = work_logs::list_visible(state.store.as_ref(), &user, query).await?;
    Ok(Json(aggregate::group_by_month(&logs)))
}

pub async fn create_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(req): Json<CreateWorkLogRequest>,
) -> AppResult<(StatusCode, Json<WorkLog>)> {
    let new_log = req.into_new_log(user.id, today())?;
    let outcome = work_logs::submit(state.store.as_ref(), &user, new_log).await?;
    state.events.dispatch(outcome.events).await;
    Ok((StatusCode::CREATED, Json(outcome.value)))
}

pub async fn get_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WorkLog>> {
    let log = work_logs::fetch_visible(state.store.as_ref(), &user, id).await?;
    Ok(Json(log))
}

pub async fn update_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWorkLogRequest>,
) -> AppResult<Json<WorkLog>> {
    let patch = req.into_patch()?;
    let outcome = work_logs::edit(state.store.as_ref(), &user, id, patch).await?;
    state.events.dispatch(outcome.events).await;
    Ok(Json(outcome.value))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let outcome = work_logs::remove(state.store.as_ref(), &user, id).await?;
    state.events.dispatch(outcome.events).await;
    Ok(Json(DeleteResponse {
        deleted: true,
        id: outcome.value,
    }))
}

pub async fn review_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> AppResult<Json<WorkLog>> {
    validator::Validate::validate(&req)?;
    let notes = req.normalized_notes();
    let outcome = work_logs::review(
        state.store.as_ref(),
        state.users.as_ref(),
        &user,
        id,
        req.reviewed,
        notes,
    )
    .await?;
    state.events.dispatch(outcome.events).await;
    Ok(Json(outcome.value))
}

/// Exports one visible log, labelled with its owner's name.
pub async fn export_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let log = work_logs::fetch_visible(state.store.as_ref(), &user, id).await?;
    let owner_name = state
        .users
        .get_user(log.user_id)
        .await
        .map(|owner| owner.name)
        .unwrap_or_else(|| "Unknown".into());

    let filename = report::single_log_filename(&log, &owner_name, query.format);
    let artifact = report::export(std::slice::from_ref(&log), &owner_name, query.format, filename)?;
    Ok(artifact_response(artifact))
}
