use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::auth::middleware::AuthUser;
use crate::dto::{ExportQuery, RangeQuery};
use crate::error::{AppError, AppResult};
use crate::handlers::{today, window_start};
use crate::models::user::User;
use crate::services::aggregate::{self, ReportSummary};
use crate::services::query::LogFilter;
use crate::services::report::{self, ReportArtifact};
use crate::AppState;

/// 204 when there was nothing to export, otherwise a file download.
pub(crate) fn artifact_response(artifact: Option<ReportArtifact>) -> Response {
    let Some(artifact) = artifact else {
        return StatusCode::NO_CONTENT.into_response();
    };
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.body,
    )
        .into_response()
}

fn require_manager(user: &User) -> AppResult<()> {
    if user.is_manager() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// "All Developers" without a developer filter, otherwise that developer's name.
async fn report_label(state: &AppState, filter: &LogFilter) -> AppResult<String> {
    match filter.user_id {
        None => Ok("All Developers".into()),
        Some(id) => state
            .users
            .get_user(id)
            .await
            .map(|u| u.name)
            .ok_or_else(|| AppError::NotFound("User not found".into())),
    }
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<ReportSummary>> {
    require_manager(&user)?;
    let filter = LogFilter {
        user_id: query.user_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let logs = state.store.list(&filter).await?;
    Ok(Json(aggregate::report_summary(&logs)))
}

pub async fn export(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    require_manager(&user)?;

    let end = query.end_date.unwrap_or_else(today);
    let start = query.start_date.unwrap_or_else(|| window_start(end));
    let filter = LogFilter {
        user_id: query.user_id,
        start_date: Some(start),
        end_date: Some(end),
    };

    let label = report_label(&state, &filter).await?;
    let mut logs = state.store.list(&filter).await?;
    logs.sort_by_key(|log| log.date);

    let filename = report::report_filename(&logs, Some(start), Some(end), query.format);
    let artifact = report::export(&logs, &label, query.format, filename)?;
    match &artifact {
        Some(a) => tracing::info!(filename = %a.filename, logs = logs.len(), "Report exported"),
        None => tracing::info!(start = %start, end = %end, "Report export skipped: no logs"),
    }
    Ok(artifact_response(artifact))
}
