use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Duration;

use crate::auth::middleware::AuthUser;
use crate::dto::ProductivityQuery;
use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::services::aggregate::{self, ProductivityPoint, TeamSeries};
use crate::services::query::{LogFilter, LogQuery};
use crate::services::work_logs;
use crate::AppState;

const TEAM_CHART_DAYS: i64 = 7;

/// Hours and mood per log, oldest first, subject to the usual visibility rules.
pub async fn productivity(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<ProductivityQuery>,
) -> AppResult<Json<Vec<ProductivityPoint>>> {
    let log_query = LogQuery {
        user_id: query.user_id,
        ..LogQuery::default()
    };
    let logs = work_logs::list_visible(state.store.as_ref(), &user, log_query).await?;
    Ok(Json(aggregate::productivity_series(&logs, query.limit)))
}

pub async fn team(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> AppResult<Json<TeamSeries>> {
    if !user.is_manager() {
        return Err(AppError::Forbidden);
    }

    let today = today();
    let filter = LogFilter {
        user_id: None,
        start_date: Some(today - Duration::days(TEAM_CHART_DAYS)),
        end_date: Some(today),
    };
    let logs = state.store.list(&filter).await?;
    let developers = state.users.developers().await;
    Ok(Json(aggregate::team_series(&logs, &developers)))
}
