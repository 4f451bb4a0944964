use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::auth::middleware::AuthUser;
use crate::dto::RollupQuery;
use crate::error::{AppError, AppResult};
use crate::handlers::{today, window_start};
use crate::services::aggregate::{self, DeveloperRollup};
use crate::services::query::{matches_developer, search_term, LogFilter};
use crate::AppState;

pub async fn rollup(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<RollupQuery>,
) -> AppResult<Json<Vec<DeveloperRollup>>> {
    if !user.is_manager() {
        return Err(AppError::Forbidden);
    }

    let today = today();
    let end = query.end_date.unwrap_or(today);
    let filter = LogFilter {
        user_id: None,
        start_date: Some(query.start_date.unwrap_or_else(|| window_start(end))),
        end_date: Some(end),
    };
    let mut logs = state.store.list(&filter).await?;
    aggregate::newest_first(&mut logs);

    let term = search_term(query.q.as_deref());
    let mut developers = state.users.developers().await;
    developers.retain(|dev| {
        query.user_id.map_or(true, |id| dev.id == id)
            && term.as_deref().map_or(true, |t| matches_developer(dev, t))
    });
    Ok(Json(aggregate::per_developer_rollup(&logs, &developers, today)))
}
