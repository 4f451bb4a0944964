use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::handlers::{today, window_start};
use crate::services::aggregate::{self, DeveloperDashboard, ManagerDashboard};
use crate::services::query::LogFilter;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardResponse {
    Developer(DeveloperDashboard),
    Manager(ManagerDashboard),
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> AppResult<Json<DashboardResponse>> {
    let today = today();
    let window = LogFilter {
        user_id: None,
        start_date: Some(window_start(today)),
        end_date: Some(today),
    };

    if user.is_manager() {
        let logs = state.store.list(&window).await?;
        let developers = state.users.developers().await;
        return Ok(Json(DashboardResponse::Manager(aggregate::manager_dashboard(
            &logs,
            &developers,
            today,
        ))));
    }

    let filter = LogFilter {
        user_id: Some(user.id),
        ..window
    };
    let logs = state.store.list(&filter).await?;
    Ok(Json(DashboardResponse::Developer(
        aggregate::developer_dashboard(&logs, today),
    )))
}
