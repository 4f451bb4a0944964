use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::services::reminders::{run_daily_reminders, until_next_run};
use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Debug, Serialize)]
pub struct ReminderRunResponse {
    pub reminded: usize,
}

/// Operator trigger. Hidden entirely unless an admin token is configured.
pub async fn run_reminders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ReminderRunResponse>> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Err(AppError::NotFound("Not found".into()));
    };
    let given = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if given != expected {
        tracing::warn!("Reminder trigger rejected: bad admin token");
        return Err(AppError::Unauthorized);
    }

    let reminded = run_once(&state).await?;
    Ok(Json(ReminderRunResponse { reminded }))
}

async fn run_once(state: &AppState) -> AppResult<usize> {
    let events = run_daily_reminders(state.store.as_ref(), state.users.as_ref(), today()).await?;
    let count = events.len();
    state.events.dispatch(events).await;
    Ok(count)
}

/// Sends reminders once a day at `hour`:00 UTC.
pub fn spawn_reminder_worker(state: AppState, hour: u32) {
    tokio::spawn(async move {
        loop {
            let wait = until_next_run(Utc::now(), hour);
            tracing::debug!(seconds = wait.as_secs(), "Reminder worker sleeping");
            tokio::time::sleep(wait).await;
            match run_once(&state).await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(reminded = count, "Reminder worker: reminders sent");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reminder worker error");
                }
            }
        }
    });
}
