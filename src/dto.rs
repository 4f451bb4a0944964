//! # Work log API: request and response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field rules are expressed via `validator` derive macros; rules that span
//!   fields or collections live in the `impl` blocks below
//! - Blank optional text is normalized to absent

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::mood::Mood;
use crate::models::work_log::{NewTask, NewWorkLog, WorkLogPatch};
use crate::services::report::ExportFormat;

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_mood(value: i64) -> AppResult<Mood> {
    Mood::try_from(value).map_err(|e| AppError::Validation(e.to_string()))
}

// ============================================================================
// Work logs
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(max = 200, message = "Task title must be under 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Task description must be under 2000 characters"))]
    pub description: String,

    /// Minutes
    #[serde(default)]
    pub time_spent: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub completed: bool,
}

/// Rejects an empty task list or any task without a title, then applies the
/// per-task field rules.
pub fn validate_tasks(tasks: Vec<TaskInput>) -> AppResult<Vec<NewTask>> {
    if tasks.is_empty() {
        return Err(AppError::Validation("Please add at least one task".into()));
    }
    if tasks.iter().any(|t| t.title.trim().is_empty()) {
        return Err(AppError::Validation("All tasks must have a title".into()));
    }
    for task in &tasks {
        task.validate()?;
    }

    Ok(tasks
        .into_iter()
        .map(|t| NewTask {
            title: t.title.trim().to_string(),
            description: t.description,
            time_spent: t.time_spent,
            tags: t
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            completed: t.completed,
        })
        .collect())
}

/// POST /api/work-logs
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkLogRequest {
    /// Defaults to the server's current day
    pub date: Option<NaiveDate>,

    pub tasks: Vec<TaskInput>,

    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: i64,

    #[validate(length(max = 5000, message = "Blockers must be under 5000 characters"))]
    pub blockers: Option<String>,

    #[validate(length(max = 20000, message = "Notes must be under 20000 characters"))]
    pub notes: Option<String>,
}

impl CreateWorkLogRequest {
    pub fn into_new_log(self, owner: Uuid, today: NaiveDate) -> AppResult<NewWorkLog> {
        self.validate()?;
        Ok(NewWorkLog {
            user_id: owner,
            date: self.date.unwrap_or(today),
            tasks: validate_tasks(self.tasks)?,
            mood: parse_mood(self.mood)?,
            blockers: normalize_text(self.blockers),
            notes: normalize_text(self.notes),
        })
    }
}

/// PUT /api/work-logs/{id}; a partial update where every field is optional.
/// An empty string clears `blockers` or `notes`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWorkLogRequest {
    pub date: Option<NaiveDate>,

    pub tasks: Option<Vec<TaskInput>>,

    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: Option<i64>,

    #[validate(length(max = 5000, message = "Blockers must be under 5000 characters"))]
    pub blockers: Option<String>,

    #[validate(length(max = 20000, message = "Notes must be under 20000 characters"))]
    pub notes: Option<String>,
}

impl UpdateWorkLogRequest {
    pub fn into_patch(self) -> AppResult<WorkLogPatch> {
        self.validate()?;
        Ok(WorkLogPatch {
            date: self.date,
            tasks: self.tasks.map(validate_tasks).transpose()?,
            mood: self.mood.map(parse_mood).transpose()?,
            blockers: self.blockers.map(|b| normalize_text(Some(b))),
            notes: self.notes.map(|n| normalize_text(Some(n))),
            review: None,
        })
    }
}

fn default_true() -> bool {
    true
}

/// POST /api/work-logs/{id}/review
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    #[serde(default = "default_true")]
    pub reviewed: bool,

    #[validate(length(max = 5000, message = "Review notes must be under 5000 characters"))]
    pub review_notes: Option<String>,
}

impl ReviewRequest {
    pub fn normalized_notes(&self) -> Option<String> {
        normalize_text(self.review_notes.clone())
    }
}

// ============================================================================
// Reports & charts
// ============================================================================

/// GET /api/reports/export, GET /api/work-logs/{id}/export
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/reports/summary
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/team/rollup; `q` searches developer name and email.
#[derive(Debug, Default, Deserialize)]
pub struct RollupQuery {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub q: Option<String>,
}

/// GET /api/charts/productivity
#[derive(Debug, Default, Deserialize)]
pub struct ProductivityQuery {
    pub user_id: Option<Uuid>,
    pub limit: Option<usize>,
}
