use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::user::User;
use crate::models::work_log::WorkLog;

/// Owner and inclusive date-range predicates. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogFilter {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl LogFilter {
    pub fn matches(&self, log: &WorkLog) -> bool {
        self.user_id.map_or(true, |id| log.user_id == id)
            && self.start_date.map_or(true, |start| log.date >= start)
            && self.end_date.map_or(true, |end| log.date <= end)
    }
}

/// Full query: store-level predicates plus an exact day and free-text search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogQuery {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub date: Option<NaiveDate>,
    pub q: Option<String>,
}

impl LogQuery {
    /// The part of the query a store can evaluate.
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// The search term, lowercased; blank input counts as no search.
    pub fn search_term(&self) -> Option<String> {
        search_term(self.q.as_deref())
    }

    pub fn matches(&self, log: &WorkLog) -> bool {
        self.filter().matches(log)
            && self.date.map_or(true, |d| log.date == d)
            && self
                .search_term()
                .map_or(true, |term| matches_search(log, &term))
    }
}

/// Case-insensitive substring match over task titles, descriptions and tags,
/// then blockers and notes. `term` must already be lowercase.
pub fn matches_search(log: &WorkLog, term: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(term);
    log.tasks.iter().any(|t| hit(&t.title))
        || log.tasks.iter().any(|t| hit(&t.description))
        || log.tasks.iter().any(|t| t.tags.iter().any(|tag| hit(tag)))
        || log.blockers.as_deref().is_some_and(hit)
        || log.notes.as_deref().is_some_and(hit)
}

/// Lowercased as given; only all-blank input is treated as absent.
pub fn search_term(q: Option<&str>) -> Option<String> {
    q.filter(|q| !q.trim().is_empty()).map(str::to_lowercase)
}

/// Case-insensitive substring match over a developer's name and email.
/// `term` must already be lowercase.
pub fn matches_developer(user: &User, term: &str) -> bool {
    user.name.to_lowercase().contains(term) || user.email.to_lowercase().contains(term)
}

pub fn apply(logs: Vec<WorkLog>, query: &LogQuery) -> Vec<WorkLog> {
    logs.into_iter().filter(|log| query.matches(log)).collect()
}
