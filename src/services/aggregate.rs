//! Statistics derived from a log collection.
//!
//! Everything here is pure and total: empty input yields zeros, empty
//! collections and `None` averages, never an error.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::mood::Mood;
use crate::models::user::{User, UserSummary};
use crate::models::work_log::WorkLog;
use crate::services::time::{format_minutes, log_minutes, minutes_to_hours};

const RECENT_WINDOW_DAYS: i64 = 7;
const DASHBOARD_RECENT_LOGS: usize = 5;
const DASHBOARD_RECENT_BLOCKERS: usize = 3;
pub const TAG_SUMMARY_LIMIT: usize = 5;

pub fn total_minutes(logs: &[WorkLog]) -> u64 {
    logs.iter().map(log_minutes).sum()
}

pub fn total_tasks(logs: &[WorkLog]) -> usize {
    logs.iter().map(|log| log.tasks.len()).sum()
}

/// Mean mood, or `None` when there is nothing to average.
pub fn average_mood(logs: &[WorkLog]) -> Option<f64> {
    if logs.is_empty() {
        return None;
    }
    let sum: u64 = logs.iter().map(|log| u64::from(log.mood.value())).sum();
    Some(sum as f64 / logs.len() as f64)
}

/// `"3.7 🙂"`, or `"N/A"` for an empty collection.
pub fn describe_average_mood(average: Option<f64>) -> String {
    match average {
        Some(avg) => match Mood::symbol_for_average(avg) {
            Some(symbol) => format!("{avg:.1} {symbol}"),
            None => format!("{avg:.1}"),
        },
        None => "N/A".into(),
    }
}

/// Logs dated on or after `today - days`.
pub fn recent(logs: &[WorkLog], today: NaiveDate, days: i64) -> Vec<WorkLog> {
    let since = today - Duration::days(days);
    logs.iter().filter(|log| log.date >= since).cloned().collect()
}

pub fn newest_first(logs: &mut [WorkLog]) {
    logs.sort_by(|a, b| b.date.cmp(&a.date));
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthGroup {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub logs: Vec<WorkLog>,
}

/// Groups by calendar (year, month), newest month first, newest log first
/// within each month. The label is derived from the key, never used as one.
pub fn group_by_month(logs: &[WorkLog]) -> Vec<MonthGroup> {
    let mut buckets: BTreeMap<(i32, u32), Vec<WorkLog>> = BTreeMap::new();
    for log in logs {
        buckets
            .entry((log.date.year(), log.date.month()))
            .or_default()
            .push(log.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), mut logs)| {
            newest_first(&mut logs);
            let label = logs
                .first()
                .map(|log| log.date.format("%B %Y").to_string())
                .unwrap_or_default();
            MonthGroup {
                label,
                year,
                month,
                logs,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct DeveloperRollup {
    pub developer: UserSummary,
    pub log_count: usize,
    pub task_count: usize,
    pub total_minutes: u64,
    pub total_time: String,
    pub average_mood: Option<f64>,
    pub average_mood_display: String,
    pub logged_today: bool,
    pub logs_with_blockers: usize,
    pub logs: Vec<WorkLog>,
}

pub fn per_developer_rollup(
    logs: &[WorkLog],
    developers: &[User],
    today: NaiveDate,
) -> Vec<DeveloperRollup> {
    developers
        .iter()
        .map(|dev| {
            let own: Vec<WorkLog> = logs
                .iter()
                .filter(|log| log.user_id == dev.id)
                .cloned()
                .collect();
            let minutes = total_minutes(&own);
            let mood = average_mood(&own);
            DeveloperRollup {
                developer: UserSummary::from(dev),
                log_count: own.len(),
                task_count: total_tasks(&own),
                total_minutes: minutes,
                total_time: format_minutes(minutes),
                average_mood: mood,
                average_mood_display: describe_average_mood(mood),
                logged_today: own.iter().any(|log| log.date == today),
                logs_with_blockers: own.iter().filter(|log| log.has_blockers()).count(),
                logs: own,
            }
        })
        .collect()
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TagSummary {
    pub tags: Vec<String>,
    /// Unique tags beyond the ones shown.
    pub more: usize,
}

/// Unique non-empty tags across a log's tasks in first-seen order.
pub fn unique_tags(log: &WorkLog) -> Vec<String> {
    let mut seen = HashSet::new();
    log.tasks
        .iter()
        .flat_map(|task| task.tags.iter())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

pub fn tag_summary(log: &WorkLog, limit: usize) -> TagSummary {
    let mut tags = unique_tags(log);
    let more = tags.len().saturating_sub(limit);
    tags.truncate(limit);
    TagSummary { tags, more }
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total_logs: usize,
    pub total_minutes: u64,
    pub total_time: String,
    pub total_tasks: usize,
    pub average_daily_minutes: f64,
    pub average_daily_time: String,
    pub average_mood: Option<f64>,
    pub average_mood_display: String,
}

pub fn report_summary(logs: &[WorkLog]) -> ReportSummary {
    let minutes = total_minutes(logs);
    let average_daily = if logs.is_empty() {
        0.0
    } else {
        minutes as f64 / logs.len() as f64
    };
    let mood = average_mood(logs);
    ReportSummary {
        total_logs: logs.len(),
        total_minutes: minutes,
        total_time: format_minutes(minutes),
        total_tasks: total_tasks(logs),
        average_daily_minutes: average_daily,
        average_daily_time: format_minutes(average_daily.round() as u64),
        average_mood: mood,
        average_mood_display: describe_average_mood(mood),
    }
}

#[derive(Debug, Serialize)]
pub struct LogListItem {
    #[serde(flatten)]
    pub log: WorkLog,
    pub total_minutes: u64,
    pub total_time: String,
    pub mood_symbol: &'static str,
    pub mood_label: &'static str,
    pub tag_summary: TagSummary,
}

impl From<WorkLog> for LogListItem {
    fn from(log: WorkLog) -> Self {
        let minutes = log_minutes(&log);
        Self {
            total_minutes: minutes,
            total_time: format_minutes(minutes),
            mood_symbol: log.mood.symbol(),
            mood_label: log.mood.label(),
            tag_summary: tag_summary(&log, TAG_SUMMARY_LIMIT),
            log,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeveloperDashboard {
    pub today_log: Option<WorkLog>,
    pub time_today_minutes: u64,
    pub time_today: String,
    pub tasks_today: usize,
    pub completed_tasks_today: usize,
    pub has_blockers_today: bool,
    pub week_minutes: u64,
    pub week_time: String,
    pub recent_logs: Vec<LogListItem>,
}

/// `logs` are the developer's own logs.
pub fn developer_dashboard(logs: &[WorkLog], today: NaiveDate) -> DeveloperDashboard {
    let today_log = logs.iter().find(|log| log.date == today).cloned();
    let time_today = today_log.as_ref().map_or(0, log_minutes);
    let week_minutes = total_minutes(&recent(logs, today, RECENT_WINDOW_DAYS));

    let mut recent_logs = logs.to_vec();
    newest_first(&mut recent_logs);
    recent_logs.truncate(DASHBOARD_RECENT_LOGS);

    DeveloperDashboard {
        time_today_minutes: time_today,
        time_today: format_minutes(time_today),
        tasks_today: today_log.as_ref().map_or(0, |log| log.tasks.len()),
        completed_tasks_today: today_log
            .as_ref()
            .map_or(0, |log| log.tasks.iter().filter(|t| t.completed).count()),
        has_blockers_today: today_log.as_ref().is_some_and(WorkLog::has_blockers),
        week_minutes,
        week_time: format_minutes(week_minutes),
        recent_logs: recent_logs.into_iter().map(LogListItem::from).collect(),
        today_log,
    }
}

#[derive(Debug, Serialize)]
pub struct ManagerDashboard {
    pub total_developers: usize,
    pub developers_logged_today: usize,
    pub unreviewed_logs: usize,
    pub logs_with_blockers: usize,
    pub recent_blockers: Vec<WorkLog>,
    pub week_minutes: u64,
    pub week_time: String,
}

pub fn manager_dashboard(
    logs: &[WorkLog],
    developers: &[User],
    today: NaiveDate,
) -> ManagerDashboard {
    let logged_today: HashSet<Uuid> = logs
        .iter()
        .filter(|log| log.date == today)
        .map(|log| log.user_id)
        .collect();

    let mut blockers: Vec<WorkLog> = logs
        .iter()
        .filter(|log| log.has_blockers())
        .cloned()
        .collect();
    let logs_with_blockers = blockers.len();
    newest_first(&mut blockers);
    blockers.truncate(DASHBOARD_RECENT_BLOCKERS);

    let week_minutes = total_minutes(&recent(logs, today, RECENT_WINDOW_DAYS));

    ManagerDashboard {
        total_developers: developers.len(),
        developers_logged_today: logged_today.len(),
        unreviewed_logs: logs.iter().filter(|log| !log.reviewed).count(),
        logs_with_blockers,
        recent_blockers: blockers,
        week_minutes,
        week_time: format_minutes(week_minutes),
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProductivityPoint {
    pub date: NaiveDate,
    pub hours: f64,
    pub mood: Mood,
}

/// Oldest first; with `limit`, only the most recent `limit` points.
pub fn productivity_series(logs: &[WorkLog], limit: Option<usize>) -> Vec<ProductivityPoint> {
    let mut sorted = logs.to_vec();
    sorted.sort_by_key(|log| log.date);
    if let Some(limit) = limit {
        let skip = sorted.len().saturating_sub(limit);
        sorted.drain(..skip);
    }
    sorted
        .iter()
        .map(|log| ProductivityPoint {
            date: log.date,
            hours: minutes_to_hours(log_minutes(log)),
            mood: log.mood,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct TeamDataset {
    pub user_id: Uuid,
    pub name: String,
    /// Hours per entry of [`TeamSeries::dates`]; 0 where nothing was logged.
    pub hours: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct TeamSeries {
    pub dates: Vec<NaiveDate>,
    pub datasets: Vec<TeamDataset>,
}

pub fn team_series(logs: &[WorkLog], developers: &[User]) -> TeamSeries {
    let dates: Vec<NaiveDate> = logs
        .iter()
        .map(|log| log.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let datasets = developers
        .iter()
        .map(|dev| TeamDataset {
            user_id: dev.id,
            name: dev.name.clone(),
            hours: dates
                .iter()
                .map(|date| {
                    let minutes: u64 = logs
                        .iter()
                        .filter(|log| log.user_id == dev.id && log.date == *date)
                        .map(log_minutes)
                        .sum();
                    minutes_to_hours(minutes)
                })
                .collect(),
        })
        .collect();

    TeamSeries { dates, datasets }
}
