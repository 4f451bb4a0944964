//! Report artifacts: a fixed-width tabular document and CSV.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::work_log::WorkLog;
use crate::services::aggregate::{average_mood, describe_average_mood, total_minutes, total_tasks};
use crate::services::time::{format_minutes, log_minutes};

pub const CSV_HEADER: [&str; 5] = ["Date", "Tasks", "Time Spent", "Mood", "Blockers"];
const DISPLAY_DATE: &str = "%b %-d, %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    #[serde(alias = "pdf", alias = "txt")]
    Document,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Document => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Document => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: String,
    pub tasks: usize,
    pub time_spent: String,
    pub mood: &'static str,
    pub blockers: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub period: String,
    pub total_time: String,
    pub total_tasks: String,
    pub average_mood: String,
    pub rows: Vec<ReportRow>,
}

fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

pub fn build_document(logs: &[WorkLog], label: &str) -> ReportDocument {
    let first = logs.iter().map(|log| log.date).min();
    let last = logs.iter().map(|log| log.date).max();
    let period = match (first, last) {
        (Some(first), Some(last)) => format!("{} - {}", display_date(first), display_date(last)),
        _ => "N/A".into(),
    };

    let rows = logs
        .iter()
        .map(|log| ReportRow {
            date: display_date(log.date),
            tasks: log.tasks.len(),
            time_spent: format_minutes(log_minutes(log)),
            mood: log.mood.symbol(),
            blockers: log
                .blockers
                .clone()
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| "None".into()),
        })
        .collect();

    ReportDocument {
        title: format!("Productivity Report: {label}"),
        period: format!("Period: {period}"),
        total_time: format!("Total Time Logged: {}", format_minutes(total_minutes(logs))),
        total_tasks: format!("Total Tasks Completed: {}", total_tasks(logs)),
        average_mood: format!("Average Mood: {}", describe_average_mood(average_mood(logs))),
        rows,
    }
}

impl ReportDocument {
    pub fn render(&self) -> String {
        let cells: Vec<[String; 5]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.date.clone(),
                    row.tasks.to_string(),
                    row.time_spent.clone(),
                    row.mood.to_string(),
                    row.blockers.clone(),
                ]
            })
            .collect();

        let mut widths = CSV_HEADER.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_row = |row: &[String]| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let header: Vec<String> = CSV_HEADER.iter().map(|h| h.to_string()).collect();
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");

        let mut out = vec![
            self.title.clone(),
            String::new(),
            self.period.clone(),
            self.total_time.clone(),
            self.total_tasks.clone(),
            self.average_mood.clone(),
            String::new(),
            format_row(&header),
            rule,
        ];
        out.extend(cells.iter().map(|row| format_row(&row[..])));

        let mut rendered = out.join("\n");
        rendered.push('\n');
        rendered
    }
}

/// Wraps a value in double quotes, doubling any quotes inside it.
fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// CSV with a fixed header. Blockers are always quoted when present and left
/// empty otherwise; every other field is written as is.
pub fn render_csv(logs: &[WorkLog]) -> AppResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    for log in logs {
        let blockers = log
            .blockers
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(quote_field)
            .unwrap_or_default();
        wtr.write_record([
            log.date.format("%Y-%m-%d").to_string(),
            log.tasks.len().to_string(),
            format_minutes(log_minutes(log)),
            log.mood.value().to_string(),
            blockers,
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}

fn sanitize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `productivity_report_<start>_to_<end>.<ext>`; a missing bound falls back
/// to the earliest or latest log date.
pub fn report_filename(
    logs: &[WorkLog],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    format: ExportFormat,
) -> String {
    let bound = |given: Option<NaiveDate>, fallback: Option<NaiveDate>| {
        given
            .or(fallback)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "all".into())
    };
    let start = bound(start, logs.iter().map(|log| log.date).min());
    let end = bound(end, logs.iter().map(|log| log.date).max());
    format!("productivity_report_{start}_to_{end}.{}", format.extension())
}

/// `worklog_<date>_<name>.<ext>` with whitespace runs in the name collapsed to `_`.
pub fn single_log_filename(log: &WorkLog, owner_name: &str, format: ExportFormat) -> String {
    format!(
        "worklog_{}_{}.{}",
        log.date.format("%Y-%m-%d"),
        sanitize_name(owner_name),
        format.extension()
    )
}

/// Renders the artifact, or `None` when there is nothing to export.
pub fn export(
    logs: &[WorkLog],
    label: &str,
    format: ExportFormat,
    filename: String,
) -> AppResult<Option<ReportArtifact>> {
    if logs.is_empty() {
        return Ok(None);
    }
    let body = match format {
        ExportFormat::Csv => render_csv(logs)?,
        ExportFormat::Document => build_document(logs, label).render(),
    };
    Ok(Some(ReportArtifact {
        filename,
        content_type: format.content_type(),
        body,
    }))
}
