use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::mood::Mood;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minutes.
    pub time_spent: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub mood: Mood,
    pub blockers: Option<String>,
    pub notes: Option<String>,
    pub reviewed: bool,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
}

impl WorkLog {
    pub fn has_blockers(&self) -> bool {
        self.blockers.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Task content before the store assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub time_spent: u32,
    pub tags: Vec<String>,
    pub completed: bool,
}

impl NewTask {
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            time_spent: self.time_spent,
            tags: self.tags,
            completed: self.completed,
        }
    }
}

/// A submitted log that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkLog {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub tasks: Vec<NewTask>,
    pub mood: Mood,
    pub blockers: Option<String>,
    pub notes: Option<String>,
}

impl NewWorkLog {
    pub fn into_work_log(self, id: Uuid) -> WorkLog {
        WorkLog {
            id,
            user_id: self.user_id,
            date: self.date,
            tasks: self.tasks.into_iter().map(NewTask::into_task).collect(),
            mood: self.mood,
            blockers: self.blockers,
            notes: self.notes,
            reviewed: false,
            reviewed_by: None,
            review_notes: None,
        }
    }
}

/// Review state set by a manager. An unreviewed log never carries a reviewer
/// or review notes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewPatch {
    Reviewed {
        reviewer: Uuid,
        notes: Option<String>,
    },
    Unreviewed,
}

/// Partial update; `None` leaves the stored field untouched. For the two
/// optional text fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkLogPatch {
    pub date: Option<NaiveDate>,
    pub tasks: Option<Vec<NewTask>>,
    pub mood: Option<Mood>,
    pub blockers: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub review: Option<ReviewPatch>,
}

impl WorkLogPatch {
    pub fn review(review: ReviewPatch) -> Self {
        Self {
            review: Some(review),
            ..Self::default()
        }
    }

    pub fn apply(self, log: &mut WorkLog) {
        if let Some(date) = self.date {
            log.date = date;
        }
        if let Some(tasks) = self.tasks {
            log.tasks = tasks.into_iter().map(NewTask::into_task).collect();
        }
        if let Some(mood) = self.mood {
            log.mood = mood;
        }
        if let Some(blockers) = self.blockers {
            log.blockers = blockers;
        }
        if let Some(notes) = self.notes {
            log.notes = notes;
        }
        match self.review {
            Some(ReviewPatch::Reviewed { reviewer, notes }) => {
                log.reviewed = true;
                log.reviewed_by = Some(reviewer);
                log.review_notes = notes;
            }
            Some(ReviewPatch::Unreviewed) => {
                log.reviewed = false;
                log.reviewed_by = None;
                log.review_notes = None;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> WorkLog {
        NewWorkLog {
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            tasks: vec![NewTask {
                title: "Fix navigation bug".into(),
                description: String::new(),
                time_spent: 45,
                tags: vec!["bugfix".into()],
                completed: true,
            }],
            mood: Mood::Good,
            blockers: Some("Waiting for design assets".into()),
            notes: None,
        }
        .into_work_log(Uuid::new_v4())
    }

    #[test]
    fn test_new_log_starts_unreviewed() {
        let log = sample_log();
        assert!(!log.reviewed);
        assert!(log.reviewed_by.is_none());
        assert_eq!(log.tasks.len(), 1);
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let mut log = sample_log();
        let before = log.clone();
        WorkLogPatch {
            mood: Some(Mood::Excellent),
            blockers: Some(None),
            ..WorkLogPatch::default()
        }
        .apply(&mut log);

        assert_eq!(log.mood, Mood::Excellent);
        assert!(log.blockers.is_none());
        assert_eq!(log.tasks, before.tasks);
        assert_eq!(log.date, before.date);
    }

    #[test]
    fn test_unreview_clears_reviewer_and_notes() {
        let mut log = sample_log();
        let manager = Uuid::new_v4();
        WorkLogPatch::review(ReviewPatch::Reviewed {
            reviewer: manager,
            notes: Some("Great job".into()),
        })
        .apply(&mut log);
        assert!(log.reviewed);
        assert_eq!(log.reviewed_by, Some(manager));

        WorkLogPatch::review(ReviewPatch::Unreviewed).apply(&mut log);
        assert!(!log.reviewed);
        assert!(log.reviewed_by.is_none());
        assert!(log.review_notes.is_none());
    }

    #[test]
    fn test_serializes_date_as_iso_string() {
        let json = serde_json::to_value(sample_log()).unwrap();
        assert_eq!(json["date"], "2026-03-02");
        assert_eq!(json["mood"], 4);
        assert_eq!(json["tasks"][0]["time_spent"], 45);
    }
}
