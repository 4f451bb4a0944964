//! Demo users and logs loaded when `SEED_DEMO_DATA` is enabled.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::models::mood::Mood;
use crate::models::user::{Role, User};
use crate::models::work_log::{NewTask, NewWorkLog, ReviewPatch, WorkLog, WorkLogPatch};

pub const DEMO_TEAM_ID: Uuid = Uuid::from_u128(0x7e4d_0000_0000_4000_8000_0000_0000_0001);
pub const DEVELOPER_ID: Uuid = Uuid::from_u128(0x7e4d_0000_0000_4000_8000_0000_0000_0101);
pub const MANAGER_ID: Uuid = Uuid::from_u128(0x7e4d_0000_0000_4000_8000_0000_0000_0102);
pub const SECOND_DEVELOPER_ID: Uuid = Uuid::from_u128(0x7e4d_0000_0000_4000_8000_0000_0000_0103);

pub fn demo_users() -> Vec<User> {
    let user = |id, name: &str, email: &str, role, img: u8| User {
        id,
        name: name.into(),
        email: email.into(),
        role,
        avatar: Some(format!("https://i.pravatar.cc/150?img={img}")),
        team_id: Some(DEMO_TEAM_ID),
    };
    vec![
        user(DEVELOPER_ID, "John Developer", "developer@example.com", Role::Developer, 1),
        user(MANAGER_ID, "Jane Manager", "manager@example.com", Role::Manager, 2),
        user(SECOND_DEVELOPER_ID, "Alex Developer", "alex@example.com", Role::Developer, 3),
    ]
}

fn demo_tasks() -> Vec<NewTask> {
    let task = |title: &str, description: &str, time_spent, tags: &[&str]| NewTask {
        title: title.into(),
        description: description.into(),
        time_spent,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        completed: true,
    };
    vec![
        task(
            "Implement login functionality",
            "Created login form and connected to API",
            120,
            &["frontend", "auth"],
        ),
        task(
            "Fix navigation bug",
            "Fixed issue with dropdown menu not closing",
            45,
            &["bugfix", "ui"],
        ),
        task("Code review", "Reviewed PR for user profile feature", 30, &["review"]),
    ]
}

/// Three logs: John yesterday (reviewed) and today, Alex today with a blocker.
pub fn demo_logs(today: NaiveDate) -> Vec<WorkLog> {
    let mut yesterday = NewWorkLog {
        user_id: DEVELOPER_ID,
        date: today - Duration::days(1),
        tasks: demo_tasks(),
        mood: Mood::Good,
        blockers: Some("Waiting for design assets".into()),
        notes: Some("Good progress today, but still need to finish the error handling".into()),
    }
    .into_work_log(Uuid::new_v4());
    WorkLogPatch::review(ReviewPatch::Reviewed {
        reviewer: MANAGER_ID,
        notes: Some("Great job on the login functionality!".into()),
    })
    .apply(&mut yesterday);

    let john_today = NewWorkLog {
        user_id: DEVELOPER_ID,
        date: today,
        tasks: demo_tasks(),
        mood: Mood::Excellent,
        blockers: None,
        notes: Some("Completed all planned tasks ahead of schedule".into()),
    }
    .into_work_log(Uuid::new_v4());

    let alex_today = NewWorkLog {
        user_id: SECOND_DEVELOPER_ID,
        date: today,
        tasks: demo_tasks(),
        mood: Mood::Neutral,
        blockers: Some("API integration issues".into()),
        notes: Some("Spent most of the day troubleshooting API issues".into()),
    }
    .into_work_log(Uuid::new_v4());

    vec![yesterday, john_today, alex_today]
}
