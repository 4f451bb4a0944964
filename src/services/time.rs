use crate::models::work_log::{Task, WorkLog};

/// Minutes as `"<h>h <m>m"`, dropping whichever component is zero.
/// Zero minutes renders as `"0m"`.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

pub fn task_minutes(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| u64::from(t.time_spent)).sum()
}

pub fn log_minutes(log: &WorkLog) -> u64 {
    task_minutes(&log.tasks)
}

pub fn minutes_to_hours(minutes: u64) -> f64 {
    minutes as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn task(time_spent: u32) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: String::new(),
            time_spent,
            tags: vec![],
            completed: false,
        }
    }

    #[test]
    fn test_format_minutes_both_components() {
        assert_eq!(format_minutes(195), "3h 15m");
        assert_eq!(format_minutes(61), "1h 1m");
    }

    #[test]
    fn test_format_minutes_single_component() {
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn test_task_minutes_sums_time_spent() {
        let tasks = vec![task(120), task(45), task(30)];
        assert_eq!(task_minutes(&tasks), 195);
        assert_eq!(task_minutes(&[]), 0);
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(90), 1.5);
    }
}
