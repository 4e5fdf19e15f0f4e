use chrono::{DateTime, Utc};

use crate::domain::task::{Priority, Task, TaskStatus};

/// Score above which urgency no longer grows visually (critical + overdue).
pub const URGENCY_CEILING: f64 = 150.0;

/// Smallest and largest bubble radii, in arena pixels.
pub const BASE_RADIUS: f64 = 35.0;
pub const RADIUS_SPREAD: f64 = 40.0;

/// How urgent a task feels right now. Priority sets the floor, the deadline
/// ramps it up as it approaches and blows past.
///
/// Settled tasks (done, discarded, archived, or no status at all) score 0 no
/// matter what their priority or deadline says.
pub fn calculate_urgency(task: &Task, now: DateTime<Utc>) -> u32 {
    match task.status {
        TaskStatus::Done | TaskStatus::Discarded | TaskStatus::Archived | TaskStatus::Unset => {
            return 0
        }
        _ => {}
    }

    let mut score = match task.priority {
        Priority::Critical => 100,
        Priority::High => 50,
        Priority::Medium => 20,
        Priority::Low => 5,
        Priority::Unset => 0,
    };

    if let Some(due) = task.due_at {
        // Whole hours, truncated toward zero: a deadline 30 minutes out
        // still counts as "less than 24h left".
        let hours_left = (due - now).num_hours();

        if hours_left < 0 {
            score += 50; // Overdue
        } else if hours_left < 24 {
            score += 30;
        } else if hours_left < 72 {
            score += 15;
        }
    }

    score
}

/// Normalized urgency in [0, 1], used to scale every visual parameter.
pub fn urgency_factor(urgency: u32) -> f64 {
    (urgency as f64 / URGENCY_CEILING).min(1.0)
}

/// Base bubble radius for a given urgency score.
pub fn bubble_radius(urgency: u32) -> f64 {
    BASE_RADIUS + urgency_factor(urgency) * RADIUS_SPREAD
}

/// Phase advance rate for the idle pulse, in radians per second.
pub fn pulse_rate(urgency: u32) -> f64 {
    1.2 + urgency_factor(urgency) * 2.4
}

/// Pulse amplitude as a fraction of the body radius.
pub fn pulse_amplitude(urgency: u32) -> f64 {
    0.02 + urgency_factor(urgency) * 0.05
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn mock_task(status: TaskStatus, priority: Priority, due_in_hours: Option<i64>) -> Task {
        let mut task = Task::new("Test Task".to_string(), String::new());
        task.status = status;
        task.priority = priority;
        task.due_at = due_in_hours.map(|h| Utc::now() + Duration::hours(h));
        task
    }

    #[rstest]
    #[case(TaskStatus::Done)]
    #[case(TaskStatus::Discarded)]
    #[case(TaskStatus::Archived)]
    #[case(TaskStatus::Unset)]
    fn test_settled_statuses_score_zero(#[case] status: TaskStatus) {
        // Even critical and overdue: settled means zero.
        let task = mock_task(status, Priority::Critical, Some(-10));
        assert_eq!(calculate_urgency(&task, Utc::now()), 0);
    }

    #[rstest]
    #[case(Priority::Low, 5)]
    #[case(Priority::Medium, 20)]
    #[case(Priority::High, 50)]
    #[case(Priority::Critical, 100)]
    #[case(Priority::Unset, 0)]
    fn test_priority_base_score(#[case] priority: Priority, #[case] expected: u32) {
        let task = mock_task(TaskStatus::Todo, priority, None);
        assert_eq!(calculate_urgency(&task, Utc::now()), expected);
    }

    #[rstest]
    #[case(2, 50)] // base 20 + <24h 30
    #[case(30, 35)] // base 20 + <72h 15
    #[case(100, 20)] // base 20 + far 0
    #[case(-2, 70)] // base 20 + overdue 50
    fn test_deadline_component(#[case] due_in_hours: i64, #[case] expected: u32) {
        let task = mock_task(TaskStatus::Todo, Priority::Medium, Some(due_in_hours));
        assert_eq!(calculate_urgency(&task, Utc::now()), expected);
    }

    #[test]
    fn test_deterministic_for_fixed_now() {
        let now = Utc::now();
        let mut task = mock_task(TaskStatus::InProgress, Priority::High, None);
        task.due_at = Some(now + Duration::hours(12));

        let a = calculate_urgency(&task, now);
        let b = calculate_urgency(&task, now);
        assert_eq!(a, b);
        assert_eq!(a, 80);
    }

    #[test]
    fn test_missing_due_date_contributes_nothing() {
        let task = mock_task(TaskStatus::Backlog, Priority::Low, None);
        assert_eq!(calculate_urgency(&task, Utc::now()), 5);
    }

    #[test]
    fn test_factor_and_radius_ramp() {
        assert_eq!(urgency_factor(0), 0.0);
        assert_eq!(urgency_factor(150), 1.0);
        assert_eq!(urgency_factor(9000), 1.0);

        assert_eq!(bubble_radius(0), BASE_RADIUS);
        assert_eq!(bubble_radius(150), BASE_RADIUS + RADIUS_SPREAD);

        // Monotone in between
        assert!(bubble_radius(50) < bubble_radius(100));
    }

    #[test]
    fn test_pulse_scales_with_urgency() {
        assert!(pulse_rate(150) > pulse_rate(0));
        assert!(pulse_amplitude(150) > pulse_amplitude(0));
    }
}
