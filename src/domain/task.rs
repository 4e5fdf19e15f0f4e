use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: Option<String>,
    pub tags: HashSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub position: Position, // Last known bubble anchor, persisted across sessions
}

/// Bubble anchor in arena pixels. (0, 0) means "never placed": the
/// simulation picks a random in-bounds spot on first sight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const UNSET: Position = Position { x: 0.0, y: 0.0 };

    pub fn is_unset(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Discarded,
    Backlog,
    Archived,
    Unset,
}

impl TaskStatus {
    /// Sidebar order, top to bottom. Also the drop-zone band order.
    pub const BANDS: [TaskStatus; 6] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Backlog,
        TaskStatus::Discarded,
        TaskStatus::Archived,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Discarded => "Discarded",
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Archived => "Archived",
            TaskStatus::Unset => "-",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
            TaskStatus::Discarded => "discarded",
            TaskStatus::Backlog => "backlog",
            TaskStatus::Archived => "archived",
            TaskStatus::Unset => "-",
        }
    }

    pub fn parse(s: &str) -> TaskStatus {
        match s {
            "todo" => TaskStatus::Todo,
            "in-progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            "discarded" => TaskStatus::Discarded,
            "backlog" => TaskStatus::Backlog,
            "archived" => TaskStatus::Archived,
            _ => TaskStatus::Unset,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Unset,
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
            Priority::Unset => "-",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
            Priority::Unset => "-",
        }
    }

    pub fn parse(s: &str) -> Priority {
        match s {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "critical" => Priority::Critical,
            _ => Priority::Unset,
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new("".to_string(), "".to_string())
    }
}

impl Task {
    pub fn new(title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            category: None,
            tags: HashSet::new(),
            created_at: now,
            updated_at: now,
            due_at: None,
            completed_at: None,
            position: Position::UNSET,
        }
    }

    pub fn new_simple(title: String) -> Self {
        Self::new(title, String::new())
    }

    pub fn update_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Utc::now();

        if status == TaskStatus::Done {
            self.completed_at = Some(Utc::now());
        } else {
            self.completed_at = None;
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position { x, y };
        self.updated_at = Utc::now();
    }

    pub fn add_tag(&mut self, tag: String) {
        self.tags.insert(tag);
        self.updated_at = Utc::now();
    }

    pub fn is_overdue(&self) -> bool {
        if let Some(due) = self.due_at {
            due < Utc::now() && self.status != TaskStatus::Done
        } else {
            false
        }
    }

    /// Archived tasks never participate in the physics scene.
    pub fn in_simulation(&self) -> bool {
        self.status != TaskStatus::Archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task() {
        let task = Task::new("Test Task".to_string(), "Description".to_string());
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.description, "Description");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.position.is_unset());
    }

    #[test]
    fn test_update_status() {
        let mut task = Task::new("Task".to_string(), "".to_string());
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.completed_at.is_none());

        task.update_status(TaskStatus::InProgress);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.completed_at.is_none());

        task.update_status(TaskStatus::Done);
        assert_eq!(task.status, TaskStatus::Done);
        assert!(task.completed_at.is_some());

        task.update_status(TaskStatus::Todo);
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for status in TaskStatus::BANDS {
            assert_eq!(TaskStatus::parse(status.as_str()), status);
        }
        assert_eq!(TaskStatus::parse("-"), TaskStatus::Unset);
        assert_eq!(TaskStatus::parse("garbage"), TaskStatus::Unset);
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ] {
            assert_eq!(Priority::parse(priority.as_str()), priority);
        }
        assert_eq!(Priority::parse("-"), Priority::Unset);
    }

    #[test]
    fn test_is_overdue() {
        let mut task = Task::new("Task".to_string(), "".to_string());
        assert!(!task.is_overdue());

        task.due_at = Some(Utc::now() - chrono::Duration::days(1));
        assert!(task.is_overdue());

        task.update_status(TaskStatus::Done);
        assert!(!task.is_overdue());
    }

    #[test]
    fn test_position() {
        let mut task = Task::new("Task".to_string(), "".to_string());
        assert!(task.position.is_unset());

        task.set_position(100.5, 200.3);
        assert_eq!(task.position.x, 100.5);
        assert_eq!(task.position.y, 200.3);
        assert!(!task.position.is_unset());
    }

    #[test]
    fn test_archived_excluded_from_simulation() {
        let mut task = Task::new("Task".to_string(), "".to_string());
        assert!(task.in_simulation());

        task.update_status(TaskStatus::Done);
        assert!(task.in_simulation());

        task.update_status(TaskStatus::Archived);
        assert!(!task.in_simulation());
    }
}
