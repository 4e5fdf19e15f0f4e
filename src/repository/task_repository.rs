use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{Position, Priority, Task, TaskStatus};

#[derive(Clone)]
pub struct TaskRepository {
    pool: Arc<SqlitePool>,
}

impl TaskRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, status, priority, category, tags,
                created_at, updated_at, due_at, completed_at, bubble_x, bubble_y
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.category)
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .bind(task.due_at.map(|d| d.to_rfc3339()))
        .bind(task.completed_at.map(|d| d.to_rfc3339()))
        .bind(task.position.x)
        .bind(task.position.y)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|r| row_to_task(&r)).transpose()
    }

    pub async fn update(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks SET
                title = ?, description = ?, status = ?, priority = ?,
                category = ?, tags = ?, updated_at = ?, due_at = ?,
                completed_at = ?, bubble_x = ?, bubble_y = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.category)
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.updated_at.to_rfc3339())
        .bind(task.due_at.map(|d| d.to_rfc3339()))
        .bind(task.completed_at.map(|d| d.to_rfc3339()))
        .bind(task.position.x)
        .bind(task.position.y)
        .bind(task.id.to_string())
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query("SELECT * FROM tasks ORDER BY created_at")
            .fetch_all(&*self.pool)
            .await?;

        rows.iter().map(row_to_task).collect()
    }

    /// Persist just the bubble anchor after a drag, without touching the
    /// rest of the row.
    pub async fn update_position(&self, id: Uuid, x: f64, y: f64) -> Result<()> {
        sqlx::query("UPDATE tasks SET bubble_x = ?, bubble_y = ?, updated_at = ? WHERE id = ?")
            .bind(x)
            .bind(y)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<()> {
        let completed_at = if status == TaskStatus::Done {
            Some(Utc::now().to_rfc3339())
        } else {
            None
        };

        sqlx::query("UPDATE tasks SET status = ?, completed_at = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(completed_at)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.0)
    }
}

fn parse_date(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(s) => Ok(Some(
            DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc),
        )),
        None => Ok(None),
    }
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task> {
    let id: String = row.get("id");
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let tags: String = row.get("tags");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Task {
        id: Uuid::parse_str(&id)?,
        title: row.get("title"),
        description: row.get("description"),
        status: TaskStatus::parse(&status),
        priority: Priority::parse(&priority),
        category: row.get("category"),
        tags: serde_json::from_str::<HashSet<String>>(&tags)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at)?.with_timezone(&Utc),
        due_at: parse_date(row.get("due_at"))?,
        completed_at: parse_date(row.get("completed_at"))?,
        position: Position {
            x: row.get("bubble_x"),
            y: row.get("bubble_y"),
        },
    })
}
