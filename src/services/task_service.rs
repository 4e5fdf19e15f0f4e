use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{Task, TaskStatus};
use crate::repository::Repository;
use crate::services::error::BurbujaError;
use crate::services::seeds;

#[derive(Clone)]
pub struct TaskService {
    pub repository: Arc<Repository>,
}

impl TaskService {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, task: Task) -> Result<Task> {
        self.repository.tasks.create(&task).await?;
        Ok(task)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        self.repository.tasks.get(id).await
    }

    pub async fn require(&self, id: Uuid) -> Result<Task> {
        self.repository
            .tasks
            .get(id)
            .await?
            .ok_or_else(|| BurbujaError::TaskNotFound { id }.into())
    }

    pub async fn update(&self, task: Task) -> Result<Task> {
        self.repository.tasks.update(&task).await?;
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.repository.tasks.delete(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Task>> {
        self.repository.tasks.list().await
    }

    /// Everything the bubble scene should simulate: all tasks minus the
    /// archived ones.
    pub async fn list_simulated(&self) -> Result<Vec<Task>> {
        let tasks = self.list_all().await?;
        Ok(tasks.into_iter().filter(|t| t.in_simulation()).collect())
    }

    /// Persist the free-floating position a bubble was dropped at.
    pub async fn move_task(&self, id: Uuid, x: f64, y: f64) -> Result<()> {
        self.repository.tasks.update_position(id, x, y).await
    }

    pub async fn change_status(&self, id: Uuid, status: TaskStatus) -> Result<()> {
        self.repository.tasks.update_status(id, status).await
    }

    /// Populate an empty repository with the demo tasks. Returns how many
    /// were inserted (0 when data already exists).
    pub async fn ensure_seeds(&self) -> Result<usize> {
        if self.repository.tasks.count().await? > 0 {
            return Ok(0);
        }

        let tasks = seeds::seed_tasks();
        for task in &tasks {
            self.repository.tasks.create(task).await?;
        }
        Ok(tasks.len())
    }
}
