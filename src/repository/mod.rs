pub mod database;
pub mod task_repository;

use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repository {
    pub pool: Arc<SqlitePool>,
    pub tasks: task_repository::TaskRepository,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let pool = Arc::new(pool);
        Self {
            tasks: task_repository::TaskRepository::new(pool.clone()),
            pool,
        }
    }
}
