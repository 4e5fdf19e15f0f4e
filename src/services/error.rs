use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BurbujaError {
    #[error("Task not found: {id}")]
    TaskNotFound { id: Uuid },

    #[error("Database operation failed: {operation}")]
    DatabaseError {
        operation: String,
        source: anyhow::Error,
    },
}
