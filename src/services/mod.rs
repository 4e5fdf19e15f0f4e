mod error;
mod task_service;

pub mod seeds;
pub mod urgency;

pub use error::BurbujaError;
pub use task_service::TaskService;
