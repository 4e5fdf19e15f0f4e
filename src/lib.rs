pub mod domain;
pub mod physics;
pub mod repository;
pub mod services;
pub mod ui;
