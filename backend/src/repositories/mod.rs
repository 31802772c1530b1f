//! Data access layer.
//!
//! Repositories wrap the SQL for one table each and return `anyhow::Result`,
//! leaving business rules to the services.

pub mod user_repository;
