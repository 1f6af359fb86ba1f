//! `SQLite` adapters for task persistence.

mod connection;
pub mod migrations;
mod models;
mod repository;
mod schema;

pub use connection::{DatabaseLocation, SqliteConfig, establish};
pub use repository::SqliteTaskRepository;
