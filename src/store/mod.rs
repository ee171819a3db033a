//! Persistence layer: SQLite database and migrations.

pub mod migrations;
pub mod sqlite;

pub use sqlite::Database;
