//! Database migrations

use rusqlite::Connection;

use crate::error::{Result, SearchError};

const MIGRATIONS: [&str; 2] = [
    include_str!("../../migrations/001_initial_schema.sql"),
    include_str!("../../migrations/002_add_title_embeddings.sql"),
];

pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Run all pending migrations on the database
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| SearchError::Config(format!("read user_version: {err}")))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let target_version = (idx + 1) as u32;
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql).map_err(|err| {
            SearchError::Config(format!("migration {target_version} failed: {err}"))
        })?;
        conn.pragma_update(None, "user_version", target_version)
            .map_err(|err| {
                SearchError::Config(format!(
                    "failed to set user_version {target_version}: {err}"
                ))
            })?;
    }

    Ok(SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_user_version(conn: &Connection) -> u32 {
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn schema_version_matches_migrations_count() {
        assert_eq!(SCHEMA_VERSION, MIGRATIONS.len() as u32);
    }

    #[test]
    fn run_migrations_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_user_version(&conn), 0);

        let result = run_migrations(&conn).unwrap();
        assert_eq!(result, SCHEMA_VERSION);
        assert_eq!(get_user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        let result1 = run_migrations(&conn).unwrap();
        let result2 = run_migrations(&conn).unwrap();

        assert_eq!(result1, SCHEMA_VERSION);
        assert_eq!(result2, SCHEMA_VERSION);
        assert_eq!(get_user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn run_migrations_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["jobs", "skills"] {
            let count: i64 = conn
                .query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "table {table} missing");
        }
    }

    #[test]
    fn run_migrations_adds_embedding_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // Columns from migration 002 must exist
        conn.execute(
            "UPDATE jobs SET title_embedding = NULL, embedded_title = NULL WHERE 0",
            [],
        )
        .unwrap();
    }
}
