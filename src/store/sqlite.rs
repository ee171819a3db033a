//! SQLite store for jobs and the skill vocabulary.
//!
//! Malformed rows are skipped with a warning instead of failing the whole
//! query, so one bad record cannot take down an otherwise-good page.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tracing::warn;

use crate::error::{Result, SearchError};
use crate::model::{Job, Skill};
use crate::search::filters::JobFilters;
use crate::store::migrations;

/// SQLite database wrapper.
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path, creating parents and running
    /// migrations as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            schema_version,
        })
    }

    /// Get a reference to the connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    // --- jobs ---

    pub fn insert_job(&self, job: &Job) -> Result<()> {
        self.conn.execute(
            "INSERT INTO jobs (
                id, title, description, salary, location, job_type, work_mode,
                openings, required_skills, company_id, recruiter_id, status,
                title_embedding, embedded_title, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                job.id,
                job.title,
                job.description,
                job.salary,
                job.location,
                job.job_type.as_str(),
                job.work_mode.as_str(),
                job.openings as i64,
                serde_json::to_string(&job.required_skills)?,
                job.company_id,
                job.recruiter_id,
                job.status.as_str(),
                job.title_embedding.as_deref().map(encode_embedding),
                job.embedded_title,
                job.created_at.to_rfc3339(),
                job.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Update the mutable posting fields. The embedding columns are owned by
    /// the enrichment pipeline and left untouched here.
    pub fn update_job(&self, job: &Job) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE jobs SET
                title = ?, description = ?, salary = ?, location = ?,
                job_type = ?, work_mode = ?, openings = ?, required_skills = ?,
                status = ?, updated_at = ?
             WHERE id = ?",
            params![
                job.title,
                job.description,
                job.salary,
                job.location,
                job.job_type.as_str(),
                job.work_mode.as_str(),
                job.openings as i64,
                serde_json::to_string(&job.required_skills)?,
                job.status.as_str(),
                Utc::now().to_rfc3339(),
                job.id,
            ],
        )?;
        if changed == 0 {
            return Err(SearchError::NotFound(format!("job {}", job.id)));
        }
        Ok(())
    }

    pub fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(job_from_row(row)?));
        }
        Ok(None)
    }

    /// Filtered, paginated listing. Predicates are ANDed; only active jobs
    /// are visible; newest first.
    pub fn list_jobs(&self, filters: &JobFilters, limit: u32, offset: u32) -> Result<Vec<Job>> {
        let (where_sql, args) = filters.to_sql();
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE {where_sql} \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = args
            .into_iter()
            .map(|a| Box::new(a) as Box<dyn rusqlite::ToSql>)
            .collect();
        params_vec.push(Box::new(limit as i64));
        params_vec.push(Box::new(offset as i64));

        let rows = stmt.query_map(
            rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
            job_from_row,
        )?;

        let mut jobs = Vec::new();
        for row in rows {
            match row {
                Ok(job) => jobs.push(job),
                Err(err) => warn!(error = %err, "skipping malformed job row"),
            }
        }
        Ok(jobs)
    }

    /// Row count for the same predicate set as [`Self::list_jobs`].
    pub fn count_jobs(&self, filters: &JobFilters) -> Result<u64> {
        let (where_sql, args) = filters.to_sql();
        let sql = format!("SELECT COUNT(*) FROM jobs WHERE {where_sql}");
        let count: i64 = self.conn.query_row(
            &sql,
            rusqlite::params_from_iter(args.iter()),
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Active jobs that have an embedding, the semantic-search candidate
    /// set. Rows whose blob fails to decode are skipped.
    pub fn semantic_candidates(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE status = 'active' AND title_embedding IS NOT NULL"
        ))?;
        let rows = stmt.query_map([], job_from_row)?;

        let mut jobs = Vec::new();
        for row in rows {
            match row {
                Ok(job) => jobs.push(job),
                Err(err) => warn!(error = %err, "skipping malformed embedded job row"),
            }
        }
        Ok(jobs)
    }

    /// Persist an embedding only if the job still carries the title it was
    /// computed from. Returns false when the write was discarded as stale
    /// (or the job vanished).
    pub fn set_embedding_if_title(
        &self,
        job_id: &str,
        title: &str,
        embedding: &[f32],
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE jobs SET title_embedding = ?, embedded_title = ? \
             WHERE id = ? AND title = ?",
            params![encode_embedding(embedding), title, job_id, title],
        )?;
        Ok(changed > 0)
    }

    /// Jobs with no embedding yet, oldest first, for the backfill sweep.
    pub fn jobs_missing_embedding(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title FROM jobs \
             WHERE title_embedding IS NULL ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // --- skills ---

    pub fn insert_skill(&self, skill: &Skill) -> Result<()> {
        self.conn.execute(
            "INSERT INTO skills (id, name, color, created_at) VALUES (?, ?, ?, ?)",
            params![
                skill.id,
                skill.name,
                skill.color,
                skill.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The whole skill vocabulary. Ranking happens in memory; the
    /// vocabulary is small by construction (lazily created on assignment).
    pub fn all_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, created_at FROM skills ORDER BY name COLLATE NOCASE")?;
        let rows = stmt.query_map([], skill_from_row)?;

        let mut skills = Vec::new();
        for row in rows {
            match row {
                Ok(skill) => skills.push(skill),
                Err(err) => warn!(error = %err, "skipping malformed skill row"),
            }
        }
        Ok(skills)
    }
}

const JOB_COLUMNS: &str = "id, title, description, salary, location, job_type, work_mode, \
     openings, required_skills, company_id, recruiter_id, status, \
     title_embedding, embedded_title, created_at, updated_at";

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    let job_type_raw: String = row.get(5)?;
    let work_mode_raw: String = row.get(6)?;
    let skills_raw: String = row.get(8)?;
    let status_raw: String = row.get(11)?;
    let embedding_blob: Option<Vec<u8>> = row.get(12)?;
    let created_raw: String = row.get(14)?;
    let updated_raw: String = row.get(15)?;

    let title_embedding = embedding_blob
        .map(|blob| decode_embedding(&blob).map_err(|e| conversion_err(12, e)))
        .transpose()?;

    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        salary: row.get(3)?,
        location: row.get(4)?,
        job_type: job_type_raw.parse().map_err(|e| conversion_err(5, e))?,
        work_mode: work_mode_raw.parse().map_err(|e| conversion_err(6, e))?,
        openings: row.get::<_, i64>(7)?.max(0) as u32,
        required_skills: serde_json::from_str(&skills_raw)
            .map_err(|e| conversion_err(8, SearchError::Json(e)))?,
        company_id: row.get(9)?,
        recruiter_id: row.get(10)?,
        status: status_raw.parse().map_err(|e| conversion_err(11, e))?,
        title_embedding,
        embedded_title: row.get(13)?,
        created_at: parse_timestamp(14, &created_raw)?,
        updated_at: parse_timestamp(15, &updated_raw)?,
    })
}

fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    let created_raw: String = row.get(3)?;
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: parse_timestamp(3, &created_raw)?,
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            conversion_err(
                idx,
                SearchError::Serialization(format!("bad timestamp {raw:?}: {e}")),
            )
        })
}

fn conversion_err(idx: usize, err: SearchError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Encode an embedding as a little-endian f32 blob. f32 keeps persisted
/// vectors bit-exact under a store-reload round trip.
pub fn encode_embedding(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Decode a little-endian f32 blob.
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(SearchError::Serialization(format!(
            "embedding blob length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    let mut out = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        out.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(out)
}
