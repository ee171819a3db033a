//! Domain types shared across search, storage and enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SearchError};

/// Lifecycle status of a job posting. Only `active` jobs are searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Inactive,
    Closed,
}

impl JobStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "closed" => Ok(Self::Closed),
            other => Err(SearchError::InvalidInput(format!(
                "invalid job status: {other} (expected active, inactive, or closed)"
            ))),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment type of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            other => Err(SearchError::InvalidInput(format!(
                "invalid job type: {other} (expected full-time, part-time, contract, or internship)"
            ))),
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

impl WorkMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Onsite => "onsite",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for WorkMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "remote" => Ok(Self::Remote),
            "onsite" => Ok(Self::Onsite),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(SearchError::InvalidInput(format!(
                "invalid work mode: {other} (expected remote, onsite, or hybrid)"
            ))),
        }
    }
}

impl std::fmt::Display for WorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting as stored and searched.
///
/// `title_embedding` is the only field this crate mutates, and only through
/// the enrichment pipeline. `embedded_title` records which title the stored
/// vector was computed from; the two may lag the current `title` while an
/// enrichment task is in flight (eventual consistency, not strict).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub work_mode: WorkMode,
    pub openings: u32,
    pub required_skills: Vec<String>,
    pub company_id: String,
    pub recruiter_id: String,
    pub status: JobStatus,
    #[serde(skip)]
    pub title_embedding: Option<Vec<f32>>,
    #[serde(skip)]
    pub embedded_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Builder-ish constructor for a fresh posting. The data-access layer that
/// owns full CRUD lives outside this crate; this exists so enrichment
/// triggers and tests have something to create.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub salary: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub work_mode: WorkMode,
    pub openings: u32,
    pub required_skills: Vec<String>,
    pub company_id: String,
    pub recruiter_id: String,
}

impl NewJob {
    /// Materialize into a Job with a fresh id, active status and no embedding.
    #[must_use]
    pub fn into_job(self) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            salary: self.salary,
            location: self.location,
            job_type: self.job_type,
            work_mode: self.work_mode,
            openings: self.openings.max(1),
            required_skills: self.required_skills,
            company_id: self.company_id,
            recruiter_id: self.recruiter_id,
            status: JobStatus::Active,
            title_embedding: None,
            embedded_title: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A job plus the similarity score semantic search ordered it by.
///
/// The score is in [0, 1], present only for semantic queries, and is never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

/// One page of filter-search results, echoing the effective pagination.
#[derive(Debug, Clone, Serialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// A skill vocabulary entry. Created lazily by the external skill-assignment
/// flow; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Convenience constructor used by seeding and tests.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        for status in [JobStatus::Active, JobStatus::Inactive, JobStatus::Closed] {
            assert_eq!(JobStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(JobStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_job_type_round_trip() {
        for jt in [
            JobType::FullTime,
            JobType::PartTime,
            JobType::Contract,
            JobType::Internship,
        ] {
            assert_eq!(JobType::from_str(jt.as_str()).unwrap(), jt);
        }
        assert!(JobType::from_str("freelance").is_err());
    }

    #[test]
    fn test_work_mode_round_trip() {
        for wm in [WorkMode::Remote, WorkMode::Onsite, WorkMode::Hybrid] {
            assert_eq!(WorkMode::from_str(wm.as_str()).unwrap(), wm);
        }
        assert!(WorkMode::from_str("office").is_err());
    }

    #[test]
    fn test_new_job_defaults() {
        let job = NewJob {
            title: "Backend Engineer".into(),
            description: "Build APIs".into(),
            salary: None,
            location: "Berlin".into(),
            job_type: JobType::FullTime,
            work_mode: WorkMode::Hybrid,
            openings: 0,
            required_skills: vec!["Go".into()],
            company_id: "c1".into(),
            recruiter_id: "r1".into(),
        }
        .into_job();

        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.openings, 1);
        assert!(job.title_embedding.is_none());
        assert!(job.embedded_title.is_none());
        assert!(!job.id.is_empty());
    }

    #[test]
    fn test_job_serialization_hides_embedding() {
        let mut job = NewJob {
            title: "Data Analyst".into(),
            description: "Dashboards".into(),
            salary: Some("$90k".into()),
            location: "Remote".into(),
            job_type: JobType::Contract,
            work_mode: WorkMode::Remote,
            openings: 2,
            required_skills: vec![],
            company_id: "c1".into(),
            recruiter_id: "r1".into(),
        }
        .into_job();
        job.title_embedding = Some(vec![0.1, 0.2]);

        let json = serde_json::to_string(&job).unwrap();
        assert!(!json.contains("title_embedding"));
        assert!(json.contains("\"job_type\":\"contract\""));
        assert!(json.contains("\"work_mode\":\"remote\""));
    }
}
