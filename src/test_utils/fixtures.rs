//! Shared fixtures for unit and integration tests.

use crate::model::{Job, JobType, NewJob, WorkMode};

/// An active full-time job with the given title and placeholder fields.
#[must_use]
pub fn job(title: impl Into<String>) -> Job {
    NewJob {
        title: title.into(),
        description: "A role worth describing".into(),
        salary: None,
        location: "Berlin".into(),
        job_type: JobType::FullTime,
        work_mode: WorkMode::Onsite,
        openings: 1,
        required_skills: Vec::new(),
        company_id: "company-1".into(),
        recruiter_id: "recruiter-1".into(),
    }
    .into_job()
}
