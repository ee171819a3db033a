//! jsearch add-job - insert a posting and queue title enrichment

use clap::Args;

use crate::error::Result;
use crate::model::{JobType, NewJob, WorkMode};
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct AddJobArgs {
    /// Job title
    pub title: String,

    /// Job description
    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Location
    #[arg(long, short, default_value = "Remote")]
    pub location: String,

    /// Salary, free-form
    #[arg(long)]
    pub salary: Option<String>,

    /// Job type: full-time, part-time, contract, internship
    #[arg(long, default_value = "full-time")]
    pub job_type: JobType,

    /// Work mode: remote, onsite, hybrid
    #[arg(long, default_value = "remote")]
    pub work_mode: WorkMode,

    /// Number of openings
    #[arg(long, default_value = "1")]
    pub openings: u32,

    /// Required skills (comma-separated)
    #[arg(long)]
    pub skills: Option<String>,

    /// Company id
    #[arg(long, default_value = "unknown")]
    pub company: String,

    /// Recruiter id
    #[arg(long, default_value = "unknown")]
    pub recruiter: String,
}

pub fn run(service: &SearchService, machine: bool, args: &AddJobArgs) -> Result<()> {
    let required_skills = args
        .skills
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let job = service.create_job(NewJob {
        title: args.title.clone(),
        description: args.description.clone(),
        salary: args.salary.clone(),
        location: args.location.clone(),
        job_type: args.job_type,
        work_mode: args.work_mode,
        openings: args.openings,
        required_skills,
        company_id: args.company.clone(),
        recruiter_id: args.recruiter.clone(),
    })?;

    if machine {
        println!("{}", serde_json::to_string(&job)?);
    } else {
        println!("Added job {} ({})", job.id, job.title);
    }
    Ok(())
}
