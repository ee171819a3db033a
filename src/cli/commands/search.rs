//! jsearch search - keyword and filter search

use clap::Args;

use crate::error::Result;
use crate::model::Job;
use crate::search::JobFilters;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Keyword matched against title and description
    pub keyword: Option<String>,

    /// Filter by location substring
    #[arg(long, short)]
    pub location: Option<String>,

    /// Filter by job type (full-time, part-time, contract, internship)
    #[arg(long)]
    pub job_type: Option<String>,

    /// Filter by work mode (remote, onsite, hybrid)
    #[arg(long)]
    pub work_mode: Option<String>,

    /// Filter by company id
    #[arg(long)]
    pub company: Option<String>,

    /// Filter by recruiter id
    #[arg(long)]
    pub recruiter: Option<String>,

    /// Page number (1-based)
    #[arg(long, short, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: u32,
}

impl SearchArgs {
    fn filters(&self) -> JobFilters {
        let mut filters = JobFilters::new();
        if let Some(keyword) = &self.keyword {
            filters = filters.with_keyword(keyword);
        }
        if let Some(location) = &self.location {
            filters = filters.with_location(location);
        }
        if let Some(job_type) = &self.job_type {
            filters = filters.with_job_type(job_type);
        }
        if let Some(work_mode) = &self.work_mode {
            filters = filters.with_work_mode(work_mode);
        }
        if let Some(company) = &self.company {
            filters = filters.with_company_id(company);
        }
        if let Some(recruiter) = &self.recruiter {
            filters = filters.with_recruiter_id(recruiter);
        }
        filters
    }
}

pub fn run(service: &SearchService, machine: bool, args: &SearchArgs) -> Result<()> {
    let page = service.search(&args.filters(), args.page, args.limit)?;

    if machine {
        println!("{}", serde_json::to_string(&page)?);
        return Ok(());
    }

    if page.jobs.is_empty() {
        println!("No matching jobs.");
        return Ok(());
    }

    println!(
        "{} job(s), page {} (limit {})",
        page.total, page.page, page.limit
    );
    for job in &page.jobs {
        print_job(job);
    }
    Ok(())
}

pub(crate) fn print_job(job: &Job) {
    println!(
        "  {}  {} [{} / {}] {}",
        job.id,
        job.title,
        job.job_type.as_str(),
        job.work_mode.as_str(),
        job.location
    );
}
