//! Keyword/filter search over the structured store.
//!
//! All supplied predicates are ANDed; results are always restricted to
//! active jobs and ordered newest first. No score is computed on this path.

use crate::error::Result;
use crate::model::JobPage;
use crate::store::Database;

/// Optional predicates for filter search.
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    /// Case-insensitive substring of title OR description.
    pub keyword: Option<String>,
    /// Case-insensitive substring of location.
    pub location: Option<String>,
    /// Exact job type ("full-time", "part-time", "contract", "internship").
    pub job_type: Option<String>,
    /// Exact work mode ("remote", "onsite", "hybrid").
    pub work_mode: Option<String>,
    /// Exact owning company id.
    pub company_id: Option<String>,
    /// Exact owning recruiter id.
    pub recruiter_id: Option<String>,
}

impl JobFilters {
    /// Create new empty filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    #[must_use]
    pub fn with_work_mode(mut self, work_mode: impl Into<String>) -> Self {
        self.work_mode = Some(work_mode.into());
        self
    }

    #[must_use]
    pub fn with_company_id(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    #[must_use]
    pub fn with_recruiter_id(mut self, recruiter_id: impl Into<String>) -> Self {
        self.recruiter_id = Some(recruiter_id.into());
        self
    }

    /// Whether any optional predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.location.is_none()
            && self.job_type.is_none()
            && self.work_mode.is_none()
            && self.company_id.is_none()
            && self.recruiter_id.is_none()
    }

    /// Build the conjunctive WHERE clause and its positional arguments.
    /// The active-status predicate is always present.
    #[must_use]
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut clauses = vec!["status = 'active'".to_string()];
        let mut args = Vec::new();

        if let Some(keyword) = &self.keyword {
            clauses.push(
                "(LOWER(title) LIKE '%' || ? || '%' OR LOWER(description) LIKE '%' || ? || '%')"
                    .to_string(),
            );
            let lowered = keyword.to_lowercase();
            args.push(lowered.clone());
            args.push(lowered);
        }
        if let Some(location) = &self.location {
            clauses.push("LOWER(location) LIKE '%' || ? || '%'".to_string());
            args.push(location.to_lowercase());
        }
        if let Some(job_type) = &self.job_type {
            clauses.push("job_type = ?".to_string());
            args.push(job_type.clone());
        }
        if let Some(work_mode) = &self.work_mode {
            clauses.push("work_mode = ?".to_string());
            args.push(work_mode.clone());
        }
        if let Some(company_id) = &self.company_id {
            clauses.push("company_id = ?".to_string());
            args.push(company_id.clone());
        }
        if let Some(recruiter_id) = &self.recruiter_id {
            clauses.push("recruiter_id = ?".to_string());
            args.push(recruiter_id.clone());
        }

        (clauses.join(" AND "), args)
    }
}

/// Pagination request. Out-of-range values are clamped silently rather than
/// rejected: page floors at 1, limit falls back to the default when outside
/// [1, max].
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Clamp raw pagination inputs into valid bounds.
    #[must_use]
    pub fn clamped(page: u32, limit: u32, default_limit: u32, max_limit: u32) -> Self {
        let page = page.max(1);
        let limit = if limit < 1 || limit > max_limit {
            default_limit
        } else {
            limit
        };
        Self { page, limit }
    }

    /// Row offset for this page.
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Run a filter search and return one page with the effective pagination
/// echoed back.
pub fn search_jobs(db: &Database, filters: &JobFilters, page: Page) -> Result<JobPage> {
    let jobs = db.list_jobs(filters, page.limit, page.offset())?;
    let total = db.count_jobs(filters)?;
    Ok(JobPage {
        jobs,
        page: page.page,
        limit: page.limit,
        total,
    })
}
