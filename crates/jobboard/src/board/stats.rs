//! Dashboard statistics, recomputed fresh per request from the store's
//! current contents. Pure read-only projections.
//!
//! `views` and `partner_companies` have no backing data source in the
//! current schema and are reported as zero.

use std::collections::HashSet;

use serde::Serialize;

use super::domain::{ApplicationStatus, JobStatus, PlacementStatus, UserId};
use super::store::{ApplicationFilter, JobFilter, Storage, StoreError};

/// Counts shown on the candidate dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub applications: usize,
    pub interviews: usize,
    /// Applications still waiting on the poster: pending or reviewed.
    pub pending: usize,
    pub views: usize,
}

/// Counts shown on the company dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub active_jobs: usize,
    pub total_applications: usize,
    pub pending_reviews: usize,
    pub interviews: usize,
}

/// Counts shown on the agency dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyStats {
    pub candidate_pool: usize,
    pub active_placements: usize,
    pub successful_placements: usize,
    pub partner_companies: usize,
}

pub fn candidate_stats<S: Storage>(
    store: &S,
    candidate: UserId,
) -> Result<CandidateStats, StoreError> {
    let applications = store.applications(ApplicationFilter {
        candidate: Some(candidate),
        ..ApplicationFilter::default()
    })?;

    let interviews = applications
        .iter()
        .filter(|application| application.status == ApplicationStatus::Interview)
        .count();
    let pending = applications
        .iter()
        .filter(|application| {
            matches!(
                application.status,
                ApplicationStatus::Pending | ApplicationStatus::Reviewed
            )
        })
        .count();

    Ok(CandidateStats {
        applications: applications.len(),
        interviews,
        pending,
        views: 0,
    })
}

pub fn company_stats<S: Storage>(store: &S, company: UserId) -> Result<CompanyStats, StoreError> {
    let jobs = store.jobs(JobFilter {
        posted_by: Some(company),
        ..JobFilter::default()
    })?;
    let job_ids: HashSet<_> = jobs.iter().map(|job| job.id).collect();

    let applications = store.applications(ApplicationFilter::default())?;
    let applications: Vec<_> = applications
        .into_iter()
        .filter(|application| job_ids.contains(&application.job))
        .collect();

    Ok(CompanyStats {
        active_jobs: jobs
            .iter()
            .filter(|job| job.status == JobStatus::Active)
            .count(),
        total_applications: applications.len(),
        pending_reviews: applications
            .iter()
            .filter(|application| application.status == ApplicationStatus::Pending)
            .count(),
        interviews: applications
            .iter()
            .filter(|application| application.status == ApplicationStatus::Interview)
            .count(),
    })
}

pub fn agency_stats<S: Storage>(store: &S, agency: UserId) -> Result<AgencyStats, StoreError> {
    let pool = store.pool_entries(agency)?;

    Ok(AgencyStats {
        candidate_pool: pool.len(),
        active_placements: pool
            .iter()
            .filter(|entry| entry.status == PlacementStatus::Interviewing)
            .count(),
        successful_placements: pool
            .iter()
            .filter(|entry| entry.status == PlacementStatus::Placed)
            .count(),
        partner_companies: 0,
    })
}
