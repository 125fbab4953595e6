//! Pure role and ownership checks. No I/O: callers hand in the role or the
//! already-fetched entity, and get back a typed decision.

use super::domain::{Job, PoolEntry, Role, UserId};
use super::store::EntityKind;

/// Named permitted actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    PostJobs,
    Apply,
    ManagePool,
    ReviewApplications,
    ViewOwnApplications,
    CandidateDashboard,
    CompanyDashboard,
    AgencyDashboard,
}

impl Capability {
    pub const fn label(self) -> &'static str {
        match self {
            Capability::PostJobs => "post jobs",
            Capability::Apply => "apply to jobs",
            Capability::ManagePool => "manage a candidate pool",
            Capability::ReviewApplications => "review applications",
            Capability::ViewOwnApplications => "view own applications",
            Capability::CandidateDashboard => "view the candidate dashboard",
            Capability::CompanyDashboard => "view the company dashboard",
            Capability::AgencyDashboard => "view the agency dashboard",
        }
    }
}

/// A denied request. A missing capability and a failed ownership comparison
/// both surface as forbidden, but stay distinct here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("{} role cannot {}", role.label(), capability.label())]
    MissingCapability { role: Role, capability: Capability },
    #[error("caller does not own this {0}")]
    NotOwner(EntityKind),
}

/// The closed role capability table.
pub fn allows(role: Role, capability: Capability) -> bool {
    match role {
        Role::Candidate => matches!(
            capability,
            Capability::Apply | Capability::ViewOwnApplications | Capability::CandidateDashboard
        ),
        Role::Company => matches!(
            capability,
            Capability::PostJobs | Capability::ReviewApplications | Capability::CompanyDashboard
        ),
        Role::Agency => matches!(
            capability,
            Capability::PostJobs
                | Capability::ManagePool
                | Capability::ReviewApplications
                | Capability::AgencyDashboard
        ),
    }
}

pub fn require(role: Role, capability: Capability) -> Result<(), AccessDenied> {
    if allows(role, capability) {
        Ok(())
    } else {
        Err(AccessDenied::MissingCapability { role, capability })
    }
}

/// Job-scoped operations demand that the caller posted the job. Checked
/// after the role check, never instead of it.
pub fn require_job_owner(caller: UserId, job: &Job) -> Result<(), AccessDenied> {
    if job.posted_by == caller {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner(EntityKind::Job))
    }
}

pub fn require_pool_owner(caller: UserId, entry: &PoolEntry) -> Result<(), AccessDenied> {
    if entry.agency == caller {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner(EntityKind::PoolEntry))
    }
}
