//! Role-scoped job board core.
//!
//! Three cooperating pieces: the entity store ([`store`]), the pure role
//! and ownership checks ([`access`]), and the per-role dashboard
//! statistics ([`stats`]). The service facade ([`service`]) composes them
//! with validation and the opaque credential service ([`credentials`]);
//! the HTTP layer ([`router`]) is a thin translation on top.

pub mod access;
pub mod credentials;
pub mod domain;
pub mod router;
pub mod service;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use access::{allows, require, require_job_owner, require_pool_owner, AccessDenied, Capability};
pub use credentials::{CredentialError, Credentials};
pub use domain::{
    AccountPatch, Application, ApplicationDraft, ApplicationId, ApplicationReview,
    ApplicationStatus, Job, JobDraft, JobId, JobPatch, JobStatus, PlacementStatus, PoolEntry,
    PoolEntryDraft, PoolEntryId, PoolEntryPatch, Profile, ProfileDraft, ProfileId, Registration,
    Role, User, UserId, UserView, ValidationError,
};
pub use router::board_router;
pub use service::{
    ApplicationWithCandidate, ApplicationWithJob, Caller, DuplicateKind, JobBoardService,
    PoolEntryWithCandidate, ServiceError, Session,
};
pub use stats::{AgencyStats, CandidateStats, CompanyStats};
pub use store::{
    ApplicationFilter, EntityKind, JobFilter, MemoryStore, NewApplication, NewJob, NewPoolEntry,
    NewUser, Storage, StoreError,
};
