use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::access::{self, AccessDenied, Capability};
use super::credentials::{CredentialError, Credentials};
use super::domain::{
    check_salary_range, AccountPatch, Application, ApplicationDraft, ApplicationId,
    ApplicationReview, Job, JobDraft, JobId, JobPatch, JobStatus, PlacementStatus, PoolEntry,
    PoolEntryDraft, PoolEntryId, PoolEntryPatch, Profile, ProfileDraft, Registration, Role, User,
    UserId, UserView, ValidationError,
};
use super::stats::{self, AgencyStats, CandidateStats, CompanyStats};
use super::store::{
    ApplicationFilter, EntityKind, JobFilter, NewApplication, NewJob, NewPoolEntry, NewUser,
    Storage, StoreError,
};

/// The authenticated caller identity handlers must obtain before invoking
/// any capability-gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    fn of(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Which uniqueness rule a duplicate rejection violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Email,
    Application,
    Profile,
}

impl DuplicateKind {
    pub const fn message(self) -> &'static str {
        match self {
            DuplicateKind::Email => "email already registered",
            DuplicateKind::Application => "candidate already applied to this job",
            DuplicateKind::Profile => "profile already exists for this user",
        }
    }
}

/// Error raised by the service facade. Every variant is terminal for the
/// current operation and maps to exactly one external status.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", .0.message())]
    Duplicate(DuplicateKind),
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    #[error("invalid email or password")]
    BadLogin,
    #[error("missing or invalid credentials")]
    Unauthenticated,
    #[error(transparent)]
    Credential(CredentialError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(kind) => Self::NotFound(kind),
            StoreError::EmailTaken => Self::Duplicate(DuplicateKind::Email),
            StoreError::AlreadyApplied => Self::Duplicate(DuplicateKind::Application),
            StoreError::ProfileExists => Self::Duplicate(DuplicateKind::Profile),
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

/// A fresh or renewed login: the caller's public record plus a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: UserView,
    pub token: String,
}

/// An application enriched with the job it targets, for candidate listings.
/// The job is absent only if it disappeared between scans.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<Job>,
}

/// An application enriched with the applying candidate's public record,
/// for poster-side review listings.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithCandidate {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Option<UserView>,
}

/// A pool entry enriched with the linked candidate's public record.
#[derive(Debug, Clone, Serialize)]
pub struct PoolEntryWithCandidate {
    #[serde(flatten)]
    pub entry: PoolEntry,
    pub candidate: Option<UserView>,
}

/// Facade composing validation, access control, the credential service, and
/// the entity store. Request handlers call only this.
pub struct JobBoardService<S, C> {
    store: Arc<S>,
    credentials: Arc<C>,
}

impl<S, C> JobBoardService<S, C>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    pub fn new(store: Arc<S>, credentials: Arc<C>) -> Self {
        Self { store, credentials }
    }

    // Accounts

    pub fn register(&self, registration: Registration) -> Result<Session, ServiceError> {
        registration.validate()?;

        let password_hash = self
            .credentials
            .hash_password(&registration.password)
            .map_err(ServiceError::Credential)?;

        let user = self.store.create_user(NewUser {
            email: registration.email,
            password_hash,
            name: registration.name,
            role: registration.role,
            company_name: registration.company_name,
            agency_name: registration.agency_name,
        })?;

        info!(user = user.id.0, role = user.role.label(), "registered user");
        self.session_for(&user)
    }

    /// Both an unknown email and a wrong password answer the same way, so
    /// a probe cannot tell which one it hit.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let user = self
            .store
            .user_by_email(email)?
            .ok_or(ServiceError::BadLogin)?;

        let matches = self
            .credentials
            .verify_password(password, &user.password_hash)
            .map_err(ServiceError::Credential)?;
        if !matches {
            return Err(ServiceError::BadLogin);
        }

        self.session_for(&user)
    }

    /// Resolve a bearer token to a caller identity. Runs before every
    /// capability check; a stale token whose user vanished is rejected too.
    pub fn authenticate(&self, token: &str) -> Result<Caller, ServiceError> {
        let id = self.credentials.verify_token(token).map_err(|err| match err {
            CredentialError::TokenRejected => ServiceError::Unauthenticated,
            other => ServiceError::Credential(other),
        })?;

        let user = self.store.user(id)?.ok_or(ServiceError::Unauthenticated)?;
        Ok(Caller::of(&user))
    }

    pub fn account(&self, caller: Caller) -> Result<UserView, ServiceError> {
        let user = self
            .store
            .user(caller.id)?
            .ok_or(ServiceError::NotFound(EntityKind::User))?;
        Ok(UserView::from(&user))
    }

    pub fn update_account(
        &self,
        caller: Caller,
        patch: AccountPatch,
    ) -> Result<UserView, ServiceError> {
        let user = self.store.update_user(caller.id, patch)?;
        Ok(UserView::from(&user))
    }

    fn session_for(&self, user: &User) -> Result<Session, ServiceError> {
        let token = self
            .credentials
            .issue_token(user.id)
            .map_err(ServiceError::Credential)?;
        Ok(Session {
            user: UserView::from(user),
            token,
        })
    }

    // Jobs

    pub fn post_job(&self, caller: Caller, draft: JobDraft) -> Result<Job, ServiceError> {
        access::require(caller.role, Capability::PostJobs)?;
        draft.validate(Utc::now())?;

        let job = self.store.create_job(NewJob {
            title: draft.title,
            description: draft.description,
            department: draft.department,
            employment_type: draft.employment_type,
            experience_level: draft.experience_level,
            location: draft.location,
            remote_work: draft.remote_work,
            skills: draft.skills,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            deadline: draft.deadline,
            posted_by: caller.id,
            posted_by_role: caller.role,
        })?;

        info!(job = job.id.0, poster = caller.id.0, "posted job");
        Ok(job)
    }

    /// Public listing: only active jobs, newest first.
    pub fn browse_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        Ok(self.store.jobs(JobFilter {
            status: Some(JobStatus::Active),
            ..JobFilter::default()
        })?)
    }

    pub fn job(&self, id: JobId) -> Result<Job, ServiceError> {
        self.store
            .job(id)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))
    }

    /// The caller's own postings regardless of status, newest first.
    pub fn my_jobs(&self, caller: Caller) -> Result<Vec<Job>, ServiceError> {
        access::require(caller.role, Capability::PostJobs)?;
        Ok(self.store.jobs(JobFilter {
            posted_by: Some(caller.id),
            ..JobFilter::default()
        })?)
    }

    pub fn update_job(
        &self,
        caller: Caller,
        id: JobId,
        patch: JobPatch,
    ) -> Result<Job, ServiceError> {
        access::require(caller.role, Capability::PostJobs)?;
        let job = self
            .store
            .job(id)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))?;
        access::require_job_owner(caller.id, &job)?;

        // The merged salary range must stay valid, whichever side the
        // patch touches.
        check_salary_range(
            patch.salary_min.or(job.salary_min),
            patch.salary_max.or(job.salary_max),
        )?;

        Ok(self.store.update_job(id, patch)?)
    }

    /// Removes the job and, with it, every application referencing it.
    pub fn delete_job(&self, caller: Caller, id: JobId) -> Result<(), ServiceError> {
        access::require(caller.role, Capability::PostJobs)?;
        let job = self
            .store
            .job(id)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))?;
        access::require_job_owner(caller.id, &job)?;

        if !self.store.delete_job(id)? {
            return Err(ServiceError::NotFound(EntityKind::Job));
        }
        info!(job = id.0, poster = caller.id.0, "deleted job");
        Ok(())
    }

    // Applications

    pub fn apply(
        &self,
        caller: Caller,
        draft: ApplicationDraft,
    ) -> Result<Application, ServiceError> {
        access::require(caller.role, Capability::Apply)?;
        self.store
            .job(draft.job_id)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))?;

        let application = self.store.create_application(NewApplication {
            job: draft.job_id,
            candidate: caller.id,
            notes: draft.notes,
        })?;

        info!(
            application = application.id.0,
            job = draft.job_id.0,
            candidate = caller.id.0,
            "submitted application"
        );
        Ok(application)
    }

    pub fn my_applications(
        &self,
        caller: Caller,
    ) -> Result<Vec<ApplicationWithJob>, ServiceError> {
        access::require(caller.role, Capability::ViewOwnApplications)?;
        let applications = self.store.applications(ApplicationFilter {
            candidate: Some(caller.id),
            ..ApplicationFilter::default()
        })?;

        applications
            .into_iter()
            .map(|application| {
                let job = self.store.job(application.job)?;
                Ok(ApplicationWithJob { application, job })
            })
            .collect()
    }

    pub fn job_applications(
        &self,
        caller: Caller,
        job_id: JobId,
    ) -> Result<Vec<ApplicationWithCandidate>, ServiceError> {
        access::require(caller.role, Capability::ReviewApplications)?;
        let job = self
            .store
            .job(job_id)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))?;
        access::require_job_owner(caller.id, &job)?;

        let applications = self.store.applications(ApplicationFilter {
            job: Some(job_id),
            ..ApplicationFilter::default()
        })?;

        applications
            .into_iter()
            .map(|application| {
                let candidate = self
                    .store
                    .user(application.candidate)?
                    .as_ref()
                    .map(UserView::from);
                Ok(ApplicationWithCandidate {
                    application,
                    candidate,
                })
            })
            .collect()
    }

    pub fn review_application(
        &self,
        caller: Caller,
        id: ApplicationId,
        review: ApplicationReview,
    ) -> Result<Application, ServiceError> {
        access::require(caller.role, Capability::ReviewApplications)?;
        let application = self
            .store
            .application(id)?
            .ok_or(ServiceError::NotFound(EntityKind::Application))?;
        let job = self
            .store
            .job(application.job)?
            .ok_or(ServiceError::NotFound(EntityKind::Job))?;
        access::require_job_owner(caller.id, &job)?;

        let updated = self.store.update_application(id, review)?;
        info!(
            application = id.0,
            status = updated.status.label(),
            "reviewed application"
        );
        Ok(updated)
    }

    // Agency pool

    pub fn pool(&self, caller: Caller) -> Result<Vec<PoolEntryWithCandidate>, ServiceError> {
        access::require(caller.role, Capability::ManagePool)?;
        let entries = self.store.pool_entries(caller.id)?;

        entries
            .into_iter()
            .map(|entry| {
                let candidate = self
                    .store
                    .user(entry.candidate)?
                    .as_ref()
                    .map(UserView::from);
                Ok(PoolEntryWithCandidate { entry, candidate })
            })
            .collect()
    }

    pub fn add_pool_entry(
        &self,
        caller: Caller,
        draft: PoolEntryDraft,
    ) -> Result<PoolEntry, ServiceError> {
        access::require(caller.role, Capability::ManagePool)?;
        self.store
            .user(draft.candidate_id)?
            .ok_or(ServiceError::NotFound(EntityKind::User))?;

        let entry = self.store.create_pool_entry(NewPoolEntry {
            agency: caller.id,
            candidate: draft.candidate_id,
            specialization: draft.specialization,
            experience: draft.experience,
            rating: draft.rating.unwrap_or(0),
            status: draft.status.unwrap_or(PlacementStatus::Available),
        })?;

        info!(
            entry = entry.id.0,
            agency = caller.id.0,
            candidate = draft.candidate_id.0,
            "added pool entry"
        );
        Ok(entry)
    }

    pub fn update_pool_entry(
        &self,
        caller: Caller,
        id: PoolEntryId,
        patch: PoolEntryPatch,
    ) -> Result<PoolEntry, ServiceError> {
        access::require(caller.role, Capability::ManagePool)?;
        let entry = self
            .store
            .pool_entry(id)?
            .ok_or(ServiceError::NotFound(EntityKind::PoolEntry))?;
        access::require_pool_owner(caller.id, &entry)?;

        Ok(self.store.update_pool_entry(id, patch)?)
    }

    pub fn remove_pool_entry(&self, caller: Caller, id: PoolEntryId) -> Result<(), ServiceError> {
        access::require(caller.role, Capability::ManagePool)?;
        let entry = self
            .store
            .pool_entry(id)?
            .ok_or(ServiceError::NotFound(EntityKind::PoolEntry))?;
        access::require_pool_owner(caller.id, &entry)?;

        if !self.store.remove_pool_entry(id)? {
            return Err(ServiceError::NotFound(EntityKind::PoolEntry));
        }
        Ok(())
    }

    // Profiles

    pub fn profile(&self, caller: Caller) -> Result<Profile, ServiceError> {
        self.store
            .profile_for(caller.id)?
            .ok_or(ServiceError::NotFound(EntityKind::Profile))
    }

    /// Creates the caller's profile on first write, merges afterwards.
    pub fn upsert_profile(
        &self,
        caller: Caller,
        draft: ProfileDraft,
    ) -> Result<Profile, ServiceError> {
        let profile = if self.store.profile_for(caller.id)?.is_some() {
            self.store.update_profile(caller.id, draft)?
        } else {
            self.store.create_profile(caller.id, draft)?
        };
        Ok(profile)
    }

    // Dashboards

    pub fn candidate_stats(&self, caller: Caller) -> Result<CandidateStats, ServiceError> {
        access::require(caller.role, Capability::CandidateDashboard)?;
        Ok(stats::candidate_stats(self.store.as_ref(), caller.id)?)
    }

    pub fn company_stats(&self, caller: Caller) -> Result<CompanyStats, ServiceError> {
        access::require(caller.role, Capability::CompanyDashboard)?;
        Ok(stats::company_stats(self.store.as_ref(), caller.id)?)
    }

    pub fn agency_stats(&self, caller: Caller) -> Result<AgencyStats, ServiceError> {
        access::require(caller.role, Capability::AgencyDashboard)?;
        Ok(stats::agency_stats(self.store.as_ref(), caller.id)?)
    }
}
