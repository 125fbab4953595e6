use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use chrono::Utc;

use super::domain::{
    AccountPatch, Application, ApplicationId, ApplicationReview, ApplicationStatus, Job, JobId,
    JobPatch, JobStatus, PlacementStatus, PoolEntry, PoolEntryId, PoolEntryPatch, Profile,
    ProfileDraft, ProfileId, Role, User, UserId,
};

/// The five entity kinds the store manages, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Job,
    Application,
    PoolEntry,
    Profile,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Job => "job",
            EntityKind::Application => "application",
            EntityKind::PoolEntry => "agency candidate",
            EntityKind::Profile => "profile",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("email already registered")]
    EmailTaken,
    #[error("candidate already applied to this job")]
    AlreadyApplied,
    #[error("profile already exists for this user")]
    ProfileExists,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Store-level user record; the password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub agency_name: Option<String>,
}

/// Store-level job record, stamped with the validated poster identity.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub department: Option<String>,
    pub employment_type: String,
    pub experience_level: String,
    pub location: Option<String>,
    pub remote_work: String,
    pub skills: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub deadline: Option<chrono::DateTime<Utc>>,
    pub posted_by: UserId,
    pub posted_by_role: Role,
}

/// Store-level application record.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job: JobId,
    pub candidate: UserId,
    pub notes: Option<String>,
}

/// Store-level pool entry record.
#[derive(Debug, Clone)]
pub struct NewPoolEntry {
    pub agency: UserId,
    pub candidate: UserId,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub rating: i32,
    pub status: PlacementStatus,
}

/// Job listing filter; unset fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    pub posted_by: Option<UserId>,
    pub status: Option<JobStatus>,
}

/// Application listing filter; unset fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationFilter {
    pub job: Option<JobId>,
    pub candidate: Option<UserId>,
}

/// Storage abstraction so the service module can be exercised in isolation
/// and swapped for a database-backed implementation.
///
/// Listings come back newest first (creation timestamp descending, ties
/// broken by descending id); dashboards rely on that ordering.
pub trait Storage: Send + Sync {
    fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn update_user(&self, id: UserId, patch: AccountPatch) -> Result<User, StoreError>;

    fn create_job(&self, new: NewJob) -> Result<Job, StoreError>;
    fn job(&self, id: JobId) -> Result<Option<Job>, StoreError>;
    fn jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError>;
    fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Job, StoreError>;
    /// Removes a job and every application referencing it.
    fn delete_job(&self, id: JobId) -> Result<bool, StoreError>;

    fn create_application(&self, new: NewApplication) -> Result<Application, StoreError>;
    fn application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;
    fn applications(&self, filter: ApplicationFilter) -> Result<Vec<Application>, StoreError>;
    fn update_application(
        &self,
        id: ApplicationId,
        review: ApplicationReview,
    ) -> Result<Application, StoreError>;

    fn create_pool_entry(&self, new: NewPoolEntry) -> Result<PoolEntry, StoreError>;
    fn pool_entry(&self, id: PoolEntryId) -> Result<Option<PoolEntry>, StoreError>;
    fn pool_entries(&self, agency: UserId) -> Result<Vec<PoolEntry>, StoreError>;
    fn update_pool_entry(
        &self,
        id: PoolEntryId,
        patch: PoolEntryPatch,
    ) -> Result<PoolEntry, StoreError>;
    fn remove_pool_entry(&self, id: PoolEntryId) -> Result<bool, StoreError>;

    fn profile_for(&self, user: UserId) -> Result<Option<Profile>, StoreError>;
    fn create_profile(&self, user: UserId, draft: ProfileDraft) -> Result<Profile, StoreError>;
    fn update_profile(&self, user: UserId, draft: ProfileDraft) -> Result<Profile, StoreError>;
}

/// Generic keyed collection shared by all five entity kinds: identifier
/// allocation starting at 1 plus the usual row operations.
struct Table<T> {
    next_id: u64,
    rows: HashMap<u64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, id: u64, row: T) -> T {
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn modify(&mut self, id: u64, apply: impl FnOnce(&mut T)) -> Option<T> {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    fn remove(&mut self, id: u64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| keep(row)).cloned().collect()
    }
}

/// In-memory [`Storage`] implementation holding one mutex per collection,
/// taken only for the duration of a read-modify-write. Uniqueness checks
/// (email, (job, candidate) pair, one profile per user) run inside the
/// owning collection's critical section.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Table<User>>,
    jobs: Mutex<Table<Job>>,
    applications: Mutex<Table<Application>>,
    pool: Mutex<Table<PoolEntry>>,
    profiles: Mutex<Table<Profile>>,
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = Some(value);
    }
}

impl Storage for MemoryStore {
    fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("users mutex poisoned");
        if users.select(|user| user.email == new.email).is_empty() {
            let id = users.allocate();
            let user = User {
                id: UserId(id),
                email: new.email,
                password_hash: new.password_hash,
                name: new.name,
                role: new.role,
                company_name: new.company_name,
                agency_name: new.agency_name,
                created_at: Utc::now(),
            };
            Ok(users.insert(id, user))
        } else {
            Err(StoreError::EmailTaken)
        }
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("users mutex poisoned");
        Ok(users.get(id.0))
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("users mutex poisoned");
        Ok(users.select(|user| user.email == email).into_iter().next())
    }

    fn update_user(&self, id: UserId, patch: AccountPatch) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("users mutex poisoned");
        users
            .modify(id.0, |user| {
                if let Some(name) = patch.name {
                    user.name = name;
                }
                merge(&mut user.company_name, patch.company_name);
                merge(&mut user.agency_name, patch.agency_name);
            })
            .ok_or(StoreError::NotFound(EntityKind::User))
    }

    fn create_job(&self, new: NewJob) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        let id = jobs.allocate();
        let job = Job {
            id: JobId(id),
            title: new.title,
            description: new.description,
            department: new.department,
            employment_type: new.employment_type,
            experience_level: new.experience_level,
            location: new.location,
            remote_work: new.remote_work,
            skills: new.skills,
            salary_min: new.salary_min,
            salary_max: new.salary_max,
            deadline: new.deadline,
            status: JobStatus::Active,
            posted_by: new.posted_by,
            posted_by_role: new.posted_by_role,
            created_at: Utc::now(),
        };
        Ok(jobs.insert(id, job))
    }

    fn job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let jobs = self.jobs.lock().expect("jobs mutex poisoned");
        Ok(jobs.get(id.0))
    }

    fn jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.lock().expect("jobs mutex poisoned");
        let mut rows = jobs.select(|job| {
            filter.posted_by.map_or(true, |owner| job.posted_by == owner)
                && filter.status.map_or(true, |status| job.status == status)
        });
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        jobs.modify(id.0, |job| {
            if let Some(title) = patch.title {
                job.title = title;
            }
            if let Some(description) = patch.description {
                job.description = description;
            }
            merge(&mut job.department, patch.department);
            if let Some(employment_type) = patch.employment_type {
                job.employment_type = employment_type;
            }
            if let Some(experience_level) = patch.experience_level {
                job.experience_level = experience_level;
            }
            merge(&mut job.location, patch.location);
            if let Some(remote_work) = patch.remote_work {
                job.remote_work = remote_work;
            }
            merge(&mut job.skills, patch.skills);
            if let Some(salary_min) = patch.salary_min {
                job.salary_min = Some(salary_min);
            }
            if let Some(salary_max) = patch.salary_max {
                job.salary_max = Some(salary_max);
            }
            if let Some(deadline) = patch.deadline {
                job.deadline = Some(deadline);
            }
            if let Some(status) = patch.status {
                job.status = status;
            }
        })
        .ok_or(StoreError::NotFound(EntityKind::Job))
    }

    fn delete_job(&self, id: JobId) -> Result<bool, StoreError> {
        // Lock order: jobs, then applications.
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        if !jobs.remove(id.0) {
            return Ok(false);
        }
        let mut applications = self
            .applications
            .lock()
            .expect("applications mutex poisoned");
        applications.rows.retain(|_, application| application.job != id);
        Ok(true)
    }

    fn create_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut applications = self
            .applications
            .lock()
            .expect("applications mutex poisoned");
        let duplicates = applications.select(|application| {
            application.job == new.job && application.candidate == new.candidate
        });
        if !duplicates.is_empty() {
            return Err(StoreError::AlreadyApplied);
        }
        let id = applications.allocate();
        let application = Application {
            id: ApplicationId(id),
            job: new.job,
            candidate: new.candidate,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            interview_date: None,
            notes: new.notes,
        };
        Ok(applications.insert(id, application))
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        let applications = self
            .applications
            .lock()
            .expect("applications mutex poisoned");
        Ok(applications.get(id.0))
    }

    fn applications(&self, filter: ApplicationFilter) -> Result<Vec<Application>, StoreError> {
        let applications = self
            .applications
            .lock()
            .expect("applications mutex poisoned");
        let mut rows = applications.select(|application| {
            filter.job.map_or(true, |job| application.job == job)
                && filter
                    .candidate
                    .map_or(true, |candidate| application.candidate == candidate)
        });
        rows.sort_by(|a, b| {
            b.applied_at
                .cmp(&a.applied_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    fn update_application(
        &self,
        id: ApplicationId,
        review: ApplicationReview,
    ) -> Result<Application, StoreError> {
        let mut applications = self
            .applications
            .lock()
            .expect("applications mutex poisoned");
        applications
            .modify(id.0, |application| {
                if let Some(status) = review.status {
                    application.status = status;
                }
                if let Some(interview_date) = review.interview_date {
                    application.interview_date = Some(interview_date);
                }
                merge(&mut application.notes, review.notes);
            })
            .ok_or(StoreError::NotFound(EntityKind::Application))
    }

    fn create_pool_entry(&self, new: NewPoolEntry) -> Result<PoolEntry, StoreError> {
        let mut pool = self.pool.lock().expect("pool mutex poisoned");
        let id = pool.allocate();
        let entry = PoolEntry {
            id: PoolEntryId(id),
            agency: new.agency,
            candidate: new.candidate,
            specialization: new.specialization,
            experience: new.experience,
            rating: new.rating,
            status: new.status,
            added_at: Utc::now(),
        };
        Ok(pool.insert(id, entry))
    }

    fn pool_entry(&self, id: PoolEntryId) -> Result<Option<PoolEntry>, StoreError> {
        let pool = self.pool.lock().expect("pool mutex poisoned");
        Ok(pool.get(id.0))
    }

    fn pool_entries(&self, agency: UserId) -> Result<Vec<PoolEntry>, StoreError> {
        let pool = self.pool.lock().expect("pool mutex poisoned");
        let mut rows = pool.select(|entry| entry.agency == agency);
        rows.sort_by(|a, b| b.added_at.cmp(&a.added_at).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }

    fn update_pool_entry(
        &self,
        id: PoolEntryId,
        patch: PoolEntryPatch,
    ) -> Result<PoolEntry, StoreError> {
        let mut pool = self.pool.lock().expect("pool mutex poisoned");
        pool.modify(id.0, |entry| {
            merge(&mut entry.specialization, patch.specialization);
            merge(&mut entry.experience, patch.experience);
            if let Some(rating) = patch.rating {
                entry.rating = rating;
            }
            if let Some(status) = patch.status {
                entry.status = status;
            }
        })
        .ok_or(StoreError::NotFound(EntityKind::PoolEntry))
    }

    fn remove_pool_entry(&self, id: PoolEntryId) -> Result<bool, StoreError> {
        let mut pool = self.pool.lock().expect("pool mutex poisoned");
        Ok(pool.remove(id.0))
    }

    fn profile_for(&self, user: UserId) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(profiles
            .select(|profile| profile.user == user)
            .into_iter()
            .next())
    }

    fn create_profile(&self, user: UserId, draft: ProfileDraft) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.lock().expect("profiles mutex poisoned");
        if !profiles.select(|profile| profile.user == user).is_empty() {
            return Err(StoreError::ProfileExists);
        }
        let id = profiles.allocate();
        let profile = Profile {
            id: ProfileId(id),
            user,
            bio: draft.bio,
            skills: draft.skills,
            experience: draft.experience,
            education: draft.education,
            location: draft.location,
            resume_url: draft.resume_url,
            portfolio_url: draft.portfolio_url,
            updated_at: Utc::now(),
        };
        Ok(profiles.insert(id, profile))
    }

    fn update_profile(&self, user: UserId, draft: ProfileDraft) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.lock().expect("profiles mutex poisoned");
        let existing = profiles
            .select(|profile| profile.user == user)
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(EntityKind::Profile))?;
        profiles
            .modify(existing.id.0, |profile| {
                merge(&mut profile.bio, draft.bio);
                merge(&mut profile.skills, draft.skills);
                merge(&mut profile.experience, draft.experience);
                merge(&mut profile.education, draft.education);
                merge(&mut profile.location, draft.location);
                merge(&mut profile.resume_url, draft.resume_url);
                merge(&mut profile.portfolio_url, draft.portfolio_url);
                profile.updated_at = Utc::now();
            })
            .ok_or(StoreError::NotFound(EntityKind::Profile))
    }
}
