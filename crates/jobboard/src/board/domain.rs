use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Identifier wrapper for agency pool entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolEntryId(pub u64);

/// Identifier wrapper for user profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub u64);

/// The three account kinds; the role fixes the capability set and never
/// changes after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Company,
    Agency,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Company => "company",
            Role::Agency => "agency",
        }
    }
}

/// Lifecycle of a posted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }
}

/// Review pipeline for a submitted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

/// Placement progress of a candidate inside an agency pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStatus {
    Available,
    Interviewing,
    Placed,
}

impl PlacementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PlacementStatus::Available => "available",
            PlacementStatus::Interviewing => "interviewing",
            PlacementStatus::Placed => "placed",
        }
    }
}

/// A registered account. The stored password hash never leaves the core;
/// responses expose [`UserView`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub agency_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a [`User`] safe to serialize in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub agency_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            agency_name: user.agency_name.clone(),
            created_at: user.created_at,
        }
    }
}

/// A job posting owned by the company or agency user in `posted_by`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
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
    pub deadline: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub posted_by: UserId,
    /// The poster's role at creation time, kept for display.
    pub posted_by_role: Role,
    pub created_at: DateTime<Utc>,
}

/// A candidate's application to one job. At most one row exists per
/// (job, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub candidate: UserId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub interview_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A link between an agency and a candidate it manages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub id: PoolEntryId,
    pub agency: UserId,
    pub candidate: UserId,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub rating: i32,
    pub status: PlacementStatus,
    pub added_at: DateTime<Utc>,
}

/// Free-form profile attached to at most one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user: UserId,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Field-level rejection raised before anything touches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("passwords don't match")]
    PasswordMismatch,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("salaryMin {min} exceeds salaryMax {max}")]
    SalaryRangeInverted { min: i64, max: i64 },
    #[error("deadline must be in the future")]
    DeadlinePassed,
}

fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    let rejected = || ValidationError::InvalidEmail(value.to_string());
    let (local, domain) = value.split_once('@').ok_or_else(rejected)?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(rejected());
    }
    Ok(())
}

/// Cross-field salary constraint shared by job creation and merged updates.
pub fn check_salary_range(min: Option<i64>, max: Option<i64>) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::SalaryRangeInverted { min, max });
        }
    }
    Ok(())
}

/// Registration payload; the raw password never reaches the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub agency_name: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        require_text(&self.name, "name")?;

        match self.role {
            Role::Company => require_text(
                self.company_name.as_deref().unwrap_or_default(),
                "companyName",
            ),
            Role::Agency => require_text(
                self.agency_name.as_deref().unwrap_or_default(),
                "agencyName",
            ),
            Role::Candidate => Ok(()),
        }
    }
}

/// Fields a poster supplies when creating a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub department: Option<String>,
    pub employment_type: String,
    pub experience_level: String,
    #[serde(default)]
    pub location: Option<String>,
    pub remote_work: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl JobDraft {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        require_text(&self.title, "title")?;
        require_text(&self.description, "description")?;
        require_text(&self.employment_type, "employmentType")?;
        require_text(&self.experience_level, "experienceLevel")?;
        require_text(&self.remote_work, "remoteWork")?;
        check_salary_range(self.salary_min, self.salary_max)?;
        if let Some(deadline) = self.deadline {
            if deadline <= now {
                return Err(ValidationError::DeadlinePassed);
            }
        }
        Ok(())
    }
}

/// A candidate's application request; the candidate id comes from the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_id: JobId,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An agency's request to add a candidate to its pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntryDraft {
    pub candidate_id: UserId,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub status: Option<PlacementStatus>,
}

/// Account fields the owning user may change. Email and role are immutable
/// by construction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub agency_name: Option<String>,
}

/// Partial job update. Ids, `posted_by`, and `posted_by_role` cannot appear
/// here, so they survive every merge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remote_work: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Review fields the job owner may set on an application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReview {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a pool entry by its owning agency.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntryPatch {
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub status: Option<PlacementStatus>,
}

/// Profile fields; used both for first writes and merges.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}
