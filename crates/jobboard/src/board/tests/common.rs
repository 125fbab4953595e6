use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::board::credentials::{CredentialError, Credentials};
use crate::board::domain::{
    Application, ApplicationDraft, Job, JobDraft, Registration, Role, UserId,
};
use crate::board::service::{Caller, JobBoardService};
use crate::board::store::MemoryStore;

/// Transparent credential double: hashes are reversible markers and tokens
/// encode the user id directly.
pub(super) struct StubCredentials;

impl Credentials for StubCredentials {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        Ok(hash == format!("hashed:{password}"))
    }

    fn issue_token(&self, user: UserId) -> Result<String, CredentialError> {
        Ok(format!("token-{}", user.0))
    }

    fn verify_token(&self, token: &str) -> Result<UserId, CredentialError> {
        token
            .strip_prefix("token-")
            .and_then(|raw| raw.parse().ok())
            .map(UserId)
            .ok_or(CredentialError::TokenRejected)
    }
}

pub(super) type TestService = JobBoardService<MemoryStore, StubCredentials>;

pub(super) fn build_service() -> (TestService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = JobBoardService::new(store.clone(), Arc::new(StubCredentials));
    (service, store)
}

pub(super) fn registration(email: &str, role: Role) -> Registration {
    Registration {
        email: email.to_string(),
        password: "hunter-42".to_string(),
        confirm_password: "hunter-42".to_string(),
        name: "Alex Doe".to_string(),
        role,
        company_name: matches!(role, Role::Company).then(|| "Initech".to_string()),
        agency_name: matches!(role, Role::Agency).then(|| "TalentBridge".to_string()),
    }
}

pub(super) fn register(service: &TestService, email: &str, role: Role) -> Caller {
    let session = service
        .register(registration(email, role))
        .expect("registration succeeds");
    Caller {
        id: session.user.id,
        role: session.user.role,
    }
}

pub(super) fn job_draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: "Build and operate the data platform".to_string(),
        department: Some("Engineering".to_string()),
        employment_type: "full-time".to_string(),
        experience_level: "senior".to_string(),
        location: Some("Des Moines, IA".to_string()),
        remote_work: "hybrid".to_string(),
        skills: Some("rust, sql".to_string()),
        salary_min: Some(95_000),
        salary_max: Some(130_000),
        deadline: None,
    }
}

pub(super) fn post_job(service: &TestService, poster: Caller, title: &str) -> Job {
    service
        .post_job(poster, job_draft(title))
        .expect("job posts")
}

pub(super) fn apply(service: &TestService, candidate: Caller, job: &Job) -> Application {
    service
        .apply(
            candidate,
            ApplicationDraft {
                job_id: job.id,
                notes: None,
            },
        )
        .expect("application submits")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
