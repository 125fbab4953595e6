//! HTTP surface for the job board core. Handlers translate verbs and paths
//! into service calls and map the error taxonomy onto fixed status codes;
//! no error kind is ever converted into a different kind downstream.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::credentials::Credentials;
use super::domain::{
    AccountPatch, ApplicationDraft, ApplicationId, ApplicationReview, JobDraft, JobId, JobPatch,
    PoolEntryDraft, PoolEntryId, PoolEntryPatch, ProfileDraft, Registration,
};
use super::service::{Caller, JobBoardService, ServiceError};
use super::store::Storage;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Duplicate(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::BadLogin | ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Credential(_) | ServiceError::Unavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Router builder exposing the full `/api` surface over a shared service.
pub fn board_router<S, C>(service: Arc<JobBoardService<S, C>>) -> Router
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    Router::new()
        .route("/api/auth/register", post(register_handler::<S, C>))
        .route("/api/auth/login", post(login_handler::<S, C>))
        .route(
            "/api/auth/me",
            get(account_handler::<S, C>).put(update_account_handler::<S, C>),
        )
        .route(
            "/api/jobs",
            get(browse_jobs_handler::<S, C>).post(post_job_handler::<S, C>),
        )
        .route(
            "/api/jobs/:id",
            get(job_handler::<S, C>)
                .put(update_job_handler::<S, C>)
                .delete(delete_job_handler::<S, C>),
        )
        .route("/api/my-jobs", get(my_jobs_handler::<S, C>))
        .route("/api/applications", post(apply_handler::<S, C>))
        .route("/api/my-applications", get(my_applications_handler::<S, C>))
        .route(
            "/api/job-applications/:job_id",
            get(job_applications_handler::<S, C>),
        )
        .route("/api/applications/:id", put(review_application_handler::<S, C>))
        .route(
            "/api/agency-candidates",
            get(pool_handler::<S, C>).post(add_pool_entry_handler::<S, C>),
        )
        .route(
            "/api/agency-candidates/:id",
            put(update_pool_entry_handler::<S, C>).delete(remove_pool_entry_handler::<S, C>),
        )
        .route(
            "/api/profile",
            get(profile_handler::<S, C>).put(upsert_profile_handler::<S, C>),
        )
        .route("/api/stats/candidate", get(candidate_stats_handler::<S, C>))
        .route("/api/stats/company", get(company_stats_handler::<S, C>))
        .route("/api/stats/agency", get(agency_stats_handler::<S, C>))
        .with_state(service)
}

fn caller<S, C>(
    service: &JobBoardService<S, C>,
    headers: &HeaderMap,
) -> Result<Caller, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ServiceError::Unauthenticated)?;
    service.authenticate(token)
}

pub(crate) async fn register_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    Json(registration): Json<Registration>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let session = service.register(registration)?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

pub(crate) async fn login_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let session = service.login(&request.email, &request.password)?;
    Ok(Json(session).into_response())
}

pub(crate) async fn account_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    let view = service.account(who)?;
    Ok(Json(json!({ "user": view })).into_response())
}

pub(crate) async fn update_account_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Json(patch): Json<AccountPatch>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    let view = service.update_account(who, patch)?;
    Ok(Json(json!({ "user": view })).into_response())
}

pub(crate) async fn browse_jobs_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    Ok(Json(service.browse_jobs()?).into_response())
}

pub(crate) async fn job_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    Path(id): Path<u64>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    Ok(Json(service.job(JobId(id))?).into_response())
}

pub(crate) async fn post_job_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    let job = service.post_job(who, draft)?;
    Ok((StatusCode::CREATED, Json(job)).into_response())
}

pub(crate) async fn my_jobs_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.my_jobs(who)?).into_response())
}

pub(crate) async fn update_job_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<JobPatch>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.update_job(who, JobId(id), patch)?).into_response())
}

pub(crate) async fn delete_job_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    service.delete_job(who, JobId(id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn apply_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    let application = service.apply(who, draft)?;
    Ok((StatusCode::CREATED, Json(application)).into_response())
}

pub(crate) async fn my_applications_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.my_applications(who)?).into_response())
}

pub(crate) async fn job_applications_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.job_applications(who, JobId(job_id))?).into_response())
}

pub(crate) async fn review_application_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(review): Json<ApplicationReview>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.review_application(who, ApplicationId(id), review)?).into_response())
}

pub(crate) async fn pool_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.pool(who)?).into_response())
}

pub(crate) async fn add_pool_entry_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Json(draft): Json<PoolEntryDraft>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    let entry = service.add_pool_entry(who, draft)?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

pub(crate) async fn update_pool_entry_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<PoolEntryPatch>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.update_pool_entry(who, PoolEntryId(id), patch)?).into_response())
}

pub(crate) async fn remove_pool_entry_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    service.remove_pool_entry(who, PoolEntryId(id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn profile_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.profile(who)?).into_response())
}

pub(crate) async fn upsert_profile_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
    Json(draft): Json<ProfileDraft>,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.upsert_profile(who, draft)?).into_response())
}

pub(crate) async fn candidate_stats_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.candidate_stats(who)?).into_response())
}

pub(crate) async fn company_stats_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.company_stats(who)?).into_response())
}

pub(crate) async fn agency_stats_handler<S, C>(
    State(service): State<Arc<JobBoardService<S, C>>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError>
where
    S: Storage + 'static,
    C: Credentials + 'static,
{
    let who = caller(&service, &headers)?;
    Ok(Json(service.agency_stats(who)?).into_response())
}
