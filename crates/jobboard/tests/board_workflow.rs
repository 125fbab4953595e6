//! Integration specifications for the hiring workflow across all three roles.
//!
//! Scenarios exercise the public service facade and HTTP router end to end so we
//! can validate registration, posting, applying, reviewing, and the dashboards
//! without reaching into private modules.

mod common {
    use std::sync::Arc;

    use jobboard::board::credentials::{CredentialError, Credentials};
    use jobboard::board::domain::{JobDraft, Registration, Role, UserId};
    use jobboard::board::service::{Caller, JobBoardService};
    use jobboard::board::store::MemoryStore;

    pub(super) struct PlainCredentials;

    impl Credentials for PlainCredentials {
        fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
            Ok(format!("plain:{password}"))
        }

        fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
            Ok(hash == format!("plain:{password}"))
        }

        fn issue_token(&self, user: UserId) -> Result<String, CredentialError> {
            Ok(format!("session-{}", user.0))
        }

        fn verify_token(&self, token: &str) -> Result<UserId, CredentialError> {
            token
                .strip_prefix("session-")
                .and_then(|raw| raw.parse().ok())
                .map(UserId)
                .ok_or(CredentialError::TokenRejected)
        }
    }

    pub(super) type BoardService = JobBoardService<MemoryStore, PlainCredentials>;

    pub(super) fn build_service() -> BoardService {
        JobBoardService::new(Arc::new(MemoryStore::default()), Arc::new(PlainCredentials))
    }

    pub(super) fn registration(email: &str, role: Role) -> Registration {
        Registration {
            email: email.to_string(),
            password: "correct-horse".to_string(),
            confirm_password: "correct-horse".to_string(),
            name: "Jordan Reyes".to_string(),
            role,
            company_name: matches!(role, Role::Company).then(|| "Prairie Analytics".to_string()),
            agency_name: matches!(role, Role::Agency).then(|| "Heartland Talent".to_string()),
        }
    }

    pub(super) fn register(service: &BoardService, email: &str, role: Role) -> Caller {
        let session = service
            .register(registration(email, role))
            .expect("registration succeeds");
        Caller {
            id: session.user.id,
            role: session.user.role,
        }
    }

    pub(super) fn draft(title: &str) -> JobDraft {
        JobDraft {
            title: title.to_string(),
            description: "Own ingestion pipelines and reporting".to_string(),
            department: Some("Data".to_string()),
            employment_type: "full-time".to_string(),
            experience_level: "mid".to_string(),
            location: Some("Cedar Rapids, IA".to_string()),
            remote_work: "hybrid".to_string(),
            skills: Some("rust, airflow".to_string()),
            salary_min: Some(90_000),
            salary_max: Some(125_000),
            deadline: None,
        }
    }
}

mod hiring {
    use super::common::*;
    use chrono::{TimeZone, Utc};
    use jobboard::board::domain::{
        ApplicationDraft, ApplicationReview, ApplicationStatus, PlacementStatus, PoolEntryDraft,
        PoolEntryPatch, Role,
    };
    use jobboard::board::service::ServiceError;

    #[test]
    fn application_moves_from_pending_to_interview() {
        let service = build_service();
        let company = register(&service, "hiring@prairie.example", Role::Company);
        let candidate = register(&service, "dev@mail.example", Role::Candidate);

        let job = service
            .post_job(company, draft("Data Engineer"))
            .expect("job posts");
        let application = service
            .apply(
                candidate,
                ApplicationDraft {
                    job_id: job.id,
                    notes: Some("Five years of pipeline work".to_string()),
                },
            )
            .expect("application submits");
        assert_eq!(application.status, ApplicationStatus::Pending);

        let slot = Utc
            .with_ymd_and_hms(2026, 9, 10, 15, 0, 0)
            .single()
            .expect("valid date");
        let reviewed = service
            .review_application(
                company,
                application.id,
                ApplicationReview {
                    status: Some(ApplicationStatus::Interview),
                    interview_date: Some(slot),
                    notes: None,
                },
            )
            .expect("review succeeds");
        assert_eq!(reviewed.status, ApplicationStatus::Interview);
        assert_eq!(reviewed.interview_date, Some(slot));

        let mine = service.my_applications(candidate).expect("listing");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].application.status, ApplicationStatus::Interview);
        assert_eq!(mine[0].job.as_ref().map(|job| job.id), Some(job.id));

        let dashboard = service.company_stats(company).expect("stats");
        assert_eq!(dashboard.active_jobs, 1);
        assert_eq!(dashboard.interviews, 1);
        assert_eq!(dashboard.pending_reviews, 0);
    }

    #[test]
    fn agencies_track_placements_through_the_pool() {
        let service = build_service();
        let agency = register(&service, "book@heartland.example", Role::Agency);
        let candidate = register(&service, "dev@mail.example", Role::Candidate);

        let entry = service
            .add_pool_entry(
                agency,
                PoolEntryDraft {
                    candidate_id: candidate.id,
                    specialization: Some("platform".to_string()),
                    experience: Some("6 years".to_string()),
                    rating: Some(4),
                    status: None,
                },
            )
            .expect("entry added");
        assert_eq!(entry.status, PlacementStatus::Available);

        service
            .update_pool_entry(
                agency,
                entry.id,
                PoolEntryPatch {
                    status: Some(PlacementStatus::Placed),
                    ..PoolEntryPatch::default()
                },
            )
            .expect("entry placed");

        let stats = service.agency_stats(agency).expect("stats");
        assert_eq!(stats.candidate_pool, 1);
        assert_eq!(stats.successful_placements, 1);
        assert_eq!(stats.active_placements, 0);
    }

    #[test]
    fn login_resumes_a_session_after_registration() {
        let service = build_service();
        register(&service, "dev@mail.example", Role::Candidate);

        let session = service
            .login("dev@mail.example", "correct-horse")
            .expect("login succeeds");
        let caller = service.authenticate(&session.token).expect("token valid");
        assert_eq!(caller.id, session.user.id);
        assert_eq!(caller.role, Role::Candidate);

        assert!(matches!(
            service.login("dev@mail.example", "wrong-horse"),
            Err(ServiceError::BadLogin)
        ));
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use jobboard::board::router::board_router;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn full_http_flow_from_registration_to_review() {
        let router = board_router(Arc::new(build_service()));

        let company_session = body_json(
            router
                .clone()
                .oneshot(post_json(
                    "/api/auth/register",
                    None,
                    json!({
                        "email": "hiring@prairie.example",
                        "password": "correct-horse",
                        "confirmPassword": "correct-horse",
                        "name": "Jordan Reyes",
                        "role": "company",
                        "companyName": "Prairie Analytics",
                    }),
                ))
                .await
                .expect("register company"),
        )
        .await;
        let company_token = company_session["token"].as_str().expect("token").to_string();

        let candidate_session = body_json(
            router
                .clone()
                .oneshot(post_json(
                    "/api/auth/register",
                    None,
                    json!({
                        "email": "dev@mail.example",
                        "password": "correct-horse",
                        "confirmPassword": "correct-horse",
                        "name": "Sam Okafor",
                        "role": "candidate",
                    }),
                ))
                .await
                .expect("register candidate"),
        )
        .await;
        let candidate_token = candidate_session["token"]
            .as_str()
            .expect("token")
            .to_string();

        let job = body_json(
            router
                .clone()
                .oneshot(post_json(
                    "/api/jobs",
                    Some(&company_token),
                    json!({
                        "title": "Data Engineer",
                        "description": "Own ingestion pipelines",
                        "employmentType": "full-time",
                        "experienceLevel": "mid",
                        "remoteWork": "hybrid",
                        "salaryMin": 90000,
                        "salaryMax": 125000,
                    }),
                ))
                .await
                .expect("post job"),
        )
        .await;
        let job_id = job["id"].as_u64().expect("job id");
        assert_eq!(job["status"], json!("active"));

        let application = body_json(
            router
                .clone()
                .oneshot(post_json(
                    "/api/applications",
                    Some(&candidate_token),
                    json!({ "jobId": job_id, "notes": "Pipeline experience" }),
                ))
                .await
                .expect("apply"),
        )
        .await;
        let application_id = application["id"].as_u64().expect("application id");

        let review = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/applications/{application_id}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, format!("Bearer {company_token}"))
                    .body(Body::from(json!({ "status": "interview" }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("review");
        assert_eq!(review.status(), StatusCode::OK);
        assert_eq!(body_json(review).await["status"], json!("interview"));

        let inbox = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/job-applications/{job_id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {company_token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("inbox");
        let listed = body_json(inbox).await;
        let listed = listed.as_array().expect("array");
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0]["candidate"]["email"],
            json!("dev@mail.example")
        );
        assert!(listed[0]["candidate"].get("passwordHash").is_none());

        let stats = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/stats/candidate")
                    .header(header::AUTHORIZATION, format!("Bearer {candidate_token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("stats");
        let payload = body_json(stats).await;
        assert_eq!(payload["applications"], json!(1));
        assert_eq!(payload["interviews"], json!(1));
    }

    #[tokio::test]
    async fn cross_role_requests_are_rejected_over_http() {
        let router = board_router(Arc::new(build_service()));

        let candidate_session = body_json(
            router
                .clone()
                .oneshot(post_json(
                    "/api/auth/register",
                    None,
                    json!({
                        "email": "dev@mail.example",
                        "password": "correct-horse",
                        "confirmPassword": "correct-horse",
                        "name": "Sam Okafor",
                        "role": "candidate",
                    }),
                ))
                .await
                .expect("register candidate"),
        )
        .await;
        let token = candidate_session["token"].as_str().expect("token");

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/stats/agency")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("stats");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let payload = body_json(response).await;
        assert_eq!(payload["error"], json!("candidate role cannot view the agency dashboard"));
    }
}
