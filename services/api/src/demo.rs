use clap::Args;
use std::sync::Arc;

use crate::infra::HmacCredentials;
use jobboard::board::domain::{
    ApplicationDraft, ApplicationReview, ApplicationStatus, JobDraft, PlacementStatus,
    PoolEntryDraft, Registration, Role,
};
use jobboard::board::service::{Caller, JobBoardService, ServiceError};
use jobboard::board::store::MemoryStore;
use jobboard::config::AppConfig;
use jobboard::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the dashboard payloads as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

type DemoService = JobBoardService<MemoryStore, HmacCredentials>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = JobBoardService::new(
        Arc::new(MemoryStore::default()),
        Arc::new(HmacCredentials::new(&config.auth)),
    );

    println!("Job board demo");

    let company = match seed_account(
        &service,
        "talent@initech.example",
        "Pat Gibbons",
        Role::Company,
    ) {
        Ok(caller) => caller,
        Err(err) => return abandon("company registration", err),
    };
    let candidate = match seed_account(
        &service,
        "dev@mail.example",
        "Sam Okafor",
        Role::Candidate,
    ) {
        Ok(caller) => caller,
        Err(err) => return abandon("candidate registration", err),
    };
    let agency = match seed_account(
        &service,
        "book@heartland.example",
        "Riley Chen",
        Role::Agency,
    ) {
        Ok(caller) => caller,
        Err(err) => return abandon("agency registration", err),
    };
    println!("- Registered one company, one candidate, one agency");

    let job = match service.post_job(
        company,
        JobDraft {
            title: "Data Engineer".to_string(),
            description: "Own ingestion pipelines and reporting".to_string(),
            department: Some("Data".to_string()),
            employment_type: "full-time".to_string(),
            experience_level: "mid".to_string(),
            location: Some("Des Moines, IA".to_string()),
            remote_work: "hybrid".to_string(),
            skills: Some("rust, sql, airflow".to_string()),
            salary_min: Some(95_000),
            salary_max: Some(130_000),
            deadline: None,
        },
    ) {
        Ok(job) => job,
        Err(err) => return abandon("job posting", err),
    };
    println!("- Posted \"{}\" (job {})", job.title, job.id.0);

    let application = match service.apply(
        candidate,
        ApplicationDraft {
            job_id: job.id,
            notes: Some("Five years of pipeline work".to_string()),
        },
    ) {
        Ok(application) => application,
        Err(err) => return abandon("application", err),
    };
    println!(
        "- Candidate applied (application {}, status {})",
        application.id.0,
        application.status.label()
    );

    match service.review_application(
        company,
        application.id,
        ApplicationReview {
            status: Some(ApplicationStatus::Interview),
            interview_date: None,
            notes: Some("Strong pipeline background".to_string()),
        },
    ) {
        Ok(reviewed) => println!("- Company moved it to {}", reviewed.status.label()),
        Err(err) => return abandon("review", err),
    }

    match service.add_pool_entry(
        agency,
        PoolEntryDraft {
            candidate_id: candidate.id,
            specialization: Some("data platforms".to_string()),
            experience: Some("5 years".to_string()),
            rating: Some(4),
            status: Some(PlacementStatus::Interviewing),
        },
    ) {
        Ok(entry) => println!(
            "- Agency pooled the candidate (entry {}, {})",
            entry.id.0,
            entry.status.label()
        ),
        Err(err) => return abandon("pool entry", err),
    }

    println!("\nDashboards");
    render_candidate(&service, candidate, args.json);
    render_company(&service, company, args.json);
    render_agency(&service, agency, args.json);

    Ok(())
}

fn seed_account(
    service: &DemoService,
    email: &str,
    name: &str,
    role: Role,
) -> Result<Caller, ServiceError> {
    let session = service.register(Registration {
        email: email.to_string(),
        password: "demo-password".to_string(),
        confirm_password: "demo-password".to_string(),
        name: name.to_string(),
        role,
        company_name: matches!(role, Role::Company).then(|| "Initech".to_string()),
        agency_name: matches!(role, Role::Agency).then(|| "Heartland Talent".to_string()),
    })?;
    Ok(Caller {
        id: session.user.id,
        role: session.user.role,
    })
}

fn abandon(step: &str, err: ServiceError) -> Result<(), AppError> {
    println!("  Demo halted during {step}: {err}");
    Ok(())
}

fn render_candidate(service: &DemoService, caller: Caller, json: bool) {
    match service.candidate_stats(caller) {
        Ok(stats) if json => render_json("candidate", &stats),
        Ok(stats) => println!(
            "- Candidate: {} applications | {} interviews | {} pending | {} profile views",
            stats.applications, stats.interviews, stats.pending, stats.views
        ),
        Err(err) => println!("- Candidate dashboard unavailable: {err}"),
    }
}

fn render_company(service: &DemoService, caller: Caller, json: bool) {
    match service.company_stats(caller) {
        Ok(stats) if json => render_json("company", &stats),
        Ok(stats) => println!(
            "- Company: {} active jobs | {} applications | {} pending reviews | {} interviews",
            stats.active_jobs, stats.total_applications, stats.pending_reviews, stats.interviews
        ),
        Err(err) => println!("- Company dashboard unavailable: {err}"),
    }
}

fn render_agency(service: &DemoService, caller: Caller, json: bool) {
    match service.agency_stats(caller) {
        Ok(stats) if json => render_json("agency", &stats),
        Ok(stats) => println!(
            "- Agency: {} pooled | {} active placements | {} placed | {} partner companies",
            stats.candidate_pool,
            stats.active_placements,
            stats.successful_placements,
            stats.partner_companies
        ),
        Err(err) => println!("- Agency dashboard unavailable: {err}"),
    }
}

fn render_json<T: serde::Serialize>(label: &str, stats: &T) {
    match serde_json::to_string_pretty(stats) {
        Ok(payload) => println!("- {label}:\n{payload}"),
        Err(err) => println!("- {label} payload unavailable: {err}"),
    }
}
