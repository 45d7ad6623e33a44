/// End-to-end tests: HTTP client and controller against the reference server
///
/// Each test binds the server on an ephemeral port, seeds the in-memory store
/// directly and talks to it over real HTTP.
use actix_web::{dev::ServerHandle, web};
use std::sync::Arc;
use std::time::Duration;

use job_tracker::api::job::{FilterField, FilterSet, JobDraft, JobPatch, JobStatus};
use job_tracker::client::{ErrorKind, HttpJobService, JobService};
use job_tracker::server::{self, JobStore};
use job_tracker::JobCollectionController;

struct TestServer {
    handle: ServerHandle,
    store: web::Data<JobStore>,
    base_url: String,
}

impl TestServer {
    fn start() -> Self {
        let store = web::Data::new(JobStore::new());
        let (server, addrs) = server::bind("127.0.0.1:0", store.clone(), 1024 * 1024).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            handle,
            store,
            base_url: format!("http://{}/api/jobs", addrs[0]),
        }
    }

    fn client(&self) -> HttpJobService {
        HttpJobService::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    async fn stop(self) {
        self.handle.stop(false).await;
    }
}

#[actix_web::test]
async fn create_get_update_delete_round_trip() {
    let server = TestServer::start();
    let client = server.client();

    let created = client
        .create(
            &JobDraft::new("Acme", "Engineer")
                .with_status(JobStatus::Interview)
                .with_link("https://acme.test/careers/42"),
        )
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.status, JobStatus::Interview);

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let patch = JobPatch {
        status: Some(JobStatus::Offer),
        ..JobPatch::default()
    };
    let updated = client.update(&created.id, &patch).await.unwrap();
    assert_eq!(updated.status, JobStatus::Offer);
    assert_eq!(updated.role, "Engineer");
    assert_eq!(updated.job_link.as_deref(), Some("https://acme.test/careers/42"));

    let message = client.delete(&created.id).await.unwrap();
    assert_eq!(message, "Job deleted successfully");
    assert!(server.store.is_empty());

    server.stop().await;
}

#[actix_web::test]
async fn list_reports_pagination_totals() {
    let server = TestServer::start();
    for i in 0..11 {
        server
            .store
            .create(JobDraft::new(format!("Company {}", i), "Engineer"))
            .unwrap();
    }
    let client = server.client();

    let first = client.list(1, 10).await.unwrap();
    assert_eq!(first.data.len(), 10);
    assert_eq!(first.total_jobs, 11);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.current_page, 1);

    let second = client.list(2, 10).await.unwrap();
    assert_eq!(second.data.len(), 1);

    server.stop().await;
}

#[actix_web::test]
async fn filter_endpoint_applies_each_constraint() {
    let server = TestServer::start();
    let date = |d| chrono::NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
    for (company, status, day) in [
        ("Acme", JobStatus::Offer, 1),
        ("Acme Robotics", JobStatus::Applied, 10),
        ("Globex", JobStatus::Offer, 20),
    ] {
        server
            .store
            .create(
                JobDraft::new(company, "Engineer")
                    .with_status(status)
                    .with_applied_date(date(day)),
            )
            .unwrap();
    }
    let client = server.client();

    let offers = client
        .filter(&FilterSet::new().with(FilterField::Status, "Offer"), 1, 10)
        .await
        .unwrap();
    assert_eq!(offers.total_jobs, 2);
    assert!(offers.data.iter().all(|j| j.status == JobStatus::Offer));

    let acme = client
        .filter(&FilterSet::new().with(FilterField::Company, "acme"), 1, 10)
        .await
        .unwrap();
    assert_eq!(acme.total_jobs, 2);

    let window = FilterSet::new()
        .with(FilterField::StartDate, "2024-02-10")
        .with(FilterField::EndDate, "2024-02-20");
    let ranged = client.filter(&window, 1, 10).await.unwrap();
    assert_eq!(ranged.total_jobs, 2);

    server.stop().await;
}

#[actix_web::test]
async fn server_errors_carry_their_message() {
    let server = TestServer::start();
    let client = server.client();

    let missing = client.get("does-not-exist").await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Rejected);
    assert_eq!(missing.message(), "Job not found");

    // bypasses the controller's local validation on purpose
    let invalid = client.create(&JobDraft::new("", "Engineer")).await.unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::Rejected);
    assert_eq!(invalid.message(), "Company is required");

    let bad_date = client
        .filter(&FilterSet::new().with(FilterField::StartDate, "someday"), 1, 10)
        .await
        .unwrap_err();
    assert_eq!(bad_date.kind(), ErrorKind::Rejected);
    assert!(bad_date.message().contains("startDate"));

    server.stop().await;
}

#[actix_web::test]
async fn bulk_create_and_stats() {
    let server = TestServer::start();
    let client = server.client();

    let response = client
        .bulk_create(&[
            JobDraft::new("Acme", "Engineer").with_status(JobStatus::Rejected),
            JobDraft::new("Globex", "Analyst"),
            JobDraft::new("Initech", ""),
        ])
        .await
        .unwrap();
    assert_eq!(response.created, 2);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].company, "Initech");

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.applied, 1);

    server.stop().await;
}

#[actix_web::test]
async fn controller_returns_to_previous_page_over_http() {
    let server = TestServer::start();
    for i in 0..11 {
        server
            .store
            .create(JobDraft::new(format!("Company {}", i), "Engineer"))
            .unwrap();
    }
    let jobs = JobCollectionController::new(Arc::new(server.client()), 10);

    jobs.set_page(2).await.unwrap();
    let last = jobs.jobs();
    assert_eq!(last.len(), 1);

    jobs.delete(&last[0].id).await.unwrap();
    let state = jobs.snapshot();
    assert_eq!(state.pagination.page, 1);
    assert_eq!(state.jobs.len(), 10);
    assert_eq!(state.pagination.total_pages, 1);

    server.stop().await;
}

#[actix_web::test]
async fn blank_job_link_is_accepted_as_absent() {
    let server = TestServer::start();
    let http = reqwest::Client::new();

    let response = http
        .post(&server.base_url)
        .json(&serde_json::json!({
            "company": "Acme",
            "role": "Dev",
            "status": "Applied",
            "jobLink": "",
            "appliedDate": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"].get("jobLink").is_none());

    let id = body["data"]["id"].as_str().unwrap().to_string();
    let response = http
        .patch(format!("{}/{}", server.base_url, id))
        .json(&serde_json::json!({ "jobLink": "", "status": "Offer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let bad = http
        .post(&server.base_url)
        .json(&serde_json::json!({ "company": "Acme", "role": "Dev", "jobLink": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);
    let body: serde_json::Value = bad.json().await.unwrap();
    assert!(body["fields"].get("jobLink").is_some());

    server.stop().await;
}

#[actix_web::test]
async fn ids_never_reach_other_routes() {
    let server = TestServer::start();
    server.store.create(JobDraft::new("Acme", "Engineer")).unwrap();
    let client = server.client();

    let err = client.get("stats").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = client.delete("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(server.store.len(), 1);

    let missing = client.get("a/b?c#d").await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Rejected);
    assert_eq!(missing.message(), "Job not found");

    server.stop().await;
}

#[actix_web::test]
async fn stopped_server_is_unreachable() {
    let server = TestServer::start();
    let client = server.client();
    server.stop().await;

    let err = client.list(1, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unreachable);
    assert_eq!(
        err.message(),
        "No response received from server. Please check your network connection."
    );
}
