#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use job_tracker::api::job::dto::BulkResponse;
use job_tracker::api::job::{FilterSet, JobDraft, JobPage, JobPatch, JobRecord, JobStats, JobStatus};
use job_tracker::client::{ClientError, ClientResult, JobService};
use job_tracker::server::{JobStore, StoreError};

/// A request the fake received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List { page: u32, limit: u32 },
    Filter { filters: FilterSet, page: u32, limit: u32 },
    Get(String),
    Create(JobDraft),
    Update(String),
    Delete(String),
    Bulk(usize),
    Stats,
}

/// In-process job service backed by the reference store.
///
/// Page fetches can be held back per page number with [`FakeService::gate`]
/// and released in any order, and listings can be made to fail.
#[derive(Default)]
pub struct FakeService {
    store: JobStore,
    calls: Mutex<Vec<Call>>,
    gates: Mutex<HashMap<u32, Arc<Notify>>>,
    fail_pages: AtomicBool,
}

fn to_client_error(err: StoreError) -> ClientError {
    match err {
        StoreError::NotFound(_) => ClientError::Rejected {
            status: 404,
            message: "Job not found".to_string(),
        },
        other => ClientError::Rejected {
            status: 400,
            message: other.to_string(),
        },
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` jobs named Company 1..=count, all Applied, oldest first
    pub fn with_jobs(count: u32) -> Self {
        let service = Self::new();
        for i in 1..=count {
            service.seed(
                JobDraft::new(format!("Company {}", i), "Engineer")
                    .with_applied_date(day(i)),
            );
        }
        service
    }

    pub fn seed(&self, draft: JobDraft) -> JobRecord {
        self.store.create(draft).expect("seed draft is valid")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn page_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List { .. } | Call::Filter { .. }))
            .count()
    }

    /// Holds back fetches of `page` until [`FakeService::release`]
    pub fn gate(&self, page: u32) {
        self.gates
            .lock()
            .unwrap()
            .insert(page, Arc::new(Notify::new()));
    }

    pub fn release(&self, page: u32) {
        if let Some(gate) = self.gates.lock().unwrap().get(&page) {
            gate.notify_one();
        }
    }

    pub fn fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn fetch(&self, filters: &FilterSet, page: u32, limit: u32) -> ClientResult<JobPage> {
        let gate = self.gates.lock().unwrap().get(&page).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(ClientError::unreachable());
        }
        self.store
            .page(filters, Some(page), Some(limit))
            .map_err(to_client_error)
    }
}

#[async_trait]
impl JobService for FakeService {
    async fn list(&self, page: u32, limit: u32) -> ClientResult<JobPage> {
        self.record(Call::List { page, limit });
        self.fetch(&FilterSet::new(), page, limit).await
    }

    async fn filter(&self, filters: &FilterSet, page: u32, limit: u32) -> ClientResult<JobPage> {
        self.record(Call::Filter {
            filters: filters.clone(),
            page,
            limit,
        });
        self.fetch(filters, page, limit).await
    }

    async fn get(&self, id: &str) -> ClientResult<JobRecord> {
        self.record(Call::Get(id.to_string()));
        self.store.get(id).map_err(to_client_error)
    }

    async fn create(&self, draft: &JobDraft) -> ClientResult<JobRecord> {
        self.record(Call::Create(draft.clone()));
        self.store.create(draft.clone()).map_err(to_client_error)
    }

    async fn update(&self, id: &str, patch: &JobPatch) -> ClientResult<JobRecord> {
        self.record(Call::Update(id.to_string()));
        self.store.update(id, patch.clone()).map_err(to_client_error)
    }

    async fn delete(&self, id: &str) -> ClientResult<String> {
        self.record(Call::Delete(id.to_string()));
        self.store
            .delete(id)
            .map(|_| "Job deleted successfully".to_string())
            .map_err(to_client_error)
    }

    async fn bulk_create(&self, drafts: &[JobDraft]) -> ClientResult<BulkResponse> {
        self.record(Call::Bulk(drafts.len()));
        Ok(self.store.bulk_create(drafts.to_vec()))
    }

    async fn stats(&self) -> ClientResult<JobStats> {
        self.record(Call::Stats);
        Ok(self.store.stats())
    }
}

pub fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(u64::from(offset))
}

pub fn statuses(jobs: &[JobRecord]) -> Vec<JobStatus> {
    jobs.iter().map(|job| job.status).collect()
}
