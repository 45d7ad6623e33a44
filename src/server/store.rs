use actix_web::{HttpResponse, ResponseError};
use chrono::{NaiveDate, Utc};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::api::job::dto::{BulkJobError, BulkResponse, ErrorResponse};
use crate::api::job::models::parse_applied_date;
use crate::api::job::{FilterField, FilterSet, JobDraft, JobPage, JobPatch, JobRecord, JobStats, JobStatus};
use crate::api::validation_messages;

pub const DEFAULT_LIMIT: u32 = 10;

/// Store-level errors
#[derive(Debug)]
pub enum StoreError {
    /// No job with this id
    NotFound(String),

    /// A filter value could not be interpreted
    InvalidFilter(String),

    /// Payload failed validation
    Validation(Vec<String>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Job not found: {}", id),
            StoreError::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
            StoreError::Validation(msgs) => write!(f, "Validation error: {}", msgs.join("; ")),
        }
    }
}

impl std::error::Error for StoreError {}

impl ResponseError for StoreError {
    fn error_response(&self) -> HttpResponse {
        match self {
            StoreError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    message: "Job not found".to_string(),
                    fields: None,
                })
            }
            StoreError::InvalidFilter(msg) => {
                warn!("Invalid filter: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    message: msg.clone(),
                    fields: None,
                })
            }
            StoreError::Validation(msgs) => {
                warn!("Validation error: {}", msgs.join("; "));
                HttpResponse::BadRequest().json(ErrorResponse {
                    message: msgs.join("; "),
                    fields: Some(serde_json::json!({ "errors": msgs })),
                })
            }
        }
    }
}

/// Filter constraints decoded into comparable values
struct Criteria {
    company: Option<String>,
    status: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl Criteria {
    fn from_filters(filters: &FilterSet) -> Result<Self, StoreError> {
        let date = |field: FilterField| {
            filters
                .get(field)
                .map(|raw| {
                    parse_applied_date(raw)
                        .map_err(|_| StoreError::InvalidFilter(format!("Invalid {}: {}", field, raw)))
                })
                .transpose()
        };

        Ok(Self {
            company: filters.get(FilterField::Company).map(str::to_lowercase),
            status: filters.get(FilterField::Status).map(str::to_string),
            start: date(FilterField::StartDate)?,
            end: date(FilterField::EndDate)?,
        })
    }

    fn matches(&self, job: &JobRecord) -> bool {
        // company is a case-insensitive partial match, status is exact, dates are inclusive
        self.company
            .as_ref()
            .map_or(true, |c| job.company.to_lowercase().contains(c.as_str()))
            && self.status.as_ref().map_or(true, |s| job.status.as_str() == s)
            && self.start.map_or(true, |d| job.applied_date >= d)
            && self.end.map_or(true, |d| job.applied_date <= d)
    }
}

struct StoredJob {
    seq: u64,
    record: JobRecord,
}

#[derive(Default)]
struct Inner {
    jobs: Vec<StoredJob>,
    next_seq: u64,
}

impl Inner {
    fn insert(&mut self, draft: JobDraft) -> JobRecord {
        self.next_seq += 1;
        let record = JobRecord {
            id: uuid::Uuid::new_v4().simple().to_string(),
            company: draft.company,
            role: draft.role,
            status: draft.status,
            job_link: draft.job_link,
            applied_date: draft
                .applied_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        };
        self.jobs.push(StoredJob {
            seq: self.next_seq,
            record: record.clone(),
        });
        record
    }
}

/// In-memory job store backing the reference server. Nothing survives a restart.
#[derive(Default)]
pub struct JobStore {
    inner: RwLock<Inner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One page of matching jobs, newest application first
    pub fn page(
        &self,
        filters: &FilterSet,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<JobPage, StoreError> {
        let criteria = Criteria::from_filters(filters)?;
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);

        let inner = self.read();
        let mut matching: Vec<&StoredJob> = inner
            .jobs
            .iter()
            .filter(|job| criteria.matches(&job.record))
            .collect();
        matching.sort_by(|a, b| {
            b.record
                .applied_date
                .cmp(&a.record.applied_date)
                .then(b.seq.cmp(&a.seq))
        });

        let total_jobs = matching.len() as u64;
        let total_pages = total_jobs.div_ceil(u64::from(limit)) as u32;
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let data: Vec<JobRecord> = matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|job| job.record.clone())
            .collect();

        debug!(
            "Page {} (limit {}) filters=[{}]: {} of {} jobs",
            page,
            limit,
            filters,
            data.len(),
            total_jobs
        );

        Ok(JobPage {
            data,
            total_jobs,
            total_pages,
            current_page: page,
        })
    }

    pub fn get(&self, id: &str) -> Result<JobRecord, StoreError> {
        self.read()
            .jobs
            .iter()
            .find(|job| job.record.id == id)
            .map(|job| job.record.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn create(&self, draft: JobDraft) -> Result<JobRecord, StoreError> {
        let draft = draft.normalized();
        draft
            .validate()
            .map_err(|e| StoreError::Validation(validation_messages(&e)))?;

        let record = self.write().insert(draft);
        info!("Stored job {} ({} / {})", record.id, record.company, record.role);
        Ok(record)
    }

    /// Validates each draft on its own and stores the valid ones
    pub fn bulk_create(&self, drafts: Vec<JobDraft>) -> BulkResponse {
        info!("Processing bulk creation for {} jobs", drafts.len());

        let mut valid = Vec::new();
        let mut errors = Vec::new();
        for draft in drafts.into_iter().map(JobDraft::normalized) {
            match draft.validate() {
                Ok(()) => valid.push(draft),
                Err(e) => {
                    warn!("Validation failed for bulk job: {}", draft.company);
                    errors.push(BulkJobError {
                        company: draft.company,
                        errors: validation_messages(&e),
                    });
                }
            }
        }

        let created = valid.len();
        {
            let mut inner = self.write();
            for draft in valid {
                inner.insert(draft);
            }
        }

        BulkResponse {
            message: format!(
                "Bulk job creation completed. {} created, {} failed",
                created,
                errors.len()
            ),
            created,
            errors,
        }
    }

    pub fn update(&self, id: &str, patch: JobPatch) -> Result<JobRecord, StoreError> {
        let patch = patch.normalized();
        patch
            .validate()
            .map_err(|e| StoreError::Validation(validation_messages(&e)))?;

        let mut inner = self.write();
        let job = inner
            .jobs
            .iter_mut()
            .find(|job| job.record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(&mut job.record);
        info!("Updated job {}", id);
        Ok(job.record.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.write();
        let before = inner.jobs.len();
        inner.jobs.retain(|job| job.record.id != id);
        if inner.jobs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!("Deleted job {}", id);
        Ok(())
    }

    pub fn stats(&self) -> JobStats {
        let inner = self.read();
        let count = |status: JobStatus| {
            inner
                .jobs
                .iter()
                .filter(|job| job.record.status == status)
                .count() as u64
        };
        JobStats {
            total: inner.jobs.len() as u64,
            applied: count(JobStatus::Applied),
            interview: count(JobStatus::Interview),
            offer: count(JobStatus::Offer),
            rejected: count(JobStatus::Rejected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn seeded() -> JobStore {
        let store = JobStore::new();
        store
            .create(JobDraft::new("Acme", "Engineer").with_applied_date(date(1)))
            .unwrap();
        store
            .create(
                JobDraft::new("Acme Labs", "Designer")
                    .with_status(JobStatus::Offer)
                    .with_applied_date(date(10)),
            )
            .unwrap();
        store
            .create(
                JobDraft::new("Globex", "Engineer")
                    .with_status(JobStatus::Rejected)
                    .with_applied_date(date(20)),
            )
            .unwrap();
        store
    }

    #[test]
    fn pages_newest_first_with_totals() {
        let store = seeded();
        let page = store.page(&FilterSet::new(), Some(1), Some(2)).unwrap();
        assert_eq!(page.total_jobs, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].company, "Globex");
        assert_eq!(page.data[1].company, "Acme Labs");

        let second = store.page(&FilterSet::new(), Some(2), Some(2)).unwrap();
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.current_page, 2);
    }

    #[test]
    fn company_is_partial_and_case_insensitive() {
        let store = seeded();
        let filters = FilterSet::new().with(FilterField::Company, "acme");
        let page = store.page(&filters, None, None).unwrap();
        assert_eq!(page.total_jobs, 2);
    }

    #[test]
    fn status_is_exact() {
        let store = seeded();
        let filters = FilterSet::new().with(FilterField::Status, "Offer");
        let page = store.page(&filters, None, None).unwrap();
        assert_eq!(page.total_jobs, 1);
        assert_eq!(page.data[0].status, JobStatus::Offer);

        let lower = FilterSet::new().with(FilterField::Status, "offer");
        assert_eq!(store.page(&lower, None, None).unwrap().total_jobs, 0);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let store = seeded();
        let filters = FilterSet::new()
            .with(FilterField::StartDate, "2024-01-10")
            .with(FilterField::EndDate, "2024-01-20");
        let page = store.page(&filters, None, None).unwrap();
        assert_eq!(page.total_jobs, 2);

        let bad = FilterSet::new().with(FilterField::EndDate, "yesterday");
        assert!(matches!(
            store.page(&bad, None, None),
            Err(StoreError::InvalidFilter(_))
        ));
    }

    #[test]
    fn update_and_delete_unknown_ids() {
        let store = seeded();
        let patch = JobPatch {
            status: Some(JobStatus::Interview),
            ..JobPatch::default()
        };
        assert!(matches!(
            store.update("missing", patch),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete("missing"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn bulk_create_keeps_valid_drafts() {
        let store = JobStore::new();
        let response = store.bulk_create(vec![
            JobDraft::new("Acme", "Engineer"),
            JobDraft::new("", "Engineer"),
        ]);
        assert_eq!(response.created, 1);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].errors, vec!["Company is required"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn stats_count_by_status() {
        let stats = seeded().stats();
        assert_eq!(
            stats,
            JobStats {
                total: 3,
                applied: 1,
                interview: 0,
                offer: 1,
                rejected: 1,
            }
        );
    }
}
