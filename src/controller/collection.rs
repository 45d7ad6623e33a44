use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use validator::Validate;

use super::state::{CollectionState, Pagination};
use crate::api::job::dto::BulkResponse;
use crate::api::job::{FilterSet, JobDraft, JobPatch, JobRecord, JobStats};
use crate::client::{ClientError, ClientResult, JobService};

/// Whether a finished refresh was written to the collection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A later refresh was started before this one finished; its result was dropped
    Superseded,
}

enum Fetched {
    Applied,
    Superseded,
    /// The requested page does not exist; nothing was written except the clamped page
    PastEnd { last_page: u32 },
}

struct Inner {
    state: CollectionState,
    /// Token of the most recently started refresh
    latest_token: u64,
}

/// Client-side view of the job list, kept in step with the remote service
///
/// Every refresh takes a fresh token before awaiting the service and only
/// writes its result back if that token is still the latest one issued, so a
/// slow response can never overwrite the state of a request started after it.
/// The lock is never held across an await.
pub struct JobCollectionController {
    service: Arc<dyn JobService>,
    inner: Mutex<Inner>,
}

impl JobCollectionController {
    pub fn new(service: Arc<dyn JobService>, page_size: u32) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner {
                state: CollectionState::new(page_size),
                latest_token: 0,
            }),
        }
    }

    /// Starts with filters already active, before the first load
    pub fn with_filters(self, filters: FilterSet) -> Self {
        self.lock().state.filters = filters.compacted();
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> CollectionState {
        self.lock().state.clone()
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.lock().state.jobs.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.lock().state.pagination
    }

    pub fn filters(&self) -> FilterSet {
        self.lock().state.filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn last_error(&self) -> Option<ClientError> {
        self.lock().state.last_error.clone()
    }

    /// Fetches `page` under the active filters and replaces the visible records.
    ///
    /// On failure the previous records stay visible and the error is recorded.
    /// If the server reports fewer pages than `page`, nothing from that
    /// response is shown and the last existing page is fetched instead.
    pub async fn refresh(&self, page: u32, page_size: u32) -> ClientResult<RefreshOutcome> {
        match self.fetch(page, page_size).await? {
            Fetched::Applied => Ok(RefreshOutcome::Applied),
            Fetched::Superseded => Ok(RefreshOutcome::Superseded),
            Fetched::PastEnd { last_page } => {
                info!(
                    "Page {} is past the last page {}, loading the last page instead",
                    page, last_page
                );
                match self.fetch(last_page, page_size).await? {
                    Fetched::Superseded => Ok(RefreshOutcome::Superseded),
                    // totals shrank again between the two requests; the next refresh settles it
                    Fetched::Applied | Fetched::PastEnd { .. } => Ok(RefreshOutcome::Applied),
                }
            }
        }
    }

    /// Reloads the current page
    pub async fn reload(&self) -> ClientResult<RefreshOutcome> {
        let pagination = self.pagination();
        self.refresh(pagination.page, pagination.page_size).await
    }

    async fn fetch(&self, page: u32, page_size: u32) -> ClientResult<Fetched> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let (token, filters) = {
            let mut inner = self.lock();
            inner.latest_token += 1;
            inner.state.loading = true;
            (inner.latest_token, inner.state.filters.clone())
        };

        debug!(
            "Refresh #{}: page={} page_size={} filters=[{}]",
            token, page, page_size, filters
        );

        let result = if filters.is_empty() {
            self.service.list(page, page_size).await
        } else {
            self.service.filter(&filters, page, page_size).await
        };

        let mut inner = self.lock();
        if token != inner.latest_token {
            debug!(
                "Dropping response of refresh #{} (latest is #{})",
                token, inner.latest_token
            );
            return Ok(Fetched::Superseded);
        }

        inner.state.loading = false;
        match result {
            Ok(page_result) if page > page_result.total_pages.max(1) => {
                // keep the previous records, but never point past the last page
                let last_page = page_result.total_pages.max(1);
                inner.state.pagination = Pagination {
                    page: last_page,
                    page_size,
                    total_pages: page_result.total_pages,
                    total_items: page_result.total_jobs,
                };
                Ok(Fetched::PastEnd { last_page })
            }
            Ok(page_result) => {
                debug!(
                    "Refresh #{} applied: {} records, {} total, {} pages",
                    token,
                    page_result.data.len(),
                    page_result.total_jobs,
                    page_result.total_pages
                );
                inner.state.apply_page(page_result, page, page_size);
                Ok(Fetched::Applied)
            }
            Err(err) => {
                warn!("Refresh #{} failed, keeping previous records: {}", token, err);
                inner.state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Replaces the active filters and goes back to page 1
    pub async fn apply_filters(&self, filters: FilterSet) -> ClientResult<RefreshOutcome> {
        let page_size = {
            let mut inner = self.lock();
            inner.state.filters = filters.compacted();
            inner.state.pagination.page = 1;
            info!("Applying filters [{}]", inner.state.filters);
            inner.state.pagination.page_size
        };
        self.refresh(1, page_size).await
    }

    pub async fn clear_filters(&self) -> ClientResult<RefreshOutcome> {
        self.apply_filters(FilterSet::new()).await
    }

    /// Jumps to `page`; the server decides whether it exists.
    ///
    /// Until the response arrives the recorded page never exceeds the last
    /// page the current totals allow.
    pub async fn set_page(&self, page: u32) -> ClientResult<RefreshOutcome> {
        let page = page.max(1);
        let page_size = {
            let mut inner = self.lock();
            let pagination = &mut inner.state.pagination;
            pagination.page = page.min(pagination.last_page());
            pagination.page_size
        };
        self.refresh(page, page_size).await
    }

    /// Moves forward one page if the known totals allow it. Returns false when already on the last page.
    pub async fn next_page(&self) -> ClientResult<bool> {
        let pagination = self.pagination();
        if !pagination.has_next() {
            return Ok(false);
        }
        self.set_page(pagination.page + 1).await?;
        Ok(true)
    }

    pub async fn prev_page(&self) -> ClientResult<bool> {
        let pagination = self.pagination();
        if !pagination.has_prev() {
            return Ok(false);
        }
        self.set_page(pagination.page - 1).await?;
        Ok(true)
    }

    /// Creates a job and reloads the current page.
    ///
    /// Drafts with a blank company or role are rejected before any request is made.
    pub async fn create(&self, draft: JobDraft) -> ClientResult<JobRecord> {
        let draft = draft.normalized();
        draft.validate().map_err(|e| ClientError::from_validation(&e))?;

        let record = self.service.create(&draft).await?;
        info!("Created job {} ({} / {})", record.id, record.company, record.role);

        self.reload_after_mutation().await;
        Ok(record)
    }

    /// Sends a partial update and reloads the current page
    pub async fn update(&self, id: &str, patch: JobPatch) -> ClientResult<JobRecord> {
        let patch = patch.normalized();
        if patch.is_empty() {
            return Err(ClientError::Validation("Nothing to update".to_string()));
        }
        patch.validate().map_err(|e| ClientError::from_validation(&e))?;

        let record = self.service.update(id, &patch).await?;
        info!("Updated job {}", record.id);

        self.reload_after_mutation().await;
        Ok(record)
    }

    /// Deletes a job and reloads.
    ///
    /// When the deleted job was the only one visible on a page after the
    /// first, the previous page is loaded instead so the user does not land on
    /// an empty trailing page.
    pub async fn delete(&self, id: &str) -> ClientResult<String> {
        let (visible, pagination) = {
            let inner = self.lock();
            (inner.state.jobs.len(), inner.state.pagination)
        };

        let message = self.service.delete(id).await?;
        info!("Deleted job {}", id);

        let target = if visible == 1 && pagination.page > 1 {
            pagination.page - 1
        } else {
            pagination.page
        };
        self.lock().state.pagination.page = target;

        if let Err(err) = self.refresh(target, pagination.page_size).await {
            warn!("Reload after deleting {} failed: {}", id, err);
        }
        Ok(message)
    }

    /// Creates many jobs at once; the server reports the drafts it rejected
    pub async fn bulk_create(&self, drafts: Vec<JobDraft>) -> ClientResult<BulkResponse> {
        let drafts: Vec<JobDraft> = drafts.into_iter().map(JobDraft::normalized).collect();
        let response = self.service.bulk_create(&drafts).await?;
        info!(
            "Bulk create: {} created, {} rejected",
            response.created,
            response.errors.len()
        );

        self.reload_after_mutation().await;
        Ok(response)
    }

    pub async fn get(&self, id: &str) -> ClientResult<JobRecord> {
        self.service.get(id).await
    }

    pub async fn stats(&self) -> ClientResult<JobStats> {
        self.service.stats().await
    }

    // The mutation already succeeded; a failed reload only shows up as last_error.
    async fn reload_after_mutation(&self) {
        if let Err(err) = self.reload().await {
            warn!("Reload after mutation failed: {}", err);
        }
    }
}
