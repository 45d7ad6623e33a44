use async_trait::async_trait;

use super::error::ClientResult;
use crate::api::job::dto::BulkResponse;
use crate::api::job::{FilterSet, JobDraft, JobPage, JobPatch, JobRecord, JobStats};

/// Remote job service contract consumed by the collection controller
#[async_trait]
pub trait JobService: Send + Sync {
    /// Plain listing, newest first
    async fn list(&self, page: u32, limit: u32) -> ClientResult<JobPage>;

    /// Listing narrowed by a non-empty filter set
    async fn filter(&self, filters: &FilterSet, page: u32, limit: u32) -> ClientResult<JobPage>;

    async fn get(&self, id: &str) -> ClientResult<JobRecord>;

    async fn create(&self, draft: &JobDraft) -> ClientResult<JobRecord>;

    /// Partial update; fields absent from the patch are left unchanged
    async fn update(&self, id: &str, patch: &JobPatch) -> ClientResult<JobRecord>;

    /// Returns the server's confirmation message
    async fn delete(&self, id: &str) -> ClientResult<String>;

    async fn bulk_create(&self, drafts: &[JobDraft]) -> ClientResult<BulkResponse>;

    async fn stats(&self) -> ClientResult<JobStats>;
}
