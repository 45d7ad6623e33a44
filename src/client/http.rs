use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ClientError, ClientResult, GENERIC_REJECTION_MESSAGE};
use super::service::JobService;
use crate::api::job::dto::{
    BulkRequest, BulkResponse, DeleteResponse, Envelope, ErrorResponse, FilterRequest, ListQuery,
};
use crate::api::job::{FilterSet, JobDraft, JobPage, JobPatch, JobRecord, JobStats};

/// Path segments the service routes itself; ids can never collide with them
const RESERVED_SEGMENTS: [&str; 3] = ["filter", "bulk", "stats"];

/// HTTP client for the remote job service
pub struct HttpJobService {
    client: Client,
    base_url: Url,
}

impl HttpJobService {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(ClientError::client)?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::client(format!(
                "'{}' cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::client)?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with `segment` appended as a single, escaped path segment
    fn url(&self, segment: Option<&str>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|_| ClientError::client("base URL cannot have path segments"))?
                .pop_if_empty()
                .push(segment);
        }
        Ok(url)
    }

    fn job_url(&self, id: &str) -> ClientResult<Url> {
        if id.trim().is_empty() || id == "." || id == ".." || RESERVED_SEGMENTS.contains(&id) {
            return Err(ClientError::Validation(format!("Invalid job id '{}'", id)));
        }
        self.url(Some(id))
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to job service failed: {}", e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION_MESSAGE.to_string());

        warn!("Job service rejected request: status={}, message={}", status, message);
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn list(&self, page: u32, limit: u32) -> ClientResult<JobPage> {
        debug!("GET list page={} limit={}", page, limit);
        let query = ListQuery {
            page: Some(page),
            limit: Some(limit),
            ..ListQuery::default()
        };
        let response = self.send(self.client.get(self.url(None)?).query(&query)).await?;
        Self::decode(response).await
    }

    async fn filter(&self, filters: &FilterSet, page: u32, limit: u32) -> ClientResult<JobPage> {
        debug!("POST filter page={} limit={} filters=[{}]", page, limit, filters);
        let body = FilterRequest {
            page: Some(page),
            limit: Some(limit),
            filters: filters.clone(),
        };
        let response = self
            .send(self.client.post(self.url(Some("filter"))?).json(&body))
            .await?;
        Self::decode(response).await
    }

    async fn get(&self, id: &str) -> ClientResult<JobRecord> {
        let response = self.send(self.client.get(self.job_url(id)?)).await?;
        Self::decode::<Envelope<JobRecord>>(response)
            .await
            .map(|e| e.data)
    }

    async fn create(&self, draft: &JobDraft) -> ClientResult<JobRecord> {
        debug!("POST create company={} role={}", draft.company, draft.role);
        let response = self.send(self.client.post(self.url(None)?).json(draft)).await?;
        Self::decode::<Envelope<JobRecord>>(response)
            .await
            .map(|e| e.data)
    }

    async fn update(&self, id: &str, patch: &JobPatch) -> ClientResult<JobRecord> {
        debug!("PATCH {}", id);
        let response = self.send(self.client.patch(self.job_url(id)?).json(patch)).await?;
        Self::decode::<Envelope<JobRecord>>(response)
            .await
            .map(|e| e.data)
    }

    async fn delete(&self, id: &str) -> ClientResult<String> {
        debug!("DELETE {}", id);
        let response = self.send(self.client.delete(self.job_url(id)?)).await?;
        Self::decode::<DeleteResponse>(response)
            .await
            .map(|r| r.message)
    }

    async fn bulk_create(&self, drafts: &[JobDraft]) -> ClientResult<BulkResponse> {
        debug!("POST bulk count={}", drafts.len());
        let body = BulkRequest {
            jobs: drafts.to_vec(),
        };
        let response = self
            .send(self.client.post(self.url(Some("bulk"))?).json(&body))
            .await?;
        Self::decode(response).await
    }

    async fn stats(&self) -> ClientResult<JobStats> {
        let response = self.send(self.client.get(self.url(Some("stats"))?)).await?;
        Self::decode::<Envelope<JobStats>>(response)
            .await
            .map(|e| e.data)
    }
}
