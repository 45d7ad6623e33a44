use serde::{Deserialize, Serialize};

use super::filters::FilterSet;
use super::models::{JobDraft, JobRecord};

/// One page of jobs as returned by the list and filter endpoints
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub data: Vec<JobRecord>,
    pub total_jobs: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Single-value response wrapper used by the get, create, update and stats endpoints
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Envelope<T> {
    pub data: T,
}

/// Body of the filter endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilterRequest {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub filters: FilterSet,
}

/// Query string of the list endpoint
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeleteResponse {
    pub message: String,
}

/// Body of the bulk create endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BulkRequest {
    pub jobs: Vec<JobDraft>,
}

/// Error details for a draft rejected during bulk creation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BulkJobError {
    pub company: String,
    pub errors: Vec<String>,
}

/// Response for bulk job creation
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BulkResponse {
    pub message: String,
    pub created: usize,
    #[serde(default)]
    pub errors: Vec<BulkJobError>,
}

/// Application counts by status
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct JobStats {
    pub total: u64,
    pub applied: u64,
    pub interview: u64,
    pub offer: u64,
    pub rejected: u64,
}

/// Error body shared by every endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}
