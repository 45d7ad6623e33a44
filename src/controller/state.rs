use crate::api::job::{FilterSet, JobPage, JobRecord};
use crate::client::ClientError;

/// Pagination metadata for the visible page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
            total_items: 0,
        }
    }

    /// Highest page the current totals allow; an empty result still has page 1
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Everything a view needs to draw the list
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState {
    pub jobs: Vec<JobRecord>,
    pub filters: FilterSet,
    pub pagination: Pagination,
    pub loading: bool,
    pub last_error: Option<ClientError>,
}

impl CollectionState {
    pub fn new(page_size: u32) -> Self {
        Self {
            jobs: Vec::new(),
            filters: FilterSet::new(),
            pagination: Pagination::new(page_size),
            loading: false,
            last_error: None,
        }
    }

    /// Replaces records and totals with a server page fetched for `page`/`page_size`
    pub(crate) fn apply_page(&mut self, result: JobPage, page: u32, page_size: u32) {
        self.jobs = result.data;
        self.pagination = Pagination {
            page,
            page_size,
            total_pages: result.total_pages,
            total_items: result.total_jobs,
        };
        self.last_error = None;
    }
}
