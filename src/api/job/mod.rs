pub mod dto;
pub mod filters;
pub mod models;

// Re-export commonly used types
pub use dto::{JobPage, JobStats};
pub use filters::{FilterField, FilterSet};
pub use models::{JobDraft, JobPatch, JobRecord, JobStatus};
