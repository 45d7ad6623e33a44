pub mod error;
pub mod http;
pub mod service;

pub use error::{ClientError, ClientResult, ErrorKind};
pub use http::HttpJobService;
pub use service::JobService;
