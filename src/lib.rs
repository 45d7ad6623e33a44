pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod logging;
pub mod server;
pub mod view;

pub use client::{ClientError, HttpJobService, JobService};
pub use controller::{CollectionState, JobCollectionController, Pagination, RefreshOutcome};
