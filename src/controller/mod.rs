pub mod collection;
pub mod state;

pub use collection::{JobCollectionController, RefreshOutcome};
pub use state::{CollectionState, Pagination};
