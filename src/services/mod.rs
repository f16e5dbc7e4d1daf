pub mod data;
pub mod elasticsearch;

pub use data::{DataFetchError, DataResult, DataService, SharedDataService, Snapshot};
pub use elasticsearch::ElasticsearchDataService;
