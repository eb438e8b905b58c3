pub mod distribution;
pub mod facade;
pub mod fetcher;
#[cfg(any(feature = "cloud", test))]
pub mod jobs;
#[cfg(any(not(feature = "cloud"), test))]
pub mod legacy;
pub mod models;
pub mod query;
pub mod transport;

pub use distribution::ACTIVE_BACKEND;
pub use facade::{
    DEFAULT_MAX_ITEMS, fetch_history, fetch_history_page, fetch_queue, get_outputs_from_history,
    get_workflow_from_history,
};
pub use query::HistoryQuery;
pub use transport::{Transport, TransportFuture, TransportResponse};
