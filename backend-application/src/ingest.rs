// Upstream ingestion: rate governance, retries, discovery, fetching and persistence

pub mod fetcher;
pub mod governor;
pub mod pager;
pub mod resolver;
pub mod retry;
pub mod session;
pub mod sync;

pub use governor::RateGovernor;
pub use retry::{Backoff, Retry, RetryError, RetryPolicy};
pub use session::IngestSession;
