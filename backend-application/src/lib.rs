// Backend Application Layer

pub mod commands;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod queries;
pub mod state;

#[cfg(test)]
mod testing;

pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
