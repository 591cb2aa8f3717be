// Domain services: pure derivations over fetched and persisted records

pub mod match_builder;
pub mod narrative;
pub mod stats_aggregator;
pub mod timeline_aggregator;
pub mod timeline_engine;

pub use match_builder::*;
pub use narrative::*;
pub use stats_aggregator::*;
pub use timeline_aggregator::*;
pub use timeline_engine::*;
