pub mod narrative_service;

pub use narrative_service::*;
