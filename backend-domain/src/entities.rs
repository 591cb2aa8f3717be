// Domain entities

pub mod config;
pub mod match_record;
pub mod narrative_payload;
pub mod player;
pub mod profile;
pub mod season;
pub mod timeline;
pub mod upstream;

pub use config::*;
pub use match_record::*;
pub use narrative_payload::*;
pub use player::*;
pub use profile::*;
pub use season::*;
pub use timeline::*;
pub use upstream::*;
