// Domain value objects
pub mod comeback_pattern;
pub mod identifiers;
pub mod objective_kind;
pub mod routing_cluster;

pub use comeback_pattern::*;
pub use identifiers::*;
pub use objective_kind::*;
pub use routing_cluster::*;
