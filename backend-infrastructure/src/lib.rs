pub mod config;
pub mod repositories;
pub mod riot;
pub mod services;
pub mod utils;

pub use config::*;
pub use repositories::*;
pub use riot::*;
pub use services::*;
