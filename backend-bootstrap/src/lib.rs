pub mod cli;
pub mod context;
pub mod lifecycle;
pub mod logging;

pub use cli::{Cli, Command, PlayerArgs};
pub use lifecycle::run;
pub use logging::init_logging;
