use anyhow::Result;
use clap::Parser;

use backend_bootstrap::{init_logging, Cli};
use backend_infrastructure::CONFIG_ENV;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Held for the process lifetime so the file writer flushes on exit.
    let _log_guard = init_logging(cli.log_json, cli.log_dir.as_deref())?;

    if let Some(config) = &cli.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    backend_bootstrap::run(cli).await
}
