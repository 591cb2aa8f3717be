use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{info, warn};

use backend_application::commands::recap_commands::generate_recap;
use backend_application::commands::sync_commands::sync_and_summarize;
use backend_application::commands::timeline_commands::process_timelines;
use backend_application::queries::profile_queries::player_profile;
use backend_application::queries::timeline_queries::timeline_summary;
use backend_application::AppState;
use backend_infrastructure::AppConfig;

use crate::cli::{Cli, Command};
use crate::context::AppContext;

pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load().await?;
    let context = AppContext::new(&config).await?;
    let state = context.state;

    info!(command = cli.command.name(), "starting");
    let output = tokio::select! {
        output = dispatch(&state, &cli.command) => output,
        _ = shutdown_signal() => {
            warn!("interrupted; in-flight work abandoned, committed batches kept");
            Err(anyhow!("interrupted"))
        }
    };

    if cli.metrics {
        eprint!("{}", state.metrics.render_prometheus());
    }
    println!("{}", output?);
    Ok(())
}

async fn dispatch(state: &AppState, command: &Command) -> Result<String> {
    let player = command.player();
    let (name, tag) = (player.game_name.as_str(), player.tag_line.as_str());
    match command {
        Command::Sync(_) => render(&sync_and_summarize(state, name, tag).await?),
        Command::ProcessTimelines(_) => render(&process_timelines(state, name, tag).await?),
        Command::TimelineSummary(_) => render(&timeline_summary(state, name, tag).await?),
        Command::Recap(_) => render(&generate_recap(state, name, tag).await?),
        Command::Profile(_) => render(&player_profile(state, name, tag).await?),
    }
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("sigterm handler unavailable: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
