use backend_domain::{Player, PlayerId, RiotHandle, RoutingCluster, UpstreamError};
use tracing::{info, warn};

use crate::ingest::IngestSession;
use crate::AppError;

/// Account lookup is terminal on failure; region lookup falls back to the default cluster.
pub async fn resolve_player(
    session: &IngestSession,
    handle: &RiotHandle,
) -> Result<Player, AppError> {
    session.governor.acquire().await;
    let account = session
        .api
        .account_by_riot_id(handle)
        .await
        .map_err(|err| account_error(handle, err))?;

    let puuid = account.puuid.trim().to_string();
    if puuid.is_empty() {
        return Err(AppError::AccountNotFound(handle.to_string()));
    }

    session.governor.acquire().await;
    let cluster = match session.api.region_by_puuid(&puuid).await {
        Ok(region) => region
            .region
            .as_deref()
            .map(RoutingCluster::from_region)
            .unwrap_or_default(),
        Err(err) => {
            warn!("region lookup failed for {}, using default cluster: {}", handle, err);
            RoutingCluster::default()
        }
    };

    info!("resolved {} to cluster {}", handle, cluster);
    Ok(Player {
        handle: handle.clone(),
        puuid: PlayerId(puuid),
        cluster,
    })
}

fn account_error(handle: &RiotHandle, err: UpstreamError) -> AppError {
    match err {
        UpstreamError::Client { status: 404 } => AppError::AccountNotFound(handle.to_string()),
        UpstreamError::Client { status } if status == 401 || status == 403 => {
            AppError::UpstreamAuth { status }
        }
        other => AppError::UpstreamUnavailable(format!("account lookup failed: {}", other)),
    }
}
