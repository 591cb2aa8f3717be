use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use backend_domain::ports::RiotApi;
use backend_domain::{
    AccountDto, MatchDto, MatchIdQuery, RegionDto, RiotConfig, RiotHandle, RoutingCluster,
    TimelineDto, UpstreamError,
};

use crate::config::CLUSTER_PLACEHOLDER;

const TOKEN_HEADER: &str = "X-Riot-Token";

/// Thin HTTP adapter: one request per call, failures classified for the caller's retry policy.
pub struct RiotHttpClient {
    client: Client,
    config: RiotConfig,
}

impl RiotHttpClient {
    pub fn new(config: RiotConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()
            .context("failed to build riot http client")?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!(path = url.path(), "riot request");
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|err| UpstreamError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            return Err(UpstreamError::from_status(status.as_u16(), retry_after));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::Transport(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| UpstreamError::Decode(err.to_string()))
    }
}

#[async_trait]
impl RiotApi for RiotHttpClient {
    async fn account_by_riot_id(&self, handle: &RiotHandle) -> Result<AccountDto, UpstreamError> {
        let url = endpoint(
            &self.config.base_url,
            &self.config.account_cluster,
            &[
                "riot",
                "account",
                "v1",
                "accounts",
                "by-riot-id",
                handle.game_name.as_str(),
                handle.tag_line.as_str(),
            ],
        )?;
        self.get_json(url).await
    }

    async fn region_by_puuid(&self, puuid: &str) -> Result<RegionDto, UpstreamError> {
        let url = endpoint(
            &self.config.base_url,
            &self.config.account_cluster,
            &["riot", "account", "v1", "region", "by-game", "lol", "by-puuid", puuid],
        )?;
        self.get_json(url).await
    }

    async fn match_ids(
        &self,
        cluster: RoutingCluster,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>, UpstreamError> {
        let mut url = endpoint(
            &self.config.base_url,
            cluster.as_str(),
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        )?;
        url.query_pairs_mut()
            .append_pair("startTime", &query.start_time.to_string())
            .append_pair("start", &query.start.to_string())
            .append_pair("count", &query.count.to_string());
        self.get_json(url).await
    }

    async fn match_detail(
        &self,
        cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError> {
        let url = endpoint(
            &self.config.base_url,
            cluster.as_str(),
            &["lol", "match", "v5", "matches", match_id],
        )?;
        self.get_json(url).await
    }

    async fn match_timeline(
        &self,
        cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<TimelineDto, UpstreamError> {
        let url = endpoint(
            &self.config.base_url,
            cluster.as_str(),
            &["lol", "match", "v5", "matches", match_id, "timeline"],
        )?;
        self.get_json(url).await
    }
}

/// Substitutes the cluster into the host template and appends percent-encoded path segments.
pub fn endpoint(base_url: &str, cluster: &str, segments: &[&str]) -> Result<Url, UpstreamError> {
    let host = base_url.replace(CLUSTER_PLACEHOLDER, cluster);
    let mut url = Url::parse(&host)
        .map_err(|err| UpstreamError::Transport(format!("invalid base url {}: {}", host, err)))?;
    url.path_segments_mut()
        .map_err(|_| UpstreamError::Transport(format!("base url {} cannot carry a path", host)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Only the delta-seconds form is honored; anything else falls back to the caller's default.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    const BASE: &str = "https://{cluster}.api.riotgames.com";

    #[test]
    fn endpoint_encodes_handle_segments() {
        let url = endpoint(
            BASE,
            "asia",
            &["riot", "account", "v1", "accounts", "by-riot-id", "Hide on bush", "KR1"],
        )
        .expect("url");
        assert_eq!(
            url.as_str(),
            "https://asia.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"
        );
    }

    #[test]
    fn endpoint_keeps_slashes_inside_segments_escaped() {
        let url = endpoint(BASE, "europe", &["lol", "match", "v5", "matches", "a/b"]).expect("url");
        assert_eq!(url.path(), "/lol/match/v5/matches/a%2Fb");
        assert_eq!(url.host_str(), Some("europe.api.riotgames.com"));
    }

    #[test]
    fn endpoint_rejects_broken_template() {
        let err = endpoint("not a url {cluster}", "sea", &["x"]).expect_err("invalid");
        assert!(matches!(err, UpstreamError::Transport(_)));
    }

    #[test]
    fn retry_after_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn client_builds_from_config() {
        let client = RiotHttpClient::new(RiotConfig {
            api_key: "RGAPI-test".to_string(),
            base_url: BASE.to_string(),
            account_cluster: "americas".to_string(),
            request_timeout_seconds: 1,
        });
        assert!(client.is_ok());
    }
}
