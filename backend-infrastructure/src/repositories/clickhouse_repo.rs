use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use backend_domain::ports::{MatchRepository, TimelineRepository};
use backend_domain::{
    ComebackPattern, DbConfig, MapPoint, MatchRecord, ObjectiveCounts, StoreError, TimelineSummary,
};

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct MatchRow {
    match_id: String,
    puuid: String,
    game_mode: String,
    queue_id: i64,
    duration: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    game_start: OffsetDateTime,
    champion: String,
    team_position: String,
    team_id: i64,
    win: bool,
    kills: i64,
    deaths: i64,
    assists: i64,
    damage_to_champions: i64,
    damage_taken: i64,
    gold_earned: i64,
    minions_killed: i64,
    neutral_minions_killed: i64,
    vision_score: i64,
    wards_placed: i64,
    wards_killed: i64,
    turret_kills: i64,
    inhibitor_kills: i64,
    largest_multi_kill: i64,
    penta_kills: i64,
    first_blood: bool,
    team_dragons: i64,
    team_barons: i64,
    team_heralds: i64,
    team_towers: i64,
    team_inhibitors: i64,
    team_kills: i64,
    team_damage: i64,
    team_gold: i64,
    team_vision: i64,
}

impl From<&MatchRecord> for MatchRow {
    fn from(record: &MatchRecord) -> Self {
        Self {
            match_id: record.match_id.clone(),
            puuid: record.puuid.clone(),
            game_mode: record.game_mode.clone(),
            queue_id: record.queue_id,
            duration: record.duration,
            game_start: millis_to_utc(record.game_start),
            champion: record.champion.clone(),
            team_position: record.team_position.clone(),
            team_id: record.team_id,
            win: record.win,
            kills: record.kills,
            deaths: record.deaths,
            assists: record.assists,
            damage_to_champions: record.damage_to_champions,
            damage_taken: record.damage_taken,
            gold_earned: record.gold_earned,
            minions_killed: record.minions_killed,
            neutral_minions_killed: record.neutral_minions_killed,
            vision_score: record.vision_score,
            wards_placed: record.wards_placed,
            wards_killed: record.wards_killed,
            turret_kills: record.turret_kills,
            inhibitor_kills: record.inhibitor_kills,
            largest_multi_kill: record.largest_multi_kill,
            penta_kills: record.penta_kills,
            first_blood: record.first_blood,
            team_dragons: record.team_dragons,
            team_barons: record.team_barons,
            team_heralds: record.team_heralds,
            team_towers: record.team_towers,
            team_inhibitors: record.team_inhibitors,
            team_kills: record.team_kills,
            team_damage: record.team_damage,
            team_gold: record.team_gold,
            team_vision: record.team_vision,
        }
    }
}

impl From<MatchRow> for MatchRecord {
    fn from(row: MatchRow) -> Self {
        Self {
            match_id: row.match_id,
            puuid: row.puuid,
            game_mode: row.game_mode,
            queue_id: row.queue_id,
            duration: row.duration,
            game_start: utc_to_millis(row.game_start),
            champion: row.champion,
            team_position: row.team_position,
            team_id: row.team_id,
            win: row.win,
            kills: row.kills,
            deaths: row.deaths,
            assists: row.assists,
            damage_to_champions: row.damage_to_champions,
            damage_taken: row.damage_taken,
            gold_earned: row.gold_earned,
            minions_killed: row.minions_killed,
            neutral_minions_killed: row.neutral_minions_killed,
            vision_score: row.vision_score,
            wards_placed: row.wards_placed,
            wards_killed: row.wards_killed,
            turret_kills: row.turret_kills,
            inhibitor_kills: row.inhibitor_kills,
            largest_multi_kill: row.largest_multi_kill,
            penta_kills: row.penta_kills,
            first_blood: row.first_blood,
            team_dragons: row.team_dragons,
            team_barons: row.team_barons,
            team_heralds: row.team_heralds,
            team_towers: row.team_towers,
            team_inhibitors: row.team_inhibitors,
            team_kills: row.team_kills,
            team_damage: row.team_damage,
            team_gold: row.team_gold,
            team_vision: row.team_vision,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct TimelineRow {
    match_id: String,
    puuid: String,
    early_dominance: f64,
    midgame_swing: f64,
    consistency: f64,
    spike_score: f64,
    throw_score: f64,
    roam_score: f64,
    level6_at: Option<i64>,
    level11_at: Option<i64>,
    level16_at: Option<i64>,
    final_gold_diff: f64,
    kill_points_json: String,
    dragon: u32,
    baron: u32,
    herald: u32,
    tower: u32,
    inhibitor: u32,
    comeback: String,
    duration: i64,
}

impl TimelineRow {
    fn from_summary(summary: &TimelineSummary) -> Result<Self, StoreError> {
        let kill_points_json = serde_json::to_string(&summary.kill_points)
            .map_err(|err| StoreError::Fatal(format!("kill points not serializable: {}", err)))?;
        Ok(Self {
            match_id: summary.match_id.clone(),
            puuid: summary.puuid.clone(),
            early_dominance: summary.early_dominance,
            midgame_swing: summary.midgame_swing,
            consistency: summary.consistency,
            spike_score: summary.spike_score,
            throw_score: summary.throw_score,
            roam_score: summary.roam_score,
            level6_at: summary.level6_at,
            level11_at: summary.level11_at,
            level16_at: summary.level16_at,
            final_gold_diff: summary.final_gold_diff,
            kill_points_json,
            dragon: summary.objectives.dragon,
            baron: summary.objectives.baron,
            herald: summary.objectives.herald,
            tower: summary.objectives.tower,
            inhibitor: summary.objectives.inhibitor,
            comeback: summary.comeback.as_str().to_string(),
            duration: summary.duration,
        })
    }

    fn into_summary(self) -> Result<TimelineSummary, StoreError> {
        let kill_points: Vec<MapPoint> = serde_json::from_str(&self.kill_points_json)
            .map_err(|err| StoreError::Fatal(format!("corrupt kill points for {}: {}", self.match_id, err)))?;
        Ok(TimelineSummary {
            match_id: self.match_id,
            puuid: self.puuid,
            early_dominance: self.early_dominance,
            midgame_swing: self.midgame_swing,
            consistency: self.consistency,
            spike_score: self.spike_score,
            throw_score: self.throw_score,
            roam_score: self.roam_score,
            level6_at: self.level6_at,
            level11_at: self.level11_at,
            level16_at: self.level16_at,
            final_gold_diff: self.final_gold_diff,
            kill_points,
            objectives: ObjectiveCounts {
                dragon: self.dragon,
                baron: self.baron,
                herald: self.herald,
                tower: self.tower,
                inhibitor: self.inhibitor,
            },
            comeback: ComebackPattern::from(self.comeback.as_str()),
            duration: self.duration,
        })
    }
}

#[derive(Debug, Deserialize, Row)]
struct IdRow {
    match_id: String,
}

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn connect(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_matches = r#"
CREATE TABLE IF NOT EXISTS match_records (
    match_id String,
    puuid String,
    game_mode LowCardinality(String),
    queue_id Int64,
    duration Int64,
    game_start DateTime64(3),
    champion LowCardinality(String),
    team_position LowCardinality(String),
    team_id Int64,
    win Bool,
    kills Int64,
    deaths Int64,
    assists Int64,
    damage_to_champions Int64,
    damage_taken Int64,
    gold_earned Int64,
    minions_killed Int64,
    neutral_minions_killed Int64,
    vision_score Int64,
    wards_placed Int64,
    wards_killed Int64,
    turret_kills Int64,
    inhibitor_kills Int64,
    largest_multi_kill Int64,
    penta_kills Int64,
    first_blood Bool,
    team_dragons Int64,
    team_barons Int64,
    team_heralds Int64,
    team_towers Int64,
    team_inhibitors Int64,
    team_kills Int64,
    team_damage Int64,
    team_gold Int64,
    team_vision Int64
) ENGINE = ReplacingMergeTree
ORDER BY (puuid, match_id)
"#;
        self.client.query(create_matches).execute().await?;

        let create_summaries = r#"
CREATE TABLE IF NOT EXISTS timeline_summaries (
    match_id String,
    puuid String,
    early_dominance Float64,
    midgame_swing Float64,
    consistency Float64,
    spike_score Float64,
    throw_score Float64,
    roam_score Float64,
    level6_at Nullable(Int64),
    level11_at Nullable(Int64),
    level16_at Nullable(Int64),
    final_gold_diff Float64,
    kill_points_json String,
    dragon UInt32,
    baron UInt32,
    herald UInt32,
    tower UInt32,
    inhibitor UInt32,
    comeback LowCardinality(String),
    duration Int64
) ENGINE = ReplacingMergeTree
ORDER BY (puuid, match_id)
"#;
        self.client.query(create_summaries).execute().await?;
        info!(database = %self.database, "clickhouse schema ready");
        Ok(())
    }

    async fn ids_in(&self, table: &str, puuid: &str, match_ids: &[String]) -> Result<HashSet<String>, StoreError> {
        let query = format!(
            "SELECT match_id FROM {} FINAL WHERE puuid = ? AND has(?, match_id)",
            table
        );
        let rows = self
            .client
            .query(&query)
            .bind(puuid)
            .bind(match_ids)
            .fetch_all::<IdRow>()
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(|row| row.match_id).collect())
    }

    /// Keys already present, grouped per player so each lookup is one query.
    async fn present_keys<'a, I>(&self, table: &str, keys: I) -> Result<HashSet<(String, String)>, StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut by_player: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (puuid, match_id) in keys {
            by_player.entry(puuid).or_default().push(match_id.to_string());
        }
        let mut present = HashSet::new();
        for (puuid, match_ids) in by_player {
            for match_id in self.ids_in(table, puuid, &match_ids).await? {
                present.insert((puuid.to_string(), match_id));
            }
        }
        Ok(present)
    }
}

#[async_trait]
impl MatchRepository for ClickhouseRepo {
    async fn existing_match_ids(
        &self,
        puuid: &str,
        match_ids: &[String],
    ) -> Result<HashSet<String>, StoreError> {
        if match_ids.is_empty() {
            return Ok(HashSet::new());
        }
        self.ids_in("match_records", puuid, match_ids).await
    }

    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<usize, StoreError> {
        let mut seen = self
            .present_keys(
                "match_records",
                records.iter().map(|r| (r.puuid.as_str(), r.match_id.as_str())),
            )
            .await?;
        let fresh: Vec<&MatchRecord> = records
            .iter()
            .filter(|r| seen.insert((r.puuid.clone(), r.match_id.clone())))
            .collect();
        if fresh.is_empty() {
            return Ok(0);
        }
        let mut insert = self.client.insert("match_records").map_err(store_error)?;
        for record in &fresh {
            insert.write(&MatchRow::from(*record)).await.map_err(store_error)?;
        }
        insert.end().await.map_err(store_error)?;
        debug!(rows = fresh.len(), "inserted match rows");
        Ok(fresh.len())
    }

    async fn fetch_matches(&self, puuid: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let rows = self
            .client
            .query("SELECT ?fields FROM match_records FINAL WHERE puuid = ? ORDER BY game_start, match_id")
            .bind(puuid)
            .fetch_all::<MatchRow>()
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(MatchRecord::from).collect())
    }

    async fn latest_game_start(&self, puuid: &str) -> Result<Option<i64>, StoreError> {
        let (rows, latest) = self
            .client
            .query(
                "SELECT count(), toInt64(toUnixTimestamp64Milli(max(game_start))) FROM match_records FINAL WHERE puuid = ?",
            )
            .bind(puuid)
            .fetch_one::<(u64, i64)>()
            .await
            .map_err(store_error)?;
        Ok((rows > 0).then_some(latest))
    }
}

#[async_trait]
impl TimelineRepository for ClickhouseRepo {
    async fn summarized_match_ids(&self, puuid: &str) -> Result<HashSet<String>, StoreError> {
        let rows = self
            .client
            .query("SELECT match_id FROM timeline_summaries FINAL WHERE puuid = ?")
            .bind(puuid)
            .fetch_all::<IdRow>()
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(|row| row.match_id).collect())
    }

    async fn insert_summaries(&self, summaries: &[TimelineSummary]) -> Result<usize, StoreError> {
        let mut seen = self
            .present_keys(
                "timeline_summaries",
                summaries.iter().map(|s| (s.puuid.as_str(), s.match_id.as_str())),
            )
            .await?;
        let fresh: Vec<&TimelineSummary> = summaries
            .iter()
            .filter(|s| seen.insert((s.puuid.clone(), s.match_id.clone())))
            .collect();
        if fresh.is_empty() {
            return Ok(0);
        }
        let mut insert = self.client.insert("timeline_summaries").map_err(store_error)?;
        for summary in &fresh {
            insert
                .write(&TimelineRow::from_summary(summary)?)
                .await
                .map_err(store_error)?;
        }
        insert.end().await.map_err(store_error)?;
        Ok(fresh.len())
    }

    async fn fetch_summaries(&self, puuid: &str) -> Result<Vec<TimelineSummary>, StoreError> {
        let rows = self
            .client
            .query("SELECT ?fields FROM timeline_summaries FINAL WHERE puuid = ? ORDER BY match_id")
            .bind(puuid)
            .fetch_all::<TimelineRow>()
            .await
            .map_err(store_error)?;
        rows.into_iter().map(TimelineRow::into_summary).collect()
    }
}

/// Connection-level failures may succeed on retry; everything else will not.
fn store_error(err: clickhouse::error::Error) -> StoreError {
    match err {
        clickhouse::error::Error::Network(_) | clickhouse::error::Error::TimedOut => {
            StoreError::Transient(err.to_string())
        }
        other => StoreError::Fatal(other.to_string()),
    }
}
