use std::collections::BTreeMap;

use crate::entities::{
    ChampionStats, CoreAverages, Highlight, Highlights, ImpactRatios, MatchRecord, MonthlyBucket,
    ProfileTotals, RoleStats, SeasonStats,
};
use crate::utils::{month_key, round_to, share};

/// Turns a player's persisted match set into season statistics.
///
/// Records are consumed in the order given; extremes keep the first record
/// reaching the extreme value.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    overall: RatioAccumulator,
    champions: BTreeMap<String, ChampionAccumulator>,
    roles: BTreeMap<String, OutcomeAccumulator>,
    game_modes: BTreeMap<String, u32>,
    monthly: BTreeMap<String, RatioAccumulator>,
    extremes: ExtremeTrackers,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate(records: &[MatchRecord]) -> SeasonStats {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.add(record);
        }
        aggregator.finalize()
    }

    pub fn add(&mut self, record: &MatchRecord) {
        self.overall.add(record);
        self.champions
            .entry(record.champion.clone())
            .or_default()
            .add(record);
        self.roles
            .entry(record.team_position.clone())
            .or_default()
            .add(record.win);
        *self.game_modes.entry(record.game_mode.clone()).or_default() += 1;
        self.monthly
            .entry(month_key(record.game_start))
            .or_default()
            .add(record);
        self.extremes.add(record);
    }

    pub fn finalize(self) -> SeasonStats {
        let total_games = self.overall.matches;

        let mut champions = self
            .champions
            .into_iter()
            .map(|(champion, acc)| acc.finalize(champion))
            .collect::<Vec<_>>();
        // BTreeMap order already sorts names; a stable sort keeps it within equal counts.
        champions.sort_by(|a, b| b.games.cmp(&a.games));
        let most_played_champion = champions.first().map(|c| c.champion.clone());

        let mut roles = self
            .roles
            .into_iter()
            .map(|(role, acc)| RoleStats {
                role,
                games: acc.games,
                wins: acc.wins,
                win_rate: percentage(acc.wins, acc.games),
                share: round_to(share(acc.games as i64, total_games as i64), 4),
            })
            .collect::<Vec<_>>();
        roles.sort_by(|a, b| b.games.cmp(&a.games));

        let monthly = self
            .monthly
            .into_iter()
            .map(|(month, acc)| MonthlyBucket {
                month,
                matches: acc.matches,
                wins: acc.wins,
                losses: acc.matches - acc.wins,
                kills: acc.kills,
                deaths: acc.deaths,
                assists: acc.assists,
                win_rate: percentage(acc.wins, acc.matches),
                averages: acc.averages(),
                impact: acc.impact(),
            })
            .collect();

        SeasonStats {
            totals: self.overall.totals(),
            averages: self.overall.averages(),
            impact: self.overall.impact(),
            most_played_champion,
            champions,
            roles,
            game_modes: self.game_modes,
            highlights: self.extremes.finalize(),
            monthly,
        }
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}

fn per_game(total: i64, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    round_to(total as f64 / games as f64, 2)
}

fn kda(kills: i64, deaths: i64, assists: i64) -> f64 {
    round_to((kills + assists) as f64 / deaths.max(1) as f64, 2)
}

/// Sums and per-match ratio sums for one slice of matches (season or month).
#[derive(Debug, Default)]
struct RatioAccumulator {
    matches: u32,
    wins: u32,
    kills: i64,
    deaths: i64,
    assists: i64,
    damage: i64,
    gold: i64,
    vision: i64,
    cs_per_min: f64,
    kill_participation: f64,
    damage_share: f64,
    gold_share: f64,
    vision_share: f64,
}

impl RatioAccumulator {
    fn add(&mut self, record: &MatchRecord) {
        self.matches += 1;
        if record.win {
            self.wins += 1;
        }
        self.kills += record.kills;
        self.deaths += record.deaths;
        self.assists += record.assists;
        self.damage += record.damage_to_champions;
        self.gold += record.gold_earned;
        self.vision += record.vision_score;

        let minutes = record.duration as f64 / 60.0;
        if minutes > 0.0 {
            self.cs_per_min += record.creep_score() as f64 / minutes;
        }
        self.kill_participation += share(record.kills + record.assists, record.team_kills);
        self.damage_share += share(record.damage_to_champions, record.team_damage);
        self.gold_share += share(record.gold_earned, record.team_gold);
        self.vision_share += share(record.vision_score, record.team_vision);
    }

    fn mean_ratio(&self, sum: f64) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        round_to(sum / self.matches as f64, 4)
    }

    fn totals(&self) -> ProfileTotals {
        ProfileTotals {
            matches: self.matches,
            wins: self.wins,
            losses: self.matches - self.wins,
            win_rate: percentage(self.wins, self.matches),
            kills: self.kills,
            deaths: self.deaths,
            assists: self.assists,
        }
    }

    fn averages(&self) -> CoreAverages {
        CoreAverages {
            kills: per_game(self.kills, self.matches),
            deaths: per_game(self.deaths, self.matches),
            assists: per_game(self.assists, self.matches),
            kda: kda(self.kills, self.deaths, self.assists),
            cs_per_min: if self.matches == 0 {
                0.0
            } else {
                round_to(self.cs_per_min / self.matches as f64, 2)
            },
            damage: per_game(self.damage, self.matches),
            gold: per_game(self.gold, self.matches),
            vision: per_game(self.vision, self.matches),
        }
    }

    fn impact(&self) -> ImpactRatios {
        ImpactRatios {
            kill_participation: self.mean_ratio(self.kill_participation),
            damage_share: self.mean_ratio(self.damage_share),
            gold_share: self.mean_ratio(self.gold_share),
            vision_share: self.mean_ratio(self.vision_share),
        }
    }
}

#[derive(Debug, Default)]
struct ChampionAccumulator {
    games: u32,
    wins: u32,
    kills: i64,
    deaths: i64,
    assists: i64,
}

impl ChampionAccumulator {
    fn add(&mut self, record: &MatchRecord) {
        self.games += 1;
        if record.win {
            self.wins += 1;
        }
        self.kills += record.kills;
        self.deaths += record.deaths;
        self.assists += record.assists;
    }

    fn finalize(self, champion: String) -> ChampionStats {
        ChampionStats {
            champion,
            games: self.games,
            wins: self.wins,
            win_rate: percentage(self.wins, self.games),
            kda: kda(self.kills, self.deaths, self.assists),
        }
    }
}

#[derive(Debug, Default)]
struct OutcomeAccumulator {
    games: u32,
    wins: u32,
}

impl OutcomeAccumulator {
    fn add(&mut self, win: bool) {
        self.games += 1;
        if win {
            self.wins += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// Keeps the first record whose field reaches the extreme value.
#[derive(Debug)]
struct ExtremeTracker {
    extreme: Extreme,
    best: Option<Highlight>,
}

impl ExtremeTracker {
    fn new(extreme: Extreme) -> Self {
        Self { extreme, best: None }
    }

    fn offer(&mut self, record: &MatchRecord, value: f64) {
        let replace = match (&self.best, self.extreme) {
            (None, _) => true,
            (Some(best), Extreme::Max) => value > best.value,
            (Some(best), Extreme::Min) => value < best.value,
        };
        if replace {
            self.best = Some(Highlight {
                match_id: record.match_id.clone(),
                champion: record.champion.clone(),
                game_start: record.game_start,
                value,
            });
        }
    }
}

#[derive(Debug)]
struct ExtremeTrackers {
    most_kills: ExtremeTracker,
    most_deaths: ExtremeTracker,
    most_damage: ExtremeTracker,
    most_gold: ExtremeTracker,
    best_vision: ExtremeTracker,
    most_cs: ExtremeTracker,
    longest_game: ExtremeTracker,
    shortest_game: ExtremeTracker,
}

impl Default for ExtremeTrackers {
    fn default() -> Self {
        Self {
            most_kills: ExtremeTracker::new(Extreme::Max),
            most_deaths: ExtremeTracker::new(Extreme::Max),
            most_damage: ExtremeTracker::new(Extreme::Max),
            most_gold: ExtremeTracker::new(Extreme::Max),
            best_vision: ExtremeTracker::new(Extreme::Max),
            most_cs: ExtremeTracker::new(Extreme::Max),
            longest_game: ExtremeTracker::new(Extreme::Max),
            shortest_game: ExtremeTracker::new(Extreme::Min),
        }
    }
}

impl ExtremeTrackers {
    fn add(&mut self, record: &MatchRecord) {
        self.most_kills.offer(record, record.kills as f64);
        self.most_deaths.offer(record, record.deaths as f64);
        self.most_damage.offer(record, record.damage_to_champions as f64);
        self.most_gold.offer(record, record.gold_earned as f64);
        self.best_vision.offer(record, record.vision_score as f64);
        self.most_cs.offer(record, record.creep_score() as f64);
        self.longest_game.offer(record, record.duration as f64);
        self.shortest_game.offer(record, record.duration as f64);
    }

    fn finalize(self) -> Highlights {
        Highlights {
            most_kills: self.most_kills.best,
            most_deaths: self.most_deaths.best,
            most_damage: self.most_damage.best,
            most_gold: self.most_gold.best,
            best_vision: self.best_vision.best,
            most_cs: self.most_cs.best,
            longest_game: self.longest_game.best,
            shortest_game: self.shortest_game.best,
        }
    }
}
