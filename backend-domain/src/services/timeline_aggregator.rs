use crate::entities::{
    ComebackCounts, Heatmap, MilestoneAverages, PlaystyleLabels, TimelineAverages, TimelineSeason,
    TimelineSummary,
};
use crate::utils::round_to;

const RISK_MARGIN: f64 = 1.25;

/// Running sums for the season timeline rollup.
#[derive(Debug, Default)]
pub struct TimelineAggregator {
    matches: u32,
    early_dominance: f64,
    midgame_swing: f64,
    consistency: f64,
    spike: f64,
    throw: f64,
    roam: f64,
    spike_magnitude: f64,
    throw_magnitude: f64,
    milestones: [MilestoneSum; 3],
    comeback: ComebackCounts,
    heatmap: Heatmap,
}

#[derive(Debug, Default, Clone, Copy)]
struct MilestoneSum {
    total: f64,
    count: u32,
}

impl MilestoneSum {
    fn add(&mut self, at: Option<i64>) {
        if let Some(at) = at {
            self.total += at as f64;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| round_to(self.total / self.count as f64, 2))
    }
}

impl TimelineAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate(summaries: &[TimelineSummary]) -> TimelineSeason {
        let mut aggregator = Self::new();
        for summary in summaries {
            aggregator.add(summary);
        }
        aggregator.finalize()
    }

    pub fn add(&mut self, summary: &TimelineSummary) {
        self.matches += 1;
        self.early_dominance += summary.early_dominance;
        self.midgame_swing += summary.midgame_swing;
        self.consistency += summary.consistency;
        self.spike += summary.spike_score;
        self.throw += summary.throw_score;
        self.roam += summary.roam_score;
        self.spike_magnitude += summary.spike_score.abs();
        self.throw_magnitude += summary.throw_score.abs();

        self.milestones[0].add(summary.level6_at);
        self.milestones[1].add(summary.level11_at);
        self.milestones[2].add(summary.level16_at);

        self.comeback.record(summary.comeback);
        self.heatmap
            .kill_points
            .extend(summary.kill_points.iter().copied());
        self.heatmap.objectives.merge(&summary.objectives);
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        sum / self.matches as f64
    }

    pub fn finalize(self) -> TimelineSeason {
        let averages = TimelineAverages {
            early_dominance: round_to(self.mean(self.early_dominance), 2),
            midgame_swing: round_to(self.mean(self.midgame_swing), 2),
            consistency: round_to(self.mean(self.consistency), 2),
            spike: round_to(self.mean(self.spike), 2),
            throw: round_to(self.mean(self.throw), 2),
            roam: round_to(self.mean(self.roam), 2),
        };
        let playstyle = PlaystyleLabels {
            early_game: early_game_label(averages.early_dominance).to_string(),
            consistency: consistency_label(averages.consistency).to_string(),
            roaming: roaming_label(averages.roam).to_string(),
            risk_profile: risk_label(
                self.mean(self.spike_magnitude),
                self.mean(self.throw_magnitude),
            )
            .to_string(),
        };

        TimelineSeason {
            matches_analyzed: self.matches,
            milestones: MilestoneAverages {
                level6_at: self.milestones[0].mean(),
                level11_at: self.milestones[1].mean(),
                level16_at: self.milestones[2].mean(),
            },
            averages,
            playstyle,
            comeback_patterns: self.comeback,
            heatmap: self.heatmap,
        }
    }
}

pub fn early_game_label(early_dominance: f64) -> &'static str {
    if early_dominance > 100.0 {
        "strong"
    } else if early_dominance < -100.0 {
        "weak"
    } else {
        "neutral"
    }
}

pub fn consistency_label(consistency: f64) -> &'static str {
    if consistency > 70.0 {
        "stable"
    } else if consistency < 40.0 {
        "coinflip"
    } else {
        "moderate"
    }
}

pub fn roaming_label(roam: f64) -> &'static str {
    if roam > 3.5 {
        "heavy"
    } else if roam < 1.5 {
        "anchored"
    } else {
        "moderate"
    }
}

/// Compares mean spike magnitude against mean throw magnitude.
pub fn risk_label(spike_magnitude: f64, throw_magnitude: f64) -> &'static str {
    if spike_magnitude > throw_magnitude * RISK_MARGIN {
        "explosive"
    } else if throw_magnitude > spike_magnitude * RISK_MARGIN {
        "volatile"
    } else {
        "balanced"
    }
}
