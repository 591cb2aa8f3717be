// Routing cluster value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream regional partition a player's match history lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingCluster {
    Americas,
    Europe,
    Asia,
    Sea,
}

const AMERICAS_PREFIXES: [&str; 3] = ["na", "br", "la"];
const EUROPE_PREFIXES: [&str; 5] = ["euw", "eun", "tr", "ru", "me"];
const ASIA_PREFIXES: [&str; 2] = ["kr", "jp"];
const SEA_PREFIXES: [&str; 6] = ["oc", "ph", "sg", "th", "tw", "vn"];

impl RoutingCluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingCluster::Americas => "americas",
            RoutingCluster::Europe => "europe",
            RoutingCluster::Asia => "asia",
            RoutingCluster::Sea => "sea",
        }
    }

    /// Maps an active-region string (`na1`, `EUW1`, `kr`, ...) to its cluster.
    /// Unknown regions fall back to the first cluster.
    pub fn from_region(region: &str) -> Self {
        let region = region.trim().to_lowercase();
        let matches = |prefixes: &[&str]| prefixes.iter().any(|p| region.starts_with(p));
        if matches(&EUROPE_PREFIXES) {
            RoutingCluster::Europe
        } else if matches(&ASIA_PREFIXES) {
            RoutingCluster::Asia
        } else if matches(&SEA_PREFIXES) {
            RoutingCluster::Sea
        } else if matches(&AMERICAS_PREFIXES) {
            RoutingCluster::Americas
        } else {
            RoutingCluster::default()
        }
    }
}

impl Default for RoutingCluster {
    fn default() -> Self {
        RoutingCluster::Americas
    }
}

impl fmt::Display for RoutingCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoutingCluster {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "americas" => RoutingCluster::Americas,
            "europe" => RoutingCluster::Europe,
            "asia" => RoutingCluster::Asia,
            "sea" => RoutingCluster::Sea,
            _ => RoutingCluster::default(),
        }
    }
}
