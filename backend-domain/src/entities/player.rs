// Player entity
// Resolved once per request, never cached across requests

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{PlayerId, RoutingCluster};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiotHandle {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotHandle {
    pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
        }
    }
}

impl fmt::Display for RiotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(flatten)]
    pub handle: RiotHandle,
    pub puuid: PlayerId,
    pub cluster: RoutingCluster,
}

impl Player {
    pub fn puuid(&self) -> &str {
        self.puuid.as_str()
    }
}
