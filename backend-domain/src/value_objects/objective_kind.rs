// Objective kind value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    Dragon,
    Baron,
    Herald,
    Tower,
    Inhibitor,
}

impl ObjectiveKind {
    /// `monsterType` of an `ELITE_MONSTER_KILL` event.
    pub fn from_monster_type(monster_type: &str) -> Option<Self> {
        match monster_type.trim().to_uppercase().as_str() {
            "DRAGON" => Some(ObjectiveKind::Dragon),
            "BARON_NASHOR" => Some(ObjectiveKind::Baron),
            "RIFTHERALD" => Some(ObjectiveKind::Herald),
            _ => None,
        }
    }

    /// `buildingType` of a `BUILDING_KILL` event.
    pub fn from_building_type(building_type: &str) -> Option<Self> {
        match building_type.trim().to_uppercase().as_str() {
            "TOWER_BUILDING" => Some(ObjectiveKind::Tower),
            "INHIBITOR_BUILDING" => Some(ObjectiveKind::Inhibitor),
            _ => None,
        }
    }
}
