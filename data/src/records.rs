//! Plain records crossing the engine boundary

use serde::{Deserialize, Serialize};

/// Six stat-keyed values in party order: hp, atk, def, spa, spd, spe
pub type StatSpread = [u8; 6];

/// Static species data from the data provider
///
/// The sprite reference is carried for completeness; the engine ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: u32,
    pub name: String,
    pub base_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_special_attack: u32,
    pub base_special_defense: u32,
    pub base_speed: u32,
    /// Element names (1-2), resolved by the battle crate
    pub elements: Vec<String>,
    pub catch_rate: u32,
    pub base_experience: u32,
    #[serde(default)]
    pub sprite: Option<String>,
}

/// Static move data from the data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub name: String,
    pub element: String,
    /// "physical", "special", or "status"
    pub category: String,
    /// 0 for status moves
    pub power: u32,
    /// Accuracy percentage; `None` means the move never misses
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub priority: i32,
    pub power_points: u32,
}

/// Persisted form of an owned combatant
///
/// Level is not stored for owned combatants; it is derived from the
/// experience counter by the battle crate's leveling curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub species: u32,
    pub name: String,
    pub experience: u32,
    /// `None` restores the combatant at full health
    #[serde(default)]
    pub current_health: Option<u32>,
    pub ivs: StatSpread,
    pub evs: StatSpread,
    pub temperament: String,
    /// Move names, resolved against the static data provider
    pub moves: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub held_item: Option<String>,
    /// Original trainer; differs from the current owner for traded creatures
    #[serde(default)]
    pub original_trainer: Option<String>,
}

/// Durable record of a finished (or in-flight) battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub session: u64,
    pub kind: String,
    pub turn: u32,
    pub outcome: String,
    pub sides: Vec<SideSnapshot>,
}

/// One side of a battle snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSnapshot {
    pub combatants: Vec<CombatantSnapshot>,
}

/// Per-combatant state captured in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub species: u32,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub current_health: u32,
    pub max_health: u32,
}
