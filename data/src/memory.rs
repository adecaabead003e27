//! In-memory reference providers
//!
//! `StaticTable` serves species/move/learnset data out of hash maps and can
//! be loaded from a JSON fixture; `MemoryStore` collects persisted records.
//! Both exist for tests and local fixtures, but they implement the same
//! contracts a real backing service would.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::provider::{MoveAvailabilityProvider, PersistenceStore, StaticDataProvider};
use crate::records::{BattleSnapshot, CombatantRecord, MoveRecord, SpeciesData};
use crate::DataError;

/// Hash-map-backed static data provider
#[derive(Debug, Default)]
pub struct StaticTable {
    species: HashMap<u32, SpeciesData>,
    moves: HashMap<String, MoveRecord>,
    /// (species, level) -> move names learned exactly at that level
    learnsets: HashMap<(u32, u32), Vec<String>>,
}

/// JSON fixture shape for [`StaticTable::from_json`]
#[derive(Debug, Deserialize)]
struct TableFixture {
    #[serde(default)]
    species: Vec<SpeciesData>,
    #[serde(default)]
    moves: Vec<MoveRecord>,
    #[serde(default)]
    learnsets: Vec<LearnsetEntry>,
}

#[derive(Debug, Deserialize)]
struct LearnsetEntry {
    species: u32,
    level: u32,
    moves: Vec<String>,
}

impl StaticTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON fixture string
    pub fn from_json(raw: &str) -> Result<Self> {
        let fixture: TableFixture =
            serde_json::from_str(raw).context("Failed to parse static data fixture")?;

        let mut table = Self::new();
        for species in fixture.species {
            table.insert_species(species);
        }
        for record in fixture.moves {
            table.insert_move(record);
        }
        for entry in fixture.learnsets {
            table.insert_learnset(entry.species, entry.level, entry.moves);
        }
        Ok(table)
    }

    /// Add or replace a species entry
    pub fn insert_species(&mut self, species: SpeciesData) {
        self.species.insert(species.id, species);
    }

    /// Add or replace a move entry (keyed case-insensitively)
    pub fn insert_move(&mut self, record: MoveRecord) {
        self.moves.insert(record.name.to_lowercase(), record);
    }

    /// Add or replace a learnset entry
    pub fn insert_learnset(&mut self, species: u32, level: u32, moves: Vec<String>) {
        self.learnsets.insert((species, level), moves);
    }

    /// Number of species entries
    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}

impl StaticDataProvider for StaticTable {
    async fn species(&self, id: u32) -> Result<SpeciesData, DataError> {
        self.species
            .get(&id)
            .cloned()
            .ok_or(DataError::UnknownSpecies(id))
    }

    async fn move_record(&self, name: &str) -> Result<MoveRecord, DataError> {
        self.moves
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| DataError::UnknownMove(name.to_string()))
    }
}

impl MoveAvailabilityProvider for StaticTable {
    async fn moves_learned_at(&self, species: u32, level: u32) -> Result<Vec<String>, DataError> {
        Ok(self
            .learnsets
            .get(&(species, level))
            .cloned()
            .unwrap_or_default())
    }
}

/// Persistence store that collects records in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    combatants: Mutex<Vec<CombatantRecord>>,
    snapshots: Mutex<Vec<BattleSnapshot>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All combatant records saved so far
    pub fn combatants(&self) -> Vec<CombatantRecord> {
        self.combatants.lock().expect("store lock poisoned").clone()
    }

    /// All snapshots saved so far
    pub fn snapshots(&self) -> Vec<BattleSnapshot> {
        self.snapshots.lock().expect("store lock poisoned").clone()
    }
}

impl PersistenceStore for MemoryStore {
    async fn save_combatant(&self, record: CombatantRecord) -> Result<(), DataError> {
        self.combatants
            .lock()
            .map_err(|_| DataError::Unavailable("store lock poisoned".to_string()))?
            .push(record);
        Ok(())
    }

    async fn save_snapshot(&self, snapshot: BattleSnapshot) -> Result<(), DataError> {
        self.snapshots
            .lock()
            .map_err(|_| DataError::Unavailable("store lock poisoned".to_string()))?
            .push(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_species(id: u32, name: &str) -> SpeciesData {
        SpeciesData {
            id,
            name: name.to_string(),
            base_hp: 45,
            base_attack: 49,
            base_defense: 49,
            base_special_attack: 65,
            base_special_defense: 65,
            base_speed: 45,
            elements: vec!["grass".to_string()],
            catch_rate: 45,
            base_experience: 64,
            sprite: None,
        }
    }

    #[tokio::test]
    async fn test_static_table_lookup() {
        let mut table = StaticTable::new();
        table.insert_species(sample_species(1, "Sproutling"));

        let found = table.species(1).await.unwrap();
        assert_eq!(found.name, "Sproutling");

        let missing = table.species(99).await;
        assert!(matches!(missing, Err(DataError::UnknownSpecies(99))));
    }

    #[tokio::test]
    async fn test_move_lookup_case_insensitive() {
        let mut table = StaticTable::new();
        table.insert_move(MoveRecord {
            name: "Vine Whip".to_string(),
            element: "grass".to_string(),
            category: "physical".to_string(),
            power: 45,
            accuracy: Some(100),
            priority: 0,
            power_points: 25,
        });

        assert!(table.move_record("vine whip").await.is_ok());
        assert!(table.move_record("Vine Whip").await.is_ok());
        assert!(matches!(
            table.move_record("splash").await,
            Err(DataError::UnknownMove(_))
        ));
    }

    #[tokio::test]
    async fn test_from_json_fixture() {
        let raw = r#"{
            "species": [{
                "id": 7,
                "name": "Dribble",
                "base_hp": 44, "base_attack": 48, "base_defense": 65,
                "base_special_attack": 50, "base_special_defense": 64, "base_speed": 43,
                "elements": ["water"],
                "catch_rate": 45,
                "base_experience": 63
            }],
            "moves": [{
                "name": "Bubble",
                "element": "water",
                "category": "special",
                "power": 40,
                "accuracy": 100,
                "power_points": 30
            }],
            "learnsets": [
                {"species": 7, "level": 7, "moves": ["Bubble"]}
            ]
        }"#;

        let table = StaticTable::from_json(raw).unwrap();
        assert_eq!(table.species_count(), 1);
        assert_eq!(table.move_record("bubble").await.unwrap().power, 40);
        assert_eq!(
            table.moves_learned_at(7, 7).await.unwrap(),
            vec!["Bubble".to_string()]
        );
        assert!(table.moves_learned_at(7, 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_collects() {
        let store = MemoryStore::new();
        store
            .save_snapshot(BattleSnapshot {
                session: 1,
                kind: "wild".to_string(),
                turn: 3,
                outcome: "player_won".to_string(),
                sides: vec![],
            })
            .await
            .unwrap();

        assert_eq!(store.snapshots().len(), 1);
        assert!(store.combatants().is_empty());
    }
}
