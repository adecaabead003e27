//! Boundary records and collaborator contracts for the totem battle engine.
//!
//! This crate is the lowest layer of the workspace:
//!
//! ```text
//! totem-data (records + provider contracts) ← THIS CRATE
//!        │
//!        ▼
//! totem-battle (domain types + combat core)
//!        │
//!        ▼
//! totem-engine (async session manager)
//! ```
//!
//! Everything that crosses the engine boundary is a plain serde record
//! defined here: species and move static data, persisted combatant records,
//! and battle snapshots. The engine's external collaborators (static-data
//! lookup, durable persistence, move availability) are the async traits in
//! [`provider`]; [`memory`] holds the in-memory reference implementations
//! used by tests and fixtures.

use thiserror::Error;

pub mod memory;
pub mod provider;
pub mod records;

pub use memory::{MemoryStore, StaticTable};
pub use provider::{MoveAvailabilityProvider, PersistenceStore, StaticDataProvider};
pub use records::{
    BattleSnapshot, CombatantRecord, CombatantSnapshot, MoveRecord, SideSnapshot, SpeciesData,
    StatSpread,
};

/// Failures surfaced by the data collaborators
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unknown species: {0}")]
    UnknownSpecies(u32),

    #[error("Unknown move: {0}")]
    UnknownMove(String),

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}
