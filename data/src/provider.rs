//! Collaborator contracts consumed by the engine
//!
//! The engine treats all three collaborators as opaque async seams. Calls are
//! awaited before resolution continues; implementations decide whether the
//! answer comes from memory, disk, or a remote service.

use crate::records::{BattleSnapshot, CombatantRecord, MoveRecord, SpeciesData};
use crate::DataError;

/// Static species and move data lookup
#[allow(async_fn_in_trait)]
pub trait StaticDataProvider {
    /// Resolve a species by identifier
    async fn species(&self, id: u32) -> Result<SpeciesData, DataError>;

    /// Resolve a move by name
    async fn move_record(&self, name: &str) -> Result<MoveRecord, DataError>;
}

/// Durable store for combatant records and battle snapshots
#[allow(async_fn_in_trait)]
pub trait PersistenceStore {
    /// Durably record a combatant (post-battle settlement, capture hand-off)
    async fn save_combatant(&self, record: CombatantRecord) -> Result<(), DataError>;

    /// Durably record a battle snapshot
    async fn save_snapshot(&self, snapshot: BattleSnapshot) -> Result<(), DataError>;
}

/// Moves that become learnable at a given level
#[allow(async_fn_in_trait)]
pub trait MoveAvailabilityProvider {
    /// Move names newly learnable by `species` exactly at `level`
    async fn moves_learned_at(&self, species: u32, level: u32) -> Result<Vec<String>, DataError>;
}

// Shared handles forward to the inner provider, so one fixture can back an
// engine and still be inspected by the caller.

impl<T: StaticDataProvider> StaticDataProvider for std::sync::Arc<T> {
    async fn species(&self, id: u32) -> Result<SpeciesData, DataError> {
        (**self).species(id).await
    }

    async fn move_record(&self, name: &str) -> Result<MoveRecord, DataError> {
        (**self).move_record(name).await
    }
}

impl<T: PersistenceStore> PersistenceStore for std::sync::Arc<T> {
    async fn save_combatant(&self, record: CombatantRecord) -> Result<(), DataError> {
        (**self).save_combatant(record).await
    }

    async fn save_snapshot(&self, snapshot: BattleSnapshot) -> Result<(), DataError> {
        (**self).save_snapshot(snapshot).await
    }
}

impl<T: MoveAvailabilityProvider> MoveAvailabilityProvider for std::sync::Arc<T> {
    async fn moves_learned_at(&self, species: u32, level: u32) -> Result<Vec<String>, DataError> {
        (**self).moves_learned_at(species, level).await
    }
}
