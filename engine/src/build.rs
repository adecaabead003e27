//! Roster construction against the static data provider
//!
//! Lookups degrade to documented defaults where the battle can still make
//! sense (missing species fall back to the default stat block with no
//! elements, missing moves to the built-in fallback move); only an
//! unavailable data source aborts battle creation.

use totem_battle::{BattleMove, BattleRng, Combatant};
use totem_data::{CombatantRecord, DataError, SpeciesData, StaticDataProvider};

use crate::EngineError;

/// Species stand-in when the provider does not know the identifier
fn fallback_species(id: u32) -> SpeciesData {
    SpeciesData {
        id,
        name: format!("Unknown #{id}"),
        base_hp: 45,
        base_attack: 49,
        base_defense: 49,
        base_special_attack: 65,
        base_special_defense: 65,
        base_speed: 45,
        // No elements: neutral on both offense and defense
        elements: Vec::new(),
        catch_rate: 45,
        base_experience: 64,
        sprite: None,
    }
}

/// Resolve a species, degrading unknown identifiers to the fallback
pub(crate) async fn species_or_default<D: StaticDataProvider>(
    data: &D,
    id: u32,
) -> Result<SpeciesData, EngineError> {
    match data.species(id).await {
        Ok(species) => Ok(species),
        Err(DataError::UnknownSpecies(_)) => Ok(fallback_species(id)),
        Err(err) => Err(EngineError::ExternalDataUnavailable(err)),
    }
}

/// Resolve a moveset, degrading unknown names to the fallback move
///
/// A combatant always enters battle with at least one move.
pub(crate) async fn resolve_moves<D: StaticDataProvider>(
    data: &D,
    names: &[String],
) -> Result<Vec<BattleMove>, EngineError> {
    let mut moves = Vec::with_capacity(names.len().max(1));
    for name in names.iter().take(4) {
        match data.move_record(name).await {
            Ok(record) => moves.push(BattleMove::from_record(&record)),
            Err(DataError::UnknownMove(_)) => moves.push(BattleMove::fallback()),
            Err(err) => return Err(EngineError::ExternalDataUnavailable(err)),
        }
    }
    if moves.is_empty() {
        moves.push(BattleMove::fallback());
    }
    Ok(moves)
}

/// Rebuild a player's team from persisted records
pub(crate) async fn build_player_team<D: StaticDataProvider>(
    data: &D,
    records: &[CombatantRecord],
    owner: &str,
) -> Result<Vec<Combatant>, EngineError> {
    let mut team = Vec::with_capacity(records.len());
    for record in records.iter().take(6) {
        let species = species_or_default(data, record.species).await?;
        let moves = resolve_moves(data, &record.moves).await?;
        team.push(Combatant::from_record(record, &species, moves, owner));
    }
    Ok(team)
}

/// Generate one unowned combatant for the opposing side
pub(crate) async fn build_unowned<D: StaticDataProvider>(
    data: &D,
    species_id: u32,
    level: u32,
    move_names: &[String],
    rng: &mut dyn BattleRng,
) -> Result<Combatant, EngineError> {
    let species = species_or_default(data, species_id).await?;
    let moves = resolve_moves(data, move_names).await?;
    Ok(Combatant::unowned(&species, level, moves, rng))
}
