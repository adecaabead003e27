//! Combatant state

use totem_data::{CombatantRecord, SpeciesData};

use crate::mechanics::experience::{experience_threshold, level_from_experience};
use crate::rng::BattleRng;

use super::element::Element;
use super::moves::BattleMove;
use super::stats::{compute_stats, BaseStats, ComputedStats, Evs, Ivs, Temperament};
use super::status::{Ailment, StatusCondition};

/// Items a combatant can hold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeldItem {
    /// Boosts experience gains
    ExpCharm,
    /// Anything the engine has no behavior for
    Other(String),
}

impl HeldItem {
    /// Parse from a persisted item name
    pub fn from_name(s: &str) -> Self {
        let normalized = s.to_lowercase().replace([' ', '-', '_'], "");
        match normalized.as_str() {
            "expcharm" => HeldItem::ExpCharm,
            _ => HeldItem::Other(s.to_string()),
        }
    }

    /// Whether this item boosts experience gains
    pub fn boosts_experience(&self) -> bool {
        matches!(self, HeldItem::ExpCharm)
    }

    /// Display name
    pub fn as_str(&self) -> &str {
        match self {
            HeldItem::ExpCharm => "Exp. Charm",
            HeldItem::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for HeldItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One creature instance participating in a battle
///
/// Invariant: `current_health` is always in `[0, max_health]`; a combatant
/// at 0 health is fainted and cannot act, attack, or be switched in.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub species: u32,
    pub name: String,
    /// Experience-derived for owned combatants, level-authoritative otherwise
    pub level: u32,
    pub experience: u32,
    pub current_health: u32,
    pub stats: ComputedStats,
    pub base: BaseStats,
    pub ivs: Ivs,
    pub evs: Evs,
    pub temperament: Temperament,
    /// 1-2 elements; empty means unknown and resolves neutral
    pub elements: Vec<Element>,
    pub moves: Vec<BattleMove>,
    pub status: Option<StatusCondition>,
    /// Current owner; `None` for wild and scripted-opponent combatants
    pub owner: Option<String>,
    pub original_trainer: Option<String>,
    pub held_item: Option<HeldItem>,
    pub catch_rate: u32,
    pub base_experience: u32,
}

impl Combatant {
    /// Rebuild an owned combatant from its persisted record
    ///
    /// Level is derived from the experience counter, never read from the
    /// record.
    pub fn from_record(
        record: &CombatantRecord,
        species: &SpeciesData,
        moves: Vec<BattleMove>,
        owner: &str,
    ) -> Self {
        let base = BaseStats::from_species(species);
        let ivs = Ivs::from_spread(record.ivs);
        let evs = Evs::from_spread(record.evs);
        let temperament =
            Temperament::from_name(&record.temperament).unwrap_or(Temperament::Hardy);
        let level = level_from_experience(record.experience);
        let stats = compute_stats(&base, level, &ivs, &evs, temperament);
        let current_health = record
            .current_health
            .unwrap_or(stats.max_health)
            .min(stats.max_health);

        Self {
            species: species.id,
            name: record.name.clone(),
            level,
            experience: record.experience,
            current_health,
            stats,
            base,
            ivs,
            evs,
            temperament,
            elements: parse_elements(&species.elements),
            moves,
            status: record
                .status
                .as_deref()
                .and_then(StatusCondition::from_name),
            owner: Some(owner.to_string()),
            original_trainer: record.original_trainer.clone(),
            held_item: record.held_item.as_deref().map(HeldItem::from_name),
            catch_rate: species.catch_rate,
            base_experience: species.base_experience,
        }
    }

    /// Generate an unowned combatant (wild encounter or scripted roster member)
    ///
    /// Level is authoritative; modifiers and temperament are drawn from the
    /// battle RNG, effort modifiers are zero.
    pub fn unowned(
        species: &SpeciesData,
        level: u32,
        moves: Vec<BattleMove>,
        rng: &mut dyn BattleRng,
    ) -> Self {
        let base = BaseStats::from_species(species);
        let ivs = Ivs::from_spread([
            rng.roll(Ivs::MAX as u32 + 1) as u8,
            rng.roll(Ivs::MAX as u32 + 1) as u8,
            rng.roll(Ivs::MAX as u32 + 1) as u8,
            rng.roll(Ivs::MAX as u32 + 1) as u8,
            rng.roll(Ivs::MAX as u32 + 1) as u8,
            rng.roll(Ivs::MAX as u32 + 1) as u8,
        ]);
        let evs = Evs::default();
        let temperament = Temperament::ALL[rng.roll(Temperament::ALL.len() as u32) as usize];
        let level = level.clamp(1, 100);
        let stats = compute_stats(&base, level, &ivs, &evs, temperament);

        Self {
            species: species.id,
            name: species.name.clone(),
            level,
            experience: experience_threshold(level).max(0) as u32,
            current_health: stats.max_health,
            stats,
            base,
            ivs,
            evs,
            temperament,
            elements: parse_elements(&species.elements),
            moves,
            status: None,
            owner: None,
            original_trainer: None,
            held_item: None,
            catch_rate: species.catch_rate,
            base_experience: species.base_experience,
        }
    }

    /// Persisted record form (capture hand-off, post-battle settlement)
    pub fn to_record(&self) -> CombatantRecord {
        CombatantRecord {
            species: self.species,
            name: self.name.clone(),
            experience: self.experience,
            current_health: Some(self.current_health),
            ivs: self.ivs.to_spread(),
            evs: self.evs.to_spread(),
            temperament: self.temperament.as_str().to_string(),
            moves: self.moves.iter().map(|m| m.name.clone()).collect(),
            status: self.status.map(|s| s.ailment.as_str().to_string()),
            held_item: self.held_item.as_ref().map(|i| i.as_str().to_string()),
            original_trainer: self.original_trainer.clone(),
        }
    }

    /// Maximum health from the computed stat block
    pub fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    /// Whether this combatant has fainted
    pub fn is_fainted(&self) -> bool {
        self.current_health == 0
    }

    /// Whether this combatant can still fight
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Whether the combatant has an element (for the same-element bonus)
    pub fn has_element(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    /// Apply damage, flooring health at zero; returns the amount actually dealt
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_health);
        self.current_health -= dealt;
        dealt
    }

    /// Restore health, capped at max health
    pub fn heal(&mut self, amount: u32) {
        self.current_health = (self.current_health + amount).min(self.stats.max_health);
    }

    /// Try to inflict a status condition
    ///
    /// Fails silently when a condition is already present (no stacking).
    /// Sleep draws its turn counter here, once, from the battle RNG.
    pub fn try_inflict(&mut self, ailment: Ailment, rng: &mut dyn BattleRng) -> bool {
        if self.status.is_some() {
            return false;
        }
        let turns = match ailment {
            Ailment::Sleep => {
                StatusCondition::SLEEP_TURNS_MIN
                    + rng.roll(
                        StatusCondition::SLEEP_TURNS_MAX - StatusCondition::SLEEP_TURNS_MIN + 1,
                    )
            }
            _ => 0,
        };
        self.status = Some(StatusCondition::new(ailment, turns));
        true
    }

    /// Clear any status condition
    pub fn cure_status(&mut self) {
        self.status = None;
    }

    /// Recompute stats for a new level, growing current health by the same
    /// delta as max health
    pub fn apply_level_up(&mut self, new_level: u32) {
        let previous_max = self.stats.max_health;
        self.level = new_level.clamp(1, 100);
        self.stats = compute_stats(&self.base, self.level, &self.ivs, &self.evs, self.temperament);
        let gained = self.stats.max_health.saturating_sub(previous_max);
        self.current_health = (self.current_health + gained).min(self.stats.max_health);
    }

    /// Whether the moveset has an open slot
    pub fn has_open_move_slot(&self) -> bool {
        self.moves.len() < 4
    }

    /// Whether this combatant was traded away from its original trainer
    pub fn is_traded(&self) -> bool {
        match (&self.original_trainer, &self.owner) {
            (Some(original), Some(owner)) => original != owner,
            _ => false,
        }
    }
}

fn parse_elements(names: &[String]) -> Vec<Element> {
    names.iter().filter_map(|n| Element::from_name(n)).collect()
}
