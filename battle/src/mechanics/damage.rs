//! The damage formula

use crate::rng::BattleRng;
use crate::types::{BattleMove, Combatant, MoveCategory};

/// Critical hits land 6.25% of the time and double damage
const CRITICAL_CHANCE: f64 = 0.0625;
const CRITICAL_MULTIPLIER: f64 = 2.0;
/// Same-element attack bonus
const STAB_MULTIPLIER: f64 = 1.5;

/// One computed hit, with the terms a log line needs
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOutcome {
    pub amount: u32,
    pub critical: bool,
    /// Effectiveness multiplier against the defender's elements
    pub effectiveness: f64,
    pub stab: bool,
}

/// Compute damage for a hit with `power > 0`
///
/// `base = floor(((2*level/5 + 2) * power * attack / defense) / 50) + 2`,
/// then same-element bonus, effectiveness, critical, and the random spread
/// multiply in. The result never drops below 1, even at 0x effectiveness.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    battle_move: &BattleMove,
    rng: &mut dyn BattleRng,
) -> DamageOutcome {
    let (attack, defense) = match battle_move.category {
        MoveCategory::Special => (attacker.stats.special_attack, defender.stats.special_defense),
        // Status moves never reach here; physical selection is the fallback
        _ => (attacker.stats.attack, defender.stats.defense),
    };
    let defense = defense.max(1);

    let base = ((2 * attacker.level / 5 + 2) * battle_move.power * attack / defense) / 50 + 2;

    let stab = battle_move
        .element
        .is_some_and(|element| attacker.has_element(element));
    let effectiveness = battle_move
        .element
        .map(|element| element.against_all(&defender.elements))
        .unwrap_or(1.0);
    let critical = rng.fraction() < CRITICAL_CHANCE;

    let mut modifiers = rng.damage_spread() * effectiveness;
    if stab {
        modifiers *= STAB_MULTIPLIER;
    }
    if critical {
        modifiers *= CRITICAL_MULTIPLIER;
    }

    let amount = ((base as f64 * modifiers).floor() as u32).max(1);

    DamageOutcome {
        amount,
        critical,
        effectiveness,
        stab,
    }
}
