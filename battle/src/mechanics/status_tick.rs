//! Start-of-turn status processing

use crate::rng::BattleRng;
use crate::types::{Ailment, Combatant};

/// Outcome of a combatant's start-of-turn status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTick {
    /// Whether the combatant may act this turn
    pub can_act: bool,
    /// Residual damage applied during the tick
    pub damage: u32,
    pub message: Option<String>,
}

impl StatusTick {
    fn clear() -> Self {
        Self {
            can_act: true,
            damage: 0,
            message: None,
        }
    }
}

/// Apply a combatant's status condition at the start of its action
///
/// Residual damage is applied to the combatant here; counters decrement and
/// chance-based conditions roll their clear chance. The per-condition rules:
/// poison `max(1, max/8)` and burn `max(1, max/16)` damage but still act;
/// paralysis blocks 25% of turns; sleep blocks until its counter runs out;
/// freeze blocks with a 20% thaw chance per turn.
pub fn start_of_turn_tick(combatant: &mut Combatant, rng: &mut dyn BattleRng) -> StatusTick {
    let Some(condition) = combatant.status else {
        return StatusTick::clear();
    };

    match condition.ailment {
        Ailment::Poison => {
            let amount = residual(combatant.max_health(), 8);
            let dealt = combatant.apply_damage(amount);
            StatusTick {
                can_act: true,
                damage: dealt,
                message: Some(format!("{} is hurt by poison!", combatant.name)),
            }
        }
        Ailment::Burn => {
            let amount = residual(combatant.max_health(), 16);
            let dealt = combatant.apply_damage(amount);
            StatusTick {
                can_act: true,
                damage: dealt,
                message: Some(format!("{} is hurt by its burn!", combatant.name)),
            }
        }
        Ailment::Paralysis => {
            if rng.percent(25) {
                StatusTick {
                    can_act: false,
                    damage: 0,
                    message: Some(format!("{} is paralyzed! It can't move!", combatant.name)),
                }
            } else {
                StatusTick::clear()
            }
        }
        Ailment::Sleep => {
            let remaining = condition.turns_remaining.saturating_sub(1);
            if remaining == 0 {
                combatant.cure_status();
                StatusTick {
                    can_act: false,
                    damage: 0,
                    message: Some(format!("{} woke up!", combatant.name)),
                }
            } else {
                combatant.status = Some(crate::types::StatusCondition::new(
                    Ailment::Sleep,
                    remaining,
                ));
                StatusTick {
                    can_act: false,
                    damage: 0,
                    message: Some(format!("{} is fast asleep.", combatant.name)),
                }
            }
        }
        Ailment::Freeze => {
            if rng.percent(20) {
                combatant.cure_status();
                StatusTick {
                    can_act: true,
                    damage: 0,
                    message: Some(format!("{} thawed out!", combatant.name)),
                }
            } else {
                StatusTick {
                    can_act: false,
                    damage: 0,
                    message: Some(format!("{} is frozen solid!", combatant.name)),
                }
            }
        }
    }
}

/// `max(1, floor(max_health / divisor))`
fn residual(max_health: u32, divisor: u32) -> u32 {
    (max_health / divisor).max(1)
}
