//! Status conditions and their turn bookkeeping

use serde::{Deserialize, Serialize};

/// Status-condition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ailment {
    Poison,
    Burn,
    Paralysis,
    Sleep,
    Freeze,
}

impl Ailment {
    /// Parse from a persisted name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "poison" | "poisoned" => Some(Ailment::Poison),
            "burn" | "burned" => Some(Ailment::Burn),
            "paralysis" | "paralyzed" => Some(Ailment::Paralysis),
            "sleep" | "asleep" => Some(Ailment::Sleep),
            "freeze" | "frozen" => Some(Ailment::Freeze),
            _ => None,
        }
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Ailment::Poison => "Poison",
            Ailment::Burn => "Burn",
            Ailment::Paralysis => "Paralysis",
            Ailment::Sleep => "Sleep",
            Ailment::Freeze => "Freeze",
        }
    }
}

impl std::fmt::Display for Ailment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An active status condition on a combatant
///
/// `turns_remaining` only counts down for sleep; the other ailments persist
/// until cured or cleared by their own chance roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub ailment: Ailment,
    pub turns_remaining: u32,
}

impl StatusCondition {
    /// Sleep lasts between 1 and 3 turns, drawn once at infliction
    pub const SLEEP_TURNS_MIN: u32 = 1;
    pub const SLEEP_TURNS_MAX: u32 = 3;

    /// Build a condition with an explicit sleep counter
    pub fn new(ailment: Ailment, turns_remaining: u32) -> Self {
        Self {
            ailment,
            turns_remaining,
        }
    }

    /// Restore a condition from its persisted name
    ///
    /// A persisted sleep loses its counter; it is restored at the midpoint
    /// of the infliction range.
    pub fn from_name(s: &str) -> Option<Self> {
        let ailment = Ailment::from_name(s)?;
        let turns = match ailment {
            Ailment::Sleep => 2,
            _ => 0,
        };
        Some(Self::new(ailment, turns))
    }
}

impl std::fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ailment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ailment_from_name() {
        assert_eq!(Ailment::from_name("poison"), Some(Ailment::Poison));
        assert_eq!(Ailment::from_name("Poisoned"), Some(Ailment::Poison));
        assert_eq!(Ailment::from_name("FROZEN"), Some(Ailment::Freeze));
        assert_eq!(Ailment::from_name("asleep"), Some(Ailment::Sleep));
        assert_eq!(Ailment::from_name("cursed"), None);
    }

    #[test]
    fn test_condition_from_name_sleep_counter() {
        let sleep = StatusCondition::from_name("sleep").unwrap();
        assert_eq!(sleep.ailment, Ailment::Sleep);
        assert!(sleep.turns_remaining >= StatusCondition::SLEEP_TURNS_MIN);
        assert!(sleep.turns_remaining <= StatusCondition::SLEEP_TURNS_MAX);

        let burn = StatusCondition::from_name("burn").unwrap();
        assert_eq!(burn.turns_remaining, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ailment::Paralysis.to_string(), "Paralysis");
        assert_eq!(
            StatusCondition::new(Ailment::Burn, 0).to_string(),
            "Burn"
        );
    }
}
