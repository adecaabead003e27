//! Base and computed stat blocks, temperaments, and the stat formulas

use totem_data::SpeciesData;

/// The six combat stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    Health,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKey {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Health => "Health",
            StatKey::Attack => "Attack",
            StatKey::Defense => "Defense",
            StatKey::SpecialAttack => "Special Attack",
            StatKey::SpecialDefense => "Special Defense",
            StatKey::Speed => "Speed",
        }
    }
}

impl std::fmt::Display for StatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Species stat constants
///
/// Deliberately a different type from [`ComputedStats`]: base values never
/// appear where battle-ready values are expected, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    /// Extract base stats from a species record
    pub fn from_species(species: &SpeciesData) -> Self {
        Self {
            hp: species.base_hp,
            attack: species.base_attack,
            defense: species.base_defense,
            special_attack: species.base_special_attack,
            special_defense: species.base_special_defense,
            speed: species.base_speed,
        }
    }
}

impl Default for BaseStats {
    /// Documented fallback when species data is missing
    fn default() -> Self {
        Self {
            hp: 45,
            attack: 49,
            defense: 49,
            special_attack: 65,
            special_defense: 65,
            speed: 45,
        }
    }
}

/// Individual modifiers, one per stat, each in [0, 31]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ivs {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special_attack: u8,
    pub special_defense: u8,
    pub speed: u8,
}

impl Ivs {
    pub const MAX: u8 = 31;

    /// Build from a persisted spread (hp, atk, def, spa, spd, spe), clamping
    /// each value into range
    pub fn from_spread(spread: [u8; 6]) -> Self {
        Self {
            hp: spread[0].min(Self::MAX),
            attack: spread[1].min(Self::MAX),
            defense: spread[2].min(Self::MAX),
            special_attack: spread[3].min(Self::MAX),
            special_defense: spread[4].min(Self::MAX),
            speed: spread[5].min(Self::MAX),
        }
    }

    /// Persisted spread form
    pub fn to_spread(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }
}

/// Effort modifiers, one per stat, each in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evs {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special_attack: u8,
    pub special_defense: u8,
    pub speed: u8,
}

impl Evs {
    /// Build from a persisted spread (hp, atk, def, spa, spd, spe)
    pub fn from_spread(spread: [u8; 6]) -> Self {
        Self {
            hp: spread[0],
            attack: spread[1],
            defense: spread[2],
            special_attack: spread[3],
            special_defense: spread[4],
            speed: spread[5],
        }
    }

    /// Persisted spread form
    pub fn to_spread(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }
}

/// The 25 temperaments
///
/// Each boosts one non-health stat by 10% and reduces one by 10%; the five
/// neutral entries boost and reduce the same stat for a net 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temperament {
    Hardy,
    Lonely,
    Adamant,
    Naughty,
    Brave,
    Bold,
    Docile,
    Impish,
    Lax,
    Relaxed,
    Modest,
    Mild,
    Bashful,
    Rash,
    Quiet,
    Calm,
    Gentle,
    Careful,
    Quirky,
    Sassy,
    Timid,
    Hasty,
    Jolly,
    Naive,
    Serious,
}

impl Temperament {
    /// All 25 temperaments
    #[rustfmt::skip]
    pub const ALL: [Temperament; 25] = [
        Temperament::Hardy, Temperament::Lonely, Temperament::Adamant, Temperament::Naughty, Temperament::Brave,
        Temperament::Bold, Temperament::Docile, Temperament::Impish, Temperament::Lax, Temperament::Relaxed,
        Temperament::Modest, Temperament::Mild, Temperament::Bashful, Temperament::Rash, Temperament::Quiet,
        Temperament::Calm, Temperament::Gentle, Temperament::Careful, Temperament::Quirky, Temperament::Sassy,
        Temperament::Timid, Temperament::Hasty, Temperament::Jolly, Temperament::Naive, Temperament::Serious,
    ];

    /// The stat this temperament boosts by 10%
    pub fn boosted(&self) -> StatKey {
        match self {
            Temperament::Hardy
            | Temperament::Lonely
            | Temperament::Adamant
            | Temperament::Naughty
            | Temperament::Brave => StatKey::Attack,
            Temperament::Bold
            | Temperament::Docile
            | Temperament::Impish
            | Temperament::Lax
            | Temperament::Relaxed => StatKey::Defense,
            Temperament::Modest
            | Temperament::Mild
            | Temperament::Bashful
            | Temperament::Rash
            | Temperament::Quiet => StatKey::SpecialAttack,
            Temperament::Calm
            | Temperament::Gentle
            | Temperament::Careful
            | Temperament::Quirky
            | Temperament::Sassy => StatKey::SpecialDefense,
            Temperament::Timid
            | Temperament::Hasty
            | Temperament::Jolly
            | Temperament::Naive
            | Temperament::Serious => StatKey::Speed,
        }
    }

    /// The stat this temperament reduces by 10%
    pub fn reduced(&self) -> StatKey {
        match self {
            Temperament::Bold | Temperament::Modest | Temperament::Calm | Temperament::Timid => {
                StatKey::Attack
            }
            Temperament::Lonely | Temperament::Mild | Temperament::Gentle | Temperament::Hasty => {
                StatKey::Defense
            }
            Temperament::Adamant
            | Temperament::Impish
            | Temperament::Careful
            | Temperament::Jolly => StatKey::SpecialAttack,
            Temperament::Naughty | Temperament::Lax | Temperament::Rash | Temperament::Naive => {
                StatKey::SpecialDefense
            }
            Temperament::Brave | Temperament::Relaxed | Temperament::Quiet | Temperament::Sassy => {
                StatKey::Speed
            }
            Temperament::Hardy => StatKey::Attack,
            Temperament::Docile => StatKey::Defense,
            Temperament::Bashful => StatKey::SpecialAttack,
            Temperament::Quirky => StatKey::SpecialDefense,
            Temperament::Serious => StatKey::Speed,
        }
    }

    /// Multiplier applied to a stat: 1.1 boosted, 0.9 reduced, 1.0 otherwise
    pub fn multiplier(&self, stat: StatKey) -> f64 {
        let mut factor = 1.0;
        if stat == self.boosted() {
            factor += 0.1;
        }
        if stat == self.reduced() {
            factor -= 0.1;
        }
        factor
    }

    /// Parse from a persisted name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Temperament::Hardy => "Hardy",
            Temperament::Lonely => "Lonely",
            Temperament::Adamant => "Adamant",
            Temperament::Naughty => "Naughty",
            Temperament::Brave => "Brave",
            Temperament::Bold => "Bold",
            Temperament::Docile => "Docile",
            Temperament::Impish => "Impish",
            Temperament::Lax => "Lax",
            Temperament::Relaxed => "Relaxed",
            Temperament::Modest => "Modest",
            Temperament::Mild => "Mild",
            Temperament::Bashful => "Bashful",
            Temperament::Rash => "Rash",
            Temperament::Quiet => "Quiet",
            Temperament::Calm => "Calm",
            Temperament::Gentle => "Gentle",
            Temperament::Careful => "Careful",
            Temperament::Quirky => "Quirky",
            Temperament::Sassy => "Sassy",
            Temperament::Timid => "Timid",
            Temperament::Hasty => "Hasty",
            Temperament::Jolly => "Jolly",
            Temperament::Naive => "Naive",
            Temperament::Serious => "Serious",
        }
    }
}

impl std::fmt::Display for Temperament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Battle-ready stat block derived from level, modifiers, and temperament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedStats {
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl ComputedStats {
    /// Look up a stat by key (health maps to max health)
    pub fn get(&self, stat: StatKey) -> u32 {
        match stat {
            StatKey::Health => self.max_health,
            StatKey::Attack => self.attack,
            StatKey::Defense => self.defense,
            StatKey::SpecialAttack => self.special_attack,
            StatKey::SpecialDefense => self.special_defense,
            StatKey::Speed => self.speed,
        }
    }
}

/// Derive a battle-ready stat block
///
/// Max health: `floor((2b + iv + floor(ev/4)) * level / 100) + level + 10`,
/// except species with base HP of exactly 1, which always yield 1.
/// Other stats: `floor((floor((2b + iv + floor(ev/4)) * level / 100) + 5) * nature)`.
pub fn compute_stats(
    base: &BaseStats,
    level: u32,
    ivs: &Ivs,
    evs: &Evs,
    temperament: Temperament,
) -> ComputedStats {
    let max_health = if base.hp == 1 {
        1
    } else {
        stat_core(base.hp, ivs.hp, evs.hp, level) + level + 10
    };

    ComputedStats {
        max_health,
        attack: derived_stat(
            base.attack,
            ivs.attack,
            evs.attack,
            level,
            temperament.multiplier(StatKey::Attack),
        ),
        defense: derived_stat(
            base.defense,
            ivs.defense,
            evs.defense,
            level,
            temperament.multiplier(StatKey::Defense),
        ),
        special_attack: derived_stat(
            base.special_attack,
            ivs.special_attack,
            evs.special_attack,
            level,
            temperament.multiplier(StatKey::SpecialAttack),
        ),
        special_defense: derived_stat(
            base.special_defense,
            ivs.special_defense,
            evs.special_defense,
            level,
            temperament.multiplier(StatKey::SpecialDefense),
        ),
        speed: derived_stat(
            base.speed,
            ivs.speed,
            evs.speed,
            level,
            temperament.multiplier(StatKey::Speed),
        ),
    }
}

/// `floor((2b + iv + floor(ev/4)) * level / 100)` shared by all six stats
fn stat_core(base: u32, iv: u8, ev: u8, level: u32) -> u32 {
    (2 * base + iv as u32 + ev as u32 / 4) * level / 100
}

fn derived_stat(base: u32, iv: u8, ev: u8, level: u32, nature: f64) -> u32 {
    (((stat_core(base, iv, ev, level) + 5) as f64) * nature).floor() as u32
}
