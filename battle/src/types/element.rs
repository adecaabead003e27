//! Elemental tags and the effectiveness chart

/// Elemental tags (the standard 18-entry matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    Normal = 0,
    Fire = 1,
    Water = 2,
    Electric = 3,
    Grass = 4,
    Ice = 5,
    Fighting = 6,
    Poison = 7,
    Ground = 8,
    Flying = 9,
    Psychic = 10,
    Bug = 11,
    Rock = 12,
    Ghost = 13,
    Dragon = 14,
    Dark = 15,
    Steel = 16,
    Fairy = 17,
}

impl Element {
    /// All 18 elements in chart order
    pub const ALL: [Element; 18] = [
        Element::Normal,
        Element::Fire,
        Element::Water,
        Element::Electric,
        Element::Grass,
        Element::Ice,
        Element::Fighting,
        Element::Poison,
        Element::Ground,
        Element::Flying,
        Element::Psychic,
        Element::Bug,
        Element::Rock,
        Element::Ghost,
        Element::Dragon,
        Element::Dark,
        Element::Steel,
        Element::Fairy,
    ];

    /// Effectiveness of this element attacking a single defending element
    pub fn against(&self, defender: Element) -> f64 {
        EFFECTIVENESS_CHART[*self as usize][defender as usize]
    }

    /// Effectiveness against a multi-element defender (product of lookups)
    ///
    /// An empty defender list is neutral 1.0.
    pub fn against_all(&self, defenders: &[Element]) -> f64 {
        defenders.iter().map(|d| self.against(*d)).product()
    }

    /// Parse from a data-layer element name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Element::Normal),
            "fire" => Some(Element::Fire),
            "water" => Some(Element::Water),
            "electric" => Some(Element::Electric),
            "grass" => Some(Element::Grass),
            "ice" => Some(Element::Ice),
            "fighting" => Some(Element::Fighting),
            "poison" => Some(Element::Poison),
            "ground" => Some(Element::Ground),
            "flying" => Some(Element::Flying),
            "psychic" => Some(Element::Psychic),
            "bug" => Some(Element::Bug),
            "rock" => Some(Element::Rock),
            "ghost" => Some(Element::Ghost),
            "dragon" => Some(Element::Dragon),
            "dark" => Some(Element::Dark),
            "steel" => Some(Element::Steel),
            "fairy" => Some(Element::Fairy),
            _ => None,
        }
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Normal => "Normal",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Electric => "Electric",
            Element::Grass => "Grass",
            Element::Ice => "Ice",
            Element::Fighting => "Fighting",
            Element::Poison => "Poison",
            Element::Ground => "Ground",
            Element::Flying => "Flying",
            Element::Psychic => "Psychic",
            Element::Bug => "Bug",
            Element::Rock => "Rock",
            Element::Ghost => "Ghost",
            Element::Dragon => "Dragon",
            Element::Dark => "Dark",
            Element::Steel => "Steel",
            Element::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 18x18 effectiveness chart
///
/// Row = attacking element, column = defending element.
/// Values: 0.0 immune, 0.5 resisted, 1.0 neutral, 2.0 super effective.
/// Column order matches [`Element::ALL`].
#[rustfmt::skip]
pub static EFFECTIVENESS_CHART: [[f64; 18]; 18] = [
    // Normal
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.0, 1.0, 1.0, 0.5, 1.0],
    // Fire
    [1.0, 0.5, 0.5, 1.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 0.5, 1.0, 2.0, 1.0],
    // Water
    [1.0, 2.0, 0.5, 1.0, 0.5, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 1.0, 1.0],
    // Electric
    [1.0, 1.0, 2.0, 0.5, 0.5, 1.0, 1.0, 1.0, 0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0],
    // Grass
    [1.0, 0.5, 2.0, 1.0, 0.5, 1.0, 1.0, 0.5, 2.0, 0.5, 1.0, 0.5, 2.0, 1.0, 0.5, 1.0, 0.5, 1.0],
    // Ice
    [1.0, 0.5, 0.5, 1.0, 2.0, 0.5, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0],
    // Fighting
    [2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 0.5, 0.5, 0.5, 2.0, 0.0, 1.0, 2.0, 2.0, 0.5],
    // Poison
    [1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 0.5, 0.5, 1.0, 1.0, 1.0, 0.5, 0.5, 1.0, 1.0, 0.0, 2.0],
    // Ground
    [1.0, 2.0, 1.0, 2.0, 0.5, 1.0, 1.0, 2.0, 1.0, 0.0, 1.0, 0.5, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0],
    // Flying
    [1.0, 1.0, 1.0, 0.5, 2.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 1.0, 1.0, 0.5, 1.0],
    // Psychic
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0, 1.0, 0.0, 0.5, 1.0],
    // Bug
    [1.0, 0.5, 1.0, 1.0, 2.0, 1.0, 0.5, 0.5, 1.0, 0.5, 2.0, 1.0, 1.0, 0.5, 1.0, 2.0, 0.5, 0.5],
    // Rock
    [1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 0.5, 2.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0],
    // Ghost
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 1.0],
    // Dragon
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 0.0],
    // Dark
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 0.5],
    // Steel
    [1.0, 0.5, 0.5, 0.5, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 0.5, 2.0],
    // Fairy
    [1.0, 0.5, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 0.5, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element_lookups() {
        assert_eq!(Element::Fire.against(Element::Grass), 2.0);
        assert_eq!(Element::Fire.against(Element::Water), 0.5);
        assert_eq!(Element::Electric.against(Element::Ground), 0.0);
        assert_eq!(Element::Dragon.against(Element::Fairy), 0.0);
        assert_eq!(Element::Normal.against(Element::Normal), 1.0);
    }

    #[test]
    fn test_dual_element_is_product_of_lookups() {
        // Electric vs Water/Flying: 2.0 * 2.0
        assert_eq!(
            Element::Electric.against_all(&[Element::Water, Element::Flying]),
            4.0
        );
        // Fire vs Water/Rock: 0.5 * 0.5
        assert_eq!(
            Element::Fire.against_all(&[Element::Water, Element::Rock]),
            0.25
        );
        // Ground vs Flying/Steel: immunity wins the product
        assert_eq!(
            Element::Ground.against_all(&[Element::Flying, Element::Steel]),
            0.0
        );
    }

    #[test]
    fn test_empty_defender_list_is_neutral() {
        assert_eq!(Element::Fire.against_all(&[]), 1.0);
        assert_eq!(Element::Ghost.against_all(&[]), 1.0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Element::from_name("fire"), Some(Element::Fire));
        assert_eq!(Element::from_name("FIRE"), Some(Element::Fire));
        assert_eq!(Element::from_name("Fairy"), Some(Element::Fairy));
        assert_eq!(Element::from_name("plasma"), None);
    }

    #[test]
    fn test_chart_values_are_known_multipliers() {
        for row in EFFECTIVENESS_CHART.iter() {
            for value in row.iter() {
                assert!([0.0, 0.5, 1.0, 2.0].contains(value));
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Element::Psychic.to_string(), "Psychic");
        assert_eq!(Element::ALL.len(), 18);
    }
}
