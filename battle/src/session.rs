//! Per-battle mutable state

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::types::Combatant;
use crate::BattleError;

/// Battle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleKind {
    /// A single wild combatant; capture and flee are legal
    Wild,
    /// A scripted opponent team that auto-rotates on faint
    Scripted,
    /// Two player-owned teams
    Pvp,
}

impl BattleKind {
    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleKind::Wild => "wild",
            BattleKind::Scripted => "scripted",
            BattleKind::Pvp => "pvp",
        }
    }
}

impl std::fmt::Display for BattleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Battle outcome state machine: ongoing, then exactly one terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Ongoing,
    PlayerWon,
    OpponentWon,
    Fled,
    Captured,
}

impl BattleOutcome {
    /// Whether the battle has ended
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BattleOutcome::Ongoing)
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleOutcome::Ongoing => "ongoing",
            BattleOutcome::PlayerWon => "player_won",
            BattleOutcome::OpponentWon => "opponent_won",
            BattleOutcome::Fled => "fled",
            BattleOutcome::Captured => "captured",
        }
    }
}

impl std::fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// The other side
    pub fn opposite(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    fn index(&self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

/// One side's team and active slot
#[derive(Debug, Clone)]
pub struct TeamSide {
    /// Party order, up to 6
    pub combatants: Vec<Combatant>,
    /// Index of the combatant currently on the field
    pub active: usize,
}

impl TeamSide {
    /// Create a side with the first party member active
    pub fn new(combatants: Vec<Combatant>) -> Self {
        Self {
            combatants,
            active: 0,
        }
    }

    /// The combatant currently on the field
    pub fn active_combatant(&self) -> &Combatant {
        &self.combatants[self.active]
    }

    /// The combatant currently on the field, mutably
    pub fn active_combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatants[self.active]
    }

    /// Count non-fainted party members
    pub fn alive_count(&self) -> usize {
        self.combatants.iter().filter(|c| c.is_alive()).count()
    }

    /// Whether every party member has fainted
    pub fn all_fainted(&self) -> bool {
        self.alive_count() == 0
    }

    /// First non-fainted, non-active party index, if any
    pub fn next_available(&self) -> Option<usize> {
        self.combatants
            .iter()
            .enumerate()
            .find(|(index, c)| *index != self.active && c.is_alive())
            .map(|(index, _)| index)
    }
}

/// A battle-log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
    /// Epoch milliseconds at the time the line was appended
    pub timestamp_ms: u64,
}

/// One ongoing encounter
///
/// Mutated only through turn resolution, the switch operation, and the
/// capture resolver; the session manager owns the only writable handle.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub id: u64,
    pub kind: BattleKind,
    sides: [TeamSide; 2],
    pub turn: u32,
    pub log: Vec<LogEntry>,
    /// Player-side party indices that have acted (experience scoping)
    pub participants: HashSet<usize>,
    pub outcome: BattleOutcome,
}

impl BattleSession {
    /// Create a session; both teams must be non-empty (validated upstream)
    pub fn new(id: u64, kind: BattleKind, player: Vec<Combatant>, opponent: Vec<Combatant>) -> Self {
        let mut session = Self {
            id,
            kind,
            sides: [TeamSide::new(player), TeamSide::new(opponent)],
            turn: 0,
            log: Vec::new(),
            participants: HashSet::new(),
            outcome: BattleOutcome::Ongoing,
        };
        let opener = format!(
            "{} battle started: {} vs {}",
            session.kind,
            session.side(Side::Player).active_combatant().name,
            session.side(Side::Opponent).active_combatant().name,
        );
        session.push_log(opener);
        session
    }

    /// Borrow a side
    pub fn side(&self, side: Side) -> &TeamSide {
        &self.sides[side.index()]
    }

    /// Borrow a side mutably
    pub fn side_mut(&mut self, side: Side) -> &mut TeamSide {
        &mut self.sides[side.index()]
    }

    /// Whether the battle has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Append a log line stamped with the current turn
    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry {
            turn: self.turn,
            message: message.into(),
            timestamp_ms: epoch_millis(),
        });
    }

    /// Switch a side's active combatant
    ///
    /// Rejected when the target is out of range, fainted, or already on the
    /// field; nothing is mutated on rejection.
    pub fn switch(&mut self, side: Side, new_index: usize) -> Result<(), BattleError> {
        if self.is_terminal() {
            return Err(BattleError::SessionTerminal);
        }
        let team = self.side(side);
        let Some(target) = team.combatants.get(new_index) else {
            return Err(BattleError::InvalidSwitchTarget(format!(
                "no party member at slot {new_index}"
            )));
        };
        if target.is_fainted() {
            return Err(BattleError::InvalidSwitchTarget(format!(
                "{} has fainted and cannot battle",
                target.name
            )));
        }
        if new_index == team.active {
            return Err(BattleError::InvalidSwitchTarget(format!(
                "{} is already on the field",
                target.name
            )));
        }

        self.side_mut(side).active = new_index;
        let name = self.side(side).active_combatant().name.clone();
        self.push_log(format!("{name} was sent out!"));
        Ok(())
    }

    /// Mark a player-side party slot as having participated
    pub fn track_participant(&mut self, index: usize) {
        self.participants.insert(index);
    }
}

/// Milliseconds since the epoch for log stamps
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::types::BattleMove;
    use totem_data::SpeciesData;

    fn species(id: u32, name: &str) -> SpeciesData {
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

    fn roster(names: &[&str], rng: &mut SeededRng) -> Vec<Combatant> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Combatant::unowned(
                    &species(i as u32 + 1, name),
                    10,
                    vec![BattleMove::fallback()],
                    rng,
                )
            })
            .collect()
    }

    fn session(rng: &mut SeededRng) -> BattleSession {
        let player = roster(&["Sprout", "Puddle"], rng);
        let opponent = roster(&["Scurry"], rng);
        BattleSession::new(1, BattleKind::Wild, player, opponent)
    }

    #[test]
    fn test_new_session_logs_an_opener() {
        let mut rng = SeededRng::new(1);
        let session = session(&mut rng);

        assert_eq!(session.turn, 0);
        assert_eq!(session.outcome, BattleOutcome::Ongoing);
        assert!(!session.is_terminal());
        assert_eq!(session.log.len(), 1);
        assert!(session.log[0].message.contains("Sprout"));
        assert!(session.log[0].message.contains("Scurry"));
    }

    #[test]
    fn test_switch_updates_active_and_logs() {
        let mut rng = SeededRng::new(2);
        let mut session = session(&mut rng);

        session.switch(Side::Player, 1).unwrap();
        assert_eq!(session.side(Side::Player).active, 1);
        assert_eq!(
            session.log.last().unwrap().message,
            "Puddle was sent out!"
        );
    }

    #[test]
    fn test_switch_rejects_active_slot() {
        let mut rng = SeededRng::new(3);
        let mut session = session(&mut rng);

        let result = session.switch(Side::Player, 0);
        assert!(matches!(result, Err(BattleError::InvalidSwitchTarget(_))));
        assert_eq!(session.side(Side::Player).active, 0);
    }

    #[test]
    fn test_switch_rejects_fainted_target() {
        let mut rng = SeededRng::new(4);
        let mut session = session(&mut rng);
        session.side_mut(Side::Player).combatants[1].current_health = 0;

        let result = session.switch(Side::Player, 1);
        assert!(matches!(result, Err(BattleError::InvalidSwitchTarget(_))));
    }

    #[test]
    fn test_switch_rejects_out_of_range() {
        let mut rng = SeededRng::new(5);
        let mut session = session(&mut rng);

        assert!(matches!(
            session.switch(Side::Player, 9),
            Err(BattleError::InvalidSwitchTarget(_))
        ));
    }

    #[test]
    fn test_switch_rejects_terminal_session() {
        let mut rng = SeededRng::new(6);
        let mut session = session(&mut rng);
        session.outcome = BattleOutcome::Fled;

        assert!(matches!(
            session.switch(Side::Player, 1),
            Err(BattleError::SessionTerminal)
        ));
    }

    #[test]
    fn test_side_accounting() {
        let mut rng = SeededRng::new(7);
        let mut session = session(&mut rng);

        assert_eq!(session.side(Side::Player).alive_count(), 2);
        assert!(!session.side(Side::Player).all_fainted());
        assert_eq!(session.side(Side::Player).next_available(), Some(1));

        session.side_mut(Side::Player).combatants[0].current_health = 0;
        session.side_mut(Side::Player).combatants[1].current_health = 0;
        assert!(session.side(Side::Player).all_fainted());
        assert_eq!(session.side(Side::Player).next_available(), None);
    }

    #[test]
    fn test_outcome_terminality() {
        assert!(!BattleOutcome::Ongoing.is_terminal());
        for outcome in [
            BattleOutcome::PlayerWon,
            BattleOutcome::OpponentWon,
            BattleOutcome::Fled,
            BattleOutcome::Captured,
        ] {
            assert!(outcome.is_terminal());
        }
    }

    #[test]
    fn test_participant_tracking_dedupes() {
        let mut rng = SeededRng::new(8);
        let mut session = session(&mut rng);

        session.track_participant(0);
        session.track_participant(0);
        session.track_participant(1);
        assert_eq!(session.participants.len(), 2);
    }
}
