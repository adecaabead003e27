//! Combat core and battle session state machine.
//!
//! This crate holds everything about a battle that is pure computation:
//! domain types, the combat math, and the per-session state machine.
//!
//! ```text
//! totem-data (records + provider contracts)
//!        │
//!        ▼
//! totem-battle (domain types + combat core) ← THIS CRATE
//!        │
//!        ▼
//! totem-engine (async session manager)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Element`] - elemental tags with the effectiveness chart
//! - [`BaseStats`] / [`ComputedStats`] - species constants vs derived battle stats
//! - [`Temperament`] - the 25-entry stat-bias table
//! - [`Ailment`] / [`StatusCondition`] - status conditions with turn counters
//! - [`BattleMove`] - a resolved move with remaining power points
//! - [`Combatant`] - one creature instance in battle
//!
//! ## Mechanics
//! - [`mechanics::start_of_turn_tick`] - the status-effect processor
//! - [`mechanics::compute_damage`] - the damage formula
//! - [`mechanics::attempt_capture`] - the shake-based capture resolver
//! - [`mechanics::distribute_experience`] - experience and leveling
//!
//! ## Session
//! - [`BattleSession`] - per-battle mutable state
//! - [`turn::resolve_turn`] - one full turn of resolution
//!
//! No I/O, no async, no clocks beyond log timestamps; every random draw goes
//! through the injected [`rng::BattleRng`], so whole battles replay
//! deterministically from a seed.

use thiserror::Error;

pub mod mechanics;
pub mod rng;
pub mod session;
pub mod turn;
pub mod types;

pub use rng::{BattleRng, SeededRng};
pub use session::{BattleKind, BattleOutcome, BattleSession, LogEntry, Side, TeamSide};
pub use turn::{ActionOutcome, ActionReport, TurnCommand, TurnReport};
pub use types::{
    Ailment, BaseStats, BattleMove, Combatant, ComputedStats, Element, Evs, HeldItem, Ivs,
    MoveCategory, StatKey, StatusCondition, Temperament,
};

/// Rejections surfaced by battle operations
///
/// Soft mid-turn conditions (a fainted actor skipping its action, a status
/// blocking a move) are turn events, not errors; only structural problems
/// land here, and they are rejected before any session state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Move slot {0} is not in the active combatant's moveset")]
    InvalidMoveReference(usize),

    #[error("Invalid switch target: {0}")]
    InvalidSwitchTarget(String),

    #[error("Capture attempts are only legal against wild encounters")]
    CaptureNotApplicable,

    #[error("The battle has already ended")]
    SessionTerminal,
}
