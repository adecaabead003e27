//! Async battle session manager.
//!
//! The only component external callers talk to. The manager owns the
//! in-memory session table, serializes every operation on a given session,
//! and drives the combat core in `totem-battle` against the collaborator
//! contracts in `totem-data`:
//!
//! ```text
//! totem-data (records + provider contracts)
//!        │
//!        ▼
//! totem-battle (domain types + combat core)
//!        │
//!        ▼
//! totem-engine (async session manager) ← THIS CRATE
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use totem_engine::{SessionManager, StartRequest, OpponentSpec, TurnRequest};
//!
//! let manager = SessionManager::new(data, store, availability);
//!
//! let view = manager.start_battle(StartRequest {
//!     owner: "ash".to_string(),
//!     team: roster_records,
//!     opponent: OpponentSpec::Wild { species: 19, level: 5, moves: vec![] },
//!     seed: None,
//! }).await?;
//!
//! let outcome = manager.submit_turn(view.id, TurnRequest {
//!     move_slot: 0,
//!     opponent_move_slot: None,
//! }).await?;
//! ```

use thiserror::Error;

use totem_battle::BattleError;
use totem_data::DataError;

mod build;
pub mod manager;
pub mod view;


pub use manager::{
    BallKind, OpponentSpec, RosterEntry, SessionManager, StartRequest, TurnRequest,
};
pub use view::{
    ActionView, CaptureOutcome, CombatantView, ExperienceView, MoveView, SessionView, SideView,
    TurnOutcome,
};

/// Rejections surfaced to callers of the session manager
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Session {0} not found")]
    SessionNotFound(u64),

    #[error("A battle needs at least one combatant on each side")]
    EmptyTeam,

    #[error("External data unavailable: {0}")]
    ExternalDataUnavailable(#[from] DataError),

    #[error(transparent)]
    Battle(#[from] BattleError),
}
