//! Response records
//!
//! Everything returned to callers is a plain serializable snapshot; no
//! combat-core type crosses the boundary.

use serde::Serialize;

use totem_battle::mechanics::CaptureAttempt;
use totem_battle::{
    ActionOutcome, ActionReport, BattleSession, Combatant, LogEntry, Side, TurnReport,
};

/// One combatant's visible state
#[derive(Debug, Clone, Serialize)]
pub struct CombatantView {
    pub species: u32,
    pub name: String,
    pub level: u32,
    pub current_health: u32,
    pub max_health: u32,
    pub elements: Vec<String>,
    pub status: Option<String>,
    pub moves: Vec<MoveView>,
}

/// One move slot's visible state
#[derive(Debug, Clone, Serialize)]
pub struct MoveView {
    pub name: String,
    pub element: Option<String>,
    pub category: String,
    pub power: u32,
    pub accuracy: Option<u32>,
    pub priority: i32,
    pub remaining_pp: u32,
    pub max_pp: u32,
}

/// One side's visible state
#[derive(Debug, Clone, Serialize)]
pub struct SideView {
    pub active: usize,
    pub combatants: Vec<CombatantView>,
}

/// Snapshot of a battle session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: u64,
    pub kind: String,
    pub turn: u32,
    pub outcome: String,
    pub player: SideView,
    pub opponent: SideView,
    pub log: Vec<LogEntry>,
}

impl SessionView {
    /// Snapshot a session
    pub fn from_session(session: &BattleSession) -> Self {
        Self {
            id: session.id,
            kind: session.kind.as_str().to_string(),
            turn: session.turn,
            outcome: session.outcome.as_str().to_string(),
            player: side_view(session, Side::Player),
            opponent: side_view(session, Side::Opponent),
            log: session.log.clone(),
        }
    }
}

fn side_view(session: &BattleSession, side: Side) -> SideView {
    let team = session.side(side);
    SideView {
        active: team.active,
        combatants: team.combatants.iter().map(combatant_view).collect(),
    }
}

fn combatant_view(combatant: &Combatant) -> CombatantView {
    CombatantView {
        species: combatant.species,
        name: combatant.name.clone(),
        level: combatant.level,
        current_health: combatant.current_health,
        max_health: combatant.max_health(),
        elements: combatant
            .elements
            .iter()
            .map(|e| e.as_str().to_string())
            .collect(),
        status: combatant.status.map(|s| s.ailment.as_str().to_string()),
        moves: combatant
            .moves
            .iter()
            .map(|m| MoveView {
                name: m.name.clone(),
                element: m.element.map(|e| e.as_str().to_string()),
                category: m.category.as_str().to_string(),
                power: m.power,
                accuracy: m.accuracy,
                priority: m.priority,
                remaining_pp: m.remaining_pp,
                max_pp: m.max_pp,
            })
            .collect(),
    }
}

/// One action within a resolved turn
#[derive(Debug, Clone, Serialize)]
pub struct ActionView {
    pub side: String,
    pub actor: String,
    pub move_name: Option<String>,
    pub kind: String,
    pub damage: Option<u32>,
    pub critical: bool,
    pub effectiveness: Option<f64>,
    pub knocked_out: bool,
    pub message: Option<String>,
}

impl ActionView {
    fn from_report(report: &ActionReport) -> Self {
        let side = match report.side {
            Side::Player => "player",
            Side::Opponent => "opponent",
        };
        let mut view = Self {
            side: side.to_string(),
            actor: report.actor.clone(),
            move_name: report.move_name.clone(),
            kind: String::new(),
            damage: None,
            critical: false,
            effectiveness: None,
            knocked_out: false,
            message: None,
        };
        match &report.outcome {
            ActionOutcome::CannotAttack => view.kind = "cannot_attack".to_string(),
            ActionOutcome::StatusBlocked { message } => {
                view.kind = "status_blocked".to_string();
                view.message = Some(message.clone());
            }
            ActionOutcome::FaintedDuringTick { message } => {
                view.kind = "fainted".to_string();
                view.message = Some(message.clone());
            }
            ActionOutcome::Missed => view.kind = "missed".to_string(),
            ActionOutcome::StatusMove => view.kind = "status_move".to_string(),
            ActionOutcome::Hit {
                damage,
                critical,
                effectiveness,
                knocked_out,
            } => {
                view.kind = "hit".to_string();
                view.damage = Some(*damage);
                view.critical = *critical;
                view.effectiveness = Some(*effectiveness);
                view.knocked_out = *knocked_out;
            }
        }
        view
    }
}

/// One participant's experience settlement
#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    pub party_index: usize,
    pub gained: u32,
    pub previous_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    /// Moves learned into open slots during the level-ups
    pub learned: Vec<String>,
    /// Newly available moves awaiting a caller-driven replacement flow
    pub pending: Vec<String>,
}

/// Result of one submitted turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub turn: u32,
    pub events: Vec<ActionView>,
    pub experience: Vec<ExperienceView>,
    pub rotated_in: Option<String>,
    pub outcome: String,
    pub state: SessionView,
}

impl TurnOutcome {
    /// Assemble the response for a resolved turn
    pub(crate) fn assemble(
        report: &TurnReport,
        experience: Vec<ExperienceView>,
        state: SessionView,
    ) -> Self {
        Self {
            turn: report.turn,
            events: report.actions.iter().map(ActionView::from_report).collect(),
            experience,
            rotated_in: report.rotated_in.clone(),
            outcome: report.outcome.as_str().to_string(),
            state,
        }
    }
}

/// Result of one capture attempt
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    pub shakes: u32,
    pub captured: bool,
    /// The computed rate term `a`
    pub rate_term: u32,
    /// The computed shake threshold `b`
    pub shake_threshold: u32,
    pub state: SessionView,
}

impl CaptureOutcome {
    pub(crate) fn assemble(attempt: &CaptureAttempt, state: SessionView) -> Self {
        Self {
            shakes: attempt.shakes,
            captured: attempt.captured,
            rate_term: attempt.rate_term,
            shake_threshold: attempt.shake_threshold,
            state,
        }
    }
}
