//! The battle session manager
//!
//! Owns the in-memory session table. The table lock is held only for
//! lookup, insert, and remove; each session sits behind its own mutex,
//! which an operation holds for its whole resolution, awaited provider
//! calls included. At most one resolution is ever in flight per session,
//! and sessions never contend with each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use totem_battle::mechanics::{attempt_capture, ExperienceGain};
use totem_battle::turn::{resolve_turn, TurnCommand};
use totem_battle::{
    BattleError, BattleKind, BattleMove, BattleOutcome, BattleSession, SeededRng, Side,
};
use totem_data::{
    BattleSnapshot, CombatantRecord, CombatantSnapshot, MoveAvailabilityProvider,
    PersistenceStore, SideSnapshot, StaticDataProvider,
};

use crate::view::{CaptureOutcome, ExperienceView, SessionView, TurnOutcome};
use crate::{build, EngineError};

/// Spreads consecutive session ids across the seed space
const SEED_SCRAMBLE: u64 = 0x9e3779b97f4a7c15;

/// Everything needed to open a battle
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub owner: String,
    pub team: Vec<CombatantRecord>,
    pub opponent: OpponentSpec,
    /// Explicit seed for deterministic replays; derived from the session id
    /// when absent
    pub seed: Option<u64>,
}

/// The opposing side of a new battle; the variant decides the battle kind
#[derive(Debug, Clone)]
pub enum OpponentSpec {
    Wild {
        species: u32,
        level: u32,
        /// Move names; empty means the built-in fallback move
        moves: Vec<String>,
    },
    Scripted {
        trainer: String,
        roster: Vec<RosterEntry>,
    },
    Pvp {
        owner: String,
        team: Vec<CombatantRecord>,
    },
}

/// One scripted-roster member
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub species: u32,
    pub level: u32,
    pub moves: Vec<String>,
}

/// One turn's choices
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest {
    /// The player's move slot
    pub move_slot: usize,
    /// The opposing player's slot in pvp; `None` lets the engine draw
    pub opponent_move_slot: Option<usize>,
}

/// Ball grades and their capture multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallKind {
    Standard,
    Great,
    Ultra,
    Master,
}

impl BallKind {
    /// Capture-rate multiplier
    pub fn multiplier(&self) -> f64 {
        match self {
            BallKind::Standard => 1.0,
            BallKind::Great => 1.5,
            BallKind::Ultra => 2.0,
            // Large enough to force the certain-capture branch
            BallKind::Master => 255.0,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Standard => "standard ball",
            BallKind::Great => "great ball",
            BallKind::Ultra => "ultra ball",
            BallKind::Master => "master ball",
        }
    }
}

impl std::fmt::Display for BallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A session plus its private random source
struct SessionEntry {
    session: BattleSession,
    rng: SeededRng,
}

/// The externally-invoked battle engine
pub struct SessionManager<D, P, M> {
    data: D,
    store: P,
    availability: M,
    sessions: RwLock<HashMap<u64, Arc<Mutex<SessionEntry>>>>,
    next_id: AtomicU64,
}

impl<D, P, M> SessionManager<D, P, M>
where
    D: StaticDataProvider,
    P: PersistenceStore,
    M: MoveAvailabilityProvider,
{
    /// Create a manager over the three collaborators
    pub fn new(data: D, store: P, availability: M) -> Self {
        Self {
            data,
            store,
            availability,
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of sessions currently in the table
    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Open a battle and return its starting state
    ///
    /// An empty player team or an empty opposing roster rejects before any
    /// session exists; species and move lookups degrade per the build rules.
    pub async fn start_battle(&self, request: StartRequest) -> Result<SessionView, EngineError> {
        if request.team.is_empty() {
            return Err(EngineError::EmptyTeam);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let seed = request.seed.unwrap_or(id.wrapping_mul(SEED_SCRAMBLE));
        let mut rng = SeededRng::new(seed);

        let team = build::build_player_team(&self.data, &request.team, &request.owner).await?;
        let (kind, opponent) = match &request.opponent {
            OpponentSpec::Wild {
                species,
                level,
                moves,
            } => {
                let wild =
                    build::build_unowned(&self.data, *species, *level, moves, &mut rng).await?;
                (BattleKind::Wild, vec![wild])
            }
            OpponentSpec::Scripted { roster, .. } => {
                if roster.is_empty() {
                    return Err(EngineError::EmptyTeam);
                }
                let mut members = Vec::with_capacity(roster.len().min(6));
                for entry in roster.iter().take(6) {
                    members.push(
                        build::build_unowned(
                            &self.data,
                            entry.species,
                            entry.level,
                            &entry.moves,
                            &mut rng,
                        )
                        .await?,
                    );
                }
                (BattleKind::Scripted, members)
            }
            OpponentSpec::Pvp { owner, team } => {
                if team.is_empty() {
                    return Err(EngineError::EmptyTeam);
                }
                let members = build::build_player_team(&self.data, team, owner).await?;
                (BattleKind::Pvp, members)
            }
        };

        let session = BattleSession::new(id, kind, team, opponent);
        tracing::info!(session = id, kind = %kind, seed, "battle started");
        let view = SessionView::from_session(&session);

        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(SessionEntry { session, rng })));
        Ok(view)
    }

    /// Resolve one turn
    pub async fn submit_turn(
        &self,
        session_id: u64,
        request: TurnRequest,
    ) -> Result<TurnOutcome, EngineError> {
        let entry = self.entry(session_id).await?;
        let mut guard = entry.lock().await;
        let entry = &mut *guard;

        let command = TurnCommand {
            player_move: request.move_slot,
            opponent_move: request.opponent_move_slot,
        };
        let report = resolve_turn(&mut entry.session, &command, &mut entry.rng)?;
        let experience = self
            .surface_level_ups(&mut entry.session, &report.experience)
            .await;
        tracing::debug!(
            session = session_id,
            turn = report.turn,
            outcome = %report.outcome,
            "turn resolved"
        );

        let state = SessionView::from_session(&entry.session);
        let outcome = TurnOutcome::assemble(&report, experience, state);

        if entry.session.is_terminal() {
            let finished = entry.session.clone();
            drop(guard);
            self.finish(finished).await?;
        }
        Ok(outcome)
    }

    /// Switch the player's active combatant
    pub async fn switch(
        &self,
        session_id: u64,
        new_index: usize,
    ) -> Result<SessionView, EngineError> {
        let entry = self.entry(session_id).await?;
        let mut guard = entry.lock().await;
        guard.session.switch(Side::Player, new_index)?;
        Ok(SessionView::from_session(&guard.session))
    }

    /// Throw a ball at the wild combatant
    ///
    /// Only legal in wild sessions. On success the wild creature's record is
    /// handed to the persistence collaborator with the catcher as its
    /// original trainer, and the session terminates as captured.
    pub async fn attempt_capture(
        &self,
        session_id: u64,
        ball: BallKind,
    ) -> Result<CaptureOutcome, EngineError> {
        let entry = self.entry(session_id).await?;
        let mut guard = entry.lock().await;
        let entry = &mut *guard;

        if entry.session.is_terminal() {
            return Err(BattleError::SessionTerminal.into());
        }
        if entry.session.kind != BattleKind::Wild {
            return Err(BattleError::CaptureNotApplicable.into());
        }

        let attempt = attempt_capture(
            entry.session.side(Side::Opponent).active_combatant(),
            ball.multiplier(),
            &mut entry.rng,
        );
        let wild_name = entry
            .session
            .side(Side::Opponent)
            .active_combatant()
            .name
            .clone();
        entry.session.push_log(format!("You threw a {ball}!"));
        if attempt.captured {
            entry
                .session
                .push_log(format!("Gotcha! {wild_name} was caught!"));
            entry.session.outcome = BattleOutcome::Captured;
        } else {
            entry.session.push_log(format!(
                "Oh no! {wild_name} broke free after {} shakes!",
                attempt.shakes
            ));
        }

        let state = SessionView::from_session(&entry.session);
        let outcome = CaptureOutcome::assemble(&attempt, state);

        if entry.session.is_terminal() {
            let catcher = entry
                .session
                .side(Side::Player)
                .combatants
                .first()
                .and_then(|c| c.owner.clone());
            let mut record = entry
                .session
                .side(Side::Opponent)
                .active_combatant()
                .to_record();
            record.original_trainer = catcher;

            let finished = entry.session.clone();
            drop(guard);
            self.store.save_combatant(record).await?;
            self.finish(finished).await?;
        }
        Ok(outcome)
    }

    /// Abandon the battle
    pub async fn flee(&self, session_id: u64) -> Result<SessionView, EngineError> {
        let entry = self.entry(session_id).await?;
        let mut guard = entry.lock().await;

        if guard.session.is_terminal() {
            return Err(BattleError::SessionTerminal.into());
        }
        guard.session.outcome = BattleOutcome::Fled;
        guard.session.push_log("Got away safely!");

        let view = SessionView::from_session(&guard.session);
        let finished = guard.session.clone();
        drop(guard);
        self.finish(finished).await?;
        Ok(view)
    }

    /// Snapshot a session without mutating it
    pub async fn get_state(&self, session_id: u64) -> Result<SessionView, EngineError> {
        let entry = self.entry(session_id).await?;
        let guard = entry.lock().await;
        Ok(SessionView::from_session(&guard.session))
    }

    async fn entry(&self, session_id: u64) -> Result<Arc<Mutex<SessionEntry>>, EngineError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(EngineError::SessionNotFound(session_id))
    }

    /// Query move availability for crossed levels and learn into open slots
    ///
    /// Full movesets surface the new names for caller-driven replacement;
    /// availability failures degrade to an empty answer.
    async fn surface_level_ups(
        &self,
        session: &mut BattleSession,
        gains: &[ExperienceGain],
    ) -> Vec<ExperienceView> {
        let mut views = Vec::with_capacity(gains.len());
        for gain in gains {
            let mut learned = Vec::new();
            let mut pending = Vec::new();
            let species = session.side(Side::Player).combatants[gain.party_index].species;

            for level in &gain.levels_crossed {
                let names = self
                    .availability
                    .moves_learned_at(species, *level)
                    .await
                    .unwrap_or_default();
                for name in names {
                    let (known, open) = {
                        let combatant =
                            &session.side(Side::Player).combatants[gain.party_index];
                        let known = combatant
                            .moves
                            .iter()
                            .any(|m| m.name.eq_ignore_ascii_case(&name));
                        (known, combatant.has_open_move_slot())
                    };
                    if known {
                        continue;
                    }
                    if !open {
                        pending.push(name);
                        continue;
                    }
                    match self.data.move_record(&name).await {
                        Ok(record) => {
                            let combatant =
                                &mut session.side_mut(Side::Player).combatants[gain.party_index];
                            let display = combatant.name.clone();
                            combatant.moves.push(BattleMove::from_record(&record));
                            session.push_log(format!("{display} learned {name}!"));
                            learned.push(name);
                        }
                        Err(_) => pending.push(name),
                    }
                }
            }

            views.push(ExperienceView {
                party_index: gain.party_index,
                gained: gain.gained,
                previous_level: gain.previous_level,
                new_level: gain.new_level,
                leveled_up: gain.leveled_up,
                learned,
                pending,
            });
        }
        views
    }

    /// Drop a finished session and settle it durably
    async fn finish(&self, session: BattleSession) -> Result<(), EngineError> {
        self.sessions.write().await.remove(&session.id);
        tracing::info!(
            session = session.id,
            outcome = %session.outcome,
            turns = session.turn,
            "battle ended"
        );

        for combatant in &session.side(Side::Player).combatants {
            if combatant.owner.is_some() {
                self.store.save_combatant(combatant.to_record()).await?;
            }
        }
        self.store.save_snapshot(snapshot_of(&session)).await?;
        Ok(())
    }
}

fn snapshot_of(session: &BattleSession) -> BattleSnapshot {
    let side_snapshot = |side: Side| SideSnapshot {
        combatants: session
            .side(side)
            .combatants
            .iter()
            .map(|c| CombatantSnapshot {
                species: c.species,
                name: c.name.clone(),
                level: c.level,
                experience: c.experience,
                current_health: c.current_health,
                max_health: c.max_health(),
            })
            .collect(),
    };

    BattleSnapshot {
        session: session.id,
        kind: session.kind.as_str().to_string(),
        turn: session.turn,
        outcome: session.outcome.as_str().to_string(),
        sides: vec![side_snapshot(Side::Player), side_snapshot(Side::Opponent)],
    }
}
