//! Turn ordering and resolution

use crate::mechanics::damage::compute_damage;
use crate::mechanics::experience::{distribute_experience, ExperienceGain};
use crate::mechanics::status_tick::start_of_turn_tick;
use crate::rng::BattleRng;
use crate::session::{BattleKind, BattleOutcome, BattleSession, Side};
use crate::BattleError;

/// The two queued choices for one turn
///
/// `opponent_move` is supplied by pvp transports (both players' choices
/// aggregate into one request); when `None` the opponent draws uniformly
/// from its moveset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnCommand {
    pub player_move: usize,
    pub opponent_move: Option<usize>,
}

/// What one actor's action came to
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The actor was already fainted; the action is a no-op
    CannotAttack,
    /// A status condition prevented the action
    StatusBlocked { message: String },
    /// The residual status tick fainted the actor before it could act
    FaintedDuringTick { message: String },
    Missed,
    Hit {
        damage: u32,
        critical: bool,
        effectiveness: f64,
        knocked_out: bool,
    },
    /// A zero-power move; logged, no damage
    StatusMove,
}

/// One actor's slice of the turn
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub side: Side,
    pub actor: String,
    pub move_name: Option<String>,
    pub outcome: ActionOutcome,
}

/// Everything that happened in one resolved turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn: u32,
    pub actions: Vec<ActionReport>,
    /// Settlements for opponents defeated this turn
    pub experience: Vec<ExperienceGain>,
    /// Scripted auto-rotation, when it happened
    pub rotated_in: Option<String>,
    pub outcome: BattleOutcome,
}

/// Resolve one full turn
///
/// Validation (unknown move slots, terminal session) rejects before any
/// state changes; everything after that is a recorded event, never an error.
pub fn resolve_turn(
    session: &mut BattleSession,
    command: &TurnCommand,
    rng: &mut dyn BattleRng,
) -> Result<TurnReport, BattleError> {
    if session.is_terminal() {
        return Err(BattleError::SessionTerminal);
    }

    let player_moves = session.side(Side::Player).active_combatant().moves.len();
    if command.player_move >= player_moves {
        return Err(BattleError::InvalidMoveReference(command.player_move));
    }
    let opponent_moves = session.side(Side::Opponent).active_combatant().moves.len();
    let opponent_move = match command.opponent_move {
        Some(index) if index >= opponent_moves => {
            return Err(BattleError::InvalidMoveReference(index));
        }
        Some(index) => index,
        None => rng.roll(opponent_moves.max(1) as u32) as usize,
    };

    session.turn += 1;

    let opponent_alive_before: Vec<usize> = session
        .side(Side::Opponent)
        .combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(index, _)| index)
        .collect();

    let first = first_actor(session, command.player_move, opponent_move, rng);
    let second = first.opposite();
    let move_for = |side: Side| match side {
        Side::Player => command.player_move,
        Side::Opponent => opponent_move,
    };

    let mut actions = Vec::with_capacity(2);
    let mut down_first: Option<Side> = None;

    let first_report = perform_action(session, first, move_for(first), rng);
    note_fallen_side(session, &mut down_first);
    let second_koed = matches!(
        first_report.outcome,
        ActionOutcome::Hit {
            knocked_out: true,
            ..
        }
    );
    actions.push(first_report);

    // The second actor still acts when the first merely fell to its own
    // residual tick; only a knockout from the first action preempts it.
    if !second_koed {
        let second_report = perform_action(session, second, move_for(second), rng);
        note_fallen_side(session, &mut down_first);
        actions.push(second_report);
    }

    let experience = settle_defeats(session, &opponent_alive_before);
    let (outcome, rotated_in) = conclude_turn(session, down_first);

    Ok(TurnReport {
        turn: session.turn,
        actions,
        experience,
        rotated_in,
        outcome,
    })
}

/// Priority tiers first, then computed speed, then a fair coin
fn first_actor(
    session: &BattleSession,
    player_move: usize,
    opponent_move: usize,
    rng: &mut dyn BattleRng,
) -> Side {
    let player = session.side(Side::Player).active_combatant();
    let opponent = session.side(Side::Opponent).active_combatant();
    let player_priority = player.moves[player_move].priority;
    let opponent_priority = opponent.moves[opponent_move].priority;

    if player_priority != opponent_priority {
        return if player_priority > opponent_priority {
            Side::Player
        } else {
            Side::Opponent
        };
    }
    if player.stats.speed != opponent.stats.speed {
        return if player.stats.speed > opponent.stats.speed {
            Side::Player
        } else {
            Side::Opponent
        };
    }
    if rng.coin() {
        Side::Player
    } else {
        Side::Opponent
    }
}

/// Execute one actor's action against the opposing active combatant
fn perform_action(
    session: &mut BattleSession,
    side: Side,
    move_index: usize,
    rng: &mut dyn BattleRng,
) -> ActionReport {
    let actor_name = session.side(side).active_combatant().name.clone();

    if session.side(side).active_combatant().is_fainted() {
        session.push_log(format!("{actor_name} cannot attack!"));
        return ActionReport {
            side,
            actor: actor_name,
            move_name: None,
            outcome: ActionOutcome::CannotAttack,
        };
    }

    if side == Side::Player {
        let active = session.side(Side::Player).active;
        session.track_participant(active);
    }

    let tick = {
        let actor = session.side_mut(side).active_combatant_mut();
        start_of_turn_tick(actor, rng)
    };
    if let Some(message) = &tick.message {
        session.push_log(message.clone());
    }
    if session.side(side).active_combatant().is_fainted() {
        let message = tick.message.unwrap_or_default();
        session.push_log(format!("{actor_name} fainted!"));
        return ActionReport {
            side,
            actor: actor_name,
            move_name: None,
            outcome: ActionOutcome::FaintedDuringTick { message },
        };
    }
    if !tick.can_act {
        return ActionReport {
            side,
            actor: actor_name,
            move_name: None,
            outcome: ActionOutcome::StatusBlocked {
                message: tick.message.unwrap_or_default(),
            },
        };
    }

    let (battle_move, accuracy) = {
        let actor = session.side_mut(side).active_combatant_mut();
        let slot = &mut actor.moves[move_index];
        slot.spend_pp();
        (slot.clone(), slot.accuracy.unwrap_or(100))
    };
    let move_name = battle_move.name.clone();

    if rng.roll(101) > accuracy {
        session.push_log(format!("{actor_name}'s {move_name} missed!"));
        return ActionReport {
            side,
            actor: actor_name,
            move_name: Some(move_name),
            outcome: ActionOutcome::Missed,
        };
    }

    if !battle_move.is_damaging() {
        session.push_log(format!("{actor_name} used {move_name}!"));
        return ActionReport {
            side,
            actor: actor_name,
            move_name: Some(move_name),
            outcome: ActionOutcome::StatusMove,
        };
    }

    let outcome = {
        let attacker = session.side(side).active_combatant().clone();
        let defender = session.side_mut(side.opposite()).active_combatant_mut();
        let hit = compute_damage(&attacker, defender, &battle_move, rng);
        let dealt = defender.apply_damage(hit.amount);
        let knocked_out = defender.is_fainted();
        (hit, dealt, knocked_out)
    };
    let (hit, dealt, knocked_out) = outcome;

    session.push_log(format!("{actor_name} used {move_name}!"));
    if hit.critical {
        session.push_log("A critical hit!");
    }
    if hit.effectiveness > 1.0 {
        session.push_log("It's super effective!");
    } else if hit.effectiveness == 0.0 {
        session.push_log("It barely has any effect...");
    } else if hit.effectiveness < 1.0 {
        session.push_log("It's not very effective...");
    }
    let defender_name = session.side(side.opposite()).active_combatant().name.clone();
    session.push_log(format!("{defender_name} took {dealt} damage."));
    if knocked_out {
        session.push_log(format!("{defender_name} fainted!"));
    }

    ActionReport {
        side,
        actor: actor_name,
        move_name: Some(move_name),
        outcome: ActionOutcome::Hit {
            damage: dealt,
            critical: hit.critical,
            effectiveness: hit.effectiveness,
            knocked_out,
        },
    }
}

/// Record the first side to go fully down (simultaneous-K.O. ordering)
fn note_fallen_side(session: &BattleSession, down_first: &mut Option<Side>) {
    if down_first.is_some() {
        return;
    }
    for side in [Side::Player, Side::Opponent] {
        if session.side(side).all_fainted() {
            *down_first = Some(side);
            return;
        }
    }
}

/// Distribute experience for opponents defeated this turn
fn settle_defeats(session: &mut BattleSession, alive_before: &[usize]) -> Vec<ExperienceGain> {
    let defeated: Vec<(u32, u32)> = alive_before
        .iter()
        .filter_map(|&index| {
            let combatant = &session.side(Side::Opponent).combatants[index];
            combatant
                .is_fainted()
                .then_some((combatant.level, combatant.base_experience))
        })
        .collect();

    let mut settlements = Vec::new();
    let participants = session.participants.clone();
    for (level, base_experience) in defeated {
        let gains = distribute_experience(
            &mut session.side_mut(Side::Player).combatants,
            &participants,
            level,
            base_experience,
        );
        for gain in &gains {
            let name = session.side(Side::Player).combatants[gain.party_index]
                .name
                .clone();
            session.push_log(format!("{name} gained {} experience!", gain.gained));
            if gain.leveled_up {
                session.push_log(format!("{name} grew to level {}!", gain.new_level));
            }
        }
        settlements.extend(gains);
    }
    settlements
}

/// End-of-turn termination check and scripted auto-rotation
fn conclude_turn(
    session: &mut BattleSession,
    down_first: Option<Side>,
) -> (BattleOutcome, Option<String>) {
    let player_down = session.side(Side::Player).all_fainted();
    let opponent_down = session.side(Side::Opponent).all_fainted();

    let outcome = if player_down && opponent_down {
        // Whichever side emptied first loses the exchange
        match down_first {
            Some(Side::Opponent) => BattleOutcome::PlayerWon,
            _ => BattleOutcome::OpponentWon,
        }
    } else if player_down {
        BattleOutcome::OpponentWon
    } else if opponent_down {
        BattleOutcome::PlayerWon
    } else {
        BattleOutcome::Ongoing
    };

    if outcome.is_terminal() {
        session.outcome = outcome;
        let message = match outcome {
            BattleOutcome::PlayerWon => "The battle is won!",
            _ => "The battle is lost...",
        };
        session.push_log(message);
        return (outcome, None);
    }

    // Scripted opponents bring in their next teammate mid-battle; wild and
    // pvp battles leave switching to the players.
    let mut rotated_in = None;
    if session.kind == BattleKind::Scripted
        && session.side(Side::Opponent).active_combatant().is_fainted()
    {
        if let Some(next) = session.side(Side::Opponent).next_available() {
            session.side_mut(Side::Opponent).active = next;
            let name = session.side(Side::Opponent).active_combatant().name.clone();
            session.push_log(format!("The opposing trainer sent out {name}!"));
            rotated_in = Some(name);
        }
    }

    (BattleOutcome::Ongoing, rotated_in)
}
