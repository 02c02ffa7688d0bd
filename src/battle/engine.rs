use crate::battle::ai::{Behavior, FirstAvailableAI};
use crate::battle::calculators::calculate_damage;
use crate::battle::state::{BattleEvent, BattleState, EventBus, TurnRng};
use crate::errors::{ActionError, BattleResult};
use crate::roster::build_roster;
use crate::teams::Team;
use schema::{BattleMode, Intent, Side};
use tracing::{debug, info};

/// Snapshot two battle-ready teams into a fresh battle at turn 0.
pub fn start_battle(team_a: &Team, team_b: &Team, mode: BattleMode) -> BattleResult<BattleState> {
    let side_a = build_roster(team_a)?;
    let side_b = build_roster(team_b)?;

    info!(
        mode = %mode,
        "Battle started: {} vs {}",
        side_a.display_name,
        side_b.display_name
    );
    Ok(BattleState::new(side_a, side_b, mode))
}

/// Parse an intent from its JSON wire form, e.g. `{"kind":"switch","index":2}`
pub fn parse_intent(json: &str) -> BattleResult<Intent> {
    serde_json::from_str(json).map_err(|e| ActionError::MalformedIntent(e.to_string()).into())
}

/// Resolve one turn with the default opponent AI driving side B in vs-AI mode.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    intent_a: Intent,
    intent_b: Option<Intent>,
    rng: TurnRng,
) -> BattleResult<EventBus> {
    resolve_turn_with(battle_state, intent_a, intent_b, rng, &FirstAvailableAI::new())
}

/// Resolve one turn of the battle.
///
/// Order inside a turn is fixed: side A's switch, then the opponent's
/// replacement (vs-AI) or switch (two-player), then A attacks B, then B
/// attacks A. A finished battle is left untouched and yields no events.
///
/// In two-player mode a missing `intent_b` means side B does nothing this
/// turn. In vs-AI mode `intent_b` must be `None`.
pub fn resolve_turn_with<B: Behavior>(
    battle_state: &mut BattleState,
    intent_a: Intent,
    intent_b: Option<Intent>,
    mut rng: TurnRng,
    opponent: &B,
) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();

    if let Some(winner) = battle_state.winner {
        debug!(winner = %winner, "Battle already decided, ignoring turn");
        return Ok(bus);
    }
    if battle_state.mode == BattleMode::Ai && intent_b.is_some() {
        return Err(ActionError::UnexpectedOpponentIntent.into());
    }

    battle_state.turn += 1;
    let turn_number = battle_state.turn;
    debug!(turn = turn_number, intent_a = %intent_a, "Resolving turn");
    emit(battle_state, &mut bus, BattleEvent::TurnStarted { turn_number });

    // Switches always resolve before any attack
    if let Intent::Switch { index } = intent_a {
        execute_switch(battle_state, Side::A, index, &mut bus);
    }

    match battle_state.mode {
        BattleMode::Ai => {
            if !send_out_replacement(battle_state, opponent, &mut bus) {
                emit(
                    battle_state,
                    &mut bus,
                    BattleEvent::OutOfParticipants { side: Side::B },
                );
                end_battle(battle_state, Side::A, &mut bus);
                return Ok(bus);
            }
        }
        BattleMode::Pvp => {
            if let Some(Intent::Switch { index }) = intent_b {
                execute_switch(battle_state, Side::B, index, &mut bus);
            }
        }
    }

    if intent_a == Intent::Attack && execute_attack(battle_state, Side::A, &mut bus, &mut rng) {
        return Ok(bus);
    }

    let b_attacks = match battle_state.mode {
        BattleMode::Ai => true,
        BattleMode::Pvp => intent_b == Some(Intent::Attack),
    };
    if b_attacks {
        execute_attack(battle_state, Side::B, &mut bus, &mut rng);
    }

    Ok(bus)
}

/// Record an event: its text goes to the battle log, the event to the bus.
fn emit(battle_state: &mut BattleState, bus: &mut EventBus, event: BattleEvent) {
    let line = event.format(battle_state);
    debug!(turn = battle_state.turn, "{}", line);
    battle_state.log.push(line);
    bus.push(event);
}

/// A refused switch is logged and otherwise ignored; the side's action is
/// spent either way.
fn execute_switch(battle_state: &mut BattleState, side: Side, slot: i64, bus: &mut EventBus) {
    match battle_state.side_mut(side).switch_to_slot(slot) {
        Ok(participant_index) => emit(
            battle_state,
            bus,
            BattleEvent::Switched {
                side,
                participant_index,
            },
        ),
        Err(reason) => emit(
            battle_state,
            bus,
            BattleEvent::SwitchFailed {
                side,
                requested_index: slot,
                reason,
            },
        ),
    }
}

/// Make sure the AI side has a participant standing in front.
/// Returns false when every participant on side B is KO'd.
fn send_out_replacement<B: Behavior>(
    battle_state: &mut BattleState,
    opponent: &B,
    bus: &mut EventBus,
) -> bool {
    let roster = &battle_state.side_b;
    if !roster.active().is_fainted() {
        return true;
    }

    let chosen = opponent
        .choose_replacement(roster)
        .filter(|&i| roster.participant(i).is_some_and(|p| !p.is_fainted()))
        .or_else(|| roster.first_available());

    let Some(index) = chosen else {
        return false;
    };
    if battle_state.side_b.switch_to(index).is_err() {
        return false;
    }

    emit(
        battle_state,
        bus,
        BattleEvent::ReplacementSentOut {
            side: Side::B,
            participant_index: index,
        },
    );
    true
}

/// The attacker's active participant hits the opponent's active one.
/// Nothing happens if either of them is KO'd. Returns true if this attack
/// decided the battle.
fn execute_attack(
    battle_state: &mut BattleState,
    attacker_side: Side,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) -> bool {
    let defender_side = attacker_side.opponent();
    let attacker = battle_state.side(attacker_side).active();
    if attacker.is_fainted() || battle_state.side(defender_side).active().is_fainted() {
        return false;
    }

    let damage = calculate_damage(attacker, rng);
    let attacker_index = battle_state.side(attacker_side).active_index();
    let defender_roster = battle_state.side_mut(defender_side);
    let defender_index = defender_roster.active_index();
    let remaining_health = defender_roster.active_mut().take_damage(damage);

    emit(
        battle_state,
        bus,
        BattleEvent::Attacked {
            attacker_side,
            attacker_index,
            defender_index,
            damage,
            remaining_health,
        },
    );

    if remaining_health > 0 {
        return false;
    }

    emit(
        battle_state,
        bus,
        BattleEvent::Fainted {
            side: defender_side,
            participant_index: defender_index,
        },
    );

    if battle_state.side(defender_side).all_fainted() {
        end_battle(battle_state, attacker_side, bus);
        return true;
    }
    false
}

fn end_battle(battle_state: &mut BattleState, winner: Side, bus: &mut EventBus) {
    battle_state.winner = Some(winner);
    emit(battle_state, bus, BattleEvent::BattleEnded { winner });
    info!(
        winner = %winner,
        turn = battle_state.turn,
        "{} won the battle",
        battle_state.side(winner).display_name
    );
}
