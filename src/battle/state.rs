use crate::errors::{StoreError, StoreResult};
use crate::roster::{Roster, SwitchFailure};
use schema::{BattleMode, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds of the uniform damage variance roll, inclusive on both ends
pub const DAMAGE_VARIANCE: i32 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
    },

    // Participant switching
    Switched {
        side: Side,
        participant_index: usize,
    },
    SwitchFailed {
        side: Side,
        requested_index: i64,
        reason: SwitchFailure,
    },
    ReplacementSentOut {
        side: Side,
        participant_index: usize,
    },

    // Attacks
    Attacked {
        attacker_side: Side,
        attacker_index: usize,
        defender_index: usize,
        damage: u32,
        remaining_health: u32,
    },
    Fainted {
        side: Side,
        participant_index: usize,
    },

    // Battle end
    OutOfParticipants {
        side: Side,
    },
    BattleEnded {
        winner: Side,
    },
}

impl BattleEvent {
    /// Formats the event into the human-readable line stored in the battle log.
    pub fn format(&self, battle_state: &BattleState) -> String {
        match self {
            BattleEvent::TurnStarted { turn_number } => format!("--- Turn {} ---", turn_number),

            BattleEvent::Switched {
                side,
                participant_index,
            } => {
                let roster = battle_state.side(*side);
                format!(
                    "{} sends out {}!",
                    roster.owner_label,
                    Self::nickname(roster, *participant_index)
                )
            }
            BattleEvent::SwitchFailed {
                side,
                requested_index,
                reason,
            } => format!(
                "{} cannot switch to slot {} ({}).",
                battle_state.side(*side).owner_label,
                requested_index,
                reason
            ),
            BattleEvent::ReplacementSentOut {
                side,
                participant_index,
            } => format!(
                "The opponent sends out {}!",
                Self::nickname(battle_state.side(*side), *participant_index)
            ),

            BattleEvent::Attacked {
                attacker_side,
                attacker_index,
                defender_index,
                damage,
                ..
            } => format!(
                "{} attacks! {} damage to {}.",
                Self::nickname(battle_state.side(*attacker_side), *attacker_index),
                damage,
                Self::nickname(battle_state.side(attacker_side.opponent()), *defender_index)
            ),
            BattleEvent::Fainted {
                side,
                participant_index,
            } => format!(
                "{} is KO'd!",
                Self::nickname(battle_state.side(*side), *participant_index)
            ),

            BattleEvent::OutOfParticipants { side } => match battle_state.mode {
                BattleMode::Ai if *side == Side::B => {
                    "The opponent has no creatures left!".to_string()
                }
                _ => format!(
                    "{} has no creatures left!",
                    battle_state.side(*side).owner_label
                ),
            },
            BattleEvent::BattleEnded { winner } => {
                format!("{} wins the battle!", battle_state.side(*winner).display_name)
            }
        }
    }

    fn nickname(roster: &Roster, index: usize) -> &str {
        roster
            .participant(index)
            .map(|p| p.nickname.as_str())
            .unwrap_or("???")
    }
}

/// Event bus for collecting the typed events of one resolved turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        for event in &self.events {
            println!("  {:?}", event);
        }
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Source of the damage variance rolls consumed while resolving one turn.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<i32>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<i32>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn new_random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        // A turn has at most two attacks; keep a few spare rolls
        let outcomes: Vec<i32> = (0..4)
            .map(|_| rng.random_range(-DAMAGE_VARIANCE..=DAMAGE_VARIANCE))
            .collect();
        Self { outcomes, index: 0 }
    }

    /// Next variance roll, always within `-DAMAGE_VARIANCE..=DAMAGE_VARIANCE`
    pub fn next_variance(&mut self, reason: &str) -> i32 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index].clamp(-DAMAGE_VARIANCE, DAMAGE_VARIANCE);

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}

/// The complete, serializable snapshot of a battle.
///
/// This is the unit a caller persists between turns; the engine keeps nothing
/// else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleState {
    pub turn: u32,
    pub log: Vec<String>,
    pub winner: Option<Side>,
    pub mode: BattleMode,
    pub side_a: Roster,
    pub side_b: Roster,
}

impl BattleState {
    pub fn new(side_a: Roster, side_b: Roster, mode: BattleMode) -> Self {
        Self {
            turn: 0,
            log: Vec::new(),
            winner: None,
            mode,
            side_a,
            side_b,
        }
    }

    pub fn side(&self, side: Side) -> &Roster {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Encode the state as a compact binary blob for an external store
    pub fn to_blob(&self) -> StoreResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| StoreError::Codec(e.to_string()))
    }

    /// Decode a blob produced by `to_blob`. Rosters that break the health
    /// invariants fail to decode.
    pub fn from_blob(bytes: &[u8]) -> StoreResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| StoreError::Codec(e.to_string()))
    }
}

impl fmt::Display for BattleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {} ({} mode)", self.turn, self.mode)?;
        write!(f, "{}", self.side_a)?;
        writeln!(f, "  vs")?;
        write!(f, "{}", self.side_b)?;
        if let Some(winner) = self.winner {
            writeln!(f, "Winner: {}", self.side(winner).display_name)?;
        }
        Ok(())
    }
}
