//! Read-only projection of a battle for presentation layers.

use crate::battle::state::BattleState;
use crate::roster::{Participant, Roster};
use schema::{BattleMode, Side};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub record_id: u64,
    pub catalog_id: u32,
    pub name: String,
    pub nickname: String,
    pub level: u32,
    pub max_health: u32,
    pub current_health: u32,
    pub fainted: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    pub display_name: String,
    pub owner_label: String,
    pub active_index: usize,
    pub participants: Vec<ParticipantView>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleStateView {
    pub turn: u32,
    pub log: Vec<String>,
    pub winner: Option<Side>,
    pub mode: BattleMode,
    pub side_a: RosterView,
    pub side_b: RosterView,
}

impl From<&Participant> for ParticipantView {
    fn from(participant: &Participant) -> Self {
        ParticipantView {
            record_id: participant.record_id,
            catalog_id: participant.catalog_id,
            name: participant.name.clone(),
            nickname: participant.nickname.clone(),
            level: participant.level,
            max_health: participant.max_health(),
            current_health: participant.current_health(),
            fainted: participant.is_fainted(),
        }
    }
}

impl From<&Roster> for RosterView {
    fn from(roster: &Roster) -> Self {
        RosterView {
            display_name: roster.display_name.clone(),
            owner_label: roster.owner_label.clone(),
            active_index: roster.active_index(),
            participants: roster.participants().iter().map(ParticipantView::from).collect(),
        }
    }
}

impl BattleStateView {
    pub fn side(&self, side: Side) -> &RosterView {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Build the read-only view of a battle
pub fn get_view(battle_state: &BattleState) -> BattleStateView {
    BattleStateView {
        turn: battle_state.turn,
        log: battle_state.log.clone(),
        winner: battle_state.winner,
        mode: battle_state.mode,
        side_a: RosterView::from(&battle_state.side_a),
        side_b: RosterView::from(&battle_state.side_b),
    }
}
