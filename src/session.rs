//! In-memory match sessions.
//!
//! The engine resolves a turn only when it has every intent it needs. In
//! two-player mode the two sides submit separately, so side A's intent waits
//! here until side B submits. Battle states are kept as postcard blobs, the
//! same form an external store would hold.

use crate::battle::engine::{resolve_turn, start_battle};
use crate::battle::state::{BattleState, TurnRng};
use crate::battle::view::{get_view, BattleStateView};
use crate::errors::{BattleResult, SessionError};
use crate::teams::Team;
use schema::{BattleMode, Intent, Side};
use std::collections::HashMap;
use tracing::{debug, info};

/// What happened to a submitted intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored until the other side submits
    Pending,
    /// The turn was resolved; these lines were appended to the battle log
    Resolved { events: Vec<String> },
}

#[derive(Debug, Clone)]
struct StoredMatch {
    blob: Vec<u8>,
    pending_intent: Option<Intent>,
}

#[derive(Debug, Default)]
pub struct MatchStore {
    matches: HashMap<String, StoredMatch>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.matches.contains_key(match_id)
    }

    /// Start a battle between two teams and store it under `match_id`
    pub fn create_match(
        &mut self,
        match_id: &str,
        team_a: &Team,
        team_b: &Team,
        mode: BattleMode,
    ) -> BattleResult<BattleStateView> {
        if self.contains(match_id) {
            return Err(SessionError::MatchExists(match_id.to_string()).into());
        }

        let battle_state = start_battle(team_a, team_b, mode)?;
        let blob = battle_state.to_blob()?;
        self.matches.insert(
            match_id.to_string(),
            StoredMatch {
                blob,
                pending_intent: None,
            },
        );

        info!(match_id, "Match created");
        Ok(get_view(&battle_state))
    }

    /// Decode the current battle state of a match
    pub fn load(&self, match_id: &str) -> BattleResult<BattleState> {
        let stored = self.stored(match_id)?;
        Ok(BattleState::from_blob(&stored.blob)?)
    }

    pub fn view(&self, match_id: &str) -> BattleResult<BattleStateView> {
        Ok(get_view(&self.load(match_id)?))
    }

    /// The intent side A is waiting on, if any
    pub fn pending_intent(&self, match_id: &str) -> BattleResult<Option<Intent>> {
        Ok(self.stored(match_id)?.pending_intent)
    }

    /// Submit one side's intent for the coming turn.
    ///
    /// Against the AI only side A submits and the turn resolves at once. In
    /// two-player mode side A goes first and is held as pending; side B's
    /// submission resolves the turn with both intents. A finished battle
    /// resolves to no events.
    pub fn submit_intent(
        &mut self,
        match_id: &str,
        side: Side,
        intent: Intent,
        rng: TurnRng,
    ) -> BattleResult<SubmitOutcome> {
        let mut battle_state = self.load(match_id)?;
        let pending = self.stored(match_id)?.pending_intent;

        let (intent_a, intent_b) = match (battle_state.mode, side) {
            (_, Side::A) if battle_state.is_over() => (intent, None),
            (BattleMode::Ai, Side::A) => (intent, None),
            (BattleMode::Ai, Side::B) => return Err(SessionError::OutOfTurn(Side::B).into()),
            (BattleMode::Pvp, Side::A) => {
                self.stored_mut(match_id)?.pending_intent = Some(intent);
                debug!(match_id, intent = %intent, "Holding side A intent");
                return Ok(SubmitOutcome::Pending);
            }
            (BattleMode::Pvp, Side::B) => match pending {
                Some(intent_a) => (intent_a, Some(intent)),
                None => return Err(SessionError::OutOfTurn(Side::B).into()),
            },
        };

        let log_before = battle_state.log.len();
        resolve_turn(&mut battle_state, intent_a, intent_b, rng)?;
        let events = battle_state.log[log_before..].to_vec();

        let blob = battle_state.to_blob()?;
        let stored = self.stored_mut(match_id)?;
        stored.blob = blob;
        stored.pending_intent = None;

        debug!(match_id, turn = battle_state.turn, lines = events.len(), "Turn stored");
        Ok(SubmitOutcome::Resolved { events })
    }

    pub fn discard(&mut self, match_id: &str) -> BattleResult<()> {
        match self.matches.remove(match_id) {
            Some(_) => {
                info!(match_id, "Match discarded");
                Ok(())
            }
            None => Err(SessionError::MatchNotFound(match_id.to_string()).into()),
        }
    }

    fn stored(&self, match_id: &str) -> BattleResult<&StoredMatch> {
        self.matches
            .get(match_id)
            .ok_or_else(|| SessionError::MatchNotFound(match_id.to_string()).into())
    }

    fn stored_mut(&mut self, match_id: &str) -> BattleResult<&mut StoredMatch> {
        self.matches
            .get_mut(match_id)
            .ok_or_else(|| SessionError::MatchNotFound(match_id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{predictable_rng, TestTeamBuilder};
    use crate::errors::BattleEngineError;
    use pretty_assertions::assert_eq;

    fn store_with_match(mode: BattleMode) -> MatchStore {
        let mut store = MatchStore::new();
        let team_a = TestTeamBuilder::new("u1", "Team 1").build();
        let team_b = TestTeamBuilder::new("u2", "Team 2").build();
        store.create_match("m1", &team_a, &team_b, mode).unwrap();
        store
    }

    #[test]
    fn test_create_match_stores_fresh_state() {
        let store = store_with_match(BattleMode::Ai);

        assert_eq!(store.len(), 1);
        let view = store.view("m1").unwrap();
        assert_eq!(view.turn, 0);
        assert_eq!(view.mode, BattleMode::Ai);
        assert_eq!(store.pending_intent("m1").unwrap(), None);
    }

    #[test]
    fn test_duplicate_match_id_is_refused() {
        let mut store = store_with_match(BattleMode::Ai);
        let team = TestTeamBuilder::new("u3", "Team 3").build();

        let result = store.create_match("m1", &team, &team, BattleMode::Pvp);
        assert_eq!(
            result.unwrap_err(),
            BattleEngineError::Session(SessionError::MatchExists("m1".to_string()))
        );
        assert_eq!(store.view("m1").unwrap().mode, BattleMode::Ai);
    }

    #[test]
    fn test_ai_match_resolves_on_submit() {
        let mut store = store_with_match(BattleMode::Ai);

        let outcome = store
            .submit_intent("m1", Side::A, Intent::Attack, predictable_rng())
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Resolved {
                events: vec![
                    "--- Turn 1 ---".to_string(),
                    "P1-0 attacks! 20 damage to P2-0.".to_string(),
                    "P2-0 attacks! 20 damage to P1-0.".to_string(),
                ]
            }
        );
        let state = store.load("m1").unwrap();
        assert_eq!(state.turn, 1);
        assert_eq!(state.side_b.active().current_health(), 130);
    }

    #[test]
    fn test_ai_match_refuses_side_b() {
        let mut store = store_with_match(BattleMode::Ai);

        let result = store.submit_intent("m1", Side::B, Intent::Attack, predictable_rng());
        assert_eq!(
            result.unwrap_err(),
            BattleEngineError::Session(SessionError::OutOfTurn(Side::B))
        );
        assert_eq!(store.view("m1").unwrap().turn, 0);
    }

    #[test]
    fn test_pvp_waits_for_both_sides() {
        let mut store = store_with_match(BattleMode::Pvp);

        let first = store
            .submit_intent("m1", Side::A, Intent::Switch { index: 2 }, predictable_rng())
            .unwrap();
        assert_eq!(first, SubmitOutcome::Pending);
        assert_eq!(store.view("m1").unwrap().turn, 0);

        // A later submission from side A replaces the pending one
        store
            .submit_intent("m1", Side::A, Intent::Attack, predictable_rng())
            .unwrap();
        assert_eq!(store.pending_intent("m1").unwrap(), Some(Intent::Attack));

        let second = store
            .submit_intent("m1", Side::B, Intent::Attack, predictable_rng())
            .unwrap();
        let SubmitOutcome::Resolved { events } = second else {
            panic!("Expected the turn to resolve");
        };
        assert_eq!(events.len(), 3);

        let state = store.load("m1").unwrap();
        assert_eq!(state.turn, 1);
        assert_eq!(state.side_a.active_index(), 0);
        assert_eq!(state.side_a.active().current_health(), 130);
        assert_eq!(state.side_b.active().current_health(), 130);
        assert_eq!(store.pending_intent("m1").unwrap(), None);
    }

    #[test]
    fn test_pvp_side_b_cannot_go_first() {
        let mut store = store_with_match(BattleMode::Pvp);

        let result = store.submit_intent("m1", Side::B, Intent::Attack, predictable_rng());
        assert_eq!(
            result.unwrap_err(),
            BattleEngineError::Session(SessionError::OutOfTurn(Side::B))
        );
    }

    #[test]
    fn test_unknown_match_is_reported() {
        let mut store = MatchStore::new();
        let missing = BattleEngineError::Session(SessionError::MatchNotFound("nope".to_string()));

        assert_eq!(store.view("nope").unwrap_err(), missing);
        assert_eq!(
            store
                .submit_intent("nope", Side::A, Intent::Attack, predictable_rng())
                .unwrap_err(),
            missing
        );
        assert_eq!(store.discard("nope").unwrap_err(), missing);
    }

    #[test]
    fn test_discard_removes_match() {
        let mut store = store_with_match(BattleMode::Ai);
        store.discard("m1").unwrap();
        assert!(store.is_empty());
        assert!(!store.contains("m1"));
    }
}
