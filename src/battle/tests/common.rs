use crate::battle::engine::start_battle;
use crate::battle::state::{BattleState, TurnRng};
use crate::creature::Creature;
use crate::errors::BattleResult;
use crate::teams::Team;
use schema::{BattleMode, Side};

/// A builder for creating battle-ready test teams with common defaults.
///
/// Members are named `P{n}-{i}` where `n` is taken from the team name's last
/// character, so "Team 2" yields `P2-0` .. `P2-4`.
///
/// # Example
/// ```ignore
/// let team = TestTeamBuilder::new("u1", "Team 1")
///     .with_levels([5, 10, 15, 20, 25])
///     .build();
/// ```
pub struct TestTeamBuilder {
    owner: String,
    name: String,
    levels: [u32; 5],
    nicknames: [Option<String>; 5],
}

impl TestTeamBuilder {
    /// Creates a builder for a team of five level 10 creatures.
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            levels: [10; 5],
            nicknames: Default::default(),
        }
    }

    pub fn with_levels(mut self, levels: [u32; 5]) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_nickname(mut self, slot: usize, nickname: &str) -> Self {
        self.nicknames[slot] = Some(nickname.to_string());
        self
    }

    pub fn build(self) -> Team {
        let prefix = self.name.chars().last().unwrap_or('0');
        let record_base = prefix.to_digit(10).unwrap_or(0) as u64 * 100;

        let mut team = match Team::new(record_base, &self.owner, &self.name, 0) {
            Ok(team) => team,
            Err(err) => panic!("Failed to create test team {}: {}", self.name, err),
        };
        for (i, level) in self.levels.iter().enumerate() {
            let mut creature = Creature::new(
                record_base + i as u64,
                record_base as u32 + i as u32 + 1,
                &self.owner,
                &format!("P{}-{}", prefix, i),
            )
            .with_level(*level);
            if let Some(nickname) = &self.nicknames[i] {
                creature = creature.with_nickname(nickname);
            }
            if let Err(err) = team.add_member(creature) {
                panic!("Failed to add member to {}: {}", self.name, err);
            }
        }
        team
    }
}

/// Creates the standard battle: "Team 1" (owner u1) vs "Team 2" (owner u2),
/// five level 10 creatures each, 150 max health all round.
pub fn create_test_battle(mode: BattleMode) -> BattleState {
    let team_a = TestTeamBuilder::new("u1", "Team 1").build();
    let team_b = TestTeamBuilder::new("u2", "Team 2").build();
    assert_ok(start_battle(&team_a, &team_b, mode))
}

/// KO every participant on `side` except `survivor`, which is left with
/// `health` and made active.
pub fn leave_last_standing(state: &mut BattleState, side: Side, survivor: usize, health: u32) {
    let roster = state.side_mut(side);
    for i in 0..5 {
        if let Some(participant) = roster.participant_mut(i) {
            participant.set_health(if i == survivor { health } else { 0 });
        }
    }
    if let Err(reason) = roster.switch_to(survivor) {
        panic!("Could not make slot {} active: {:?}", survivor, reason);
    }
}

/// Creates a `TurnRng` with a neutral roll (0) for every draw.
/// Useful for tests where the specific variance is not important.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0; 8])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Asserts the health invariants hold for every participant on both sides.
pub fn assert_consistent(state: &BattleState) {
    for side in [Side::A, Side::B] {
        assert!(state.side(side).is_consistent(), "{:?} roster is inconsistent", side);
        for participant in state.side(side).participants() {
            assert!(
                participant.current_health() <= participant.max_health(),
                "{} has more health than its maximum",
                participant.nickname
            );
            assert_eq!(
                participant.is_fainted(),
                participant.current_health() == 0,
                "{} has a faint flag that disagrees with its health",
                participant.nickname
            );
        }
    }
}
