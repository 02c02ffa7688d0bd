//! Experience and leveling rules for persisted creatures.
//!
//! These run outside of battle: a collaborator grants experience (after a
//! win, a trade, a daily bonus...) and the creature is written back through a
//! `CreatureStore`.

use crate::creature::Creature;
use crate::errors::BattleResult;
use crate::store::CreatureStore;
use tracing::{debug, info};

// Experience needed to leave level L is EXP_PER_LEVEL * L
const EXP_PER_LEVEL: u32 = 100;

/// Experience a creature at `level` must accumulate to reach the next level
pub fn experience_threshold(level: u32) -> u32 {
    EXP_PER_LEVEL.saturating_mul(level)
}

/// Result of applying an experience grant to a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpOutcome {
    pub levels_gained: u32,
    pub new_level: u32,
}

impl LevelUpOutcome {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

impl Creature {
    /// Add experience and resolve every level-up it pays for.
    ///
    /// The threshold is recomputed after each level, so one large grant can
    /// cross several levels. Leftover experience stays on the creature.
    pub fn apply_experience(&mut self, amount: u32) -> LevelUpOutcome {
        self.experience = self.experience.saturating_add(amount);

        let mut levels_gained = 0;
        let mut needed = experience_threshold(self.level);
        while self.experience >= needed {
            self.level += 1;
            self.experience -= needed;
            needed = experience_threshold(self.level);
            levels_gained += 1;
        }

        LevelUpOutcome {
            levels_gained,
            new_level: self.level,
        }
    }
}

/// Grant experience to a creature and persist the result.
///
/// Returns `true` when at least one level-up happened. All level-ups are
/// resolved before the record is saved.
pub fn gain_experience<S: CreatureStore>(
    store: &mut S,
    creature: &mut Creature,
    amount: u32,
) -> BattleResult<bool> {
    let outcome = creature.apply_experience(amount);
    store.save(creature)?;

    if outcome.leveled_up() {
        info!(
            record_id = creature.record_id,
            levels = outcome.levels_gained,
            level = outcome.new_level,
            "{} grew to level {}",
            creature.display_name(),
            outcome.new_level
        );
    } else {
        debug!(
            record_id = creature.record_id,
            experience = creature.experience,
            "{} gained {} XP",
            creature.display_name(),
            amount
        );
    }

    Ok(outcome.leveled_up())
}
