use serde::{Deserialize, Serialize};
use std::fmt;

fn default_level() -> u32 {
    1
}

/// A creature record as persisted by the collection store.
///
/// Battles never mutate this record; they work on a `Participant` snapshot.
/// Only the leveling rules in `progression` change `level` and `experience`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub record_id: u64,
    pub catalog_id: u32, // Species id in the external catalog, used for sprites
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
}

impl Creature {
    /// Create a freshly caught creature at level 1 with no experience
    pub fn new(record_id: u64, catalog_id: u32, owner: &str, name: &str) -> Self {
        Self {
            record_id,
            catalog_id,
            owner: owner.to_string(),
            name: name.to_string(),
            nickname: None,
            level: default_level(),
            experience: 0,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    /// The nickname when one is set and not blank, otherwise the species name
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nickname) if !nickname.trim().is_empty() => nickname,
            _ => &self.name,
        }
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (#{}, Lv. {}, {} XP, trainer {})",
            self.display_name(),
            self.catalog_id,
            self.level,
            self.experience,
            self.owner
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creature_defaults() {
        let creature = Creature::new(7, 25, "ash", "Pikachu");
        assert_eq!(creature.level, 1);
        assert_eq!(creature.experience, 0);
        assert_eq!(creature.display_name(), "Pikachu");
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let creature = Creature::new(7, 25, "ash", "Pikachu").with_nickname("Sparky");
        assert_eq!(creature.display_name(), "Sparky");

        let blank = Creature::new(8, 25, "ash", "Pikachu").with_nickname("  ");
        assert_eq!(blank.display_name(), "Pikachu");
    }

    #[test]
    fn test_level_is_never_zero() {
        let creature = Creature::new(1, 1, "ash", "Bulbasaur").with_level(0);
        assert_eq!(creature.level, 1);
    }

    #[test]
    fn test_ron_record_fills_defaults() {
        let creature: Creature = ron::from_str(
            r#"(record_id: 3, catalog_id: 4, owner: "misty", name: "Charmander")"#,
        )
        .unwrap();
        assert_eq!(creature.level, 1);
        assert_eq!(creature.nickname, None);
    }
}
