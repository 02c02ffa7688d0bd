//! Persistence seam for creature records.
//!
//! The battle engine never talks to a database. Anything that needs to write a
//! creature back (the leveling rules) goes through `CreatureStore`.

use crate::creature::Creature;
use crate::errors::{StoreError, StoreResult};
use std::collections::HashMap;

pub trait CreatureStore {
    /// Fetch a copy of the stored record
    fn load(&self, record_id: u64) -> StoreResult<Creature>;

    /// Insert or overwrite the record keyed by its `record_id`
    fn save(&mut self, creature: &Creature) -> StoreResult<()>;
}

/// A `CreatureStore` backed by a HashMap, for tests and the demo binaries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCreatureStore {
    records: HashMap<u64, Creature>,
}

impl InMemoryCreatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CreatureStore for InMemoryCreatureStore {
    fn load(&self, record_id: u64) -> StoreResult<Creature> {
        self.records
            .get(&record_id)
            .cloned()
            .ok_or(StoreError::CreatureNotFound(record_id))
    }

    fn save(&mut self, creature: &Creature) -> StoreResult<()> {
        self.records.insert(creature.record_id, creature.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_then_load_returns_latest_record() {
        let mut store = InMemoryCreatureStore::new();
        let mut creature = Creature::new(1, 143, "red", "Snorlax");
        store.save(&creature).unwrap();

        creature.level = 12;
        store.save(&creature).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.load(1).unwrap().level, 12);
    }

    #[test]
    fn test_load_unknown_record() {
        let store = InMemoryCreatureStore::new();
        assert!(store.is_empty());
        assert_eq!(store.load(99), Err(StoreError::CreatureNotFound(99)));
    }
}
