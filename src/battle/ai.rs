//! A module for defining AI behaviors for battle opponents.

use crate::roster::Roster;
use schema::Intent;

/// A trait for any system that can decide on a battle action for a roster.
pub trait Behavior {
    /// Pick which participant to send out once the active one is KO'd.
    /// `None` means the roster has nothing left to send.
    fn choose_replacement(&self, roster: &Roster) -> Option<usize>;

    /// Decide the intent for the coming turn.
    fn decide_intent(&self, roster: &Roster) -> Intent {
        if roster.active().is_fainted() {
            if let Some(index) = self.choose_replacement(roster) {
                return Intent::Switch {
                    index: index as i64,
                };
            }
        }
        Intent::Attack
    }
}

/// The opponent used in vs-AI battles: always attacks, and replaces a KO'd
/// participant with the first one still standing in roster order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailableAI;

impl FirstAvailableAI {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for FirstAvailableAI {
    fn choose_replacement(&self, roster: &Roster) -> Option<usize> {
        roster.first_available()
    }
}
