// In: src/lib.rs

//! Pokedex Arena Battle Engine
//!
//! A turn-based battle engine for teams of five creatures. Each call to
//! `resolve_turn` advances a serializable `BattleState` by exactly one turn,
//! so callers can persist the state between requests.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod creature;
pub mod errors;
pub mod mcp_interface;
pub mod progression;
pub mod roster;
pub mod session;
pub mod store;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Wire-level enums shared with clients.
pub use schema::{BattleMode, Intent, Side};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::ai::{Behavior, FirstAvailableAI};
pub use battle::engine::{parse_intent, resolve_turn, resolve_turn_with, start_battle};
pub use battle::state::{BattleEvent, BattleState, EventBus, TurnRng};
pub use battle::view::{get_view, BattleStateView};

// Teams, snapshots and persistence.
pub use creature::Creature;
pub use progression::gain_experience;
pub use roster::{build_roster, Participant, Roster};
pub use session::{MatchStore, SubmitOutcome};
pub use store::{CreatureStore, InMemoryCreatureStore};
pub use teams::{load_teams, Team};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, RosterError, SessionError, StoreError,
    StoreResult,
};
