// Pokedex Arena Schema - Shared type definitions
// Plain enums shared between the battle engine, its session layer and the
// binaries that drive it.

pub use battle_types::*;
pub use intent::*;

pub mod battle_types;
pub mod intent;
