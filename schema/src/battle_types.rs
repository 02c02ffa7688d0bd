use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who controls side B of a battle.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum BattleMode {
    /// Side B is driven by the built-in opponent AI.
    #[strum(to_string = "ai", serialize = "pve")]
    Ai,
    /// Both sides submit their own intents.
    #[strum(to_string = "pvp", serialize = "two-player")]
    Pvp,
}

/// One of the two sides of a battle. Side A is always the challenger.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Side {
    #[serde(rename = "side-a")]
    #[strum(to_string = "side-a", serialize = "a")]
    A,
    #[serde(rename = "side-b")]
    #[strum(to_string = "side-b", serialize = "b")]
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}
