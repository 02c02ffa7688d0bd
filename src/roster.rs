use crate::creature::Creature;
use crate::errors::{BattleResult, RosterError};
use crate::teams::{Team, TEAM_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// Battle health is a flat formula of the level, not of species base stats
pub fn max_health_for_level(level: u32) -> u32 {
    100u32.saturating_add(level.saturating_mul(5))
}

/// One creature's live battle state, snapshotted from its persisted record.
///
/// Health only changes through `take_damage` and `set_health`, which keep
/// `fainted` equal to `current_health == 0`. Deserialized values are checked
/// against the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParticipantData")]
pub struct Participant {
    pub record_id: u64,
    pub catalog_id: u32,
    pub name: String,
    pub nickname: String, // Nickname if the record has one, otherwise the name
    pub level: u32,
    max_health: u32,
    current_health: u32,
    fainted: bool,
}

/// Unchecked wire form of a `Participant`
#[derive(Deserialize)]
struct ParticipantData {
    record_id: u64,
    catalog_id: u32,
    name: String,
    nickname: String,
    level: u32,
    max_health: u32,
    current_health: u32,
    fainted: bool,
}

impl TryFrom<ParticipantData> for Participant {
    type Error = String;

    fn try_from(data: ParticipantData) -> Result<Self, Self::Error> {
        let participant = Participant {
            record_id: data.record_id,
            catalog_id: data.catalog_id,
            name: data.name,
            nickname: data.nickname,
            level: data.level,
            max_health: data.max_health,
            current_health: data.current_health,
            fainted: data.fainted,
        };
        if !participant.is_consistent() {
            return Err(format!(
                "participant {} has health {}/{} with fainted={}",
                participant.record_id,
                participant.current_health,
                participant.max_health,
                participant.fainted
            ));
        }
        Ok(participant)
    }
}

impl Participant {
    pub fn from_creature(creature: &Creature) -> Self {
        let level = creature.level.max(1);
        let max_health = max_health_for_level(level);
        Participant {
            record_id: creature.record_id,
            catalog_id: creature.catalog_id,
            name: creature.name.clone(),
            nickname: creature.display_name().to_string(),
            level,
            max_health,
            current_health: max_health,
            fainted: false,
        }
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    /// Subtract damage, flooring at zero. Returns the remaining health.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.set_health(self.current_health.saturating_sub(damage));
        self.current_health
    }

    /// Set health directly, clamped to `0..=max_health`
    pub fn set_health(&mut self, health: u32) {
        self.current_health = health.min(self.max_health);
        self.fainted = self.current_health == 0;
    }

    /// True when the health and faint flag agree with each other
    pub fn is_consistent(&self) -> bool {
        self.current_health <= self.max_health && self.fainted == (self.current_health == 0)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Lv. {}) HP: {}/{}",
            self.nickname, self.level, self.current_health, self.max_health
        )?;
        if self.fainted {
            write!(f, " [KO]")?;
        }
        Ok(())
    }
}

/// Why a switch request was refused. The display text is used in the battle log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SwitchFailure {
    #[strum(to_string = "no such slot")]
    OutOfRange,
    #[strum(to_string = "that creature is KO'd")]
    TargetFainted,
}

/// One side's battle lineup. The order is fixed at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RosterData")]
pub struct Roster {
    pub display_name: String,
    pub owner_label: String,
    participants: [Participant; TEAM_SIZE],
    active_index: usize,
}

/// Unchecked wire form of a `Roster`
#[derive(Deserialize)]
struct RosterData {
    display_name: String,
    owner_label: String,
    participants: [Participant; TEAM_SIZE],
    active_index: usize,
}

impl TryFrom<RosterData> for Roster {
    type Error = String;

    fn try_from(data: RosterData) -> Result<Self, Self::Error> {
        if data.active_index >= TEAM_SIZE {
            return Err(format!(
                "active index {} is outside the roster of '{}'",
                data.active_index, data.display_name
            ));
        }
        Ok(Roster {
            display_name: data.display_name,
            owner_label: data.owner_label,
            participants: data.participants,
            active_index: data.active_index,
        })
    }
}

impl Roster {
    pub fn new(
        display_name: String,
        owner_label: String,
        participants: [Participant; TEAM_SIZE],
    ) -> Self {
        Roster {
            display_name,
            owner_label,
            participants,
            active_index: 0,
        }
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> &Participant {
        &self.participants[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Participant {
        &mut self.participants[self.active_index]
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn participant_mut(&mut self, index: usize) -> Option<&mut Participant> {
        self.participants.get_mut(index)
    }

    /// Make `index` the active participant if it exists and can still fight
    pub fn switch_to(&mut self, index: usize) -> Result<(), SwitchFailure> {
        let target = self
            .participants
            .get(index)
            .ok_or(SwitchFailure::OutOfRange)?;
        if target.is_fainted() {
            return Err(SwitchFailure::TargetFainted);
        }
        self.active_index = index;
        Ok(())
    }

    /// `switch_to` for a slot number taken from an intent, which may be
    /// negative. Returns the index that became active.
    pub fn switch_to_slot(&mut self, slot: i64) -> Result<usize, SwitchFailure> {
        let index = usize::try_from(slot).map_err(|_| SwitchFailure::OutOfRange)?;
        self.switch_to(index)?;
        Ok(index)
    }

    /// First participant in stored order that has not fainted
    pub fn first_available(&self) -> Option<usize> {
        self.participants.iter().position(|p| !p.is_fainted())
    }

    pub fn all_fainted(&self) -> bool {
        self.participants.iter().all(|p| p.is_fainted())
    }

    pub fn is_consistent(&self) -> bool {
        self.active_index < TEAM_SIZE && self.participants.iter().all(|p| p.is_consistent())
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.display_name, self.owner_label)?;
        for (i, participant) in self.participants.iter().enumerate() {
            let marker = if i == self.active_index { ">" } else { " " };
            writeln!(f, " {} {}. {}", marker, i, participant)?;
        }
        Ok(())
    }
}

/// Snapshot a battle-ready team into a roster.
///
/// The team must hold exactly five creatures of its owner; anything else is
/// refused rather than padded or truncated.
pub fn build_roster(team: &Team) -> BattleResult<Roster> {
    team.ensure_battle_ready()?;

    let participants: Vec<Participant> =
        team.members.iter().map(Participant::from_creature).collect();
    let participants: [Participant; TEAM_SIZE] =
        participants
            .try_into()
            .map_err(|leftover: Vec<Participant>| RosterError::NotBattleReady {
                team: team.name.clone(),
                size: leftover.len(),
            })?;

    Ok(Roster::new(team.name.clone(), team.owner.clone(), participants))
}
