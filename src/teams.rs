use crate::creature::Creature;
use crate::errors::RosterError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of creatures a battle-ready team holds
pub const TEAM_SIZE: usize = 5;

/// Number of team slots each owner has
pub const TEAM_SLOTS: u8 = 5;

/// A named lineup of up to five creatures belonging to one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub position: u8, // Owner's slot (0-4) this team occupies
    #[serde(default)]
    pub members: Vec<Creature>,
}

/// The layout of a RON team data file
#[derive(Debug, Clone, Deserialize)]
struct TeamFile {
    teams: Vec<Team>,
}

impl Team {
    pub fn new(id: u64, owner: &str, name: &str, position: u8) -> Result<Self, RosterError> {
        if position >= TEAM_SLOTS {
            return Err(RosterError::InvalidSlot(position));
        }
        if name.trim().is_empty() {
            return Err(RosterError::BlankName);
        }

        Ok(Team {
            id,
            owner: owner.to_string(),
            name: name.to_string(),
            position,
            members: Vec::new(),
        })
    }

    /// Append a creature to the lineup. Members keep their insertion order,
    /// which is the order they are sent out in battle.
    pub fn add_member(&mut self, creature: Creature) -> Result<(), RosterError> {
        if self.members.len() >= TEAM_SIZE {
            return Err(RosterError::TeamFull {
                team: self.name.clone(),
            });
        }
        if creature.owner != self.owner {
            return Err(RosterError::ForeignMember {
                team: self.name.clone(),
                record_id: creature.record_id,
            });
        }

        self.members.push(creature);
        Ok(())
    }

    pub fn rename(&mut self, new_name: &str) -> Result<(), RosterError> {
        if new_name.trim().is_empty() {
            return Err(RosterError::BlankName);
        }
        self.name = new_name.to_string();
        Ok(())
    }

    pub fn is_battle_ready(&self) -> bool {
        self.ensure_battle_ready().is_ok()
    }

    /// Check the rules a lineup must satisfy before it can be snapshotted
    pub fn ensure_battle_ready(&self) -> Result<(), RosterError> {
        if self.members.len() != TEAM_SIZE {
            return Err(RosterError::NotBattleReady {
                team: self.name.clone(),
                size: self.members.len(),
            });
        }
        self.ensure_members_owned()
    }

    fn ensure_members_owned(&self) -> Result<(), RosterError> {
        match self.members.iter().find(|c| c.owner != self.owner) {
            Some(foreign) => Err(RosterError::ForeignMember {
                team: self.name.clone(),
                record_id: foreign.record_id,
            }),
            None => Ok(()),
        }
    }
}

/// Load every team from a RON data file.
///
/// Teams read from disk bypass `add_member`, so the size and ownership rules
/// are checked here instead.
pub fn load_teams(path: &Path) -> Result<Vec<Team>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Team data file not found: {}", path.display()).into());
    }

    let content = fs::read_to_string(path)?;
    let file: TeamFile = ron::from_str(&content)?;

    for team in &file.teams {
        if team.members.len() > TEAM_SIZE {
            return Err(RosterError::TeamFull {
                team: team.name.clone(),
            }
            .into());
        }
        if team.position >= TEAM_SLOTS {
            return Err(RosterError::InvalidSlot(team.position).into());
        }
        team.ensure_members_owned()?;
    }

    Ok(file.teams)
}

/// Find a team by case-insensitive name
pub fn find_team<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
