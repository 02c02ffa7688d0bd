use schema::Side;
use std::fmt;

/// Main error type for the Pokedex Arena battle engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEngineError {
    /// A team could not be turned into a roster, or a team rule was broken
    Roster(RosterError),
    /// An intent was malformed or not allowed in this battle
    Action(ActionError),
    /// The creature store failed to load or persist a record
    Store(StoreError),
    /// The match session layer rejected a request
    Session(SessionError),
}

/// Errors related to teams and roster snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A battle needs exactly five members on each side
    NotBattleReady { team: String, size: usize },
    /// The team already holds the maximum number of members
    TeamFull { team: String },
    /// A member does not belong to the team's owner
    ForeignMember { team: String, record_id: u64 },
    /// Team names cannot be blank
    BlankName,
    /// Owners have five team slots, numbered 0 to 4
    InvalidSlot(u8),
}

/// Errors related to player intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The intent payload could not be understood
    MalformedIntent(String),
    /// An opponent intent was supplied while the AI controls side B
    UnexpectedOpponentIntent,
}

/// Errors related to persisted creature records and state blobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No creature with this record id exists in the store
    CreatureNotFound(u64),
    /// A stored battle state could not be encoded or decoded
    Codec(String),
}

/// Errors related to match sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No match is stored under this id
    MatchNotFound(String),
    /// A match is already stored under this id
    MatchExists(String),
    /// The side submitted an intent when it was not its turn to do so
    OutOfTurn(Side),
}

impl fmt::Display for BattleEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEngineError::Roster(err) => write!(f, "Roster error: {}", err),
            BattleEngineError::Action(err) => write!(f, "Action error: {}", err),
            BattleEngineError::Store(err) => write!(f, "Store error: {}", err),
            BattleEngineError::Session(err) => write!(f, "Session error: {}", err),
        }
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::NotBattleReady { team, size } => write!(
                f,
                "Team '{}' has {} members, a battle needs exactly 5",
                team, size
            ),
            RosterError::TeamFull { team } => {
                write!(f, "Team '{}' cannot hold more than 5 members", team)
            }
            RosterError::ForeignMember { team, record_id } => write!(
                f,
                "Creature {} does not belong to the owner of team '{}'",
                record_id, team
            ),
            RosterError::BlankName => write!(f, "Team name cannot be blank"),
            RosterError::InvalidSlot(slot) => {
                write!(f, "Invalid team slot {}, expected 0 to 4", slot)
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::MalformedIntent(details) => write!(f, "Malformed intent: {}", details),
            ActionError::UnexpectedOpponentIntent => {
                write!(f, "Side B is AI-controlled and cannot receive an intent")
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::CreatureNotFound(id) => write!(f, "Creature not found: {}", id),
            StoreError::Codec(details) => write!(f, "State codec failure: {}", details),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MatchNotFound(id) => write!(f, "Match not found: {}", id),
            SessionError::MatchExists(id) => write!(f, "Match already exists: {}", id),
            SessionError::OutOfTurn(side) => write!(f, "It is not {}'s turn to act", side),
        }
    }
}

impl std::error::Error for BattleEngineError {}
impl std::error::Error for RosterError {}
impl std::error::Error for ActionError {}
impl std::error::Error for StoreError {}
impl std::error::Error for SessionError {}

impl From<RosterError> for BattleEngineError {
    fn from(err: RosterError) -> Self {
        BattleEngineError::Roster(err)
    }
}

impl From<ActionError> for BattleEngineError {
    fn from(err: ActionError) -> Self {
        BattleEngineError::Action(err)
    }
}

impl From<StoreError> for BattleEngineError {
    fn from(err: StoreError) -> Self {
        BattleEngineError::Store(err)
    }
}

impl From<SessionError> for BattleEngineError {
    fn from(err: SessionError) -> Self {
        BattleEngineError::Session(err)
    }
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using StoreError
pub type StoreResult<T> = Result<T, StoreError>;
