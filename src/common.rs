//! Common types for the engine: space states, shot results and errors.

use core::fmt;

use crate::position::Position;
use crate::snapshot::SnapshotError;

/// State of a single board space.
///
/// During play a space only moves `Empty -> Miss` or `Ship -> Hit`; replay
/// rewinding reverses those two transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SpaceState {
    #[default]
    Empty = 0,
    Ship = 1,
    Miss = 2,
    Hit = 3,
}

impl SpaceState {
    /// `true` for spaces that have been fired at.
    pub fn is_resolved(self) -> bool {
        matches!(self, SpaceState::Miss | SpaceState::Hit)
    }

    /// `true` for spaces occupied by a ship, hit or not.
    pub fn is_ship(self) -> bool {
        matches!(self, SpaceState::Ship | SpaceState::Hit)
    }
}

impl From<SpaceState> for u8 {
    fn from(state: SpaceState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for SpaceState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(SpaceState::Empty),
            1 => Ok(SpaceState::Ship),
            2 => Ok(SpaceState::Miss),
            3 => Ok(SpaceState::Hit),
            other => Err(other),
        }
    }
}

/// Result of a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Shot {
    /// The shot landed on a ship space.
    Hit,
    /// The shot landed in open water.
    Miss,
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate lies outside the board.
    OutOfBounds(Position),
    /// Space was already fired at.
    AlreadyResolved(Position),
    /// Every ship space on the target board has been hit.
    AlreadyWon,
    /// No shots are left to replay or undo.
    EmptyReplayLog,
    /// Requested fleet cannot be packed onto the board.
    UnplaceableShipSet { required: usize, capacity: usize },
    /// Manual ship placement is not a straight run of empty, in-bounds spaces.
    InvalidShip,
    /// The editor cannot change a space that was already fired at.
    InvalidEdit(Position),
    /// The opponent has no targets left to draw from.
    TargetsExhausted,
    /// Operation not available in the current session phase.
    WrongPhase,
    /// Snapshot failed validation.
    InvalidSnapshot(SnapshotError),
}

impl From<SnapshotError> for GameError {
    fn from(err: SnapshotError) -> Self {
        GameError::InvalidSnapshot(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds(p) => write!(f, "Position {} is outside the board", p),
            GameError::AlreadyResolved(p) => write!(f, "Position {} was already fired at", p),
            GameError::AlreadyWon => write!(f, "All ships on this board are already sunk"),
            GameError::EmptyReplayLog => write!(f, "No shots left in the replay log"),
            GameError::UnplaceableShipSet { required, capacity } => write!(
                f,
                "Cannot place ships: {} spaces required, {} available",
                required, capacity
            ),
            GameError::InvalidShip => {
                write!(f, "Ship must be a straight run of empty spaces on the board")
            }
            GameError::InvalidEdit(p) => {
                write!(f, "Space {} was fired at and cannot be edited", p)
            }
            GameError::TargetsExhausted => write!(f, "Opponent has no targets left"),
            GameError::WrongPhase => write!(f, "Operation not allowed in the current phase"),
            GameError::InvalidSnapshot(e) => write!(f, "Invalid snapshot: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
