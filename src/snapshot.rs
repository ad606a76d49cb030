//! Saved game state: both boards, counters, shot order, timer, difficulty and
//! the opponent's working sets.
//!
//! A snapshot is only ever turned back into live state after [`GameSnapshot::validate`]
//! succeeds; nothing is repaired on load.

use alloc::vec::Vec;
use core::fmt;

use crate::{
    ai::{Difficulty, TargetingAi},
    board::{Board, BoardState},
    common::{GameError, SpaceState},
    position::Position,
};

/// Reason a snapshot was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    DifficultyOutOfRange(u8),
    NegativeTimer(i64),
    EmptyGrid,
    RaggedGrid { row: usize },
    DimensionMismatch,
    CellOutOfRange { position: Position, value: u8 },
    ShipSpacesMismatch { recorded: u32, counted: u32 },
    ShipsHitMismatch { recorded: u32, counted: u32 },
    ShotWithoutResolvedSpace(Position),
    ResolvedSpaceWithoutShot(Position),
    DuplicateShot(Position),
    /// An opponent target lies outside the human board.
    TargetOutOfBounds(Position),
    /// The human still has ships afloat but the opponent has no open target.
    NoOpenTargets,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::DifficultyOutOfRange(d) => write!(f, "difficulty tag {} out of range", d),
            SnapshotError::NegativeTimer(ms) => write!(f, "negative timer {}ms", ms),
            SnapshotError::EmptyGrid => write!(f, "board grid is empty"),
            SnapshotError::RaggedGrid { row } => write!(f, "grid row {} has the wrong width", row),
            SnapshotError::DimensionMismatch => write!(f, "board dimensions differ"),
            SnapshotError::CellOutOfRange { position, value } => {
                write!(f, "space {} holds invalid value {}", position, value)
            }
            SnapshotError::ShipSpacesMismatch { recorded, counted } => write!(
                f,
                "ship space count {} does not match {} ship spaces on the grid",
                recorded, counted
            ),
            SnapshotError::ShipsHitMismatch { recorded, counted } => write!(
                f,
                "hit count {} does not match {} hit spaces on the grid",
                recorded, counted
            ),
            SnapshotError::ShotWithoutResolvedSpace(p) => {
                write!(f, "shot at {} has no resolved space", p)
            }
            SnapshotError::ResolvedSpaceWithoutShot(p) => {
                write!(f, "resolved space {} has no recorded shot", p)
            }
            SnapshotError::DuplicateShot(p) => write!(f, "shot at {} recorded twice", p),
            SnapshotError::TargetOutOfBounds(p) => {
                write!(f, "opponent target {} is outside the board", p)
            }
            SnapshotError::NoOpenTargets => {
                write!(f, "opponent has no open target left while ships remain")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SnapshotError {}

/// Everything needed to resume or replay a game.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    /// The human's board, fired at by the opponent.
    pub player: BoardState,
    /// The opponent's board, fired at by the human.
    pub enemy: BoardState,
    /// Active play time in milliseconds.
    pub elapsed_ms: i64,
    /// 0 easy, 1 medium, 2 hard.
    pub difficulty: u8,
    pub shot_targets: Vec<Position>,
    pub check_around: Vec<Position>,
}

impl GameSnapshot {
    pub fn capture(player: &Board, enemy: &Board, ai: &TargetingAi, elapsed_ms: u64) -> Self {
        GameSnapshot {
            player: BoardState::from(player),
            enemy: BoardState::from(enemy),
            elapsed_ms: elapsed_ms.min(i64::MAX as u64) as i64,
            difficulty: u8::from(ai.difficulty()),
            shot_targets: ai.shot_targets().to_vec(),
            check_around: ai.check_around().to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        Difficulty::try_from(self.difficulty).map_err(SnapshotError::DifficultyOutOfRange)?;
        if self.elapsed_ms < 0 {
            return Err(SnapshotError::NegativeTimer(self.elapsed_ms));
        }
        self.player.validate()?;
        self.enemy.validate()?;
        if self.player.width() != self.enemy.width() || self.player.height() != self.enemy.height()
        {
            return Err(SnapshotError::DimensionMismatch);
        }
        self.validate_targets()
    }

    /// Opponent working sets must point inside the human board and, while
    /// any human ship is afloat, include at least one unresolved space.
    fn validate_targets(&self) -> Result<(), SnapshotError> {
        let grid = &self.player.spaces;
        let state_at = |p: &Position| {
            if p.x < 0 || p.y < 0 {
                return None;
            }
            grid.get(p.y as usize)?.get(p.x as usize).copied()
        };
        let mut open = false;
        for p in self.shot_targets.iter().chain(&self.check_around) {
            let value = state_at(p).ok_or(SnapshotError::TargetOutOfBounds(*p))?;
            open |= value <= SpaceState::Ship as u8;
        }
        if !open && !self.player.won() {
            return Err(SnapshotError::NoOpenTargets);
        }
        Ok(())
    }

    /// Neither side has sunk the other's fleet yet.
    pub fn is_ongoing(&self) -> bool {
        !self.player.won() && !self.enemy.won()
    }

    /// The human sank every enemy ship.
    pub fn player_won(&self) -> bool {
        self.enemy.won()
    }

    pub fn difficulty(&self) -> Result<Difficulty, SnapshotError> {
        Difficulty::try_from(self.difficulty).map_err(SnapshotError::DifficultyOutOfRange)
    }

    /// Validate and rebuild `(player, enemy, opponent)`.
    pub fn restore(self) -> Result<(Board, Board, TargetingAi), GameError> {
        if let Err(err) = self.validate() {
            log::warn!("rejecting snapshot: {}", err);
            return Err(err.into());
        }
        let difficulty = self.difficulty()?;
        let player = Board::try_from(self.player)?;
        let enemy = Board::try_from(self.enemy)?;
        let ai = TargetingAi::from_parts(difficulty, self.shot_targets, self.check_around);
        Ok((player, enemy, ai))
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a JSON snapshot.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    #[cfg(feature = "std")]
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a bincode snapshot.
    #[cfg(feature = "std")]
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let snapshot: GameSnapshot = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
