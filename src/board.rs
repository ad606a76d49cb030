//! Game board: a grid of space states, ship accounting and the ordered shot log.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::common::{GameError, Shot, SpaceState};
use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::position::Position;
use crate::snapshot::SnapshotError;

/// Serializable board state for saving and replaying games.
///
/// Spaces are stored row by row using the small-integer encoding of
/// [`SpaceState`] (0 empty, 1 ship, 2 miss, 3 hit).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardState {
    pub spaces: Vec<Vec<u8>>,
    pub ship_spaces: u32,
    pub ships_hit: u32,
    pub shots: Vec<Position>,
}

impl BoardState {
    pub fn height(&self) -> usize {
        self.spaces.len()
    }

    pub fn width(&self) -> usize {
        self.spaces.first().map_or(0, Vec::len)
    }

    /// Mirrors [`Board::won`] without rebuilding the board.
    pub fn won(&self) -> bool {
        self.ship_spaces > 0 && self.ships_hit == self.ship_spaces
    }

    /// Check that the grid is rectangular, every value encodes a space state,
    /// the counters match the grid and the shot list matches the resolved
    /// spaces one to one.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let height = self.height();
        let width = self.width();
        if height == 0 || width == 0 {
            return Err(SnapshotError::EmptyGrid);
        }

        let mut ship_spaces = 0u32;
        let mut ships_hit = 0u32;
        for (y, row) in self.spaces.iter().enumerate() {
            if row.len() != width {
                return Err(SnapshotError::RaggedGrid { row: y });
            }
            for (x, &value) in row.iter().enumerate() {
                let state = SpaceState::try_from(value).map_err(|value| {
                    SnapshotError::CellOutOfRange {
                        position: Position::new(x as i32, y as i32),
                        value,
                    }
                })?;
                if state.is_ship() {
                    ship_spaces += 1;
                }
                if state == SpaceState::Hit {
                    ships_hit += 1;
                }
            }
        }
        if ship_spaces != self.ship_spaces {
            return Err(SnapshotError::ShipSpacesMismatch {
                recorded: self.ship_spaces,
                counted: ship_spaces,
            });
        }
        if ships_hit != self.ships_hit {
            return Err(SnapshotError::ShipsHitMismatch {
                recorded: self.ships_hit,
                counted: ships_hit,
            });
        }

        // every shot must land on a distinct resolved space
        let mut matched = alloc::vec![false; width * height];
        for &shot in &self.shots {
            let resolved = index_of(width, height, shot)
                .filter(|&i| self.spaces[i / width][i % width] > SpaceState::Ship as u8);
            let Some(i) = resolved else {
                return Err(SnapshotError::ShotWithoutResolvedSpace(shot));
            };
            if matched[i] {
                return Err(SnapshotError::DuplicateShot(shot));
            }
            matched[i] = true;
        }
        // and every resolved space must have been shot
        for (y, row) in self.spaces.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value > SpaceState::Ship as u8 && !matched[y * width + x] {
                    return Err(SnapshotError::ResolvedSpaceWithoutShot(Position::new(
                        x as i32, y as i32,
                    )));
                }
            }
        }
        Ok(())
    }
}

fn index_of(width: usize, height: usize, pos: Position) -> Option<usize> {
    if pos.x < 0 || pos.y < 0 {
        return None;
    }
    let (x, y) = (pos.x as usize, pos.y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(y * width + x)
}

/// One player's board.
///
/// The shot log and the grid move in lockstep: every `Hit`/`Miss` space has
/// exactly one entry in the log and every entry points at a resolved space.
/// While a replay is in progress the log holds only the shots that have not
/// been re-applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    spaces: Vec<SpaceState>,
    ship_spaces: usize,
    ships_hit: usize,
    resolved: usize,
    shots: VecDeque<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Board {
    /// Create an empty board. Dimensions are clamped to at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Board {
            width,
            height,
            spaces: alloc::vec![SpaceState::Empty; width * height],
            ship_spaces: 0,
            ships_hit: 0,
            resolved: 0,
            shots: VecDeque::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of spaces occupied by ships, hit or not.
    pub fn ship_spaces(&self) -> usize {
        self.ship_spaces
    }

    /// Number of ship spaces that have been hit.
    pub fn ships_hit(&self) -> usize {
        self.ships_hit
    }

    /// Shot log, oldest first.
    pub fn shots(&self) -> &VecDeque<Position> {
        &self.shots
    }

    /// Number of spaces currently resolved as a hit or miss.
    pub fn shots_fired(&self) -> usize {
        self.resolved
    }

    /// Returns `true` when every ship space has been hit.
    pub fn won(&self) -> bool {
        self.ship_spaces > 0 && self.ships_hit == self.ship_spaces
    }

    /// Percentage of shots that hit, rounded to one decimal place. Zero when
    /// nothing has been fired.
    pub fn hit_rate(&self) -> f32 {
        if self.resolved == 0 {
            return 0.0;
        }
        libm::roundf(self.ships_hit as f32 / self.resolved as f32 * 1000.0) / 10.0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// State of the space at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<SpaceState> {
        self.index(pos).map(|i| self.spaces[i])
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[SpaceState]> + '_ {
        self.spaces.chunks(self.width)
    }

    /// Every position on the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Positions holding a ship that has not been hit.
    pub fn ship_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions()
            .filter(move |&p| self.get(p) == Some(SpaceState::Ship))
    }

    /// Fire a shot at `pos` and record it in the shot log.
    pub fn fire_at(&mut self, pos: Position) -> Result<Shot, GameError> {
        if self.won() {
            return Err(GameError::AlreadyWon);
        }
        let shot = self.apply(pos)?;
        self.shots.push_back(pos);
        log::trace!("shot at {} -> {:?}", pos, shot);
        Ok(shot)
    }

    /// Resolve the space at `pos` without touching the shot log.
    fn apply(&mut self, pos: Position) -> Result<Shot, GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        let shot = match self.spaces[i] {
            SpaceState::Empty => {
                self.spaces[i] = SpaceState::Miss;
                Shot::Miss
            }
            SpaceState::Ship => {
                self.spaces[i] = SpaceState::Hit;
                self.ships_hit += 1;
                Shot::Hit
            }
            SpaceState::Miss | SpaceState::Hit => return Err(GameError::AlreadyResolved(pos)),
        };
        self.resolved += 1;
        debug_assert!(self.ships_hit <= self.ship_spaces);
        Ok(shot)
    }

    /// Return a resolved space at `pos` to its pre-shot state.
    fn revert(&mut self, pos: Position) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        match self.spaces[i] {
            SpaceState::Hit => {
                self.spaces[i] = SpaceState::Ship;
                self.ships_hit -= 1;
            }
            SpaceState::Miss => self.spaces[i] = SpaceState::Empty,
            SpaceState::Empty | SpaceState::Ship => return Err(GameError::InvalidEdit(pos)),
        }
        self.resolved -= 1;
        Ok(())
    }

    /// Set an unresolved space to `Empty` or `Ship`, keeping the ship count
    /// in step. Resolved spaces and resolved states are rejected.
    pub fn set_space_status(&mut self, pos: Position, state: SpaceState) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        let current = self.spaces[i];
        if current.is_resolved() || state.is_resolved() {
            return Err(GameError::InvalidEdit(pos));
        }
        match (current, state) {
            (SpaceState::Empty, SpaceState::Ship) => self.ship_spaces += 1,
            (SpaceState::Ship, SpaceState::Empty) => self.ship_spaces -= 1,
            _ => {}
        }
        self.spaces[i] = state;
        Ok(())
    }

    /// Reallocate the grid. With `keep_existing` the overlapping region is
    /// copied and shots that fall outside the new bounds are dropped;
    /// otherwise the board starts over empty. Zero-sized requests do nothing.
    pub fn resize(&mut self, width: usize, height: usize, keep_existing: bool) {
        if width == 0 || height == 0 {
            return;
        }
        let mut resized = Board::new(width, height);
        if keep_existing {
            for y in 0..self.height.min(height) {
                for x in 0..self.width.min(width) {
                    let state = self.spaces[y * self.width + x];
                    resized.spaces[y * width + x] = state;
                    if state.is_ship() {
                        resized.ship_spaces += 1;
                    }
                    if state == SpaceState::Hit {
                        resized.ships_hit += 1;
                    }
                    if state.is_resolved() {
                        resized.resolved += 1;
                    }
                }
            }
            resized.shots = self
                .shots
                .iter()
                .copied()
                .filter(|&p| resized.contains(p))
                .collect();
        }
        *self = resized;
    }

    /// Rewind every resolved space (`Hit -> Ship`, `Miss -> Empty`) while
    /// keeping the shot log, so the log can be stepped back in.
    pub fn prepare_for_replay(&mut self) {
        for space in self.spaces.iter_mut() {
            match *space {
                SpaceState::Hit => {
                    *space = SpaceState::Ship;
                    self.ships_hit -= 1;
                }
                SpaceState::Miss => *space = SpaceState::Empty,
                SpaceState::Empty | SpaceState::Ship => {}
            }
        }
        self.resolved = 0;
        debug_assert_eq!(self.ships_hit, 0);
    }

    /// Take the oldest shot still in the log and re-apply it.
    pub fn replay_next_shot(&mut self) -> Result<Position, GameError> {
        let pos = self.shots.pop_front().ok_or(GameError::EmptyReplayLog)?;
        if let Err(err) = self.apply(pos) {
            self.shots.push_front(pos);
            return Err(err);
        }
        Ok(pos)
    }

    /// Revert the space at `pos` and put it back at the front of the log.
    pub fn undo_last_shot(&mut self, pos: Position) -> Result<(), GameError> {
        self.revert(pos)?;
        self.shots.push_front(pos);
        Ok(())
    }

    /// Take back the most recent live shot: drop it from the end of the log
    /// and revert its space.
    pub fn retract_last_shot(&mut self) -> Result<Position, GameError> {
        let pos = *self.shots.back().ok_or(GameError::EmptyReplayLog)?;
        self.revert(pos)?;
        self.shots.pop_back();
        Ok(pos)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        index_of(self.width, self.height, pos)
    }
}

impl From<&Board> for BoardState {
    fn from(board: &Board) -> Self {
        BoardState {
            spaces: board
                .rows()
                .map(|row| row.iter().map(|&s| u8::from(s)).collect())
                .collect(),
            ship_spaces: board.ship_spaces as u32,
            ships_hit: board.ships_hit as u32,
            shots: board.shots.iter().copied().collect(),
        }
    }
}

impl TryFrom<BoardState> for Board {
    type Error = SnapshotError;

    fn try_from(state: BoardState) -> Result<Self, SnapshotError> {
        state.validate()?;
        let width = state.width();
        let height = state.height();
        let spaces = state
            .spaces
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, &value)| {
                    SpaceState::try_from(value).map_err(|value| SnapshotError::CellOutOfRange {
                        position: Position::new(x as i32, y as i32),
                        value,
                    })
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let resolved = spaces.iter().filter(|s| s.is_resolved()).count();
        debug_assert_eq!(spaces.len(), width * height);
        Ok(Board {
            width,
            height,
            spaces,
            ship_spaces: state.ship_spaces as usize,
            ships_hit: state.ships_hit as usize,
            resolved,
            shots: state.shots.into_iter().collect(),
        })
    }
}
