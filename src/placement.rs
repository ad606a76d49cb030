//! Ship specs and random fleet placement.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::{GameError, SpaceState};
use crate::config::{fleet_area, MAX_PLACEMENT_RESTARTS};
use crate::position::Position;

/// `count` ships, each `length` spaces long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipSpec {
    pub count: usize,
    pub length: usize,
}

impl ShipSpec {
    pub const fn new(count: usize, length: usize) -> Self {
        Self { count, length }
    }

    /// Spaces covered by every ship of this spec.
    pub fn area(&self) -> usize {
        self.count * self.length
    }
}

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn step(self) -> Position {
        match self {
            Orientation::Horizontal => Position::new(1, 0),
            Orientation::Vertical => Position::new(0, 1),
        }
    }

    fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Spaces covered by a ship of `length` starting at `origin`.
pub fn ship_cells(
    origin: Position,
    orientation: Orientation,
    length: usize,
) -> impl Iterator<Item = Position> {
    let step = orientation.step();
    (0..length as i32).map(move |i| Position::new(origin.x + step.x * i, origin.y + step.y * i))
}

/// Group individual ship lengths into specs, longest first.
pub fn fleet_from_lengths(lengths: &[usize]) -> Vec<ShipSpec> {
    let mut fleet: Vec<ShipSpec> = Vec::new();
    for &length in lengths.iter().filter(|&&l| l > 0) {
        match fleet.iter_mut().find(|s| s.length == length) {
            Some(spec) => spec.count += 1,
            None => fleet.push(ShipSpec::new(1, length)),
        }
    }
    fleet.sort_by(|a, b| b.length.cmp(&a.length));
    fleet
}

/// A ship laid down by [`place_ships`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedShip {
    pub origin: Position,
    pub orientation: Orientation,
    pub length: usize,
}

impl PlacedShip {
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        ship_cells(self.origin, self.orientation, self.length)
    }
}

fn fits(board: &Board, origin: Position, orientation: Orientation, length: usize) -> bool {
    ship_cells(origin, orientation, length).all(|p| board.get(p) == Some(SpaceState::Empty))
}

/// Randomly place `fleet` on the empty spaces of `board`.
///
/// Ships are placed longest first. Each ship draws random anchors from the
/// free spaces, trying a random orientation and then the other one; anchors
/// that fit neither way are dropped for that ship only. If a ship runs out of
/// anchors every ship placed so far is removed and the whole fleet starts
/// over. Restarts are capped at [`MAX_PLACEMENT_RESTARTS`]; on failure the
/// board is left as it was. Returns the ships in the order they were placed.
pub fn place_ships<R: Rng + ?Sized>(
    board: &mut Board,
    fleet: &[ShipSpec],
    rng: &mut R,
) -> Result<Vec<PlacedShip>, GameError> {
    let mut lengths: Vec<usize> = fleet
        .iter()
        .filter(|s| s.length > 0)
        .flat_map(|s| core::iter::repeat(s.length).take(s.count))
        .collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));

    let free: Vec<Position> = board
        .positions()
        .filter(|&p| board.get(p) == Some(SpaceState::Empty))
        .collect();
    let required = fleet_area(fleet);
    if required > free.len() {
        return Err(GameError::UnplaceableShipSet {
            required,
            capacity: free.len(),
        });
    }
    let longest_run = board.width().max(board.height());
    if lengths.first().is_some_and(|&l| l > longest_run) {
        return Err(GameError::UnplaceableShipSet {
            required,
            capacity: free.len(),
        });
    }

    let mut placed = Vec::with_capacity(lengths.len());
    for attempt in 0..=MAX_PLACEMENT_RESTARTS {
        if try_pack(board, &lengths, free.clone(), &mut placed, rng)? {
            log::debug!(
                "placed {} ships ({} spaces) after {} restarts",
                lengths.len(),
                required,
                attempt
            );
            return Ok(placed);
        }
        log::debug!("placement ran out of anchors, restarting (attempt {})", attempt + 1);
        for ship in placed.drain(..) {
            for p in ship.cells() {
                board.set_space_status(p, SpaceState::Empty)?;
            }
        }
    }
    log::warn!("giving up on placement after {} restarts", MAX_PLACEMENT_RESTARTS);
    Err(GameError::UnplaceableShipSet {
        required,
        capacity: free.len(),
    })
}

/// One pass over the fleet. Returns `false` when a ship found no room; the
/// ships placed so far are left in `placed` for the caller to wipe.
fn try_pack<R: Rng + ?Sized>(
    board: &mut Board,
    lengths: &[usize],
    mut available: Vec<Position>,
    placed: &mut Vec<PlacedShip>,
    rng: &mut R,
) -> Result<bool, GameError> {
    for &length in lengths {
        let mut anchors = available.clone();
        loop {
            if anchors.is_empty() {
                return Ok(false);
            }
            let i = rng.random_range(0..anchors.len());
            let anchor = anchors[i];
            let first = if rng.random() {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            let orientation = [first, first.flipped()]
                .into_iter()
                .find(|&o| fits(board, anchor, o, length));
            let Some(orientation) = orientation else {
                anchors.swap_remove(i);
                continue;
            };
            let ship = PlacedShip {
                origin: anchor,
                orientation,
                length,
            };
            for cell in ship.cells() {
                board.set_space_status(cell, SpaceState::Ship)?;
                available.retain(|&p| p != cell);
            }
            placed.push(ship);
            log::trace!("ship of length {} at {} {:?}", length, anchor, orientation);
            break;
        }
    }
    Ok(true)
}
