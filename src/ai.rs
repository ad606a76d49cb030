//! Opponent targeting: a search pool plus a hunt queue seeded by hits.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::{
    board::Board,
    common::{GameError, Shot, SpaceState},
    config::hard_radius,
    position::Position,
};

/// Opponent strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Difficulty {
    /// Uniform random fire, no follow-up on hits.
    Easy = 0,
    /// Random fire that hunts around every hit.
    #[default]
    Medium = 1,
    /// Fire jittered around the real ship positions, hunting around hits.
    Hard = 2,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next entry in menu order, saturating at `Hard`.
    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// Previous entry in menu order, saturating at `Easy`.
    pub fn easier(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d as u8
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            other => Err(other),
        }
    }
}

/// Computer opponent firing at the human board.
///
/// `shot_targets` is the search pool and `check_around` the hunt queue.
/// While the hunt queue is non-empty (never on `Easy`) shots are drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetingAi {
    difficulty: Difficulty,
    shot_targets: Vec<Position>,
    check_around: Vec<Position>,
}

impl TargetingAi {
    /// Build the search pool for `target`: every position for `Easy` and
    /// `Medium`, only the ship positions for `Hard`.
    pub fn new(difficulty: Difficulty, target: &Board) -> Self {
        let shot_targets: Vec<Position> = match difficulty {
            Difficulty::Easy | Difficulty::Medium => target.positions().collect(),
            Difficulty::Hard => target.ship_positions().collect(),
        };
        log::debug!(
            "{} opponent with {} search targets",
            difficulty,
            shot_targets.len()
        );
        Self {
            difficulty,
            shot_targets,
            check_around: Vec::new(),
        }
    }

    /// Rebuild an opponent from saved working sets.
    pub fn from_parts(
        difficulty: Difficulty,
        shot_targets: Vec<Position>,
        check_around: Vec<Position>,
    ) -> Self {
        Self {
            difficulty,
            shot_targets,
            check_around,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn shot_targets(&self) -> &[Position] {
        &self.shot_targets
    }

    pub fn check_around(&self) -> &[Position] {
        &self.check_around
    }

    /// `true` while follow-up shots around a hit are pending.
    pub fn hunting(&self) -> bool {
        self.difficulty != Difficulty::Easy && !self.check_around.is_empty()
    }

    /// Fire exactly one resolved shot at `board`.
    ///
    /// Draws that land out of bounds or on a spent space are retried without
    /// returning. Fails with `TargetsExhausted` when both pools are empty.
    pub fn next_shot<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
    ) -> Result<(Position, Shot), GameError> {
        if board.won() {
            return Err(GameError::AlreadyWon);
        }
        if self.difficulty == Difficulty::Hard {
            self.shot_targets
                .retain(|&p| board.get(p).is_some_and(|s| !s.is_resolved()));
        }
        let radius = hard_radius(board.width(), board.height());
        loop {
            let target = self.draw(rng, radius)?;
            match board.fire_at(target) {
                Ok(shot) => {
                    if shot == Shot::Hit {
                        self.shot_targets.retain(|&p| p != target);
                        if self.difficulty != Difficulty::Easy {
                            self.seed_hunt(board, target);
                        }
                    }
                    return Ok((target, shot));
                }
                Err(GameError::OutOfBounds(_)) | Err(GameError::AlreadyResolved(_)) => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Pick the next coordinate to try, removing it from the pools it came from.
    fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R, radius: i32) -> Result<Position, GameError> {
        if self.hunting() {
            let pos = self.check_around[rng.random_range(0..self.check_around.len())];
            self.check_around.retain(|&p| p != pos);
            self.shot_targets.retain(|&p| p != pos);
            return Ok(pos);
        }
        if self.shot_targets.is_empty() {
            return Err(GameError::TargetsExhausted);
        }
        let i = rng.random_range(0..self.shot_targets.len());
        Ok(match self.difficulty {
            Difficulty::Easy | Difficulty::Medium => self.shot_targets.remove(i),
            Difficulty::Hard => {
                let jitter = Position::new(
                    rng.random_range(-radius..=radius),
                    rng.random_range(-radius..=radius),
                );
                self.shot_targets[i] + jitter
            }
        })
    }

    /// Queue the unresolved in-bounds neighbours of a hit.
    fn seed_hunt(&mut self, board: &Board, hit: Position) {
        for n in hit.neighbors() {
            let open = matches!(board.get(n), Some(SpaceState::Empty | SpaceState::Ship));
            if open && !self.check_around.contains(&n) {
                self.check_around.push(n);
            }
        }
        log::debug!(
            "hit at {}, {} follow-up targets queued",
            hit,
            self.check_around.len()
        );
    }
}
