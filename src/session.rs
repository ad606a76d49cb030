//! A single game from board sizing to game over.
//!
//! The session can be driven with discrete [`Input`] events (the way a
//! terminal front end would) or through the direct methods, which is what
//! tests and the harness binary do. Either way every call is one atomic step.

use alloc::vec::Vec;
use rand::Rng;

use crate::{
    ai::{Difficulty, TargetingAi},
    board::Board,
    clock::{Stopwatch, TimeSource},
    common::{GameError, Shot, SpaceState},
    placement::{fleet_from_lengths, place_ships, ShipSpec},
    position::Position,
    snapshot::GameSnapshot,
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BoardSizing,
    ShipAllocation,
    DifficultySelection,
    Gameplay,
    GameOver,
}

/// Discrete input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Start/finish a ship, or fire.
    Select,
    /// Confirm the current phase.
    Confirm,
    /// Toggle pause.
    Cancel,
}

impl Input {
    /// Cursor movement for directional inputs, zero for the rest.
    pub fn movement(self) -> Position {
        match self {
            Input::Up => Position::new(0, -1),
            Input::Down => Position::new(0, 1),
            Input::Left => Position::new(-1, 0),
            Input::Right => Position::new(1, 0),
            Input::Select | Input::Confirm | Input::Cancel => Position::new(0, 0),
        }
    }
}

/// What happened during one human turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player_shot: (Position, Shot),
    /// `None` when the human's shot ended the game.
    pub opponent_shot: Option<(Position, Shot)>,
    pub game_over: bool,
}

pub struct Session<R, T> {
    phase: Phase,
    paused: bool,
    player: Board,
    enemy: Board,
    ai: Option<TargetingAi>,
    difficulty: Difficulty,
    ship_lengths: Vec<usize>,
    cursor: Position,
    origin: Option<Position>,
    clock: Stopwatch,
    rng: R,
    time: T,
}

fn clamp_to(board: &Board, pos: Position) -> Position {
    Position::new(
        pos.x.clamp(0, board.width() as i32 - 1),
        pos.y.clamp(0, board.height() as i32 - 1),
    )
}

impl<R: Rng, T: TimeSource> Session<R, T> {
    /// New session at board sizing with a default-sized board.
    pub fn new(rng: R, time: T) -> Self {
        Self {
            phase: Phase::BoardSizing,
            paused: false,
            player: Board::default(),
            enemy: Board::default(),
            ai: None,
            difficulty: Difficulty::default(),
            ship_lengths: Vec::new(),
            cursor: Position::default(),
            origin: None,
            clock: Stopwatch::default(),
            rng,
            time,
        }
    }

    /// Continue a saved game. The clock resumes from the saved elapsed time.
    pub fn resume(snapshot: GameSnapshot, rng: R, time: T) -> Result<Self, GameError> {
        let elapsed = snapshot.elapsed_ms.max(0) as u64;
        let (player, enemy, ai) = snapshot.restore()?;
        let phase = if player.won() || enemy.won() {
            Phase::GameOver
        } else {
            Phase::Gameplay
        };
        let mut clock = Stopwatch::with_offset(elapsed);
        if phase == Phase::Gameplay {
            clock.start(time.now_ms());
        }
        log::info!("resumed {} game at {}ms ({:?})", ai.difficulty(), elapsed, phase);
        Ok(Self {
            phase,
            paused: false,
            player,
            enemy,
            difficulty: ai.difficulty(),
            ai: Some(ai),
            ship_lengths: Vec::new(),
            cursor: Position::default(),
            origin: None,
            clock,
            rng,
            time,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// The human's board.
    pub fn player(&self) -> &Board {
        &self.player
    }

    /// The opponent's board.
    pub fn enemy(&self) -> &Board {
        &self.enemy
    }

    pub fn opponent(&self) -> Option<&TargetingAi> {
        self.ai.as_ref()
    }

    /// Selected (or, once playing, active) difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// First corner of a ship being placed with [`Input::Select`].
    pub fn pending_origin(&self) -> Option<Position> {
        self.origin
    }

    /// Ships placed by the human so far, longest first. Empty after resuming.
    pub fn fleet(&self) -> Vec<ShipSpec> {
        fleet_from_lengths(&self.ship_lengths)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms(self.time.now_ms())
    }

    /// `Some(true)` if the human won, `Some(false)` if the opponent did.
    pub fn winner_is_player(&self) -> Option<bool> {
        (self.phase == Phase::GameOver).then(|| self.enemy.won())
    }

    fn require(&self, phase: Phase) -> Result<(), GameError> {
        if self.paused || self.phase != phase {
            return Err(GameError::WrongPhase);
        }
        Ok(())
    }

    /// Pause or unpause. Not available once the game is over.
    pub fn toggle_pause(&mut self) -> Result<bool, GameError> {
        if self.phase == Phase::GameOver {
            return Err(GameError::WrongPhase);
        }
        self.paused = !self.paused;
        if self.phase == Phase::Gameplay {
            let now = self.time.now_ms();
            if self.paused {
                self.clock.stop(now);
            } else {
                self.clock.start(now);
            }
        }
        log::debug!("paused: {}", self.paused);
        Ok(self.paused)
    }

    /// Change the human board's size. Dimensions below 1 are clamped.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GameError> {
        self.require(Phase::BoardSizing)?;
        self.player.resize(width.max(1), height.max(1), false);
        Ok(())
    }

    /// Lock the board size and mirror it onto the enemy board.
    pub fn confirm_size(&mut self) -> Result<(), GameError> {
        self.require(Phase::BoardSizing)?;
        self.enemy = Board::new(self.player.width(), self.player.height());
        self.cursor = Position::default();
        self.phase = Phase::ShipAllocation;
        log::info!(
            "board size {}x{} confirmed",
            self.player.width(),
            self.player.height()
        );
        Ok(())
    }

    /// Place a ship covering the straight run from `from` to `to` inclusive.
    /// Returns its length.
    pub fn place_ship(&mut self, from: Position, to: Position) -> Result<usize, GameError> {
        self.require(Phase::ShipAllocation)?;
        if from.x != to.x && from.y != to.y {
            return Err(GameError::InvalidShip);
        }
        let (lo, hi) = (from.min(to), from.max(to));
        let cells: Vec<Position> = (lo.y..=hi.y)
            .flat_map(|y| (lo.x..=hi.x).map(move |x| Position::new(x, y)))
            .collect();
        if !cells
            .iter()
            .all(|&p| self.player.get(p) == Some(SpaceState::Empty))
        {
            return Err(GameError::InvalidShip);
        }
        for &p in &cells {
            self.player.set_space_status(p, SpaceState::Ship)?;
        }
        self.ship_lengths.push(cells.len());
        log::debug!("ship of length {} placed from {} to {}", cells.len(), from, to);
        Ok(cells.len())
    }

    /// Randomly place `fleet` on the human board instead of drawing ships by hand.
    pub fn auto_place(&mut self, fleet: &[ShipSpec]) -> Result<(), GameError> {
        self.require(Phase::ShipAllocation)?;
        place_ships(&mut self.player, fleet, &mut self.rng)?;
        for spec in fleet.iter().filter(|s| s.length > 0) {
            self.ship_lengths
                .extend(core::iter::repeat(spec.length).take(spec.count));
        }
        Ok(())
    }

    /// Finish allocation and generate the same fleet on the enemy board.
    /// Needs at least one ship.
    pub fn confirm_ships(&mut self) -> Result<(), GameError> {
        self.require(Phase::ShipAllocation)?;
        if self.ship_lengths.is_empty() {
            return Err(GameError::WrongPhase);
        }
        let fleet = self.fleet();
        place_ships(&mut self.enemy, &fleet, &mut self.rng)?;
        self.origin = None;
        self.phase = Phase::DifficultySelection;
        log::info!("fleet of {} ships confirmed", self.ship_lengths.len());
        Ok(())
    }

    /// Pick the opponent, build its target pool and start the clock.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.require(Phase::DifficultySelection)?;
        self.difficulty = difficulty;
        self.ai = Some(TargetingAi::new(difficulty, &self.player));
        self.clock.start(self.time.now_ms());
        self.cursor = Position::default();
        self.phase = Phase::Gameplay;
        log::info!("game started on {}", difficulty);
        Ok(())
    }

    /// Fire at the enemy board, then let the opponent answer. Spent or
    /// out-of-bounds targets are rejected without using up the turn. If the
    /// opponent cannot answer, the human's shot is taken back so the two
    /// shot logs stay in turn order.
    pub fn fire(&mut self, pos: Position) -> Result<TurnOutcome, GameError> {
        self.require(Phase::Gameplay)?;
        if self.ai.is_none() {
            return Err(GameError::WrongPhase);
        }
        self.clock.start(self.time.now_ms());
        let shot = self.enemy.fire_at(pos)?;
        if self.enemy.won() {
            self.finish();
            return Ok(TurnOutcome {
                player_shot: (pos, shot),
                opponent_shot: None,
                game_over: true,
            });
        }
        let ai = self.ai.as_mut().ok_or(GameError::WrongPhase)?;
        let reply = match ai.next_shot(&mut self.player, &mut self.rng) {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("opponent could not answer ({}), taking back {}", err, pos);
                self.enemy.retract_last_shot()?;
                return Err(err);
            }
        };
        let game_over = self.player.won();
        if game_over {
            self.finish();
        }
        Ok(TurnOutcome {
            player_shot: (pos, shot),
            opponent_shot: Some(reply),
            game_over,
        })
    }

    fn finish(&mut self) {
        self.clock.stop(self.time.now_ms());
        self.phase = Phase::GameOver;
        log::info!(
            "game over: {} won after {}ms",
            if self.enemy.won() { "player" } else { "opponent" },
            self.clock.elapsed_ms(self.time.now_ms())
        );
    }

    /// Capture the game for saving. Only available once play has started.
    pub fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        match (&self.ai, self.phase) {
            (Some(ai), Phase::Gameplay | Phase::GameOver) => Ok(GameSnapshot::capture(
                &self.player,
                &self.enemy,
                ai,
                self.elapsed_ms(),
            )),
            _ => Err(GameError::WrongPhase),
        }
    }

    /// Save through a snapshot store and return the slot used.
    #[cfg(feature = "std")]
    pub fn save(&self, store: &mut dyn crate::store::SnapshotStore) -> anyhow::Result<u64> {
        let snapshot = self.snapshot()?;
        store.save(&snapshot)
    }

    /// Apply one input event. Returns `true` when anything visible changed.
    pub fn update(&mut self, input: Input) -> bool {
        if input == Input::Cancel {
            return self.toggle_pause().is_ok();
        }
        if self.paused {
            return false;
        }
        match self.phase {
            Phase::BoardSizing => self.sizing_input(input),
            Phase::ShipAllocation => self.allocation_input(input),
            Phase::DifficultySelection => self.difficulty_input(input),
            Phase::Gameplay => self.gameplay_input(input),
            Phase::GameOver => false,
        }
    }

    fn sizing_input(&mut self, input: Input) -> bool {
        if input == Input::Confirm {
            return self.confirm_size().is_ok();
        }
        let step = input.movement();
        let width = (self.player.width() as i32 + step.x).max(1) as usize;
        let height = (self.player.height() as i32 + step.y).max(1) as usize;
        if width == self.player.width() && height == self.player.height() {
            return false;
        }
        self.resize(width, height).is_ok()
    }

    fn allocation_input(&mut self, input: Input) -> bool {
        match input {
            Input::Confirm => return self.confirm_ships().is_ok(),
            Input::Select => {
                return match self.origin.take() {
                    Some(origin) => self.place_ship(origin, self.cursor).is_ok(),
                    None if self.player.get(self.cursor) == Some(SpaceState::Empty) => {
                        self.origin = Some(self.cursor);
                        true
                    }
                    None => false,
                };
            }
            _ => {}
        }
        let target = clamp_to(&self.player, self.cursor + input.movement());
        let Some(origin) = self.origin else {
            let moved = target != self.cursor;
            self.cursor = target;
            return moved;
        };
        // while a ship is being drawn the cursor stays on the origin's row or
        // column and only moves onto empty water
        let along_row = self.cursor.y == origin.y && target.y == self.cursor.y;
        let along_col = self.cursor.x == origin.x && target.x == self.cursor.x;
        if target != self.cursor
            && (along_row || along_col)
            && self.player.get(target) == Some(SpaceState::Empty)
        {
            self.cursor = target;
            return true;
        }
        false
    }

    fn difficulty_input(&mut self, input: Input) -> bool {
        match input {
            Input::Up => {
                let prev = self.difficulty;
                self.difficulty = prev.easier();
                prev != self.difficulty
            }
            Input::Down => {
                let prev = self.difficulty;
                self.difficulty = prev.harder();
                prev != self.difficulty
            }
            Input::Confirm | Input::Select => self.choose_difficulty(self.difficulty).is_ok(),
            _ => false,
        }
    }

    fn gameplay_input(&mut self, input: Input) -> bool {
        if input == Input::Select {
            return self.fire(self.cursor).is_ok();
        }
        let target = clamp_to(&self.enemy, self.cursor + input.movement());
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }
}
