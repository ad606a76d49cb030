//! Step-by-step playback of a saved game.

use alloc::vec::Vec;

use crate::{board::Board, common::GameError, position::Position, snapshot::GameSnapshot};

/// Which board a replayed shot landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The human's board, fired at by the opponent.
    Player,
    /// The opponent's board, fired at by the human.
    Enemy,
}

/// Both boards rewound to their pre-game layout, re-driven from their shot
/// logs. Turns alternate starting with the human's shot at the enemy board.
#[derive(Debug, Clone)]
pub struct Replay {
    player: Board,
    enemy: Board,
    history: Vec<Position>,
}

impl Replay {
    pub fn new(snapshot: GameSnapshot) -> Result<Self, GameError> {
        let (player, enemy, _) = snapshot.restore()?;
        Ok(Self::from_boards(player, enemy))
    }

    pub fn from_boards(mut player: Board, mut enemy: Board) -> Self {
        player.prepare_for_replay();
        enemy.prepare_for_replay();
        Self {
            player,
            enemy,
            history: Vec::new(),
        }
    }

    pub fn player(&self) -> &Board {
        &self.player
    }

    pub fn enemy(&self) -> &Board {
        &self.enemy
    }

    /// Number of shots replayed so far.
    pub fn position(&self) -> usize {
        self.history.len()
    }

    /// `true` once a fleet is sunk or the next board has no shots left.
    pub fn finished(&self) -> bool {
        self.player.won() || self.enemy.won() || self.board(self.next_side()).shots().is_empty()
    }

    fn next_side(&self) -> Side {
        if self.history.len() % 2 == 0 {
            Side::Enemy
        } else {
            Side::Player
        }
    }

    fn board(&self, side: Side) -> &Board {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    fn board_mut(&mut self, side: Side) -> &mut Board {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Re-apply the next shot in turn order.
    pub fn step_forward(&mut self) -> Result<(Side, Position), GameError> {
        if self.player.won() || self.enemy.won() {
            return Err(GameError::EmptyReplayLog);
        }
        let side = self.next_side();
        let pos = self.board_mut(side).replay_next_shot()?;
        self.history.push(pos);
        Ok((side, pos))
    }

    /// Undo the most recently replayed shot.
    pub fn step_back(&mut self) -> Result<(Side, Position), GameError> {
        let pos = self.history.pop().ok_or(GameError::EmptyReplayLog)?;
        let side = self.next_side();
        if let Err(err) = self.board_mut(side).undo_last_shot(pos) {
            self.history.push(pos);
            return Err(err);
        }
        Ok((side, pos))
    }

    /// Replay everything that is left. Returns the number of shots applied.
    pub fn to_end(&mut self) -> usize {
        let mut steps = 0;
        while self.step_forward().is_ok() {
            steps += 1;
        }
        steps
    }
}
