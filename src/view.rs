//! Read-only text rendering of a board for whatever front end draws it.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{board::Board, common::SpaceState, position::Position};

/// Character shown for a space. Ships are blanked out when `hidden`.
pub fn glyph(state: SpaceState, hidden: bool) -> char {
    match state {
        SpaceState::Empty => ' ',
        SpaceState::Ship if hidden => ' ',
        SpaceState::Ship => 'O',
        SpaceState::Miss => '*',
        SpaceState::Hit => 'X',
    }
}

fn divider(width: usize) -> String {
    let mut line = String::with_capacity(width * 4 + 1);
    line.push('+');
    for _ in 0..width {
        line.push_str("---+");
    }
    line
}

/// Bordered grid, one string per line. The `selected` space is drawn as `H`.
///
/// ```text
/// +---+---+
/// | O | * |
/// +---+---+
/// ```
pub fn draw_lines(board: &Board, selected: Option<Position>, hidden: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(board.height() * 2 + 1);
    lines.push(divider(board.width()));
    for (y, row) in board.rows().enumerate() {
        let mut line = String::from("|");
        for (x, &state) in row.iter().enumerate() {
            let here = Position::new(x as i32, y as i32);
            let ch = if selected == Some(here) {
                'H'
            } else {
                glyph(state, hidden)
            };
            line.push(' ');
            line.push(ch);
            line.push_str(" |");
        }
        lines.push(line);
        lines.push(divider(board.width()));
    }
    lines
}

/// Width in characters of a line produced by [`draw_lines`].
pub fn line_width(board: &Board) -> usize {
    board.width() * 4 + 1
}
