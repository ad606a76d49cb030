use battleships::{view, Board, Position, SpaceState};

#[test]
fn test_draw_lines_layout() {
    let mut board = Board::new(3, 2);
    board.set_space_status(Position::new(0, 0), SpaceState::Ship).unwrap();
    board.set_space_status(Position::new(1, 0), SpaceState::Ship).unwrap();
    board.fire_at(Position::new(1, 0)).unwrap();
    board.fire_at(Position::new(2, 1)).unwrap();

    let lines = view::draw_lines(&board, None, false);
    assert_eq!(
        lines,
        vec![
            "+---+---+---+",
            "| O | X |   |",
            "+---+---+---+",
            "|   |   | * |",
            "+---+---+---+",
        ]
    );
    assert!(lines.iter().all(|l| l.len() == view::line_width(&board)));
}

#[test]
fn test_hidden_board_and_cursor() {
    let mut board = Board::new(2, 1);
    board.set_space_status(Position::new(0, 0), SpaceState::Ship).unwrap();
    let lines = view::draw_lines(&board, Some(Position::new(1, 0)), true);
    assert_eq!(lines[1], "|   | H |");
    assert_eq!(view::glyph(SpaceState::Ship, true), ' ');
    assert_eq!(view::glyph(SpaceState::Hit, true), 'X');
}
