use battleships::{Board, BoardState, GameError, Position, Shot, SpaceState};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn board_with_ships(width: usize, height: usize, ships: &[Position]) -> Board {
    let mut board = Board::new(width, height);
    for &pos in ships {
        board.set_space_status(pos, SpaceState::Ship).unwrap();
    }
    board
}

#[test]
fn test_hit_updates_counters_and_log() {
    let mut board = board_with_ships(10, 10, &[p(3, 3)]);
    assert_eq!(board.fire_at(p(3, 3)).unwrap(), Shot::Hit);
    assert_eq!(board.get(p(3, 3)), Some(SpaceState::Hit));
    assert_eq!(board.ships_hit(), 1);
    assert_eq!(board.shots().iter().copied().collect::<Vec<_>>(), vec![p(3, 3)]);
    assert!(board.won());
}

#[test]
fn test_miss_marks_space() {
    let mut board = board_with_ships(10, 10, &[p(3, 3)]);
    assert_eq!(board.fire_at(p(0, 0)).unwrap(), Shot::Miss);
    assert_eq!(board.get(p(0, 0)), Some(SpaceState::Miss));
    assert_eq!(board.ships_hit(), 0);
    assert_eq!(board.shots_fired(), 1);
    assert!(!board.won());
}

#[test]
fn test_second_shot_is_rejected_without_changes() {
    let mut board = board_with_ships(10, 10, &[p(3, 3), p(3, 4)]);
    board.fire_at(p(3, 3)).unwrap();
    let before = board.clone();
    assert_eq!(
        board.fire_at(p(3, 3)).unwrap_err(),
        GameError::AlreadyResolved(p(3, 3))
    );
    assert_eq!(board, before);
}

#[test]
fn test_out_of_bounds_is_rejected() {
    let mut board = Board::new(4, 3);
    for pos in [p(-1, 0), p(0, -1), p(4, 0), p(0, 3)] {
        assert_eq!(board.fire_at(pos).unwrap_err(), GameError::OutOfBounds(pos));
    }
    assert!(board.shots().is_empty());
    assert_eq!(board.get(p(4, 0)), None);
    assert!(!board.contains(p(0, 3)));
}

#[test]
fn test_won_board_rejects_shots() {
    let mut board = board_with_ships(3, 3, &[p(1, 1)]);
    board.fire_at(p(1, 1)).unwrap();
    assert_eq!(board.fire_at(p(0, 0)).unwrap_err(), GameError::AlreadyWon);
    assert_eq!(board.shots_fired(), 1);
}

#[test]
fn test_board_without_ships_is_never_won() {
    let mut board = Board::new(2, 2);
    assert!(!board.won());
    board.fire_at(p(0, 0)).unwrap();
    assert!(!board.won());
}

#[test]
fn test_hit_rate_rounds_to_one_decimal() {
    let mut board = board_with_ships(5, 5, &[p(0, 0), p(1, 0)]);
    assert_eq!(board.hit_rate(), 0.0);
    board.fire_at(p(0, 0)).unwrap();
    board.fire_at(p(4, 4)).unwrap();
    board.fire_at(p(3, 4)).unwrap();
    // 1 of 3
    assert_eq!(board.hit_rate(), 33.3);
    board.fire_at(p(1, 0)).unwrap();
    assert_eq!(board.hit_rate(), 50.0);
}

#[test]
fn test_new_clamps_dimensions() {
    let board = Board::new(0, 0);
    assert_eq!((board.width(), board.height()), (1, 1));
    let board = Board::default();
    assert_eq!((board.width(), board.height()), (10, 10));
}

#[test]
fn test_set_space_status_tracks_ship_count() {
    let mut board = Board::new(4, 4);
    board.set_space_status(p(1, 1), SpaceState::Ship).unwrap();
    board.set_space_status(p(1, 1), SpaceState::Ship).unwrap();
    assert_eq!(board.ship_spaces(), 1);
    board.set_space_status(p(1, 1), SpaceState::Empty).unwrap();
    assert_eq!(board.ship_spaces(), 0);
}

#[test]
fn test_set_space_status_rejects_resolved() {
    let mut board = board_with_ships(4, 4, &[p(0, 0), p(1, 0)]);
    board.fire_at(p(0, 0)).unwrap();
    assert_eq!(
        board.set_space_status(p(0, 0), SpaceState::Empty).unwrap_err(),
        GameError::InvalidEdit(p(0, 0))
    );
    assert_eq!(
        board.set_space_status(p(2, 2), SpaceState::Miss).unwrap_err(),
        GameError::InvalidEdit(p(2, 2))
    );
    assert_eq!(
        board.set_space_status(p(9, 9), SpaceState::Ship).unwrap_err(),
        GameError::OutOfBounds(p(9, 9))
    );
    assert_eq!(board.ship_spaces(), 2);
}

#[test]
fn test_resize_keep_existing_copies_overlap() {
    let mut board = board_with_ships(5, 5, &[p(0, 0), p(4, 4)]);
    board.fire_at(p(1, 1)).unwrap();
    board.fire_at(p(4, 3)).unwrap();
    board.resize(3, 6, true);
    assert_eq!((board.width(), board.height()), (3, 6));
    assert_eq!(board.get(p(0, 0)), Some(SpaceState::Ship));
    assert_eq!(board.get(p(1, 1)), Some(SpaceState::Miss));
    assert_eq!(board.get(p(2, 5)), Some(SpaceState::Empty));
    assert_eq!(board.ship_spaces(), 1);
    assert_eq!(board.shots().iter().copied().collect::<Vec<_>>(), vec![p(1, 1)]);
    assert!(BoardState::from(&board).validate().is_ok());
}

#[test]
fn test_resize_discard_and_zero() {
    let mut board = board_with_ships(5, 5, &[p(0, 0)]);
    board.resize(0, 7, false);
    assert_eq!((board.width(), board.height()), (5, 5));
    board.resize(7, 2, false);
    assert_eq!((board.width(), board.height()), (7, 2));
    assert_eq!(board.ship_spaces(), 0);
    assert!(board.shots().is_empty());
    assert!(board.positions().all(|pos| board.get(pos) == Some(SpaceState::Empty)));
}

#[test]
fn test_replay_rewinds_and_reapplies_in_order() {
    let mut board = board_with_ships(4, 4, &[p(0, 0), p(0, 1)]);
    let order = [p(2, 2), p(0, 0), p(3, 1), p(0, 1)];
    for pos in order {
        board.fire_at(pos).unwrap();
    }
    let finished = board.clone();

    board.prepare_for_replay();
    assert_eq!(board.ships_hit(), 0);
    assert_eq!(board.shots_fired(), 0);
    assert_eq!(board.hit_rate(), 0.0);
    assert!(board.positions().all(|pos| !board.get(pos).unwrap().is_resolved()));
    assert_eq!(board.shots().len(), 4);

    for expected in order {
        assert_eq!(board.replay_next_shot().unwrap(), expected);
    }
    assert_eq!(board.replay_next_shot().unwrap_err(), GameError::EmptyReplayLog);
    assert_eq!(board.get(p(0, 1)), Some(SpaceState::Hit));
    assert_eq!(board.ships_hit(), finished.ships_hit());
    assert_eq!(board.hit_rate(), 50.0);
}

#[test]
fn test_undo_puts_shot_back() {
    let mut board = board_with_ships(3, 3, &[p(1, 1), p(2, 2)]);
    board.fire_at(p(1, 1)).unwrap();
    board.fire_at(p(0, 0)).unwrap();
    board.prepare_for_replay();
    let first = board.replay_next_shot().unwrap();
    assert_eq!(first, p(1, 1));
    assert_eq!(board.ships_hit(), 1);
    board.undo_last_shot(first).unwrap();
    assert_eq!(board.ships_hit(), 0);
    assert_eq!(board.get(p(1, 1)), Some(SpaceState::Ship));
    assert_eq!(
        board.shots().iter().copied().collect::<Vec<_>>(),
        vec![p(1, 1), p(0, 0)]
    );
    assert_eq!(
        board.undo_last_shot(p(0, 2)).unwrap_err(),
        GameError::InvalidEdit(p(0, 2))
    );
}

#[test]
fn test_retract_last_shot() {
    let mut board = board_with_ships(3, 3, &[p(1, 1), p(2, 2)]);
    assert_eq!(board.retract_last_shot().unwrap_err(), GameError::EmptyReplayLog);
    let fresh = board.clone();
    board.fire_at(p(0, 0)).unwrap();
    let after_first = board.clone();
    board.fire_at(p(1, 1)).unwrap();

    assert_eq!(board.retract_last_shot().unwrap(), p(1, 1));
    assert_eq!(board, after_first);
    assert_eq!(board.retract_last_shot().unwrap(), p(0, 0));
    assert_eq!(board, fresh);
    assert_eq!(board.hit_rate(), 0.0);
}

#[test]
fn test_board_state_roundtrip() {
    let mut board = board_with_ships(6, 4, &[p(5, 3), p(4, 3)]);
    board.fire_at(p(5, 3)).unwrap();
    board.fire_at(p(0, 0)).unwrap();
    let state = BoardState::from(&board);
    assert_eq!(state.width(), 6);
    assert_eq!(state.height(), 4);
    assert_eq!(state.spaces[3][5], 3);
    assert_eq!(state.spaces[0][0], 2);
    assert_eq!(state.ship_spaces, 2);
    assert_eq!(state.ships_hit, 1);
    let restored = Board::try_from(state).unwrap();
    assert_eq!(restored, board);
}
