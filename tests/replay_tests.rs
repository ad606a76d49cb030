use battleships::{
    BoardState, Difficulty, GameError, GameSnapshot, Phase, Position, Replay, Session, ShipSpec,
    Side, TimeSource,
};
use rand::{rngs::SmallRng, SeedableRng};

struct Frozen;

impl TimeSource for Frozen {
    fn now_ms(&self) -> u64 {
        0
    }
}

fn finished_game(seed: u64) -> GameSnapshot {
    let mut s = Session::new(SmallRng::seed_from_u64(seed), Frozen);
    s.resize(8, 8).unwrap();
    s.confirm_size().unwrap();
    s.auto_place(&[ShipSpec::new(1, 4), ShipSpec::new(2, 2)]).unwrap();
    s.confirm_ships().unwrap();
    s.choose_difficulty(Difficulty::Medium).unwrap();
    let targets: Vec<Position> = s.enemy().positions().collect();
    for target in targets {
        if s.phase() == Phase::GameOver {
            break;
        }
        s.fire(target).unwrap();
    }
    s.snapshot().unwrap()
}

#[test]
fn test_replay_starts_from_layout() {
    let snapshot = finished_game(1);
    let replay = Replay::new(snapshot.clone()).unwrap();
    assert_eq!(replay.position(), 0);
    assert_eq!(replay.player().shots_fired(), 0);
    assert_eq!(replay.enemy().shots_fired(), 0);
    assert_eq!(replay.player().ship_spaces(), 8);
    assert_eq!(replay.enemy().shots().len(), snapshot.enemy.shots.len());
    assert!(!replay.finished());
}

#[test]
fn test_turns_alternate_enemy_first() {
    let snapshot = finished_game(2);
    let mut replay = Replay::new(snapshot.clone()).unwrap();
    assert_eq!(replay.step_forward().unwrap(), (Side::Enemy, snapshot.enemy.shots[0]));
    assert_eq!(replay.step_forward().unwrap(), (Side::Player, snapshot.player.shots[0]));
    assert_eq!(replay.step_forward().unwrap(), (Side::Enemy, snapshot.enemy.shots[1]));
    assert_eq!(replay.position(), 3);
}

#[test]
fn test_to_end_reproduces_final_boards() {
    let snapshot = finished_game(3);
    let mut replay = Replay::new(snapshot.clone()).unwrap();
    let total = snapshot.enemy.shots.len() + snapshot.player.shots.len();
    assert_eq!(replay.to_end(), total);
    assert!(replay.finished());
    assert_eq!(BoardState::from(replay.player()).spaces, snapshot.player.spaces);
    assert_eq!(BoardState::from(replay.enemy()).spaces, snapshot.enemy.spaces);
    assert_eq!(replay.player().won(), snapshot.player.won());
    assert_eq!(replay.enemy().won(), snapshot.enemy.won());
    assert_eq!(
        replay.step_forward().unwrap_err(),
        GameError::EmptyReplayLog
    );
}

#[test]
fn test_step_back_undoes_in_reverse() {
    let snapshot = finished_game(4);
    let mut replay = Replay::new(snapshot.clone()).unwrap();
    assert_eq!(replay.step_back().unwrap_err(), GameError::EmptyReplayLog);

    let fresh = replay.clone();
    replay.step_forward().unwrap();
    replay.step_forward().unwrap();
    assert_eq!(replay.step_back().unwrap(), (Side::Player, snapshot.player.shots[0]));
    assert_eq!(replay.step_back().unwrap(), (Side::Enemy, snapshot.enemy.shots[0]));
    assert_eq!(replay.player(), fresh.player());
    assert_eq!(replay.enemy(), fresh.enemy());

    // forward again after rewinding
    assert_eq!(replay.step_forward().unwrap(), (Side::Enemy, snapshot.enemy.shots[0]));
}

#[test]
fn test_invalid_snapshot_is_not_replayed() {
    let mut snapshot = finished_game(5);
    snapshot.enemy.shots.clear();
    assert!(matches!(
        Replay::new(snapshot),
        Err(GameError::InvalidSnapshot(_))
    ));
}
