//! End-to-end match scenarios through the public engine API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reorder_state::{
    pool_of, GameConfig, GameEngine, GameError, GameMode, IllegalMove, LevelGenerator, LevelLayout,
    MatchPhase, MoveResult, PoolError, Symbol, Theme, TurnChange,
};

/// Replays fixed layouts by level.
struct Fixed(Vec<LevelLayout>);

impl LevelGenerator for Fixed {
    fn generate(&mut self, _pool: &[Symbol], level: u32) -> Result<LevelLayout, PoolError> {
        self.0
            .get(level as usize)
            .or_else(|| self.0.last())
            .cloned()
            .ok_or(PoolError::Empty)
    }
}

fn layout(secret: &[&str], start: &[&str]) -> LevelLayout {
    LevelLayout {
        secret: pool_of(secret.iter().copied()),
        start: pool_of(start.iter().copied()),
    }
}

fn pool() -> Vec<Symbol> {
    pool_of(["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"])
}

#[test]
fn test_single_player_correct_move() {
    let mut engine = GameEngine::with_generator(Fixed(vec![layout(
        &["A", "B", "C"],
        &["B", "C", "A"],
    )]));
    engine.start_game(GameConfig::new(1, pool())).unwrap();

    let outcome = engine.swap(0, 2).unwrap();
    assert_eq!(outcome.delta, 10);
    assert_eq!(outcome.result, MoveResult::Progress);

    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.player_order, pool_of(["A", "C", "B"]));
    assert_eq!(snap.correct_count, 1);
    assert_eq!(snap.scores(), vec![10]);
    assert!(!snap.board_locked);
}

#[test]
fn test_two_player_regression_hands_over_turn() {
    let mut engine = GameEngine::with_generator(Fixed(vec![layout(
        &["A", "B", "C", "D"],
        &["B", "A", "D", "C"],
    )]));
    engine.start_game(GameConfig::new(2, pool())).unwrap();

    assert_eq!(engine.swap(0, 1).unwrap().delta, 20);
    let outcome = engine.swap(0, 2).unwrap();
    assert_eq!(outcome.delta, -5);
    assert_eq!(outcome.result, MoveResult::TurnForfeited);
    assert!(engine.snapshot().unwrap().board_locked);

    engine.advance(Duration::from_millis(500));
    assert_eq!(
        engine.snapshot().unwrap().pending_turn_change,
        Some(TurnChange { next_player: 1 })
    );

    engine.advance(Duration::from_millis(2500));
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.active_player, 1);
    assert_eq!(snap.turn_time_remaining, 30);
    assert!(!snap.board_locked);
    assert_eq!(snap.scores(), vec![15, 0]);
}

#[test]
fn test_full_match_then_restart() {
    let mut engine = GameEngine::with_generator(Fixed(vec![
        layout(&["A", "B", "C"], &["C", "A", "B"]),
        layout(&["A", "B", "C", "D"], &["B", "A", "D", "C"]),
    ]));
    engine
        .start_game(
            GameConfig::new(2, pool())
                .with_names(["Ada", "Lin"])
                .with_max_levels(2),
        )
        .unwrap();

    // C A B -> A C B -> A B C
    engine.swap(0, 1).unwrap();
    let outcome = engine.swap(1, 2).unwrap();
    assert_eq!(
        outcome.result,
        MoveResult::LevelWon {
            winner: 0,
            bonus: 200,
            game_over: false
        }
    );

    let snap = engine.advance_level().unwrap();
    assert_eq!(snap.level, 1);
    assert_eq!(snap.active_player, 0);

    engine.swap(0, 1).unwrap();
    let outcome = engine.swap(2, 3).unwrap();
    assert!(matches!(
        outcome.result,
        MoveResult::LevelWon {
            game_over: true,
            ..
        }
    ));

    let standings = engine.final_standings().unwrap();
    assert_eq!(standings.headline(), "Ada Wins the Game!");
    assert_eq!(standings.top_score, 30 + 200 + 40 + 300);

    engine.restart();
    assert!(engine.snapshot().is_none());
    assert_eq!(engine.swap(0, 1), Err(GameError::NoActiveMatch));

    let snap = engine.start_game(GameConfig::new(2, pool())).unwrap();
    assert_eq!(snap.level, 0);
    assert_eq!(snap.scores(), vec![0, 0]);
    assert_eq!(snap.phase, MatchPhase::InProgress);
}

#[test]
fn test_turns_cycle_through_every_player() {
    let mut engine = GameEngine::with_generator(Fixed(vec![layout(
        &["A", "B", "C", "D"],
        &["B", "A", "D", "C"],
    )]));
    engine.start_game(GameConfig::new(3, pool())).unwrap();

    let mut order = vec![engine.snapshot().unwrap().active_player];
    for _ in 0..3 {
        engine.advance(Duration::from_secs(30));
        engine.advance(Duration::from_millis(2500));
        order.push(engine.snapshot().unwrap().active_player);
    }
    assert_eq!(order, vec![0, 1, 2, 0]);
}

#[test]
fn test_locked_board_rejects_moves() {
    let mut engine = GameEngine::with_generator(Fixed(vec![layout(
        &["A", "B", "C", "D"],
        &["B", "A", "D", "C"],
    )]));
    engine.start_game(GameConfig::new(2, pool())).unwrap();
    engine.swap(0, 2).unwrap();

    let before = engine.snapshot();
    let err = engine.select(1).unwrap_err();
    assert_eq!(err, GameError::IllegalMove(IllegalMove::BoardLocked));
    assert!(err.is_illegal_move());
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_seeded_themed_match() {
    let mut engine = GameEngine::seeded(2024);
    let config = GameConfig::from_theme(4, Theme::by_name("fruits").unwrap(), GameMode::Full);
    let snap = engine.start_game(config).unwrap();

    assert_eq!(snap.max_levels, 8);
    assert_eq!(snap.players.len(), 4);
    assert_eq!(snap.players[3].name, "Player 4");
    assert_eq!(snap.correct_count, 0);
    let fruits = Theme::by_name("Fruits").unwrap();
    assert!(snap
        .player_order
        .iter()
        .all(|s| fruits.symbols.iter().any(|f| *f == s.as_str())));
}

#[test]
fn test_config_from_json_starts_match() {
    let config = GameConfig::from_json(
        r#"{
            "num_players": 2,
            "pool": ["A", "B", "C", "D"],
            "max_levels": 1,
            "timings": { "turn_seconds": 10 }
        }"#,
    )
    .unwrap();

    let mut engine = GameEngine::seeded(5);
    let snap = engine.start_game(config).unwrap();
    assert_eq!(snap.turn_time_remaining, 10);
    assert_eq!(snap.max_levels, 1);

    engine.advance(Duration::from_secs(10));
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.turn_time_remaining, 0);
    assert_eq!(snap.pending_turn_change, Some(TurnChange { next_player: 1 }));
}
