//! Behavior of the rule-based expert across whole games

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tictactoe_td::{
    ExpertPlayer,
    ports::Learner,
    tictactoe::{Board, Coord, Game, LineAnalyzer, Mark, Outcome},
    types::StateKey,
};

fn board(key: &str) -> Board {
    Board::from_key(&StateKey::parse(key).unwrap())
}

/// Random legal positions with X to move and at least two marks placed
fn random_positions(count: usize, seed: u64) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::new();
    while positions.len() < count {
        let mut game = Game::new(Mark::X);
        loop {
            let empty = game.board().empty_cells();
            let coord = *empty.choose(&mut rng).unwrap();
            let mark = game.to_move();
            if game.play(mark, coord).unwrap() != Outcome::Ongoing {
                break;
            }
            if game.to_move() == Mark::X && game.board().mark_count() >= 2 {
                positions.push(*game.board());
            }
        }
    }
    positions
}

#[test]
fn test_never_misses_a_win() {
    for position in random_positions(200, 17) {
        let Some(winning) = LineAnalyzer::first_completing_cell(&position, Mark::X) else {
            continue;
        };
        let mut expert = ExpertPlayer::with_seed(false, 5);
        let coord = expert.choose_move(Mark::X, Mark::O, &position).unwrap();
        assert_eq!(coord, winning, "position {}", position.state_key());
    }
}

#[test]
fn test_blocking_expert_blocks_when_it_cannot_win() {
    for position in random_positions(200, 23) {
        if LineAnalyzer::has_immediate_win(&position, Mark::X) {
            continue;
        }
        let Some(threat) = LineAnalyzer::first_completing_cell(&position, Mark::O) else {
            continue;
        };
        let mut expert = ExpertPlayer::with_seed(true, 5);
        assert_eq!(
            expert.choose_move(Mark::X, Mark::O, &position).unwrap(),
            threat
        );
    }
}

#[test]
fn test_moves_are_always_legal() {
    for position in random_positions(100, 31) {
        let mut expert = ExpertPlayer::with_seed(true, 9);
        let coord = expert.select_move(&position, Mark::X).unwrap();
        assert!(position.is_empty_at(coord));
    }
}

#[test]
fn test_same_seed_same_choices() {
    let position = board("X...O....");
    let picks = |seed| {
        let mut expert = ExpertPlayer::with_seed(false, seed);
        (0..10)
            .map(|_| expert.choose_move(Mark::X, Mark::O, &position).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(42), picks(42));
}

#[test]
fn test_second_mark_gets_corner_when_center_taken() {
    let mut expert = ExpertPlayer::with_seed(false, 0);
    assert_eq!(
        expert
            .choose_move(Mark::O, Mark::X, &board("....X...."))
            .unwrap(),
        Coord::new(0, 0).unwrap()
    );
}

#[test]
fn test_names_reflect_blocking() {
    assert_eq!(ExpertPlayer::with_seed(false, 0).name(), "Expert");
    assert_eq!(ExpertPlayer::with_seed(true, 0).name(), "Expert (blocking)");
    assert!(ExpertPlayer::new(true).is_blocking());
}
