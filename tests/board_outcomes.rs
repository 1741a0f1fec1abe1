//! Outcome detection and move legality on the board

use tictactoe_td::{
    Error,
    tictactoe::{Board, Coord, Game, LineAnalyzer, Mark, Outcome},
    types::StateKey,
};

fn board(key: &str) -> Board {
    Board::from_key(&StateKey::parse(key).unwrap())
}

#[test]
fn test_every_line_is_a_win() {
    let wins = [
        "XXX.OO...",
        "OO.XXX...",
        "OO....XXX",
        "XO.XO.X..",
        ".XO.XO.X.",
        "O.XO.X..X",
        "XO.OX...X",
        "O.X.X.XO.",
    ];
    for key in wins {
        assert_eq!(board(key).outcome(), Outcome::Win(Mark::X), "{key}");
        assert_eq!(board(key).checked_outcome().unwrap(), Outcome::Win(Mark::X));
    }
}

#[test]
fn test_full_board_without_line_is_tie() {
    assert_eq!(board("XOXXOOOXX").outcome(), Outcome::Tie);
}

#[test]
fn test_win_on_last_cell_is_not_a_tie() {
    assert_eq!(board("XOXOXOOXX").outcome(), Outcome::Win(Mark::X));
}

#[test]
fn test_partial_board_is_ongoing() {
    assert_eq!(Board::new().outcome(), Outcome::Ongoing);
    assert_eq!(board("X...O....").outcome(), Outcome::Ongoing);
}

#[test]
fn test_double_winner_is_rejected() {
    assert!(matches!(
        board("XXXOOO...").checked_outcome(),
        Err(Error::AmbiguousOutcome { .. })
    ));
}

#[test]
fn test_rewards_per_outcome() {
    assert_eq!(Outcome::Win(Mark::O).reward_for(Mark::O), Some(1.0));
    assert_eq!(Outcome::Win(Mark::O).reward_for(Mark::X), Some(0.0));
    assert_eq!(Outcome::Tie.reward_for(Mark::X), Some(0.5));
    assert_eq!(Outcome::Ongoing.reward_for(Mark::X), None);
}

#[test]
fn test_occupied_cell_is_rejected() {
    let mut game = Game::new(Mark::X);
    game.play(Mark::X, Coord::CENTER).unwrap();
    assert!(matches!(
        game.play(Mark::O, Coord::CENTER),
        Err(Error::InvalidMove { .. })
    ));
    assert_eq!(game.board().mark_count(), 1);
}

#[test]
fn test_game_stops_after_win() {
    let mut game = Game::new(Mark::X);
    let moves = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];
    let mut outcome = Outcome::Ongoing;
    for (i, &(row, col)) in moves.iter().enumerate() {
        let mark = if i % 2 == 0 { Mark::X } else { Mark::O };
        outcome = game.play(mark, Coord::new(row, col).unwrap()).unwrap();
    }
    assert_eq!(outcome, Outcome::Win(Mark::X));
    assert!(matches!(
        game.play(Mark::O, Coord::new(2, 2).unwrap()),
        Err(Error::GameOver)
    ));
}

#[test]
fn test_completing_cell_follows_scan_order() {
    // X can finish the left column or the main diagonal; columns are scanned
    // before diagonals.
    let position = board("XO.X.O..X");
    assert_eq!(
        LineAnalyzer::first_completing_cell(&position, Mark::X),
        Some(Coord::new(2, 0).unwrap())
    );
    assert!(LineAnalyzer::has_immediate_win(&position, Mark::X));
    assert!(!LineAnalyzer::has_immediate_win(&position, Mark::O));
}

#[test]
fn test_state_key_round_trips_through_board() {
    let key = StateKey::parse("X.O.X.O..").unwrap();
    assert_eq!(Board::from_key(&key).state_key(), key);
    assert!(StateKey::parse("X.O").is_err());
    assert!(StateKey::parse("X.O.Z.O..").is_err());
}
