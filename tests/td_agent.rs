//! TD(0) agent: move selection, backups and value bounds

use std::collections::HashSet;

use tictactoe_td::{
    Error, ExpertPlayer, Exploration, TdAgent, ValueMap,
    pipeline::{TrainingConfig, TrainingPipeline},
    tictactoe::{Board, Cell, Coord, Mark, Outcome},
    types::StateKey,
};

fn greedy(seed: u64) -> TdAgent {
    TdAgent::new(ValueMap::default(), Exploration::Probability(0.0)).with_seed(seed)
}

#[test]
fn test_first_reply_materializes_every_afterstate() {
    let mut position = Board::new();
    let opening = ExpertPlayer::with_seed(false, 0)
        .choose_move(Mark::X, Mark::O, &position)
        .unwrap();
    assert_eq!(opening, Coord::CENTER);
    position.place(Mark::X, opening).unwrap();
    let before = position;

    let mut agent = greedy(8);
    let coord = agent.choose_move(Mark::O, Mark::X, &position).unwrap();
    position.place(Mark::O, coord).unwrap();

    assert_eq!(before.get(coord), Cell::Empty);
    assert_eq!(position.get(coord), Cell::O);

    for empty in before.empty_cells() {
        let key = before.with_mark(Mark::O, empty).unwrap().state_key();
        assert_eq!(agent.value_map().peek(&key), Some(0.5), "{key}");
    }
    // Eight afterstates plus the empty board that was backed up
    assert_eq!(agent.value_map().len(), 9);
}

#[test]
fn test_tied_replies_are_spread_across_seeds() {
    let mut position = Board::new();
    position.place(Mark::X, Coord::CENTER).unwrap();

    let replies: HashSet<Coord> = (0..64)
        .map(|seed| greedy(seed).choose_move(Mark::O, Mark::X, &position).unwrap())
        .collect();
    assert!(replies.len() > 1, "every seed chose {replies:?}");
}

#[test]
fn test_prefers_highest_valued_afterstate() {
    let mut position = Board::new();
    position.place(Mark::X, Coord::CENTER).unwrap();
    let corner = Coord::new(2, 2).unwrap();
    let favored = position.with_mark(Mark::O, corner).unwrap().state_key();

    for seed in 0..16 {
        let mut map = ValueMap::new(1.0, 0.5).unwrap();
        map.update(&favored, 0.8);
        let mut agent = TdAgent::new(map, Exploration::Probability(0.0)).with_seed(seed);

        assert_eq!(agent.choose_move(Mark::O, Mark::X, &position).unwrap(), corner);
        assert_eq!(agent.previous_state(), &favored);
    }
}

#[test]
fn test_loss_lowers_the_last_afterstate() {
    let position = Board::from_key(&StateKey::parse("XX.......").unwrap());
    let mut agent = greedy(1);
    agent.choose_move(Mark::O, Mark::X, &position).unwrap();
    let chosen = agent.previous_state().clone();

    agent.finish_episode(Outcome::Win(Mark::X), Mark::O).unwrap();

    // 0.5 + 0.5 * (0.0 - 0.5)
    assert_eq!(agent.value_map().peek(&chosen), Some(0.25));
    assert_eq!(agent.previous_state(), &Board::new().state_key());
}

#[test]
fn test_repeated_wins_drive_value_toward_one() {
    let afterstate = StateKey::parse("XX..O..O.").unwrap();
    let mut map = ValueMap::new(0.5, 0.5).unwrap();
    let mut last = map.get_value(&afterstate);
    for _ in 0..20 {
        let next = map.update(&afterstate, 1.0);
        assert!(next > last && next <= 1.0);
        last = next;
    }
    assert!(last > 0.999);
}

#[test]
fn test_values_stay_in_unit_interval_after_training() {
    let config = TrainingConfig {
        episodes: 300,
        seed: Some(11),
        window: 100,
        ..TrainingConfig::default()
    };
    let mut agent = TdAgent::new(ValueMap::default(), Exploration::Probability(0.1)).with_seed(11);
    let mut expert = ExpertPlayer::with_seed(false, 12);
    TrainingPipeline::new(config)
        .run(&mut agent, &mut expert)
        .unwrap();

    for (key, value) in agent.value_map().iter() {
        assert!((0.0..=1.0).contains(&value), "{key}: {value}");
        // A board the agent completed keeps its winning value
        if Board::from_key(key).outcome() == Outcome::Win(Mark::O) {
            assert!(value > 0.5, "{key}: {value}");
        }
    }
}

#[test]
fn test_seeded_agents_play_identically() {
    let run = || {
        let mut agent =
            TdAgent::new(ValueMap::default(), Exploration::Probability(0.2)).with_seed(99);
        let mut expert = ExpertPlayer::with_seed(false, 100);
        let config = TrainingConfig {
            episodes: 100,
            seed: Some(99),
            ..TrainingConfig::default()
        };
        let result = TrainingPipeline::new(config)
            .run(&mut agent, &mut expert)
            .unwrap();
        (result, agent.into_value_map())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_full_board_is_an_error() {
    let full = Board::from_key(&StateKey::parse("XOXXOOOXX").unwrap());
    assert!(matches!(
        greedy(0).choose_move(Mark::O, Mark::X, &full),
        Err(Error::NoValidMoves)
    ));
}
