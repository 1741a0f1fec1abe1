//! Saving and resuming value tables through the app container

use std::path::Path;

use tempfile::TempDir;
use tictactoe_td::{
    ExpertPlayer, TdAgent,
    adapters::{InMemoryRepository, JsonRepository, MsgPackRepository},
    app::{AgentConfig, App},
    pipeline::{TrainingConfig, TrainingPipeline},
    ports::ValueMapRepository,
    td_learning::{SavedValueMap, TrainingMetadata},
};

fn trained_agent(app: &App, episodes: usize) -> TdAgent {
    let mut agent = app.create_agent(AgentConfig::default().with_seed(5)).unwrap();
    let mut expert = ExpertPlayer::with_seed(false, 6);
    let config = TrainingConfig {
        episodes,
        seed: Some(5),
        ..TrainingConfig::default()
    };
    TrainingPipeline::new(config)
        .run(&mut agent, &mut expert)
        .unwrap();
    agent
}

fn metadata(episodes_trained: usize) -> TrainingMetadata {
    TrainingMetadata {
        episodes_trained,
        opponent: Some("Expert".to_string()),
        blocking_expert: Some(false),
        seed: Some(5),
        saved_at: None,
    }
}

#[test]
fn test_in_memory_round_trip_keeps_every_value() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();
    let agent = trained_agent(&app, 50);

    app.save_agent(&agent, metadata(50), Path::new("values")).unwrap();
    assert_eq!(repo.count(), 1);

    let (loaded, meta) = app
        .load_agent(Path::new("values"), AgentConfig::default())
        .unwrap();
    assert_eq!(loaded.value_map(), agent.value_map());
    assert_eq!(meta.episodes_trained, 50);
    assert!(meta.saved_at.is_some());
}

#[test]
fn test_json_file_is_bit_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.json");
    let app = App::for_testing().with_repository(JsonRepository::new()).build();
    let agent = trained_agent(&app, 80);

    app.save_agent(&agent, metadata(80), &path).unwrap();
    let saved = JsonRepository::new().load(&path).unwrap();

    for (key, value) in agent.value_map().iter() {
        let restored = saved.value_map.peek(key).unwrap();
        assert_eq!(restored.to_bits(), value.to_bits(), "{key}");
    }
    assert_eq!(saved.value_map.len(), agent.value_map().len());
}

#[test]
fn test_msgpack_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.msgpack");
    let app = App::new();
    let agent = trained_agent(&app, 30);

    app.save_agent(&agent, metadata(30), &path).unwrap();
    let (loaded, _) = app.load_agent(&path, AgentConfig::default()).unwrap();
    assert_eq!(loaded.value_map(), agent.value_map());
}

#[test]
fn test_resume_keeps_learning_from_saved_table() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo)
        .with_default_seed(3)
        .build();
    let agent = trained_agent(&app, 40);
    let size_before = agent.value_map().len();
    app.save_agent(&agent, metadata(40), Path::new("values")).unwrap();

    let (mut resumed, meta) = app
        .load_or_create_agent(Path::new("values"), AgentConfig::default())
        .unwrap();
    assert_eq!(meta.episodes_trained, 40);
    assert_eq!(resumed.value_map().len(), size_before);

    let mut expert = ExpertPlayer::with_seed(false, 4);
    let config = TrainingConfig {
        episodes: 40,
        seed: Some(9),
        ..TrainingConfig::default()
    };
    TrainingPipeline::new(config)
        .run(&mut resumed, &mut expert)
        .unwrap();
    assert!(resumed.value_map().len() >= size_before);
}

#[test]
fn test_missing_table_starts_fresh() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();
    let (agent, meta) = app
        .load_or_create_agent(Path::new("nowhere"), AgentConfig::default())
        .unwrap();
    assert!(agent.value_map().is_empty());
    assert_eq!(meta, TrainingMetadata::default());
}

#[test]
fn test_wrong_format_is_an_error_not_a_fresh_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.bin");
    let table = SavedValueMap::new(Default::default(), TrainingMetadata::default());
    JsonRepository::new().save(&table, &path).unwrap();

    let app = App::for_testing()
        .with_repository(MsgPackRepository::new())
        .build();
    let err = app
        .load_or_create_agent(&path, AgentConfig::default())
        .unwrap_err();
    assert!(!err.is_not_found());
}

#[test]
fn test_resume_applies_new_learning_rate() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();
    let agent = trained_agent(&app, 10);
    app.save_agent(&agent, metadata(10), Path::new("values")).unwrap();

    let (loaded, _) = app
        .load_agent(
            Path::new("values"),
            AgentConfig::default().with_learning_rate(0.1),
        )
        .unwrap();
    assert_eq!(loaded.value_map().learning_rate(), 0.1);
}

#[test]
fn test_corrupt_table_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.json");
    std::fs::write(
        &path,
        r#"{"version":1,"value_map":{"values":{"X........":9.0},"learning_rate":42.0,"starting_value":-3.0},"metadata":{"episodes_trained":0,"opponent":null,"blocking_expert":null,"seed":null,"saved_at":null}}"#,
    )
    .unwrap();

    assert!(JsonRepository::new().load(&path).is_err());

    let app = App::for_testing().with_repository(JsonRepository::new()).build();
    let err = app
        .load_or_create_agent(&path, AgentConfig::default())
        .unwrap_err();
    assert!(!err.is_not_found());
}

#[test]
fn test_resume_applies_new_starting_value() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();
    let agent = trained_agent(&app, 10);
    app.save_agent(&agent, metadata(10), Path::new("values")).unwrap();

    let (loaded, _) = app
        .load_agent(
            Path::new("values"),
            AgentConfig::default().with_starting_value(0.3),
        )
        .unwrap();
    assert_eq!(loaded.value_map().starting_value(), 0.3);
    assert_eq!(loaded.value_map().len(), agent.value_map().len());
}
