//! Snapshot persistence integration tests against the real filesystem.

use std::{fs, sync::Arc};

use quizdda::{
    AgentKind, RewardConfig, RewardModel, SessionConfig,
    adapters::{ExactMatchEvaluator, JsonFileRepository, ManualClock},
    agents::{SarsaAgent, SarsaConfig, SessionAgent},
    ports::{DifficultyAgent, SnapshotRepository},
    session::SessionOrchestrator,
    state::{EncoderMode, StateEncoder, TimeThresholds},
};

mod common;

#[test]
fn test_session_snapshot_survives_process_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repository = JsonFileRepository::new(dir.path());
    let clock = ManualClock::new();

    let mut session = SessionOrchestrator::new(
        SessionAgent::Sarsa(SarsaAgent::new(SarsaConfig::default()).with_seed(7)),
        StateEncoder::new(EncoderMode::Composite, TimeThresholds::default()),
        RewardModel::new(RewardConfig::default()),
        common::question_bank(1),
        ExactMatchEvaluator,
        clock.clone(),
        Arc::new(JsonFileRepository::new(dir.path())),
        SessionConfig {
            total_questions: 8,
            questions_per_episode: 4,
        },
    )?;
    let mut player = common::SimulatedPlayer::new(common::average_player(), 23);
    common::drive_session(&mut session, &clock, &mut player);

    let table_len = session.agent().q_table().len();
    let epsilon = session.agent().current_epsilon();
    drop(session);

    // A fresh repository handle (new "process") sees the same state.
    let snapshot = repository
        .load(AgentKind::Sarsa)
        .expect("snapshot written at session end");
    let mut resumed = SarsaAgent::new(SarsaConfig::default());
    resumed.load_snapshot(snapshot);
    assert_eq!(resumed.q_table().len(), table_len);
    assert!((resumed.current_epsilon() - epsilon).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_missing_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileRepository::new(dir.path());
    assert!(repository.load(AgentKind::Sarsa).is_none());
    assert!(repository.load(AgentKind::MonteCarlo).is_none());
    assert!(!repository.has_any_saved_data());
}

#[test]
fn test_corrupt_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileRepository::new(dir.path());
    let path = dir.path().join(AgentKind::MonteCarlo.file_name());
    fs::write(&path, "{ locked mid-write").unwrap();

    assert!(repository.load(AgentKind::MonteCarlo).is_none());
    // The corrupt file is left in place for inspection.
    assert!(path.exists());
}

#[test]
fn test_zero_entry_snapshot_restores_epsilon_only() {
    // An agent that never learned anything still persists its exploration
    // state; reloading it must not invent table entries.
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileRepository::new(dir.path());

    let mut agent = SarsaAgent::new(SarsaConfig::default());
    agent.set_epsilon(0.42);
    repository
        .save(AgentKind::Sarsa, &agent.snapshot())
        .unwrap();

    let snapshot = repository.load(AgentKind::Sarsa).unwrap();
    assert!(snapshot.entries.is_empty());

    let mut resumed = SarsaAgent::new(SarsaConfig::default());
    resumed.load_snapshot(snapshot);
    assert!(resumed.q_table().is_empty());
    assert!((resumed.current_epsilon() - 0.42).abs() < 1e-12);
}

#[test]
fn test_unknown_action_rows_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileRepository::new(dir.path());
    let path = dir.path().join(AgentKind::Sarsa.file_name());
    fs::write(
        &path,
        r#"{
            "entries": [
                {"state": "START", "action": 1, "qValue": 0.5, "visits": 2, "returnCount": 0},
                {"state": "START", "action": 9, "qValue": 9.9, "visits": 1, "returnCount": 0}
            ],
            "epsilon": 0.2,
            "timestamp": "2026-08-28 10:00:00"
        }"#,
    )
    .unwrap();

    let snapshot = repository.load(AgentKind::Sarsa).unwrap();
    let mut agent = SarsaAgent::new(SarsaConfig::default());
    agent.load_snapshot(snapshot);

    // The valid row survives, the out-of-range action is dropped.
    assert_eq!(agent.q_table().len(), 1);
    assert!((agent.current_epsilon() - 0.2).abs() < 1e-12);
}

#[test]
fn test_save_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileRepository::new(dir.path());
    let agent = SarsaAgent::new(SarsaConfig::default());
    repository
        .save(AgentKind::Sarsa, &agent.snapshot())
        .unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![AgentKind::Sarsa.file_name().to_string()]);
}
