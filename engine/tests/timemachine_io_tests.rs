use std::fs;
use std::path::PathBuf;

use engine::{GameLogic, HeadlessRunner, TimeMachine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Counter {
    value: i32,
}

#[derive(Debug, Clone)]
struct CounterGame;

impl GameLogic for CounterGame {
    type State = Counter;
    type Input = i32;

    fn initial_state(&self) -> Self::State {
        Counter { value: 0 }
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        Counter {
            value: state.value + input,
        }
    }
}

fn temp_recording_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("arcade-{name}-{}.json", std::process::id()))
}

#[test]
fn recording_round_trips_through_json_file() {
    let mut runner = HeadlessRunner::new(CounterGame);
    runner.run([3, -1, 7]);

    let path = temp_recording_path("counter");
    runner
        .timemachine()
        .save_json_file(&path)
        .expect("save recording");

    let loaded = TimeMachine::<Counter>::load_json_file(&path).expect("load recording");
    assert_eq!(loaded.history(), runner.history());
    assert_eq!(loaded.frame(), runner.frame());

    let _ = fs::remove_file(&path);
}

#[test]
fn replay_from_loaded_recording_continues_deterministically() {
    let mut live = HeadlessRunner::new(CounterGame);
    live.run([1, 2, 3]);

    let path = temp_recording_path("counter-replay");
    live.timemachine().save_json_file(&path).expect("save");

    let tm = TimeMachine::<Counter>::load_json_file(&path).expect("load");
    let mut replay = HeadlessRunner::from_timemachine(CounterGame, tm);

    for frame in 0..replay.history().len() {
        replay.seek(frame);
        assert_eq!(replay.state(), &live.history()[frame]);
    }

    replay.step(10);
    assert_eq!(replay.state().value, 16);

    let _ = fs::remove_file(&path);
}

#[test]
fn load_rejects_malformed_recording() {
    let path = temp_recording_path("corrupt");
    fs::write(&path, b"not json").expect("write corrupt file");

    let err = TimeMachine::<Counter>::load_json_file(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let _ = fs::remove_file(&path);
}
