use std::time::Duration;

use engine::GameLogic;

use crate::merge_core::{Direction, MergeCore};
use crate::tetris_core::{TetrisCore, TetrisTuning};

/// Discrete inputs for driving the falling-block core through a
/// `HeadlessRunner` (tests, replays, bots).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrisInput {
    Noop,
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    /// Advance simulation time by the given number of milliseconds.
    Tick(u64),
}

#[derive(Debug, Clone)]
pub struct TetrisLogic {
    seed: u64,
    tuning: TetrisTuning,
}

impl TetrisLogic {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tuning: TetrisTuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: TetrisTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

impl GameLogic for TetrisLogic {
    type State = TetrisCore;
    type Input = TetrisInput;

    fn initial_state(&self) -> Self::State {
        TetrisCore::with_tuning(self.seed, self.tuning)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        match input {
            TetrisInput::Noop => {}
            TetrisInput::MoveLeft => {
                next.move_piece(-1);
            }
            TetrisInput::MoveRight => {
                next.move_piece(1);
            }
            TetrisInput::Rotate => {
                next.rotate();
            }
            TetrisInput::SoftDrop => {
                next.soft_drop();
            }
            TetrisInput::HardDrop => {
                next.hard_drop();
            }
            TetrisInput::Tick(ms) => {
                next.tick(Duration::from_millis(ms));
            }
        }
        next
    }
}

#[derive(Debug, Clone)]
pub struct MergeLogic {
    seed: u64,
}

impl MergeLogic {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GameLogic for MergeLogic {
    type State = MergeCore;
    type Input = Direction;

    fn initial_state(&self) -> Self::State {
        MergeCore::new(self.seed)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        next.shift(input);
        next
    }
}
