use serde::{Deserialize, Serialize};

use crate::merge_core::MergeCore;
use crate::tetris_core::{TetrisCore, TetrisTuning};
use crate::view::GameView;

/// Everything one arcade session owns: the view state machine plus one
/// instance of each game core. No process-wide singletons — hosts and tests
/// construct as many independent sessions as they like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeState {
    pub view: GameView,
    pub tetris: TetrisCore,
    pub merge: MergeCore,
}

impl ArcadeState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, TetrisTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: TetrisTuning) -> Self {
        Self {
            view: GameView::default(),
            tetris: TetrisCore::with_tuning(seed, tuning),
            // Offset the merge seed so the two cores don't share a stream.
            merge: MergeCore::new(seed ^ 0x6D65_7267_6532_3034),
        }
    }
}
