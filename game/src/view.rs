use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Tetris,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameView {
    MainMenu,
    Tetris { paused: bool },
    Merge,
    GameOver { game: GameKind },
}

impl Default for GameView {
    fn default() -> Self {
        Self::MainMenu
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEvent {
    StartTetris,
    StartMerge,
    Restart,
    TogglePause,
    GameOver,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEffect {
    None,
    ResetTetris,
    ResetMerge,
}

impl GameView {
    /// Pure transition function for the view state machine.
    ///
    /// Side-effects (actually resetting a core) are reported via
    /// `GameViewEffect` so callers stay deterministic and easy to test.
    pub fn handle(self, event: GameViewEvent) -> (GameView, GameViewEffect) {
        match (self, event) {
            (GameView::MainMenu, GameViewEvent::StartTetris) => (
                GameView::Tetris { paused: false },
                GameViewEffect::ResetTetris,
            ),
            (GameView::MainMenu, GameViewEvent::StartMerge) => {
                (GameView::Merge, GameViewEffect::ResetMerge)
            }

            (GameView::Tetris { paused }, GameViewEvent::TogglePause) => {
                (GameView::Tetris { paused: !paused }, GameViewEffect::None)
            }
            (GameView::Tetris { .. }, GameViewEvent::GameOver) => (
                GameView::GameOver {
                    game: GameKind::Tetris,
                },
                GameViewEffect::None,
            ),
            (GameView::Tetris { .. }, GameViewEvent::Back) => {
                (GameView::MainMenu, GameViewEffect::None)
            }

            (GameView::Merge, GameViewEvent::GameOver) => (
                GameView::GameOver {
                    game: GameKind::Merge,
                },
                GameViewEffect::None,
            ),
            (GameView::Merge, GameViewEvent::Back) => (GameView::MainMenu, GameViewEffect::None),

            (GameView::GameOver { game }, GameViewEvent::Restart) => match game {
                GameKind::Tetris => (
                    GameView::Tetris { paused: false },
                    GameViewEffect::ResetTetris,
                ),
                GameKind::Merge => (GameView::Merge, GameViewEffect::ResetMerge),
            },
            (GameView::GameOver { .. }, GameViewEvent::Back) => {
                (GameView::MainMenu, GameViewEffect::None)
            }

            // Ignore irrelevant events in the current state.
            (state, _) => (state, GameViewEffect::None),
        }
    }

    pub fn is_tetris(self) -> bool {
        matches!(self, GameView::Tetris { .. })
    }

    pub fn is_tetris_playing(self) -> bool {
        matches!(self, GameView::Tetris { paused: false })
    }

    pub fn is_tetris_paused(self) -> bool {
        matches!(self, GameView::Tetris { paused: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_main_menu() {
        assert_eq!(GameView::default(), GameView::MainMenu);
    }

    #[test]
    fn starting_either_game_requests_a_reset() {
        assert_eq!(
            GameView::MainMenu.handle(GameViewEvent::StartTetris),
            (
                GameView::Tetris { paused: false },
                GameViewEffect::ResetTetris
            )
        );
        assert_eq!(
            GameView::MainMenu.handle(GameViewEvent::StartMerge),
            (GameView::Merge, GameViewEffect::ResetMerge)
        );
    }

    #[test]
    fn toggle_pause_flips_only_the_tetris_flag() {
        assert_eq!(
            GameView::Tetris { paused: false }.handle(GameViewEvent::TogglePause),
            (GameView::Tetris { paused: true }, GameViewEffect::None)
        );
        assert_eq!(
            GameView::Tetris { paused: true }.handle(GameViewEvent::TogglePause),
            (GameView::Tetris { paused: false }, GameViewEffect::None)
        );
        assert_eq!(
            GameView::Merge.handle(GameViewEvent::TogglePause),
            (GameView::Merge, GameViewEffect::None)
        );
    }

    #[test]
    fn game_over_remembers_which_game_ended() {
        assert_eq!(
            GameView::Tetris { paused: false }.handle(GameViewEvent::GameOver),
            (
                GameView::GameOver {
                    game: GameKind::Tetris
                },
                GameViewEffect::None
            )
        );
        assert_eq!(
            GameView::Merge.handle(GameViewEvent::GameOver),
            (
                GameView::GameOver {
                    game: GameKind::Merge
                },
                GameViewEffect::None
            )
        );
    }

    #[test]
    fn restart_from_game_over_resets_the_same_game() {
        assert_eq!(
            GameView::GameOver {
                game: GameKind::Tetris
            }
            .handle(GameViewEvent::Restart),
            (
                GameView::Tetris { paused: false },
                GameViewEffect::ResetTetris
            )
        );
        assert_eq!(
            GameView::GameOver {
                game: GameKind::Merge
            }
            .handle(GameViewEvent::Restart),
            (GameView::Merge, GameViewEffect::ResetMerge)
        );
    }

    #[test]
    fn back_returns_to_main_menu_from_anywhere() {
        for view in [
            GameView::Tetris { paused: true },
            GameView::Merge,
            GameView::GameOver {
                game: GameKind::Merge,
            },
        ] {
            assert_eq!(
                view.handle(GameViewEvent::Back),
                (GameView::MainMenu, GameViewEffect::None)
            );
        }
    }

    #[test]
    fn irrelevant_events_are_ignored() {
        assert_eq!(
            GameView::MainMenu.handle(GameViewEvent::TogglePause),
            (GameView::MainMenu, GameViewEffect::None)
        );
        assert_eq!(
            GameView::Merge.handle(GameViewEvent::StartTetris),
            (GameView::Merge, GameViewEffect::None)
        );
    }
}
