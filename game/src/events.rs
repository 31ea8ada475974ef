use serde::{Deserialize, Serialize};

/// Notifications produced synchronously by a state-changing operation.
///
/// Cores queue these as plain values (so they stay deterministic and
/// serde-friendly); the host drains them right after the operation and
/// forwards them to an [`EventSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    LevelChanged(u32),
    GameOver,
}

/// Hook interface for hosts. Default methods are no-ops so a sink only
/// implements the notifications it cares about.
pub trait EventSink {
    fn on_score_change(&mut self, _score: u32) {}
    fn on_level_change(&mut self, _level: u32) {}
    fn on_game_over(&mut self) {}
}

pub fn dispatch(events: &[GameEvent], sink: &mut dyn EventSink) {
    for event in events {
        match *event {
            GameEvent::ScoreChanged(score) => sink.on_score_change(score),
            GameEvent::LevelChanged(level) => sink.on_level_change(level),
            GameEvent::GameOver => sink.on_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture {
        scores: Vec<u32>,
        levels: Vec<u32>,
        game_overs: u32,
    }

    impl EventSink for Capture {
        fn on_score_change(&mut self, score: u32) {
            self.scores.push(score);
        }

        fn on_level_change(&mut self, level: u32) {
            self.levels.push(level);
        }

        fn on_game_over(&mut self) {
            self.game_overs += 1;
        }
    }

    #[test]
    fn dispatch_routes_each_event_kind() {
        let events = [
            GameEvent::ScoreChanged(100),
            GameEvent::LevelChanged(2),
            GameEvent::ScoreChanged(300),
            GameEvent::GameOver,
        ];

        let mut capture = Capture::default();
        dispatch(&events, &mut capture);

        assert_eq!(capture.scores, vec![100, 300]);
        assert_eq!(capture.levels, vec![2]);
        assert_eq!(capture.game_overs, 1);
    }

    #[test]
    fn partial_sink_ignores_unhandled_events() {
        struct ScoresOnly(Vec<u32>);

        impl EventSink for ScoresOnly {
            fn on_score_change(&mut self, score: u32) {
                self.0.push(score);
            }
        }

        let mut sink = ScoresOnly(Vec::new());
        dispatch(&[GameEvent::GameOver, GameEvent::ScoreChanged(4)], &mut sink);
        assert_eq!(sink.0, vec![4]);
    }
}
