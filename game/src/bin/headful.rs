use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use game::events::{dispatch, EventSink};
use game::merge_core::Direction;
use game::records::{GameRecords, RecordsStore};
use game::settings::{PlayerSettings, SettingsStore};
use game::state::ArcadeState;
use game::ui::{self, FRAME_HEIGHT, FRAME_WIDTH};
use game::view::{GameKind, GameView, GameViewEffect, GameViewEvent};

/// Folds core notifications into the persistent best-score records.
struct RecordsSink<'a> {
    records: &'a mut GameRecords,
    kind: GameKind,
    changed: bool,
    game_over: bool,
}

impl EventSink for RecordsSink<'_> {
    fn on_score_change(&mut self, score: u32) {
        self.changed |= match self.kind {
            GameKind::Tetris => self.records.observe_tetris(score, 0),
            GameKind::Merge => self.records.observe_merge(score),
        };
    }

    fn on_level_change(&mut self, level: u32) {
        if self.kind == GameKind::Tetris {
            self.changed |= self.records.observe_tetris(0, level);
        }
    }

    fn on_game_over(&mut self) {
        self.game_over = true;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let settings = SettingsStore::from_env().load();
    let records_store = RecordsStore::from_env();
    let mut records = records_store.load();

    let mut state = ArcadeState::with_tuning(wall_clock_seed(), settings.tetris);
    drain_core_events(&mut state, &mut records, &records_store);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("HEART ARCADE")
        .with_inner_size(PhysicalSize::new(FRAME_WIDTH, FRAME_HEIGHT))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = PixelsBuilder::new(FRAME_WIDTH, FRAME_HEIGHT, surface_texture)
        .enable_vsync(settings.video.vsync)
        .build()?;

    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) = pixels.resize_surface(size.width, size.height) {
                        eprintln!("resize failed: {err}");
                    }
                }
                WindowEvent::Focused(false) => {
                    if settings.gameplay.auto_pause_on_focus_loss
                        && state.view.is_tetris_playing()
                    {
                        apply_view_event(&mut state, GameViewEvent::TogglePause);
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    handle_key(key, &mut state, control_flow);
                    drain_core_events(&mut state, &mut records, &records_store);
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                // Pause keeps the clock from advancing; rendering continues
                // to draw the frozen state.
                if state.view.is_tetris_playing() {
                    let _ = state.tetris.tick(dt);
                    drain_core_events(&mut state, &mut records, &records_store);
                }

                render(pixels.frame_mut(), &state, &records, &settings);
                if let Err(err) = pixels.render() {
                    eprintln!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}

fn handle_key(key: VirtualKeyCode, state: &mut ArcadeState, control_flow: &mut ControlFlow) {
    match state.view {
        GameView::MainMenu => match key {
            VirtualKeyCode::Key1 => apply_view_event(state, GameViewEvent::StartTetris),
            VirtualKeyCode::Key2 => apply_view_event(state, GameViewEvent::StartMerge),
            VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
            _ => {}
        },
        GameView::Tetris { .. } => match key {
            VirtualKeyCode::Left => {
                state.tetris.move_piece(-1);
            }
            VirtualKeyCode::Right => {
                state.tetris.move_piece(1);
            }
            VirtualKeyCode::Up => {
                state.tetris.rotate();
            }
            VirtualKeyCode::Down => {
                state.tetris.soft_drop();
            }
            VirtualKeyCode::Space => {
                state.tetris.hard_drop();
            }
            VirtualKeyCode::P => apply_view_event(state, GameViewEvent::TogglePause),
            VirtualKeyCode::Escape => apply_view_event(state, GameViewEvent::Back),
            _ => {}
        },
        GameView::Merge => match key {
            VirtualKeyCode::Left => {
                state.merge.shift(Direction::Left);
            }
            VirtualKeyCode::Right => {
                state.merge.shift(Direction::Right);
            }
            VirtualKeyCode::Up => {
                state.merge.shift(Direction::Up);
            }
            VirtualKeyCode::Down => {
                state.merge.shift(Direction::Down);
            }
            VirtualKeyCode::Escape => apply_view_event(state, GameViewEvent::Back),
            _ => {}
        },
        GameView::GameOver { .. } => match key {
            VirtualKeyCode::Return => apply_view_event(state, GameViewEvent::Restart),
            VirtualKeyCode::Escape => apply_view_event(state, GameViewEvent::Back),
            _ => {}
        },
    }
}

fn apply_view_event(state: &mut ArcadeState, event: GameViewEvent) {
    let (view, effect) = state.view.handle(event);
    state.view = view;
    match effect {
        GameViewEffect::ResetTetris => state.tetris.reset(),
        GameViewEffect::ResetMerge => state.merge.reset(),
        GameViewEffect::None => {}
    }
}

/// Drain both cores' queued notifications: update best-score records, persist
/// them when they improve, and route `GameOver` into the view machine.
fn drain_core_events(state: &mut ArcadeState, records: &mut GameRecords, store: &RecordsStore) {
    let batches = [
        (GameKind::Tetris, state.tetris.take_events()),
        (GameKind::Merge, state.merge.take_events()),
    ];

    for (kind, events) in batches {
        if events.is_empty() {
            continue;
        }

        let (changed, game_over) = {
            let mut sink = RecordsSink {
                records,
                kind,
                changed: false,
                game_over: false,
            };
            dispatch(&events, &mut sink);
            (sink.changed, sink.game_over)
        };

        if game_over {
            let (view, _) = state.view.handle(GameViewEvent::GameOver);
            state.view = view;
        }
        if changed {
            if let Err(err) = store.save(records) {
                eprintln!("failed saving records: {err}");
            }
        }
    }
}

fn render(frame: &mut [u8], state: &ArcadeState, records: &GameRecords, settings: &PlayerSettings) {
    match state.view {
        GameView::MainMenu => ui::draw_main_menu(frame, FRAME_WIDTH, FRAME_HEIGHT, records),
        GameView::Tetris { paused } => {
            ui::draw_tetris(
                frame,
                FRAME_WIDTH,
                FRAME_HEIGHT,
                &state.tetris,
                settings.gameplay.show_ghost_piece,
            );
            if paused {
                ui::draw_pause_overlay(frame, FRAME_WIDTH, FRAME_HEIGHT);
            }
        }
        GameView::Merge => ui::draw_merge(frame, FRAME_WIDTH, FRAME_HEIGHT, &state.merge),
        GameView::GameOver { game } => match game {
            GameKind::Tetris => {
                ui::draw_tetris(frame, FRAME_WIDTH, FRAME_HEIGHT, &state.tetris, false);
                ui::draw_game_over_overlay(
                    frame,
                    FRAME_WIDTH,
                    FRAME_HEIGHT,
                    state.tetris.score(),
                    records.tetris_best_score,
                );
            }
            GameKind::Merge => {
                ui::draw_merge(frame, FRAME_WIDTH, FRAME_HEIGHT, &state.merge);
                ui::draw_game_over_overlay(
                    frame,
                    FRAME_WIDTH,
                    FRAME_HEIGHT,
                    state.merge.score(),
                    records.merge_best_score,
                );
            }
        },
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
