use std::ops::Add;
use std::time::Duration;

use engine::clock::TickTimer;
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::rng::Rng;

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Settled cells hold a palette index in `1..=PALETTE_SIZE`; 0 is empty.
pub const PALETTE_SIZE: usize = 7;

const SPAWN_COLUMN: i32 = 4;
/// Kick offsets tried in order when rotating: in place, one left, one right.
const KICK_OFFSETS: [i32; 3] = [0, -1, 1];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Piece {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::J,
        Piece::L,
        Piece::O,
        Piece::S,
        Piece::Z,
        Piece::T,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2i {
    type Output = Vec2i;

    fn add(self, rhs: Vec2i) -> Self::Output {
        Vec2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// One draw from the generator: a shape plus an independently chosen
/// palette color (the color does not encode the shape).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceDraw {
    pub kind: Piece,
    pub color: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: Piece,
    pub color: u8,
    pub pos: Vec2i,
    pub rotation: u8,
}

/// Gravity/progression tuning. Values follow the deployed game: 600 ms base
/// interval, 60 ms faster per level, floored at 100 ms, level-up every
/// `level x lines_per_level` total lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TetrisTuning {
    pub base_drop_interval_ms: u64,
    pub drop_speedup_per_level_ms: u64,
    pub min_drop_interval_ms: u64,
    pub lines_per_level: u32,
}

impl Default for TetrisTuning {
    fn default() -> Self {
        Self {
            base_drop_interval_ms: 600,
            drop_speedup_per_level_ms: 60,
            min_drop_interval_ms: 100,
            lines_per_level: 5,
        }
    }
}

impl TetrisTuning {
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.base_drop_interval_ms == 0 {
            self.base_drop_interval_ms = defaults.base_drop_interval_ms;
        }
        if self.min_drop_interval_ms == 0 {
            self.min_drop_interval_ms = defaults.min_drop_interval_ms;
        }
        if self.min_drop_interval_ms > self.base_drop_interval_ms {
            self.min_drop_interval_ms = self.base_drop_interval_ms;
        }
        if self.lines_per_level == 0 {
            self.lines_per_level = defaults.lines_per_level;
        }
        self
    }
}

/// Outcome of advancing the falling piece by one or more gravity steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityResult {
    /// The piece fell one row and keeps falling.
    Moved,
    /// The piece locked into the grid; `rows_cleared` full rows collapsed
    /// and the queued piece spawned.
    Locked { rows_cleared: u32 },
    /// The freshly spawned piece collided: board overflow, terminal until
    /// `reset`.
    GameOver,
    /// Nothing to do (no active piece, or the game is already over).
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrisSnapshot {
    pub board: Vec<Vec<u8>>,
    pub current: Option<ActivePiece>,
    pub next: PieceDraw,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

/// Falling-block engine.
///
/// Row 0 is the bottom of the well; pieces spawn touching the top row and
/// fall by decreasing `y`. All mutation happens synchronously inside the
/// operation that caused it, and every guard failure degrades to a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetrisCore {
    board: Vec<Vec<u8>>,
    current: Option<ActivePiece>,
    next: PieceDraw,
    rng: Rng,
    score: u32,
    level: u32,
    lines_cleared: u32,
    gravity: TickTimer,
    game_over: bool,
    tuning: TetrisTuning,
    #[serde(skip, default)]
    events: Vec<GameEvent>,
}

impl TetrisCore {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, TetrisTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: TetrisTuning) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Rng::new(seed);
        let next = draw_from(&mut rng);
        let mut core = Self {
            board: vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT],
            current: None,
            next,
            rng,
            score: 0,
            level: 1,
            lines_cleared: 0,
            gravity: TickTimer::new(Duration::from_millis(tuning.base_drop_interval_ms)),
            game_over: false,
            tuning,
            events: Vec::new(),
        };
        core.reset();
        core
    }

    /// Reinitialize grid, score, level, and the piece pair. Atomic from the
    /// caller's perspective: no intermediate state is observable. The RNG
    /// stream continues, so consecutive games differ.
    pub fn reset(&mut self) {
        self.board = vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT];
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.game_over = false;
        self.gravity = TickTimer::new(self.drop_interval_for_level(1));
        self.current = None;
        self.next = self.draw_piece();
        self.events.clear();
        self.spawn_next_piece();
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::LevelChanged(1));
    }

    pub fn board(&self) -> &[Vec<u8>] {
        &self.board
    }

    pub fn current_piece(&self) -> Option<ActivePiece> {
        self.current
    }

    pub fn next_piece(&self) -> PieceDraw {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn drop_interval(&self) -> Duration {
        self.gravity.interval()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn tuning(&self) -> TetrisTuning {
        self.tuning
    }

    /// Drain notifications queued by operations since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> TetrisSnapshot {
        TetrisSnapshot {
            board: self.board.clone(),
            current: self.current,
            next: self.next,
            score: self.score,
            level: self.level,
            lines_cleared: self.lines_cleared,
            game_over: self.game_over,
        }
    }

    /// Uniform draw over the 7 canonical shapes and the 7-entry palette.
    pub fn draw_piece(&mut self) -> PieceDraw {
        draw_from(&mut self.rng)
    }

    /// True iff every cell of the piece lands on an empty in-bounds column.
    /// Cells above the visible top are allowed (pieces spawn there);
    /// anything past a wall or below the floor counts as occupied.
    pub fn piece_fits(&self, kind: Piece, pos: Vec2i, rotation: u8) -> bool {
        let grid = piece_grid(kind, rotation);
        let offset = piece_board_offset(kind);

        for gy in 0..grid.size() {
            for gx in 0..grid.size() {
                if grid.cell(gx, gy) != 1 {
                    continue;
                }

                let board_x = pos.x + gx as i32 - offset;
                let board_y = pos.y - gy as i32 + offset;

                if board_x < 0 || board_x >= BOARD_WIDTH as i32 {
                    return false;
                }
                if board_y < 0 {
                    return false;
                }
                if board_y < self.board.len() as i32
                    && self.board[board_y as usize][board_x as usize] != 0
                {
                    return false;
                }
            }
        }

        true
    }

    /// Guarded horizontal move; a colliding move is a no-op.
    pub fn move_piece(&mut self, dx: i32) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        let new_pos = piece.pos + Vec2i::new(dx, 0);
        if self.piece_fits(piece.kind, new_pos, piece.rotation) {
            self.current = Some(ActivePiece { pos: new_pos, ..piece });
            return true;
        }
        false
    }

    /// Clockwise rotation with wall kicks: the rotated shape is tried in
    /// place, then one column left, then one column right. If all three
    /// collide the piece is left bit-for-bit unchanged.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        let new_rotation = (piece.rotation + 1) % piece_rotation_states(piece.kind);
        for dx in KICK_OFFSETS {
            let test_pos = piece.pos + Vec2i::new(dx, 0);
            if self.piece_fits(piece.kind, test_pos, new_rotation) {
                self.current = Some(ActivePiece {
                    pos: test_pos,
                    rotation: new_rotation,
                    ..piece
                });
                return true;
            }
        }
        false
    }

    /// One immediate gravity step; locks on contact like a natural tick.
    pub fn soft_drop(&mut self) -> GravityResult {
        if self.game_over || self.current.is_none() {
            return GravityResult::Idle;
        }
        self.gravity.reset();
        self.apply_gravity_step()
    }

    /// Fast-forward down-moves until collision, then lock. Always ends in a
    /// lock (or game over on the follow-up spawn), never leaves the piece
    /// falling.
    pub fn hard_drop(&mut self) -> GravityResult {
        if self.game_over {
            return GravityResult::Idle;
        }
        let Some(mut piece) = self.current else {
            return GravityResult::Idle;
        };

        loop {
            let down = piece.pos + Vec2i::new(0, -1);
            if self.piece_fits(piece.kind, down, piece.rotation) {
                piece.pos = down;
            } else {
                break;
            }
        }

        self.current = Some(piece);
        self.lock_current_piece()
    }

    /// Advance simulation time. Gravity steps fire whenever the accumulated
    /// elapsed time crosses the level-scaled drop interval; the remainder is
    /// kept, so the simulation rate is independent of the caller's frame
    /// cadence. Pause is implemented by simply not calling this.
    pub fn tick(&mut self, dt: Duration) -> GravityResult {
        if self.game_over || self.current.is_none() {
            return GravityResult::Idle;
        }

        let steps = self.gravity.advance(dt);
        let mut outcome = GravityResult::Idle;
        for _ in 0..steps {
            match self.apply_gravity_step() {
                GravityResult::GameOver => return GravityResult::GameOver,
                GravityResult::Locked { rows_cleared } => {
                    outcome = match outcome {
                        GravityResult::Locked { rows_cleared: prev } => GravityResult::Locked {
                            rows_cleared: prev.saturating_add(rows_cleared),
                        },
                        _ => GravityResult::Locked { rows_cleared },
                    };
                }
                GravityResult::Moved => {
                    if !matches!(outcome, GravityResult::Locked { .. }) {
                        outcome = GravityResult::Moved;
                    }
                }
                GravityResult::Idle => {}
            }
        }
        outcome
    }

    /// Where the current piece would land if hard-dropped now. Pure read for
    /// the ghost-piece overlay; never mutates engine state.
    pub fn ghost_piece_pos(&self) -> Option<Vec2i> {
        let piece = self.current?;
        if !self.piece_fits(piece.kind, piece.pos, piece.rotation) {
            return None;
        }

        let mut pos = piece.pos;
        while self.piece_fits(piece.kind, pos + Vec2i::new(0, -1), piece.rotation) {
            pos = pos + Vec2i::new(0, -1);
        }
        Some(pos)
    }

    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        if y < self.board.len() && x < BOARD_WIDTH {
            self.board[y][x] = value;
        }
    }

    pub fn set_current_piece_for_test(&mut self, kind: Piece, color: u8, pos: Vec2i, rotation: u8) {
        self.current = Some(ActivePiece {
            kind,
            color,
            pos,
            rotation: rotation % piece_rotation_states(kind),
        });
        self.gravity.reset();
    }

    fn apply_gravity_step(&mut self) -> GravityResult {
        let Some(piece) = self.current else {
            return GravityResult::Idle;
        };
        let down = piece.pos + Vec2i::new(0, -1);
        if self.piece_fits(piece.kind, down, piece.rotation) {
            self.current = Some(ActivePiece { pos: down, ..piece });
            return GravityResult::Moved;
        }
        self.lock_current_piece()
    }

    fn lock_current_piece(&mut self) -> GravityResult {
        self.place_current_piece();
        let rows_cleared = self.clear_full_rows();
        if rows_cleared > 0 {
            self.apply_clear_scoring(rows_cleared);
        }
        self.gravity.reset();
        if self.spawn_next_piece() {
            GravityResult::Locked { rows_cleared }
        } else {
            GravityResult::GameOver
        }
    }

    fn place_current_piece(&mut self) {
        let Some(piece) = self.current else {
            return;
        };
        let grid = piece_grid(piece.kind, piece.rotation);
        let offset = piece_board_offset(piece.kind);

        for gy in 0..grid.size() {
            for gx in 0..grid.size() {
                if grid.cell(gx, gy) != 1 {
                    continue;
                }

                let board_x = piece.pos.x + gx as i32 - offset;
                let board_y = piece.pos.y - gy as i32 + offset;

                if board_x >= 0
                    && board_x < BOARD_WIDTH as i32
                    && board_y >= 0
                    && board_y < self.board.len() as i32
                {
                    self.board[board_y as usize][board_x as usize] = piece.color;
                }
            }
        }
    }

    /// Remove every full row; rows above collapse down and fresh empty rows
    /// appear at the top, keeping the well height constant.
    fn clear_full_rows(&mut self) -> u32 {
        let full_rows: Vec<usize> = (0..self.board.len())
            .filter(|&y| self.board[y].iter().all(|&cell| cell != 0))
            .collect();

        for &y in full_rows.iter().rev() {
            self.board.remove(y);
            self.board.push(vec![0; BOARD_WIDTH]);
        }

        full_rows.len() as u32
    }

    fn apply_clear_scoring(&mut self, rows_cleared: u32) {
        self.lines_cleared = self.lines_cleared.saturating_add(rows_cleared);
        let points = rows_cleared.saturating_mul(100).saturating_mul(self.level);
        self.score = self.score.saturating_add(points);
        self.events.push(GameEvent::ScoreChanged(self.score));

        while self.lines_cleared >= self.level.saturating_mul(self.tuning.lines_per_level) {
            self.level = self.level.saturating_add(1);
            self.gravity
                .set_interval(self.drop_interval_for_level(self.level));
            self.events.push(GameEvent::LevelChanged(self.level));
        }
    }

    fn drop_interval_for_level(&self, level: u32) -> Duration {
        let speedup = (level.saturating_sub(1) as u64)
            .saturating_mul(self.tuning.drop_speedup_per_level_ms);
        let ms = self
            .tuning
            .base_drop_interval_ms
            .saturating_sub(speedup)
            .max(self.tuning.min_drop_interval_ms);
        Duration::from_millis(ms)
    }

    fn spawn_next_piece(&mut self) -> bool {
        let draw = self.next;
        self.next = self.draw_piece();
        let piece = ActivePiece {
            kind: draw.kind,
            color: draw.color,
            pos: spawn_pos(draw.kind),
            rotation: 0,
        };
        let fits = self.piece_fits(piece.kind, piece.pos, piece.rotation);
        self.current = Some(piece);
        self.gravity.reset();

        if !fits {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            return false;
        }
        true
    }
}

fn draw_from(rng: &mut Rng) -> PieceDraw {
    let kind = Piece::ALL[rng.next_below(Piece::ALL.len() as u32) as usize];
    let color = 1 + rng.next_below(PALETTE_SIZE as u32) as u8;
    PieceDraw { kind, color }
}

/// Spawn position for a fresh piece: fixed column, topmost occupied cell on
/// the top row of the well, so a blocked spawn is a real collision.
pub fn spawn_pos(kind: Piece) -> Vec2i {
    let grid = piece_grid(kind, 0);
    let top_gy = (0..grid.size())
        .find(|&gy| (0..grid.size()).any(|gx| grid.cell(gx, gy) == 1))
        .unwrap_or(0);
    let offset = piece_board_offset(kind);
    Vec2i::new(
        SPAWN_COLUMN,
        BOARD_HEIGHT as i32 - 1 + top_gy as i32 - offset,
    )
}

/// Board coordinates of every occupied cell of a piece at `pos`/`rotation`,
/// sorted for stable comparison. Cells may be out of bounds (above the top).
pub fn piece_cells(kind: Piece, pos: Vec2i, rotation: u8) -> Vec<(i32, i32)> {
    let grid = piece_grid(kind, rotation);
    let offset = piece_board_offset(kind);
    let mut cells = Vec::new();

    for gy in 0..grid.size() {
        for gx in 0..grid.size() {
            if grid.cell(gx, gy) != 1 {
                continue;
            }
            cells.push((pos.x + gx as i32 - offset, pos.y - gy as i32 + offset));
        }
    }

    cells.sort_unstable();
    cells
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PieceGrid {
    size: usize,
    cells: [u8; 16],
}

impl PieceGrid {
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn cell(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.size && y < self.size);
        self.cells[y * self.size + x]
    }
}

pub(crate) const fn piece_board_offset(piece: Piece) -> i32 {
    match piece {
        Piece::O => 0,
        Piece::I | Piece::J | Piece::L | Piece::S | Piece::Z | Piece::T => 1,
    }
}

const fn piece_grid_size(piece: Piece) -> usize {
    match piece {
        Piece::I => 4,
        Piece::O => 2,
        Piece::J | Piece::L | Piece::S | Piece::Z | Piece::T => 3,
    }
}

pub(crate) const fn piece_rotation_states(piece: Piece) -> u8 {
    match piece {
        Piece::O => 1,
        Piece::I | Piece::S | Piece::Z => 2,
        Piece::J | Piece::L | Piece::T => 4,
    }
}

pub(crate) fn piece_grid(piece: Piece, rotation: u8) -> PieceGrid {
    let mut grid = base_piece_grid(piece);
    let steps = rotation % piece_rotation_states(piece);
    for _ in 0..steps {
        grid = rotate_grid_90(&grid);
    }
    grid
}

fn rotate_grid_90(grid: &PieceGrid) -> PieceGrid {
    let size = grid.size;
    let mut rotated = PieceGrid {
        size,
        cells: [0u8; 16],
    };

    for y in 0..size {
        for x in 0..size {
            // Rotate clockwise: rotated[x][size-1-y] = grid[y][x]
            let src = grid.cells[y * size + x];
            let dst_row = x;
            let dst_col = size - 1 - y;
            rotated.cells[dst_row * size + dst_col] = src;
        }
    }

    rotated
}

fn base_piece_grid(piece: Piece) -> PieceGrid {
    let size = piece_grid_size(piece);
    match piece {
        Piece::I => PieceGrid {
            size,
            cells: [
                0, 0, 0, 0, //
                1, 1, 1, 1, //
                0, 0, 0, 0, //
                0, 0, 0, 0, //
            ],
        },
        Piece::O => PieceGrid {
            size,
            cells: [
                1, 1, //
                1, 1, //
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            ],
        },
        Piece::J => PieceGrid {
            size,
            cells: [
                1, 0, 0, //
                1, 1, 1, //
                0, 0, 0, //
                0, 0, 0, 0, 0, 0, 0,
            ],
        },
        Piece::L => PieceGrid {
            size,
            cells: [
                0, 0, 1, //
                1, 1, 1, //
                0, 0, 0, //
                0, 0, 0, 0, 0, 0, 0,
            ],
        },
        Piece::S => PieceGrid {
            size,
            cells: [
                0, 1, 1, //
                1, 1, 0, //
                0, 0, 0, //
                0, 0, 0, 0, 0, 0, 0,
            ],
        },
        Piece::Z => PieceGrid {
            size,
            cells: [
                1, 1, 0, //
                0, 1, 1, //
                0, 0, 0, //
                0, 0, 0, 0, 0, 0, 0,
            ],
        },
        Piece::T => PieceGrid {
            size,
            cells: [
                0, 1, 0, //
                1, 1, 1, //
                0, 0, 0, //
                0, 0, 0, 0, 0, 0, 0,
            ],
        },
    }
}
