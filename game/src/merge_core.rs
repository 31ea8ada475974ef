use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::rng::Rng;

pub const GRID_SIZE: usize = 4;
/// A spawned tile is 2 with probability 0.9 and 4 with probability 0.1.
const FOUR_TILE_CHANCE_IN_TEN: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Outcome of a directional shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// The grid changed: merges were scored and a tile spawned (unless the
    /// board filled up in the same move).
    Moved { merged_points: u32, spawned: bool },
    /// The move would not change the grid: no spawn, no score delta.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSnapshot {
    pub grid: Vec<Vec<u32>>,
    pub score: u32,
    pub game_over: bool,
}

/// Tile-merging engine on a 4x4 grid.
///
/// Cells hold the actual tile value (2, 4, 8, ...); 0 is empty. Row 0 is the
/// top row, so `grid()[r][c]` matches the on-screen layout directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeCore {
    grid: Vec<Vec<u32>>,
    rng: Rng,
    score: u32,
    game_over: bool,
    #[serde(skip, default)]
    events: Vec<GameEvent>,
}

impl MergeCore {
    pub fn new(seed: u64) -> Self {
        let mut core = Self {
            grid: vec![vec![0; GRID_SIZE]; GRID_SIZE],
            rng: Rng::new(seed),
            score: 0,
            game_over: false,
            events: Vec::new(),
        };
        core.reset();
        core
    }

    /// Clear the grid and score and spawn the two starting tiles. The RNG
    /// stream continues, so consecutive games differ.
    pub fn reset(&mut self) {
        self.grid = vec![vec![0; GRID_SIZE]; GRID_SIZE];
        self.score = 0;
        self.game_over = false;
        self.events.clear();
        self.spawn_tile();
        self.spawn_tile();
        self.events.push(GameEvent::ScoreChanged(0));
    }

    pub fn grid(&self) -> &[Vec<u32>] {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Drain notifications queued by operations since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> MergeSnapshot {
        MergeSnapshot {
            grid: self.grid.clone(),
            score: self.score,
            game_over: self.game_over,
        }
    }

    /// Apply one directional move: compact each line toward the leading
    /// edge, merge equal adjacent pairs left-to-right (each cell merges at
    /// most once per move), compact again. Scores the sum of merged-cell
    /// values and spawns one tile iff the grid changed.
    pub fn shift(&mut self, dir: Direction) -> ShiftOutcome {
        if self.game_over {
            return ShiftOutcome::Blocked;
        }

        let before = self.grid.clone();
        let mut merged_points = 0u32;

        for lane in 0..GRID_SIZE {
            let line = self.read_lane(dir, lane);
            let (reduced, gained) = reduce_line(&line);
            merged_points = merged_points.saturating_add(gained);
            self.write_lane(dir, lane, &reduced);
        }

        if self.grid == before {
            return ShiftOutcome::Blocked;
        }

        if merged_points > 0 {
            self.score = self.score.saturating_add(merged_points);
            self.events.push(GameEvent::ScoreChanged(self.score));
        }

        let spawned = self.spawn_tile().is_some();
        if !self.has_moves() {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
        }

        ShiftOutcome::Moved {
            merged_points,
            spawned,
        }
    }

    /// Place a 2 (or, rarely, a 4) on a uniformly chosen empty cell.
    /// Returns `None` without touching the grid when no cell is empty —
    /// the caller's signal that the board is full.
    pub fn spawn_tile(&mut self) -> Option<(usize, usize, u32)> {
        let mut empty = Vec::new();
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if self.grid[r][c] == 0 {
                    empty.push((r, c));
                }
            }
        }

        if empty.is_empty() {
            return None;
        }

        let (r, c) = empty[self.rng.next_below(empty.len() as u32) as usize];
        let value = if self.rng.next_below(10) < FOUR_TILE_CHANCE_IN_TEN {
            4
        } else {
            2
        };
        self.grid[r][c] = value;
        Some((r, c, value))
    }

    /// True while any move can change the grid: an empty cell exists or two
    /// equal tiles are orthogonally adjacent.
    pub fn has_moves(&self) -> bool {
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if self.grid[r][c] == 0 {
                    return true;
                }
                if c + 1 < GRID_SIZE && self.grid[r][c] == self.grid[r][c + 1] {
                    return true;
                }
                if r + 1 < GRID_SIZE && self.grid[r][c] == self.grid[r + 1][c] {
                    return true;
                }
            }
        }
        false
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: u32) {
        if row < GRID_SIZE && col < GRID_SIZE {
            self.grid[row][col] = value;
        }
    }

    pub fn clear_grid_for_test(&mut self) {
        self.grid = vec![vec![0; GRID_SIZE]; GRID_SIZE];
        self.game_over = false;
    }

    /// Read lane `i` in move order: index 0 is the cell tiles move toward.
    fn read_lane(&self, dir: Direction, lane: usize) -> [u32; GRID_SIZE] {
        let mut line = [0u32; GRID_SIZE];
        for (i, slot) in line.iter_mut().enumerate() {
            let (r, c) = lane_coords(dir, lane, i);
            *slot = self.grid[r][c];
        }
        line
    }

    fn write_lane(&mut self, dir: Direction, lane: usize, line: &[u32; GRID_SIZE]) {
        for (i, &value) in line.iter().enumerate() {
            let (r, c) = lane_coords(dir, lane, i);
            self.grid[r][c] = value;
        }
    }
}

/// Map (lane, position-along-move-direction) to grid coordinates, so every
/// direction reduces to a leftward pass over a 4-cell line.
fn lane_coords(dir: Direction, lane: usize, i: usize) -> (usize, usize) {
    match dir {
        Direction::Left => (lane, i),
        Direction::Right => (lane, GRID_SIZE - 1 - i),
        Direction::Up => (i, lane),
        Direction::Down => (GRID_SIZE - 1 - i, lane),
    }
}

/// Compact, merge adjacent equal pairs once each (first-pair priority),
/// compact again. Returns the reduced line and the points gained.
fn reduce_line(line: &[u32; GRID_SIZE]) -> ([u32; GRID_SIZE], u32) {
    let mut out = compact_line(line);
    let mut gained = 0u32;

    for i in 0..GRID_SIZE - 1 {
        if out[i] != 0 && out[i] == out[i + 1] {
            out[i] = out[i].saturating_mul(2);
            gained = gained.saturating_add(out[i]);
            out[i + 1] = 0;
        }
    }

    (compact_line(&out), gained)
}

fn compact_line(line: &[u32; GRID_SIZE]) -> [u32; GRID_SIZE] {
    let mut out = [0u32; GRID_SIZE];
    let mut write = 0usize;
    for &value in line {
        if value != 0 {
            out[write] = value;
            write += 1;
        }
    }
    out
}

#[cfg(test)]
mod reduce_tests {
    use super::*;

    #[test]
    fn compaction_preserves_order() {
        assert_eq!(compact_line(&[0, 2, 0, 4]), [2, 4, 0, 0]);
        assert_eq!(compact_line(&[0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn four_equal_tiles_merge_pairwise_not_into_one() {
        let (line, gained) = reduce_line(&[2, 2, 2, 2]);
        assert_eq!(line, [4, 4, 0, 0]);
        assert_eq!(gained, 8);
    }

    #[test]
    fn first_pair_has_merge_priority() {
        let (line, gained) = reduce_line(&[2, 2, 2, 0]);
        assert_eq!(line, [4, 2, 0, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn freshly_merged_cell_does_not_merge_again() {
        let (line, gained) = reduce_line(&[4, 2, 2, 0]);
        assert_eq!(line, [4, 4, 0, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn gaps_close_before_merging() {
        let (line, gained) = reduce_line(&[2, 0, 0, 2]);
        assert_eq!(line, [4, 0, 0, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn compacted_distinct_line_is_unchanged() {
        let (line, gained) = reduce_line(&[2, 4, 8, 16]);
        assert_eq!(line, [2, 4, 8, 16]);
        assert_eq!(gained, 0);
    }
}
