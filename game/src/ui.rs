//! Framebuffer UI for both games.
//!
//! Every function draws into a plain RGBA buffer; the windowed host and the
//! golden-hash render tests share this code unchanged. Cell colors come from
//! the portal's rose palette.

use engine::render::{blend_rect, clear_frame, draw_rect_outline, fill_rect};

use crate::merge_core::{MergeCore, GRID_SIZE};
use crate::records::GameRecords;
use crate::tetris_core::{
    piece_cells, piece_grid, ActivePiece, TetrisCore, BOARD_HEIGHT, BOARD_WIDTH,
};
use crate::text::{draw_text, draw_text_scaled, text_width, GLYPH_H};

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 560;

pub const CELL_SIZE: u32 = 24;
const MERGE_CELL_SIZE: u32 = 96;
const MERGE_TILE_PAD: u32 = 6;

const GHOST_ALPHA: u8 = 80;
const DIM_ALPHA: u8 = 170;

const PANEL_MARGIN: u32 = 16;
const PANEL_PADDING: u32 = 12;
const PREVIEW_GRID: u32 = 4;
const PREVIEW_CELL: u32 = 16;

const COLOR_BACKGROUND: [u8; 4] = [16, 16, 22, 255];
const COLOR_BOARD_BG: [u8; 4] = [10, 10, 14, 255];
const COLOR_BOARD_OUTLINE: [u8; 4] = [40, 40, 55, 255];
const COLOR_GRID_DOT: [u8; 4] = [24, 22, 30, 255];
const COLOR_PANEL_BG: [u8; 4] = [10, 10, 14, 255];
const COLOR_PANEL_BORDER: [u8; 4] = [40, 40, 55, 255];
const COLOR_TEXT: [u8; 4] = [245, 235, 240, 255];
const COLOR_DIM: [u8; 4] = [0, 0, 0, 255];
const COLOR_MERGE_TEXT: [u8; 4] = [55, 48, 163, 255];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Palette-indexed colors for settled and falling cells (1..=7).
pub fn tetris_cell_color(index: u8) -> [u8; 4] {
    match index {
        0 => COLOR_BOARD_BG,
        1 => [253, 164, 175, 255],
        2 => [249, 168, 212, 255],
        3 => [167, 139, 250, 255],
        4 => [147, 197, 253, 255],
        5 => [134, 239, 172, 255],
        6 => [252, 211, 77, 255],
        7 => [251, 191, 36, 255],
        _ => [255, 255, 255, 255],
    }
}

/// Tile colors keyed by value, matching the portal's 2048 board.
pub fn merge_tile_color(value: u32) -> [u8; 4] {
    match value {
        0 => [253, 242, 248, 255],
        2 => [255, 228, 230, 255],
        4 => [254, 205, 211, 255],
        8 => [253, 164, 175, 255],
        16 => [251, 113, 133, 255],
        32 => [244, 114, 182, 255],
        64 => [236, 72, 153, 255],
        128 => [217, 70, 239, 255],
        256 => [167, 139, 250, 255],
        512 => [129, 140, 248, 255],
        1024 => [96, 165, 250, 255],
        2048 => [52, 211, 153, 255],
        _ => [134, 239, 172, 255],
    }
}

pub fn tetris_board_rect(width: u32, height: u32) -> Rect {
    let w = (BOARD_WIDTH as u32) * CELL_SIZE;
    let h = (BOARD_HEIGHT as u32) * CELL_SIZE;
    Rect {
        x: width.saturating_sub(w) / 2,
        y: height.saturating_sub(h) / 2,
        w,
        h,
    }
}

pub fn draw_tetris(frame: &mut [u8], width: u32, height: u32, core: &TetrisCore, show_ghost: bool) {
    clear_frame(frame, width, height, COLOR_BACKGROUND);

    let rect = tetris_board_rect(width, height);
    fill_rect(frame, width, height, rect.x, rect.y, rect.w, rect.h, COLOR_BOARD_BG);
    draw_rect_outline(
        frame,
        width,
        height,
        rect.x.saturating_sub(1),
        rect.y.saturating_sub(1),
        rect.w + 2,
        rect.h + 2,
        COLOR_BOARD_OUTLINE,
    );

    for (y, row) in core.board().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let (px, py) = board_cell_origin(rect, x as i32, y as i32);
            if cell == 0 {
                // A subtle dot in the center of each empty cell reveals the
                // grid without distracting from the pieces.
                let dot = 2u32;
                fill_rect(
                    frame,
                    width,
                    height,
                    px + CELL_SIZE / 2 - dot / 2,
                    py + CELL_SIZE / 2 - dot / 2,
                    dot,
                    dot,
                    COLOR_GRID_DOT,
                );
            } else {
                fill_rect(frame, width, height, px, py, CELL_SIZE, CELL_SIZE, tetris_cell_color(cell));
            }
        }
    }

    if let Some(piece) = core.current_piece() {
        // Ghost renders behind the active piece.
        if show_ghost {
            if let Some(ghost_pos) = core.ghost_piece_pos() {
                draw_piece_cells(frame, width, height, rect, piece, Some(ghost_pos), GHOST_ALPHA);
            }
        }
        draw_piece_cells(frame, width, height, rect, piece, None, 255);
    }

    draw_next_panel(frame, width, height, rect, core);
    draw_tetris_hud(frame, width, height, rect, core);
}

fn board_cell_origin(rect: Rect, x: i32, y: i32) -> (u32, u32) {
    // Row 0 is the bottom of the well; the framebuffer grows downward.
    let px = rect.x.wrapping_add_signed(x * CELL_SIZE as i32);
    let inverted = (BOARD_HEIGHT as i32 - 1) - y;
    let py = rect.y.wrapping_add_signed(inverted * CELL_SIZE as i32);
    (px, py)
}

fn draw_piece_cells(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rect: Rect,
    piece: ActivePiece,
    pos_override: Option<crate::tetris_core::Vec2i>,
    alpha: u8,
) {
    let pos = pos_override.unwrap_or(piece.pos);
    let color = tetris_cell_color(piece.color);

    for (x, y) in piece_cells(piece.kind, pos, piece.rotation) {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            continue;
        }
        let (px, py) = board_cell_origin(rect, x, y);
        if alpha == 255 {
            fill_rect(frame, width, height, px, py, CELL_SIZE, CELL_SIZE, color);
        } else {
            blend_rect(frame, width, height, px, py, CELL_SIZE, CELL_SIZE, color, alpha);
        }
    }
}

fn draw_next_panel(frame: &mut [u8], width: u32, height: u32, board: Rect, core: &TetrisCore) {
    let panel_w = PREVIEW_GRID * PREVIEW_CELL + PANEL_PADDING * 2;
    let panel_h = PREVIEW_GRID * PREVIEW_CELL + PANEL_PADDING * 2 + 20;
    let rect = Rect {
        x: board.x + board.w + PANEL_MARGIN,
        y: board.y,
        w: panel_w,
        h: panel_h,
    };

    fill_rect(frame, width, height, rect.x, rect.y, rect.w, rect.h, COLOR_PANEL_BG);
    draw_rect_outline(frame, width, height, rect.x, rect.y, rect.w, rect.h, COLOR_PANEL_BORDER);
    draw_text(frame, width, height, rect.x + PANEL_PADDING, rect.y + 6, "NEXT", COLOR_TEXT);

    let next = core.next_piece();
    let grid = piece_grid(next.kind, 0);
    let grid_size = grid.size() as u32;
    let offset_x = (PREVIEW_GRID.saturating_sub(grid_size)) / 2;
    let offset_y = (PREVIEW_GRID.saturating_sub(grid_size)) / 2;
    let origin_x = rect.x + PANEL_PADDING;
    let origin_y = rect.y + PANEL_PADDING + 20;
    let color = tetris_cell_color(next.color);

    for gy in 0..grid.size() {
        for gx in 0..grid.size() {
            if grid.cell(gx, gy) != 1 {
                continue;
            }
            fill_rect(
                frame,
                width,
                height,
                origin_x + (offset_x + gx as u32) * PREVIEW_CELL,
                origin_y + (offset_y + gy as u32) * PREVIEW_CELL,
                PREVIEW_CELL,
                PREVIEW_CELL,
                color,
            );
        }
    }
}

fn draw_tetris_hud(frame: &mut [u8], width: u32, height: u32, board: Rect, core: &TetrisCore) {
    let x = board.x.saturating_sub(150);
    let mut y = board.y;

    for line in [
        format!("SCORE {}", core.score()),
        format!("LEVEL {}", core.level()),
        format!("LINES {}", core.lines_cleared()),
    ] {
        draw_text(frame, width, height, x, y, &line, COLOR_TEXT);
        y += 18;
    }
}

pub fn merge_board_rect(width: u32, height: u32) -> Rect {
    let side = (GRID_SIZE as u32) * MERGE_CELL_SIZE;
    Rect {
        x: width.saturating_sub(side) / 2,
        y: height.saturating_sub(side) / 2,
        w: side,
        h: side,
    }
}

pub fn draw_merge(frame: &mut [u8], width: u32, height: u32, core: &MergeCore) {
    clear_frame(frame, width, height, COLOR_BACKGROUND);

    let rect = merge_board_rect(width, height);
    draw_rect_outline(
        frame,
        width,
        height,
        rect.x.saturating_sub(1),
        rect.y.saturating_sub(1),
        rect.w + 2,
        rect.h + 2,
        COLOR_PANEL_BORDER,
    );

    for (r, row) in core.grid().iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let tile_x = rect.x + (c as u32) * MERGE_CELL_SIZE + MERGE_TILE_PAD;
            let tile_y = rect.y + (r as u32) * MERGE_CELL_SIZE + MERGE_TILE_PAD;
            let tile_w = MERGE_CELL_SIZE - MERGE_TILE_PAD * 2;
            let tile_h = MERGE_CELL_SIZE - MERGE_TILE_PAD * 2;
            fill_rect(frame, width, height, tile_x, tile_y, tile_w, tile_h, merge_tile_color(value));

            if value != 0 {
                let label = value.to_string();
                let scale = 3u32;
                let label_w = text_width(&label, scale);
                let label_h = GLYPH_H * scale;
                draw_text_scaled(
                    frame,
                    width,
                    height,
                    tile_x + tile_w.saturating_sub(label_w) / 2,
                    tile_y + tile_h.saturating_sub(label_h) / 2,
                    &label,
                    COLOR_MERGE_TEXT,
                    scale,
                );
            }
        }
    }

    let score_text = format!("SCORE {}", core.score());
    draw_text(
        frame,
        width,
        height,
        rect.x,
        rect.y.saturating_sub(24),
        &score_text,
        COLOR_TEXT,
    );
}

pub fn draw_main_menu(frame: &mut [u8], width: u32, height: u32, records: &GameRecords) {
    clear_frame(frame, width, height, COLOR_BACKGROUND);

    let title = "HEART ARCADE";
    let title_scale = 6u32;
    let title_w = text_width(title, title_scale);
    let title_x = width.saturating_sub(title_w) / 2;
    let title_y = height / 4;
    draw_text_scaled(frame, width, height, title_x, title_y, title, COLOR_TEXT, title_scale);

    let lines = [
        format!("1: TETRIS - BEST {}", records.tetris_best_score),
        format!("2: 2048 - BEST {}", records.merge_best_score),
        "ESC: QUIT".to_string(),
    ];

    let mut y = title_y + GLYPH_H * title_scale + 48;
    for line in lines {
        let w = text_width(&line, 2);
        draw_text(frame, width, height, width.saturating_sub(w) / 2, y, &line, COLOR_TEXT);
        y += 24;
    }
}

pub fn draw_pause_overlay(frame: &mut [u8], width: u32, height: u32) {
    blend_rect(frame, width, height, 0, 0, width, height, COLOR_DIM, DIM_ALPHA);

    let title = "PAUSED";
    let scale = 4u32;
    let w = text_width(title, scale);
    draw_text_scaled(
        frame,
        width,
        height,
        width.saturating_sub(w) / 2,
        (height / 2).saturating_sub(GLYPH_H * scale),
        title,
        COLOR_TEXT,
        scale,
    );

    let hint = "P TO RESUME";
    let hint_w = text_width(hint, 2);
    draw_text(
        frame,
        width,
        height,
        width.saturating_sub(hint_w) / 2,
        height / 2 + 16,
        hint,
        COLOR_TEXT,
    );
}

pub fn draw_game_over_overlay(frame: &mut [u8], width: u32, height: u32, score: u32, best: u32) {
    blend_rect(frame, width, height, 0, 0, width, height, COLOR_DIM, DIM_ALPHA);

    let title = "GAME OVER";
    let scale = 4u32;
    let w = text_width(title, scale);
    let mut y = (height / 2).saturating_sub(GLYPH_H * scale * 2);
    draw_text_scaled(
        frame,
        width,
        height,
        width.saturating_sub(w) / 2,
        y,
        title,
        COLOR_TEXT,
        scale,
    );
    y += GLYPH_H * scale + 16;

    for line in [
        format!("SCORE {score}"),
        format!("BEST {best}"),
        "ENTER: RESTART".to_string(),
        "ESC: MENU".to_string(),
    ] {
        let line_w = text_width(&line, 2);
        draw_text(
            frame,
            width,
            height,
            width.saturating_sub(line_w) / 2,
            y,
            &line,
            COLOR_TEXT,
        );
        y += 20;
    }
}
