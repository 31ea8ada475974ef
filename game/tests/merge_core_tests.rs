use game::events::GameEvent;
use game::merge_core::{Direction, MergeCore, ShiftOutcome, GRID_SIZE};

fn empty_core(seed: u64) -> MergeCore {
    let mut core = MergeCore::new(seed);
    core.clear_grid_for_test();
    core.take_events();
    core
}

fn tile_count(core: &MergeCore) -> usize {
    core.grid()
        .iter()
        .map(|row| row.iter().filter(|&&v| v != 0).count())
        .sum()
}

#[test]
fn new_game_starts_with_two_small_tiles() {
    let core = MergeCore::new(5);

    assert_eq!(core.grid().len(), GRID_SIZE);
    assert!(core.grid().iter().all(|row| row.len() == GRID_SIZE));
    assert_eq!(tile_count(&core), 2);
    assert!(core
        .grid()
        .iter()
        .flatten()
        .all(|&v| v == 0 || v == 2 || v == 4));
    assert_eq!(core.score(), 0);
    assert!(!core.is_game_over());
    assert!(core.has_moves());
}

#[test]
fn two_adjacent_twos_merge_left_into_a_four() {
    let mut core = empty_core(9);
    core.set_cell(0, 0, 2);
    core.set_cell(0, 1, 2);

    let outcome = core.shift(Direction::Left);
    assert_eq!(
        outcome,
        ShiftOutcome::Moved {
            merged_points: 4,
            spawned: true
        }
    );
    assert_eq!(core.grid()[0][0], 4);
    assert_eq!(core.score(), 4);

    // Merge result plus exactly one spawned tile; everything else empty.
    assert_eq!(tile_count(&core), 2);
    let spawned: Vec<u32> = core
        .grid()
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(move |&(c, &v)| v != 0 && !(r == 0 && c == 0))
                .map(|(_, &v)| v)
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    assert!(spawned[0] == 2 || spawned[0] == 4);
}

#[test]
fn four_equal_tiles_merge_pairwise() {
    let mut core = empty_core(11);
    for c in 0..GRID_SIZE {
        core.set_cell(0, c, 2);
    }

    let outcome = core.shift(Direction::Left);
    assert!(matches!(
        outcome,
        ShiftOutcome::Moved {
            merged_points: 8,
            ..
        }
    ));
    assert_eq!(core.grid()[0][0], 4);
    assert_eq!(core.grid()[0][1], 4);
    assert_eq!(core.score(), 8);
    assert_eq!(tile_count(&core), 3);
}

#[test]
fn every_direction_compacts_toward_its_leading_edge() {
    let mut core = empty_core(13);
    core.set_cell(0, 0, 2);
    core.set_cell(1, 0, 2);
    assert!(matches!(core.shift(Direction::Up), ShiftOutcome::Moved { .. }));
    assert_eq!(core.grid()[0][0], 4);

    let mut core = empty_core(14);
    core.set_cell(0, 0, 2);
    core.set_cell(1, 0, 2);
    assert!(matches!(core.shift(Direction::Down), ShiftOutcome::Moved { .. }));
    assert_eq!(core.grid()[GRID_SIZE - 1][0], 4);

    let mut core = empty_core(15);
    core.set_cell(0, 2, 2);
    core.set_cell(0, 3, 2);
    assert!(matches!(core.shift(Direction::Right), ShiftOutcome::Moved { .. }));
    assert_eq!(core.grid()[0][GRID_SIZE - 1], 4);
}

/// Staggered full board with no equal neighbors: every direction is blocked.
fn deadlocked_grid(core: &mut MergeCore) {
    let rows = [
        [2, 4, 8, 16],
        [32, 64, 128, 256],
        [512, 1024, 2, 8],
        [4, 16, 32, 64],
    ];
    for (r, row) in rows.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            core.set_cell(r, c, v);
        }
    }
}

#[test]
fn fully_compacted_mergeless_move_is_blocked() {
    let mut core = empty_core(17);
    deadlocked_grid(&mut core);
    let before = core.snapshot();

    for dir in Direction::ALL {
        assert_eq!(core.shift(dir), ShiftOutcome::Blocked);
    }

    assert_eq!(core.snapshot(), before);
    assert_eq!(core.score(), 0);
    assert!(core.take_events().is_empty());
    assert!(!core.has_moves());
}

#[test]
fn compacted_row_without_merges_is_blocked() {
    let mut core = empty_core(19);
    core.set_cell(0, 0, 2);
    core.set_cell(0, 1, 4);
    core.set_cell(0, 2, 8);
    core.set_cell(0, 3, 16);

    assert_eq!(core.shift(Direction::Left), ShiftOutcome::Blocked);
    assert_eq!(core.grid()[0], vec![2, 4, 8, 16]);
    assert_eq!(tile_count(&core), 4);
}

#[test]
fn spawner_fails_silently_on_a_full_board() {
    let mut core = empty_core(21);
    deadlocked_grid(&mut core);
    let before = core.snapshot();

    assert_eq!(core.spawn_tile(), None);
    assert_eq!(core.snapshot(), before);
}

#[test]
fn spawner_places_a_two_or_four_on_an_empty_cell() {
    let mut core = empty_core(23);

    let (r, c, v) = core.spawn_tile().expect("empty board accepts a tile");
    assert_eq!(core.grid()[r][c], v);
    assert!(v == 2 || v == 4);
    assert_eq!(tile_count(&core), 1);
}

#[test]
fn merge_scores_accumulate_and_notify() {
    let mut core = empty_core(25);
    core.set_cell(0, 0, 2);
    core.set_cell(0, 1, 2);
    core.set_cell(1, 0, 4);
    core.set_cell(1, 1, 4);

    let outcome = core.shift(Direction::Left);
    assert!(matches!(
        outcome,
        ShiftOutcome::Moved {
            merged_points: 12,
            ..
        }
    ));
    assert_eq!(core.score(), 12);
    assert!(core.take_events().contains(&GameEvent::ScoreChanged(12)));
}

#[test]
fn reset_clears_score_and_respawns_two_tiles() {
    let mut core = MergeCore::new(27);
    core.clear_grid_for_test();
    core.set_cell(0, 0, 2);
    core.set_cell(0, 1, 2);
    core.shift(Direction::Left);
    assert!(core.score() > 0);
    core.take_events();

    core.reset();
    assert_eq!(core.score(), 0);
    assert_eq!(tile_count(&core), 2);
    assert!(!core.is_game_over());
    assert!(core.take_events().contains(&GameEvent::ScoreChanged(0)));
}
