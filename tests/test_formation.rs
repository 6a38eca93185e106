use alien_invaders::config::Config;
use alien_invaders::entities::AlienVariant;
use alien_invaders::error::ContractError;
use alien_invaders::formation::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn full() -> Formation {
    let c = Config::default();
    Formation::new(c.alien_rows, c.aliens_in_row, &c).unwrap()
}

fn clear_column(f: &mut Formation, col: usize) {
    for row in 0..f.rows() {
        f.clear(Slot { row, col });
    }
}

// ── Scoring & variants ────────────────────────────────────────────────────────

#[test]
fn row_score_rises_every_two_rows() {
    let expected = [20, 20, 40, 40, 60, 60, 80];
    for (row, &score) in expected.iter().enumerate() {
        assert_eq!(row_score(row), score, "row {row}");
        assert_eq!(row_score(row), 20 + 20 * (row as u32 / 2));
    }
}

#[test]
fn variant_alternates_every_two_rows_and_wraps() {
    let variants: Vec<u8> = (0..8).map(|row| row_variant(row, 3).0).collect();
    assert_eq!(variants, vec![0, 0, 1, 1, 2, 2, 0, 0]);
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[test]
fn new_fills_every_slot() {
    let f = full();
    assert_eq!(f.rows(), 5);
    assert_eq!(f.cols(), 12);
    assert_eq!(f.occupied_count(), 60);
    assert!(!f.is_empty());
}

#[test]
fn layout_grows_right_and_up_from_bottom_left() {
    let f = full();
    let first = f.get(Slot { row: 0, col: 0 }).unwrap();
    assert_eq!(first.x(), 32.5);
    assert_eq!(first.y(), 387.5);

    let right = f.get(Slot { row: 0, col: 1 }).unwrap();
    assert_eq!(right.x(), 32.5 + 49.0);
    assert_eq!(right.y(), 387.5);

    let up = f.get(Slot { row: 1, col: 0 }).unwrap();
    assert_eq!(up.x(), 32.5);
    assert_eq!(up.y(), 387.5 + 49.0);
}

#[test]
fn aliens_carry_row_score_and_variant() {
    let f = full();
    for (slot, alien) in f.iter() {
        assert_eq!(alien.score(), row_score(slot.row));
        assert_eq!(alien.variant(), AlienVariant((slot.row / 2) as u8 % 3));
    }
}

#[test]
fn new_rejects_mismatched_dimensions() {
    let c = Config::default();
    let err = Formation::new(4, 12, &c).unwrap_err();
    assert_eq!(
        err,
        ContractError::GridDimensions {
            rows: 4,
            cols: 12,
            expected_rows: 5,
            expected_cols: 12
        }
    );
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[test]
fn clear_empties_a_slot_once() {
    let mut f = full();
    let slot = Slot { row: 2, col: 3 };
    assert!(f.clear(slot).is_some());
    assert!(f.clear(slot).is_none());
    assert!(f.get(slot).is_none());
    assert_eq!(f.occupied_count(), 59);
}

#[test]
fn out_of_range_slots_are_empty() {
    let mut f = full();
    assert!(f.get(Slot { row: 5, col: 0 }).is_none());
    assert!(f.clear(Slot { row: 0, col: 12 }).is_none());
    assert_eq!(f.occupied_count(), 60);
}

#[test]
fn shift_all_moves_only_survivors() {
    let mut f = full();
    f.clear(Slot { row: 0, col: 0 });
    f.shift_all(8.0, -16.0);
    let alien = f.get(Slot { row: 0, col: 1 }).unwrap();
    assert_eq!(alien.x(), 32.5 + 49.0 + 8.0);
    assert_eq!(alien.y(), 387.5 - 16.0);
    assert_eq!(f.occupied_count(), 59);
}

#[test]
fn lowest_edge_tracks_bottom_row() {
    let mut f = full();
    assert_eq!(f.lowest_edge(), Some(387.5 - 16.5));
    for col in 0..12 {
        f.clear(Slot { row: 0, col });
    }
    assert_eq!(f.lowest_edge(), Some(387.5 + 49.0 - 16.5));
}

// ── Edge scans ────────────────────────────────────────────────────────────────

#[test]
fn extremes_of_full_grid_are_bottom_corners() {
    let f = full();
    assert_eq!(f.rightmost_occupied(), Some(Slot { row: 0, col: 11 }));
    assert_eq!(f.leftmost_occupied(), Some(Slot { row: 0, col: 0 }));
}

#[test]
fn extremes_skip_cleared_columns() {
    let mut f = full();
    clear_column(&mut f, 11);
    clear_column(&mut f, 0);
    clear_column(&mut f, 1);
    assert_eq!(f.rightmost_occupied(), Some(Slot { row: 0, col: 10 }));
    assert_eq!(f.leftmost_occupied(), Some(Slot { row: 0, col: 2 }));
}

#[test]
fn extremes_walk_up_a_partly_cleared_column() {
    let mut f = full();
    for row in 0..3 {
        f.clear(Slot { row, col: 11 });
    }
    assert_eq!(f.rightmost_occupied(), Some(Slot { row: 3, col: 11 }));
}

#[test]
fn extremes_of_empty_grid_are_none() {
    let mut f = full();
    for col in 0..12 {
        clear_column(&mut f, col);
    }
    assert!(f.is_empty());
    assert_eq!(f.rightmost_occupied(), None);
    assert_eq!(f.leftmost_occupied(), None);
    assert_eq!(f.lowest_edge(), None);
}

// ── Shooter choice ────────────────────────────────────────────────────────────

#[test]
fn lowest_in_column_finds_front_alien() {
    let mut f = full();
    f.clear(Slot { row: 0, col: 4 });
    f.clear(Slot { row: 1, col: 4 });
    assert_eq!(f.lowest_in_column(4), Some(Slot { row: 2, col: 4 }));
    clear_column(&mut f, 4);
    assert_eq!(f.lowest_in_column(4), None);
}

#[test]
fn pick_shooter_only_returns_front_aliens() {
    let mut f = full();
    for col in 0..12 {
        f.clear(Slot { row: 0, col });
    }
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let slot = f.pick_shooter(&mut rng).unwrap();
        assert_eq!(slot.row, 1);
    }
}

#[test]
fn pick_shooter_retries_past_empty_columns() {
    let mut f = full();
    for col in (0..12).filter(|&c| c != 5) {
        clear_column(&mut f, col);
    }
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        assert_eq!(f.pick_shooter(&mut rng), Some(Slot { row: 0, col: 5 }));
    }
}

#[test]
fn pick_shooter_covers_every_column() {
    let f = full();
    let mut rng = StdRng::seed_from_u64(3);
    let mut seen = [false; 12];
    for _ in 0..1000 {
        seen[f.pick_shooter(&mut rng).unwrap().col] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn pick_shooter_on_empty_grid_is_none() {
    let mut f = full();
    for col in 0..12 {
        clear_column(&mut f, col);
    }
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(f.pick_shooter(&mut rng), None);
}
