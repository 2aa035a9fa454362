//! Grid placement for masters on the diagram canvas

use crate::graph::Position;

const ORIGIN: f64 = 100.0;
const COLUMN_WIDTH: f64 = 400.0;
const ROW_HEIGHT: f64 = 300.0;

/// Smallest `c` with `c * c >= total` (at least 1)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn columns(total: usize) -> usize {
    let mut cols = ((total as f64).sqrt() as usize).max(1);
    while cols > 1 && (cols - 1) * (cols - 1) >= total {
        cols -= 1;
    }
    while cols.checked_mul(cols).is_some_and(|sq| sq < total) {
        cols += 1;
    }
    cols
}

/// Diagram position of the `index`-th of `total` masters
///
/// Masters fill a square-ish grid row by row, starting at (100, 100) with
/// 400 px columns and 300 px rows.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn auto_layout_position(index: usize, total: usize) -> Position {
    let cols = columns(total);
    let row = index / cols;
    let col = index % cols;
    Position::new(
        ORIGIN + col as f64 * COLUMN_WIDTH,
        ORIGIN + row as f64 * ROW_HEIGHT,
    )
}

/// First grid slot, for a layout of `occupied.len() + 1` masters, that no
/// existing position takes
#[must_use]
pub fn next_free_slot(occupied: &[Position]) -> Position {
    let total = occupied.len() + 1;
    (0..)
        .map(|i| auto_layout_position(i, total))
        .find(|slot| !occupied.contains(slot))
        .unwrap_or_else(|| Position::new(ORIGIN, ORIGIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_count_is_ceil_sqrt() {
        assert_eq!(columns(0), 1);
        assert_eq!(columns(1), 1);
        assert_eq!(columns(4), 2);
        assert_eq!(columns(5), 3);
        assert_eq!(columns(9), 3);
        assert_eq!(columns(10), 4);
        assert_eq!(columns(1_000_001), 1001);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        assert_eq!(columns(usize::MAX), 1 << (usize::BITS / 2));
        let far = auto_layout_position(usize::MAX - 1, usize::MAX);
        assert!(far.x >= 0.0 && far.y >= 0.0);
    }

    #[test]
    fn five_masters_use_three_columns() {
        assert_eq!(auto_layout_position(0, 5), Position::new(100.0, 100.0));
        assert_eq!(auto_layout_position(2, 5), Position::new(900.0, 100.0));
        assert_eq!(auto_layout_position(3, 5), Position::new(100.0, 400.0));
        assert_eq!(auto_layout_position(4, 5), Position::new(500.0, 400.0));
    }

    #[test]
    fn zero_total_is_single_column() {
        assert_eq!(auto_layout_position(0, 0), Position::new(100.0, 100.0));
        assert_eq!(auto_layout_position(2, 0), Position::new(100.0, 700.0));
    }

    #[test]
    fn free_slot_skips_taken_positions() {
        assert_eq!(next_free_slot(&[]), Position::new(100.0, 100.0));
        let taken = [Position::new(100.0, 100.0)];
        assert_eq!(next_free_slot(&taken), Position::new(500.0, 100.0));
        let moved = [Position::new(500.0, 100.0)];
        assert_eq!(next_free_slot(&moved), Position::new(100.0, 100.0));
    }
}
