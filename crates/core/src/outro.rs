//! Outro grid: layout of all scene thumbnails and their staggered reveal.

use serde::{Deserialize, Serialize};

/// Default time over which the whole grid reveals, in seconds.
pub const DEFAULT_REVEAL_WINDOW_SECS: f64 = 2.0;

/// Extra column counts tried beyond `ceil(sqrt(n))`.
const EXTRA_COLUMNS_TRIED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
}

impl GridLayout {
    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }
}

/// Near-square, landscape-leaning grid holding `n` cells.
///
/// Column counts from `ceil(sqrt(n))` upwards are tried, keeping only
/// layouts no wider than twice their height. The layout with the fewest
/// empty cells wins, ties going to the squarer one. `n == 0` gives an
/// empty `0 x 0` grid.
pub fn layout_grid(n: usize) -> GridLayout {
    if n == 0 {
        return GridLayout { cols: 0, rows: 0 };
    }

    let base = (n as f64).sqrt().ceil() as usize;
    let fallback = GridLayout {
        cols: base,
        rows: n.div_ceil(base),
    };

    (base..=base + EXTRA_COLUMNS_TRIED)
        .map(|cols| GridLayout {
            cols,
            rows: n.div_ceil(cols),
        })
        .filter(|layout| layout.cols <= 2 * layout.rows)
        .min_by_key(|layout| (layout.cells() - n, layout.cols.abs_diff(layout.rows)))
        .unwrap_or(fallback)
}

/// Normalized reveal time of each cell in row-major order.
///
/// Cells reveal along the diagonal from the top-left corner: the value is
/// `(row + col) / ((cols - 1) + (rows - 1))`, or `0` for a single cell.
pub fn reveal_order(cols: usize, rows: usize) -> Vec<f64> {
    let span = (cols + rows).saturating_sub(2);
    let mut order = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let d = if span == 0 {
                0.0
            } else {
                (row + col) as f64 / span as f64
            };
            order.push(d);
        }
    }
    order
}

/// Frame offset of each cell's reveal within a `window_secs` window.
pub fn reveal_frames(cols: usize, rows: usize, window_secs: f64, fps: f64) -> Vec<u32> {
    let window_frames = (window_secs * fps).max(0.0);
    reveal_order(cols, rows)
        .into_iter()
        .map(|d| (d * window_frames).round() as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- layout_grid ---------------------------------------------------------

    #[test]
    fn small_counts() {
        assert_eq!(layout_grid(0), GridLayout { cols: 0, rows: 0 });
        assert_eq!(layout_grid(1), GridLayout { cols: 1, rows: 1 });
        assert_eq!(layout_grid(2), GridLayout { cols: 2, rows: 1 });
        assert_eq!(layout_grid(3), GridLayout { cols: 2, rows: 2 });
    }

    #[test]
    fn prefers_layouts_without_waste() {
        assert_eq!(layout_grid(5), GridLayout { cols: 3, rows: 2 });
        assert_eq!(layout_grid(7), GridLayout { cols: 4, rows: 2 });
        assert_eq!(layout_grid(12), GridLayout { cols: 4, rows: 3 });
        assert_eq!(layout_grid(9), GridLayout { cols: 3, rows: 3 });
    }

    #[test]
    fn layout_always_fits_and_is_landscape() {
        for n in 1..=60 {
            let layout = layout_grid(n);
            assert!(layout.cells() >= n, "{n} does not fit {layout:?}");
            assert!(layout.cols >= layout.rows, "{n} is portrait: {layout:?}");
        }
    }

    // -- reveal_order --------------------------------------------------------

    #[test]
    fn two_by_two_reveal() {
        assert_eq!(reveal_order(2, 2), vec![0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn single_cell_reveals_immediately() {
        assert_eq!(reveal_order(1, 1), vec![0.0]);
    }

    #[test]
    fn reveal_values_are_normalized() {
        let order = reveal_order(4, 3);
        assert_eq!(order.len(), 12);
        assert_eq!(order[0], 0.0);
        assert_eq!(order[11], 1.0);
        assert!(order.iter().all(|d| (0.0..=1.0).contains(d)));
    }

    #[test]
    fn reveal_frames_span_window() {
        let frames = reveal_frames(3, 1, DEFAULT_REVEAL_WINDOW_SECS, 30.0);
        assert_eq!(frames, vec![0, 30, 60]);
    }
}
