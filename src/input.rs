//! Host input handling: event types, click targets, and the pixel-to-cell
//! conversion that turns a DOM tap into a semantic action.
//!
//! Knows nothing about prophecy rules; `ProphecyGame` does the dispatch.

use ratzilla::ratatui::layout::Rect;

/// Input normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, carrying its action ID from
    /// `prophecy::actions`.
    Click(u16),
}

/// A tappable region in terminal cell coordinates.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared between the render loop (which registers targets every frame)
/// and the mouse handler (which hit-tests them).
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame: remember the grid size and forget old targets.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width, one-row target. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action under a cell. Later targets win where they overlap, so an
    /// overlay registered after the panels beneath it takes the tap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Resolve a tap given in pixels relative to the grid's top-left corner.
    pub fn tap(&self, click_x: f64, click_y: f64, grid_width: f64, grid_height: f64) -> Option<InputEvent> {
        let col = pixel_x_to_col(click_x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(click_y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row).map(InputEvent::Click)
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}

/// Below this many columns the panels stack vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Cell index along one axis, or `None` outside the grid.
fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 || !offset.is_finite() {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}

/// ピクセルY座標 (グリッド上端基準) を行番号に変換。
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// ピクセルX座標 (グリッド左端基準) を列番号に変換。
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prophecy::actions::{BUY_UPGRADE_BASE, CHOOSE_PATH_BASE, CLICK_FLAME, RESET};

    /// 80x30 grid of 10x15 px cells with the flame panel on top, two
    /// upgrade rows, and a help bar at the bottom.
    fn layout() -> ClickState {
        let mut cs = ClickState::new();
        cs.begin_frame(80, 30);
        cs.add_click_target(Rect::new(0, 0, 80, 9), CLICK_FLAME);
        cs.add_row_target(Rect::new(0, 9, 44, 18), 10, BUY_UPGRADE_BASE);
        cs.add_row_target(Rect::new(0, 9, 44, 18), 11, BUY_UPGRADE_BASE + 1);
        cs.add_click_target(Rect::new(40, 27, 12, 3), RESET);
        cs
    }

    #[test]
    fn hit_test_finds_panels() {
        let cs = layout();
        assert_eq!(cs.hit_test(5, 0), Some(CLICK_FLAME));
        assert_eq!(cs.hit_test(79, 8), Some(CLICK_FLAME));
        assert_eq!(cs.hit_test(3, 10), Some(BUY_UPGRADE_BASE));
        assert_eq!(cs.hit_test(43, 11), Some(BUY_UPGRADE_BASE + 1));
        assert_eq!(cs.hit_test(41, 28), Some(RESET));
    }

    #[test]
    fn hit_test_misses() {
        let cs = layout();
        assert_eq!(cs.hit_test(44, 10), None); // right of the upgrade column
        assert_eq!(cs.hit_test(3, 12), None);
        assert_eq!(cs.hit_test(39, 28), None);
        assert_eq!(ClickState::new().hit_test(0, 0), None);
    }

    #[test]
    fn overlay_registered_last_wins() {
        let mut cs = layout();
        cs.add_row_target(Rect::new(12, 8, 56, 8), 10, CHOOSE_PATH_BASE);
        assert_eq!(cs.hit_test(20, 10), Some(CHOOSE_PATH_BASE));
        // Outside the overlay the upgrade row still answers
        assert_eq!(cs.hit_test(5, 10), Some(BUY_UPGRADE_BASE));
    }

    #[test]
    fn row_target_outside_area_is_dropped() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 1);
        cs.add_row_target(area, 15, 2);
        assert!(cs.targets.is_empty());
        cs.add_row_target(area, 14, 3);
        assert_eq!(cs.hit_test(5, 14), Some(3));
        assert_eq!(cs.hit_test(4, 14), None);
    }

    #[test]
    fn begin_frame_resets_targets() {
        let mut cs = layout();
        cs.begin_frame(40, 50);
        assert!(cs.targets.is_empty());
        assert_eq!((cs.terminal_cols, cs.terminal_rows), (40, 50));
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(37));
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    #[test]
    fn pixel_rows() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.9, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
        assert_eq!(pixel_y_to_row(f64::NAN, 450.0, 30), None);
    }

    #[test]
    fn pixel_columns_with_fractional_cells() {
        // 24 columns over 400 px: cells are ~16.67 px wide
        assert_eq!(pixel_x_to_col(16.0, 400.0, 24), Some(0));
        assert_eq!(pixel_x_to_col(17.0, 400.0, 24), Some(1));
        assert_eq!(pixel_x_to_col(399.0, 400.0, 24), Some(23));
        assert_eq!(pixel_x_to_col(400.0, 400.0, 24), None);
    }

    #[test]
    fn tap_resolves_pixels_to_actions() {
        let cs = layout();
        // Centre of cell (3, 10)
        assert_eq!(
            cs.tap(35.0, 157.5, 800.0, 450.0),
            Some(InputEvent::Click(BUY_UPGRADE_BASE))
        );
        assert_eq!(cs.tap(400.0, 60.0, 800.0, 450.0), Some(InputEvent::Click(CLICK_FLAME)));
        assert_eq!(cs.tap(700.0, 180.0, 800.0, 450.0), None);
        assert_eq!(cs.tap(-5.0, 60.0, 800.0, 450.0), None);
    }

    #[test]
    fn tap_before_first_frame_is_ignored() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 0, 10, 10), CLICK_FLAME);
        assert_eq!(cs.tap(5.0, 5.0, 100.0, 100.0), None);
    }

    #[test]
    fn every_row_centre_maps_back_to_its_row() {
        let rows: u16 = 50;
        let cell = 15.0;
        for row in 0..rows {
            let y = row as f64 * cell + cell / 2.0;
            assert_eq!(pixel_y_to_row(y, rows as f64 * cell, rows), Some(row));
        }
    }
}
