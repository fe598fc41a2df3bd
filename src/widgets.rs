//! Line lists whose rows double as tap targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// Collects the lines of a panel and remembers which of them carry an
/// action, so targets land on whatever row a line is finally drawn at.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Upgrades"));
/// cl.push_clickable(Line::from("[1] Deep Meditation"), BUY_UPGRADE_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, 0, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// (`lines` のインデックス, アクションID)
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Visual rows each line occupies when wrapped at `width` columns.
    /// A width of 0 means the paragraph does not wrap.
    fn row_heights(&self, width: u16) -> Vec<u16> {
        self.lines
            .iter()
            .map(|line| {
                let w = line.width();
                if width == 0 || w <= width as usize {
                    1
                } else {
                    w.div_ceil(width as usize) as u16
                }
            })
            .collect()
    }

    /// Register a row target for every visible row of every clickable line.
    ///
    /// `top` and `bottom` are the rows taken by borders, `scroll` is the
    /// paragraph's vertical scroll in visual rows, and `wrap_width` is the
    /// inner width when the paragraph wraps (0 otherwise).
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top: u16,
        bottom: u16,
        scroll: u16,
        wrap_width: u16,
    ) {
        let first_row = area.y + top;
        let end_row = area.y + area.height.saturating_sub(bottom);

        let heights = self.row_heights(wrap_width);
        let mut starts = Vec::with_capacity(heights.len());
        let mut acc: u16 = 0;
        for h in &heights {
            starts.push(acc);
            acc = acc.saturating_add(*h);
        }

        for &(idx, action_id) in &self.actions {
            let (start, height) = (starts[idx], heights[idx]);
            for visual in start..start.saturating_add(height) {
                if visual < scroll {
                    continue;
                }
                let row = first_row + (visual - scroll);
                if row >= end_row {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
