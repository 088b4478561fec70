use listview::{Align, ListViewHandle};

/// A surface that can be scrolled programmatically, in list coordinates.
pub trait Scroller {
    fn scroll_to(&mut self, y: u64);
    fn scroll_by(&mut self, dy: i64);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn sign(self) -> i64 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Programmatic scrolling built only on a list's imperative handle.
///
/// Row geometry comes from `row_position`/`viewport_height`; the actual scrolling is delegated to
/// a [`Scroller`], so this works the same for self-scrolling and page-scrolling lists.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollNavigator {
    /// Fraction of the viewport height moved by `page_up`/`page_down`.
    pub page_fraction: f32,
    /// Fraction of the viewport height a row is scrolled past the edge by `scroll_past`.
    pub past_fraction: f32,
}

impl Default for ScrollNavigator {
    fn default() -> Self {
        Self {
            page_fraction: 0.95,
            past_fraction: 0.5,
        }
    }
}

impl ScrollNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the offset that brings `index` into view with the given alignment.
    ///
    /// Returns `None` when `index` is out of range, or for [`Align::Auto`] when the row is already
    /// between the top and bottom visible rows.
    pub fn row_target(
        &self,
        list: &mut impl ListViewHandle,
        index: usize,
        align: Align,
    ) -> Option<u64> {
        let pos = list.row_position(index)?;
        let view = list.viewport_height() as u64;
        let target = match align {
            Align::Start => pos.y,
            Align::End => pos.end().saturating_sub(view),
            Align::Center => pos
                .y
                .saturating_add(pos.height as u64 / 2)
                .saturating_sub(view / 2),
            Align::Auto => {
                let top = list.top_visible_index();
                let bottom = list.bottom_visible_index();
                if top < index && index < bottom {
                    return None;
                } else if index <= top {
                    pos.y
                } else {
                    pos.end().saturating_sub(view)
                }
            }
        };
        Some(target)
    }

    /// Scrolls so `index` is in view. Returns the applied target, if any.
    pub fn scroll_to_row(
        &self,
        list: &mut impl ListViewHandle,
        scroller: &mut impl Scroller,
        index: usize,
        align: Align,
    ) -> Option<u64> {
        let target = self.row_target(list, index, align)?;
        vtrace!(index, target, "ScrollNavigator::scroll_to_row");
        scroller.scroll_to(target);
        Some(target)
    }

    /// Scrolls `row` past the viewport edge in `direction`, leaving part of a viewport of context
    /// beyond it.
    ///
    /// Scrolling down aligns the row's bottom edge with the viewport's bottom before adding the
    /// context; scrolling up starts from the row's top edge.
    pub fn scroll_past(
        &self,
        list: &mut impl ListViewHandle,
        scroller: &mut impl Scroller,
        row: usize,
        direction: Direction,
    ) -> Option<u64> {
        let Some(pos) = list.row_position(row) else {
            vwarn!(row, "ScrollNavigator::scroll_past: invalid row index");
            return None;
        };
        let view = list.viewport_height() as i64;
        let mut y = pos.y as i64;
        if direction == Direction::Down {
            y += pos.height as i64;
            y -= view;
        }
        y += direction.sign() * scaled(view, self.past_fraction);
        let target = y.max(0) as u64;
        scroller.scroll_to(target);
        Some(target)
    }

    pub fn page_down(&self, list: &impl ListViewHandle, scroller: &mut impl Scroller) {
        scroller.scroll_by(self.page_delta(list));
    }

    pub fn page_up(&self, list: &impl ListViewHandle, scroller: &mut impl Scroller) {
        scroller.scroll_by(-self.page_delta(list));
    }

    fn page_delta(&self, list: &impl ListViewHandle) -> i64 {
        scaled(list.viewport_height() as i64, self.page_fraction)
    }
}

/// `value * fraction`, rounded to the nearest whole pixel.
fn scaled(value: i64, fraction: f32) -> i64 {
    (value as f64 * fraction as f64 + 0.5) as i64
}
