use crate::{IndexRange, PositionCache, Viewport};

/// Default number of rows drawn before any viewport has been measured.
pub const DEFAULT_INITIAL_DRAW: usize = 300;

/// Outcome of a draw-window decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowDecision {
    /// The current drawn range still covers the visible range plus `buffer_min`.
    Keep(IndexRange),
    /// The drawn range must move; draw this range instead.
    Redraw(IndexRange),
    /// The list is empty; nothing is drawn.
    Empty,
}

impl WindowDecision {
    pub fn range(&self) -> Option<IndexRange> {
        match self {
            Self::Keep(r) | Self::Redraw(r) => Some(*r),
            Self::Empty => None,
        }
    }

    pub fn is_redraw(&self) -> bool {
        matches!(self, Self::Redraw(_))
    }
}

/// Decides which indexes must be instantiated, with two buffer tiers for hysteresis.
///
/// The drawn range is only recomputed once the visible range padded by `buffer_min` escapes it,
/// and it is then recomputed with the larger `buffer`. Both are item counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowCalculator {
    pub buffer: usize,
    pub buffer_min: usize,
    pub initial_draw: usize,
}

impl WindowCalculator {
    pub fn new(buffer: usize, buffer_min: usize) -> Self {
        debug_assert!(
            buffer_min <= buffer,
            "WindowCalculator: buffer_min should not exceed buffer ({buffer_min} > {buffer})"
        );
        Self {
            buffer,
            buffer_min,
            initial_draw: DEFAULT_INITIAL_DRAW,
        }
    }

    pub fn with_initial_draw(mut self, initial_draw: usize) -> Self {
        self.initial_draw = initial_draw;
        self
    }

    /// Indexes whose pixel span intersects `viewport`. `None` for an empty list.
    pub fn visible_range(
        &self,
        cache: &mut PositionCache,
        viewport: Viewport,
        mut height_fn: impl FnMut(usize) -> u32,
    ) -> Option<IndexRange> {
        if cache.is_empty() {
            return None;
        }
        let start = cache.floor_index(viewport.offset, &mut height_fn);
        let end = cache.floor_index(viewport.end(), &mut height_fn);
        Some(IndexRange::new(start, end))
    }

    /// The pre-viewport draw: `[0, min(initial_draw, len) - 1]`.
    pub fn initial_range(&self, len: usize) -> Option<IndexRange> {
        let n = self.initial_draw.min(len);
        (n > 0).then(|| IndexRange::new(0, n - 1))
    }

    /// Applies the two-tier buffer rule to `visible` against the current `drawn` range.
    ///
    /// `drawn` may be stale with respect to `len` (the list shrank); it is clamped first.
    pub fn decide(
        &self,
        visible: Option<IndexRange>,
        drawn: Option<IndexRange>,
        len: usize,
    ) -> WindowDecision {
        let Some(visible) = visible.and_then(|v| v.clamp_to(len)) else {
            return WindowDecision::Empty;
        };

        let min_necessary = visible.padded(self.buffer_min, len);
        match drawn.and_then(|d| d.clamp_to(len)) {
            Some(d) if d.covers(min_necessary) => WindowDecision::Keep(d),
            _ => {
                let next = visible.padded(self.buffer, len);
                vtrace!(
                    start = next.start,
                    end = next.end,
                    visible_start = visible.start,
                    visible_end = visible.end,
                    "WindowCalculator: redraw"
                );
                WindowDecision::Redraw(next)
            }
        }
    }
}
