use alloc::vec::Vec;

use crate::RowPosition;

/// Default number of rows computed past the one explicitly requested.
pub const DEFAULT_LOOKAHEAD: usize = 200;

/// Maps item index → cumulative offset and height for a sequence of rows whose heights are mostly
/// unknown up front.
///
/// Offsets are computed lazily, front to back, using a caller-provided height function. The
/// highest index computed so far is the *watermark*; lookups below it are `O(1)` (by index) or
/// `O(log n)` (by offset), lookups above it extend the watermark first.
///
/// The cache holds positions only. Which height a row "really" has (measured vs. estimated) is
/// decided by the height function the caller passes in.
#[derive(Clone, Debug)]
pub struct PositionCache {
    ys: Vec<u64>,
    heights: Vec<u32>,
    computed: Option<usize>,
    lookahead: usize,
    default_height: Option<u32>,
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionCache {
    pub fn new() -> Self {
        Self {
            ys: Vec::new(),
            heights: Vec::new(),
            computed: None,
            lookahead: DEFAULT_LOOKAHEAD,
            default_height: None,
        }
    }

    /// Sets how many rows past the requested index `extend_to` computes in one go.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Sets the height assumed for rows that were never computed when estimating the total height.
    ///
    /// With `None`, the average computed height is used instead.
    pub fn with_default_height(mut self, default_height: Option<u32>) -> Self {
        self.default_height = default_height;
        self
    }

    pub fn set_lookahead(&mut self, lookahead: usize) {
        self.lookahead = lookahead;
    }

    pub fn set_default_height(&mut self, default_height: Option<u32>) {
        self.default_height = default_height;
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// The highest index whose offset is currently computed, if any.
    pub fn watermark(&self) -> Option<usize> {
        self.computed
    }

    /// Adapts the cache to a new item count.
    ///
    /// Entries past the new length are dropped and the watermark is clamped. Computed entries
    /// below the new length are kept.
    pub fn resize(&mut self, len: usize) {
        if len == self.len() {
            return;
        }
        vdebug!(from = self.len(), to = len, "PositionCache::resize");
        self.ys.resize(len, 0);
        self.heights.resize(len, 0);
        self.computed = match self.computed {
            Some(_) if len == 0 => None,
            Some(w) => Some(w.min(len - 1)),
            None => None,
        };
    }

    /// Guarantees the watermark covers `index`, computing any missing rows with `height_fn`.
    ///
    /// Rows already below the watermark are never recomputed. Returns the watermark after the
    /// call.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn extend_to(&mut self, index: usize, mut height_fn: impl FnMut(usize) -> u32) -> usize {
        let len = self.len();
        assert!(
            index < len,
            "PositionCache::extend_to: index out of bounds (i={index}, len={len})"
        );
        if let Some(w) = self.computed {
            if w >= index {
                return w;
            }
        }

        let target = index.saturating_add(self.lookahead).min(len - 1);
        let mut i = self.computed.map_or(0, |w| w + 1);
        let mut y = if i == 0 { 0 } else { self.end_of(i - 1) };
        while i <= target {
            let h = height_fn(i);
            self.ys[i] = y;
            self.heights[i] = h;
            y = y.saturating_add(h as u64);
            i += 1;
        }
        self.computed = Some(target);
        target
    }

    /// Marks the offsets after `index` (and the height of `index` itself) as stale.
    ///
    /// Offsets before `index` are unaffected. Stale rows are recomputed by the next call that
    /// needs them.
    pub fn invalidate_from(&mut self, index: usize) {
        if let Some(w) = self.computed {
            if w >= index {
                vtrace!(index, watermark = w, "PositionCache::invalidate_from");
                self.computed = index.checked_sub(1);
            }
        }
    }

    /// Returns the offset and height of `index`, extending the cache if needed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn row_position(
        &mut self,
        index: usize,
        height_fn: impl FnMut(usize) -> u32,
    ) -> RowPosition {
        self.extend_to(index, height_fn);
        RowPosition {
            y: self.ys[index],
            height: self.heights[index],
        }
    }

    /// The height currently cached for `index`, or `None` above the watermark.
    pub fn cached_height(&self, index: usize) -> Option<u32> {
        match self.computed {
            Some(w) if index <= w => Some(self.heights[index]),
            _ => None,
        }
    }

    /// Returns the greatest index whose offset is `<= y`.
    ///
    /// Offsets past the end of the list map to the last index; an empty list maps to `0`. Runs in
    /// `O(log n)` once the watermark covers `y`.
    pub fn floor_index(&mut self, y: u64, mut height_fn: impl FnMut(usize) -> u32) -> usize {
        let len = self.len();
        if len == 0 {
            return 0;
        }

        let mut w = self.extend_to(0, &mut height_fn);
        while w < len - 1 && self.end_of(w) <= y {
            w = self.extend_to(w + 1, &mut height_fn);
        }

        // ys[0] == 0 <= y, so at least one entry matches.
        self.ys[..=w].partition_point(|&v| v <= y).saturating_sub(1)
    }

    /// Estimated height of the whole list.
    ///
    /// Computed rows contribute their real height; rows above the watermark contribute the
    /// default height (or the average computed height when no default is set).
    pub fn estimated_total_height(&self) -> u64 {
        let len = self.len() as u64;
        let Some(w) = self.computed else {
            return self.default_height.map_or(0, |d| d as u64 * len);
        };

        let known = self.end_of(w);
        let computed = w as u64 + 1;
        let unknown = len - computed;
        if unknown == 0 {
            return known;
        }
        let rest = match self.default_height {
            Some(d) => unknown.saturating_mul(d as u64),
            None => {
                let rest = known as u128 * unknown as u128 / computed as u128;
                u64::try_from(rest).unwrap_or(u64::MAX)
            }
        };
        known.saturating_add(rest)
    }

    fn end_of(&self, index: usize) -> u64 {
        self.ys[index].saturating_add(self.heights[index] as u64)
    }
}
