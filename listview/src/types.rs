/// Offset and height of one row in the scroll axis.
///
/// `y` is the sum of the heights of every row before it, so `y(0) == 0` and `y` never decreases
/// as the index grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowPosition {
    pub y: u64,
    pub height: u32,
}

impl RowPosition {
    pub fn end(&self) -> u64 {
        self.y.saturating_add(self.height as u64)
    }
}

/// An inclusive range of item indexes, `[start, end]`.
///
/// Used for both the visible range and the drawn range. An empty list has no range at all, so
/// APIs return `Option<IndexRange>` instead of an empty value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize, // inclusive
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "IndexRange: start > end ({start} > {end})");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Returns `true` when `other` lies entirely inside `self`.
    pub fn covers(&self, other: IndexRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Clamps the range into `[0, len - 1]`, returning `None` when nothing is left.
    pub fn clamp_to(&self, len: usize) -> Option<IndexRange> {
        if len == 0 || self.start >= len {
            return None;
        }
        Some(IndexRange {
            start: self.start,
            end: self.end.min(len - 1),
        })
    }

    /// Expands the range by `by` items on each side, clamped to `[0, len - 1]`.
    pub(crate) fn padded(&self, by: usize, len: usize) -> IndexRange {
        debug_assert!(len > 0);
        IndexRange {
            start: self.start.saturating_sub(by),
            end: self.end.saturating_add(by).min(len - 1),
        }
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// The portion of the list currently on screen, in list coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub offset: u64,
    pub height: u32,
}

impl Viewport {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.height as u64)
    }
}

/// Raw scroll geometry of a scrollable surface (an element or the host page).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    pub scroll_offset: u64,
    pub client_height: u32,
}

/// Which surface drives scrolling for a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollMode {
    /// The list's own scrollable element.
    #[default]
    SelfScroll,
    /// The host page; the list is laid out inline and grows to its full height.
    HostScroll,
}

/// Placement of one instantiated row. Rows are positioned absolutely inside the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowStyle {
    pub top: u64,
    pub height: u32,
}

/// Attributes an embedder must attach to a rendered row so it can be measured later.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowAttrs<K> {
    pub item_key: K,
}

/// A committed row as measured by the embedder.
///
/// `key` is `None` when the row carries no retrievable item key.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasuredRow<K> {
    pub key: Option<K>,
    pub height: u32,
}

impl<K> MeasuredRow<K> {
    pub fn new(key: K, height: u32) -> Self {
        Self {
            key: Some(key),
            height,
        }
    }

    pub fn unkeyed(height: u32) -> Self {
        Self { key: None, height }
    }
}

/// Lifecycle phase of a [`crate::ListView`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No viewport has been measured yet; draws use the `initial_draw` heuristic.
    #[default]
    Unmeasured,
    /// The drawn range is valid and covers the visible range plus buffer.
    Idle,
    /// A scroll was observed and a display-refresh callback is scheduled.
    Pending,
    /// Terminal.
    Unmounted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}
