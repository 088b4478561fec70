use crate::RowPosition;

/// The imperative surface a list exposes to whoever embeds it.
///
/// Obtained by holding a reference to the list; there is no global registry.
pub trait ListViewHandle {
    /// Re-renders without changing the drawn range, e.g. after a row's content changed in place.
    fn force_render(&mut self);

    /// Height of the last observed viewport, `0` before the first measurement.
    fn viewport_height(&self) -> u32;

    /// Index of the row at the top edge of the viewport.
    fn top_visible_index(&mut self) -> usize;

    /// Index of the row at the bottom edge of the viewport.
    fn bottom_visible_index(&mut self) -> usize;

    /// Offset and height of `index`, or `None` when it is out of range.
    fn row_position(&mut self, index: usize) -> Option<RowPosition>;
}
