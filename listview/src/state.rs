use crate::{IndexRange, Phase, Viewport};

/// A lightweight, serializable snapshot of a list's scheduling state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`. Useful for
/// diagnostics overlays and for asserting on list internals in embedder tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListViewState {
    pub phase: Phase,
    pub data_length: usize,
    pub drawn: Option<IndexRange>,
    pub visible: Option<IndexRange>,
    pub viewport: Option<Viewport>,
    pub track_height: u64,
    pub known_heights: usize,
    pub watermark: Option<usize>,
    pub render_count: u64,
}
