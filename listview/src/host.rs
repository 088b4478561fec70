//! Capabilities a [`crate::ListView`] needs from the environment it is embedded in.
//!
//! The list never holds UI objects. An embedder passes an implementation of these traits into the
//! calls that need them, so every read is a live read.

use crate::ScrollMetrics;

/// Identifies one scheduled display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameToken(pub u64);

/// Identifies one registered page-scroll listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerToken(pub u64);

/// Live scroll geometry.
pub trait ViewportSource {
    /// Scroll offset and visible height of the list's own scrollable element.
    fn element_metrics(&self) -> ScrollMetrics;

    /// Scroll offset and visible height of the host page.
    fn page_metrics(&self) -> ScrollMetrics;

    /// Distance from the top of the page to the top edge of the list element, in page
    /// coordinates (i.e. independent of the current page scroll).
    fn element_page_top(&self) -> u64;
}

/// A single-shot deferred callback keyed to the display refresh.
///
/// When a requested frame fires, the embedder calls [`crate::ListView::on_frame`] with its token.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Registration of page-level scroll listeners (host-scroll mode only).
///
/// While registered, the embedder forwards page scroll events to [`crate::ListView::on_scroll`].
pub trait PageScrollEvents {
    fn listen_page_scroll(&mut self) -> ListenerToken;
    fn unlisten_page_scroll(&mut self, token: ListenerToken);
}

/// Everything a list needs from its host.
pub trait Host: ViewportSource + FrameScheduler + PageScrollEvents {}
impl<T: ViewportSource + FrameScheduler + PageScrollEvents> Host for T {}
