use crate::{FrameScheduler, FrameToken};

/// Trailing debounce of scroll-driven recomputation onto the display refresh.
///
/// At most one frame is outstanding at a time. Scroll notifications that arrive while a frame is
/// pending are coalesced into it; their payloads are irrelevant because the viewport is re-read
/// when the frame fires.
#[derive(Clone, Debug, Default)]
pub struct RenderScheduler {
    pending: Option<FrameToken>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Handles a scroll notification. Returns `true` if a new frame was requested.
    pub fn on_scroll(&mut self, frames: &mut impl FrameScheduler) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let token = frames.request_frame();
        vtrace!(token = token.0, "RenderScheduler: frame requested");
        self.pending = Some(token);
        true
    }

    /// Handles a fired frame. Returns `true` when `token` is the outstanding frame, in which case
    /// the caller must recompute the draw window.
    ///
    /// Tokens that were canceled or superseded are ignored.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.pending != Some(token) {
            vtrace!(token = token.0, "RenderScheduler: ignoring stale frame");
            return false;
        }
        self.pending = None;
        true
    }

    /// Cancels the outstanding frame, if any.
    pub fn cancel(&mut self, frames: &mut impl FrameScheduler) {
        if let Some(token) = self.pending.take() {
            vtrace!(token = token.0, "RenderScheduler: frame canceled");
            frames.cancel_frame(token);
        }
    }
}
