use alloc::vec::Vec;
use core::mem;

use listview::{
    FrameScheduler, FrameToken, ListenerToken, PageScrollEvents, ScrollMetrics, ScrollMode,
    ViewportSource,
};

use crate::Scroller;

/// An in-memory host with no UI behind it.
///
/// Holds scroll geometry for the list element and the page, queues requested frames until the
/// adapter fires them, and keeps the set of registered page-scroll listeners. Useful for tests,
/// simulations and TUI-style adapters that own their scroll state.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    mode: ScrollMode,
    element: ScrollMetrics,
    page: ScrollMetrics,
    element_page_top: u64,
    content_height: u64,
    next_token: u64,
    frames: Vec<FrameToken>,
    frames_requested: u64,
    frames_canceled: u64,
    listeners: Vec<ListenerToken>,
}

impl HeadlessHost {
    /// Creates a host whose element and page viewports are both `viewport_height` tall.
    pub fn new(mode: ScrollMode, viewport_height: u32) -> Self {
        let metrics = ScrollMetrics {
            scroll_offset: 0,
            client_height: viewport_height,
        };
        Self {
            mode,
            element: metrics,
            page: metrics,
            element_page_top: 0,
            content_height: 0,
            next_token: 0,
            frames: Vec::new(),
            frames_requested: 0,
            frames_canceled: 0,
            listeners: Vec::new(),
        }
    }

    /// Sets where the list element starts in the page (host-scroll layouts).
    pub fn with_element_page_top(mut self, top: u64) -> Self {
        self.element_page_top = top;
        self
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn element(&self) -> ScrollMetrics {
        self.element
    }

    pub fn page(&self) -> ScrollMetrics {
        self.page
    }

    pub fn set_element_page_top(&mut self, top: u64) {
        self.element_page_top = top;
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.element.client_height = height;
        self.page.client_height = height;
    }

    /// Sets the scrollable content height (the list's track height), used to clamp scrolling.
    pub fn set_content_height(&mut self, height: u64) {
        self.content_height = height;
    }

    pub fn content_height(&self) -> u64 {
        self.content_height
    }

    /// The current scroll offset in list coordinates.
    pub fn list_offset(&self) -> u64 {
        match self.mode {
            ScrollMode::SelfScroll => self.element.scroll_offset,
            ScrollMode::HostScroll => self
                .page
                .scroll_offset
                .saturating_sub(self.element_page_top),
        }
    }

    /// Largest valid scroll offset, in list coordinates.
    pub fn max_list_offset(&self) -> u64 {
        let view = match self.mode {
            ScrollMode::SelfScroll => self.element.client_height,
            ScrollMode::HostScroll => self.page.client_height,
        };
        self.content_height.saturating_sub(view as u64)
    }

    /// Moves the active scroll surface so the list is scrolled to `offset` (clamped).
    pub fn set_list_offset(&mut self, offset: u64) {
        let offset = offset.min(self.max_list_offset());
        match self.mode {
            ScrollMode::SelfScroll => self.element.scroll_offset = offset,
            ScrollMode::HostScroll => {
                self.page.scroll_offset = offset.saturating_add(self.element_page_top)
            }
        }
    }

    /// Drains the frames requested since the last call, in request order.
    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        mem::take(&mut self.frames)
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    pub fn frames_canceled(&self) -> u64 {
        self.frames_canceled
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn next_token(&mut self) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }
}

impl ViewportSource for HeadlessHost {
    fn element_metrics(&self) -> ScrollMetrics {
        self.element
    }

    fn page_metrics(&self) -> ScrollMetrics {
        self.page
    }

    fn element_page_top(&self) -> u64 {
        self.element_page_top
    }
}

impl FrameScheduler for HeadlessHost {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token());
        self.frames.push(token);
        self.frames_requested = self.frames_requested.saturating_add(1);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.frames.len();
        self.frames.retain(|&t| t != token);
        if self.frames.len() != before {
            self.frames_canceled = self.frames_canceled.saturating_add(1);
        }
    }
}

impl PageScrollEvents for HeadlessHost {
    fn listen_page_scroll(&mut self) -> ListenerToken {
        let token = ListenerToken(self.next_token());
        self.listeners.push(token);
        token
    }

    fn unlisten_page_scroll(&mut self, token: ListenerToken) {
        self.listeners.retain(|&t| t != token);
    }
}

impl Scroller for HeadlessHost {
    fn scroll_to(&mut self, y: u64) {
        self.set_list_offset(y);
    }

    fn scroll_by(&mut self, dy: i64) {
        let cur = self.list_offset();
        let next = if dy >= 0 {
            cur.saturating_add(dy as u64)
        } else {
            cur.saturating_sub(dy.unsigned_abs())
        };
        self.set_list_offset(next);
    }
}
