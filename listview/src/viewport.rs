use crate::{ScrollMode, Viewport, ViewportSource};

/// Reads the live viewport, in list coordinates, from one of two scroll sources.
///
/// The source is fixed at construction. In host-scroll mode the list's top offset in the page is
/// captured once, on the first measurement, and reused afterwards.
#[derive(Clone, Debug)]
pub struct ViewportTracker {
    mode: ScrollMode,
    top_offset: Option<u64>,
    last: Option<Viewport>,
}

impl ViewportTracker {
    pub fn new(mode: ScrollMode) -> Self {
        Self {
            mode,
            top_offset: None,
            last: None,
        }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// The captured page top offset (host-scroll mode, after the first measurement).
    pub fn top_offset(&self) -> Option<u64> {
        self.top_offset
    }

    /// The most recently observed viewport, if any.
    pub fn last(&self) -> Option<Viewport> {
        self.last
    }

    pub fn is_measured(&self) -> bool {
        self.last.is_some()
    }

    /// Captures the page top offset if it has not been captured yet.
    pub fn capture_top_offset(&mut self, source: &impl ViewportSource) {
        if self.mode == ScrollMode::HostScroll && self.top_offset.is_none() {
            let top = source.element_page_top();
            vdebug!(top, "ViewportTracker: captured page top offset");
            self.top_offset = Some(top);
        }
    }

    /// Reads the live viewport without recording it.
    pub fn read(&mut self, source: &impl ViewportSource) -> Viewport {
        match self.mode {
            ScrollMode::SelfScroll => {
                let m = source.element_metrics();
                Viewport {
                    offset: m.scroll_offset,
                    height: m.client_height,
                }
            }
            ScrollMode::HostScroll => {
                self.capture_top_offset(source);
                let top = self.top_offset.unwrap_or(0);
                let m = source.page_metrics();
                // While the list has not reached the top of the page viewport, only the part
                // below its top edge is visible.
                if m.scroll_offset >= top {
                    Viewport {
                        offset: m.scroll_offset - top,
                        height: m.client_height,
                    }
                } else {
                    let hidden = top - m.scroll_offset;
                    Viewport {
                        offset: 0,
                        height: (m.client_height as u64).saturating_sub(hidden) as u32,
                    }
                }
            }
        }
    }

    /// Reads and records the live viewport. Returns it with whether it differs from the last one.
    pub fn observe(&mut self, source: &impl ViewportSource) -> (Viewport, bool) {
        let viewport = self.read(source);
        let changed = self.last != Some(viewport);
        self.last = Some(viewport);
        (viewport, changed)
    }
}
