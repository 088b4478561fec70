use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::ItemKey;
use crate::{
    FrameScheduler, FrameToken, HeightReconciler, IndexRange, ListViewHandle, ListViewOptions,
    ListViewState, ListenerToken, MeasuredRow, PageScrollEvents, Phase, PositionCache,
    RenderScheduler, RowAttrs, RowPosition, RowStyle, ScrollMode, Viewport, ViewportSource,
    ViewportTracker, WindowCalculator, WindowDecision,
};

/// Output of one [`ListView::render`] pass.
#[derive(Clone, Debug)]
pub struct RenderedList<N> {
    /// Height of the scrollable track; the estimated height of the whole list.
    pub track_height: u64,
    /// Indexes instantiated by this pass.
    pub drawn: Option<IndexRange>,
    /// One node per drawn index, in index order.
    pub rows: Vec<N>,
    /// With [`ScrollMode::SelfScroll`] the container scrolls itself (overflow auto, full height);
    /// with [`ScrollMode::HostScroll`] it grows to the track height and the page scrolls.
    pub scroll_mode: ScrollMode,
}

/// A headless, variable-height virtualized list.
///
/// Only a window of rows around the viewport is instantiated. Row offsets come from a
/// [`PositionCache`] fed by height estimates, and are corrected after every commit from the
/// heights the embedder actually measured.
///
/// The embedder drives it:
/// - `render` whenever `take_render_request` returns `true` (and once initially), then commits
///   the returned rows
/// - `mount` once, after the first commit
/// - `reconcile` after every commit, with the measured heights
/// - `on_scroll` for scroll events, and `on_frame` when a requested frame fires
/// - `unmount` on teardown
pub struct ListView<K, N> {
    options: ListViewOptions<K, N>,
    positions: PositionCache,
    reconciler: HeightReconciler<K>,
    tracker: ViewportTracker,
    window: WindowCalculator,
    scheduler: RenderScheduler,

    drawn: Option<IndexRange>,
    visible: Option<IndexRange>,
    visible_stale: bool,

    mounted: bool,
    unmounted: bool,
    listener: Option<ListenerToken>,
    render_requested: bool,
    render_count: u64,
}

fn height_getter<'a, K: ItemKey, N>(
    options: &'a ListViewOptions<K, N>,
    reconciler: &'a HeightReconciler<K>,
) -> impl FnMut(usize) -> u32 + 'a {
    move |i| {
        let key = (options.key_of)(i);
        reconciler
            .known_height(&key)
            .unwrap_or_else(|| (options.height_of)(i, &key))
    }
}

impl<K: ItemKey, N> ListView<K, N> {
    pub fn new(options: ListViewOptions<K, N>) -> Self {
        vdebug!(
            data_length = options.data_length,
            buffer = options.buffer,
            buffer_min = options.buffer_min,
            host_scroll = options.host_scroll,
            "ListView::new"
        );
        let mode = if options.host_scroll {
            ScrollMode::HostScroll
        } else {
            ScrollMode::SelfScroll
        };
        let mut positions = PositionCache::new()
            .with_lookahead(options.lookahead)
            .with_default_height(options.default_height);
        positions.resize(options.data_length);
        let window = WindowCalculator::new(options.buffer, options.buffer_min)
            .with_initial_draw(options.initial_draw);
        Self {
            positions,
            reconciler: HeightReconciler::new(),
            tracker: ViewportTracker::new(mode),
            window,
            scheduler: RenderScheduler::new(),
            drawn: None,
            visible: None,
            visible_stale: true,
            mounted: false,
            unmounted: false,
            listener: None,
            render_requested: false,
            render_count: 0,
            options,
        }
    }

    pub fn options(&self) -> &ListViewOptions<K, N> {
        &self.options
    }

    /// Replaces the options.
    ///
    /// The position cache is resized, never recreated. It is invalidated entirely when the key
    /// mapping or the height estimator changed. The scroll source is fixed at construction, so a
    /// changed `host_scroll` is ignored.
    pub fn set_options(&mut self, options: ListViewOptions<K, N>) {
        let heights_changed = !Arc::ptr_eq(&self.options.key_of, &options.key_of)
            || !Arc::ptr_eq(&self.options.height_of, &options.height_of);
        if options.host_scroll != self.options.host_scroll {
            vwarn!("ListView::set_options: host_scroll is fixed at construction; ignoring change");
        }
        let host_scroll = self.options.host_scroll;
        self.options = options;
        self.options.host_scroll = host_scroll;

        self.window = WindowCalculator::new(self.options.buffer, self.options.buffer_min)
            .with_initial_draw(self.options.initial_draw);
        self.positions.set_lookahead(self.options.lookahead);
        self.positions.set_default_height(self.options.default_height);
        self.positions.resize(self.options.data_length);
        if heights_changed {
            self.positions.invalidate_from(0);
        }
        self.visible_stale = true;
        self.request_render();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListViewOptions<K, N>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn data_length(&self) -> usize {
        self.options.data_length
    }

    /// Changes the item count. Ranges are clamped on the next render.
    pub fn set_data_length(&mut self, data_length: usize) {
        if self.options.data_length == data_length {
            return;
        }
        vdebug!(
            from = self.options.data_length,
            to = data_length,
            "ListView::set_data_length"
        );
        self.options.data_length = data_length;
        self.positions.resize(data_length);
        self.visible_stale = true;
        self.request_render();
    }

    pub fn phase(&self) -> Phase {
        if self.unmounted {
            Phase::Unmounted
        } else if self.scheduler.is_pending() {
            Phase::Pending
        } else if !self.tracker.is_measured() {
            Phase::Unmeasured
        } else {
            Phase::Idle
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted && !self.unmounted
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.tracker.mode()
    }

    pub fn drawn_range(&self) -> Option<IndexRange> {
        self.drawn
    }

    pub fn visible_range(&self) -> Option<IndexRange> {
        self.visible
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.tracker.last()
    }

    pub fn positions(&self) -> &PositionCache {
        &self.positions
    }

    /// Number of render passes performed so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn estimated_total_height(&self) -> u64 {
        self.positions.estimated_total_height()
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.key_of)(index)
    }

    pub fn state(&self) -> ListViewState {
        ListViewState {
            phase: self.phase(),
            data_length: self.options.data_length,
            drawn: self.drawn,
            visible: self.visible,
            viewport: self.tracker.last(),
            track_height: self.positions.estimated_total_height(),
            known_heights: self.reconciler.len(),
            watermark: self.positions.watermark(),
            render_count: self.render_count,
        }
    }

    /// Attaches the list to its host. Call once, after the first commit.
    ///
    /// Captures the page top offset and registers a page-scroll listener in host-scroll mode,
    /// then measures the viewport. Requests a render if the heuristic first draw does not cover
    /// what is actually visible.
    pub fn mount<H>(&mut self, host: &mut H)
    where
        H: ViewportSource + PageScrollEvents,
    {
        if self.mounted || self.unmounted {
            return;
        }
        self.mounted = true;
        self.tracker.capture_top_offset(&*host);
        if self.tracker.mode() == ScrollMode::HostScroll {
            self.listener = Some(host.listen_page_scroll());
        }
        vdebug!(mode = ?self.tracker.mode(), "ListView::mount");
        if self.recompute_window(&*host).is_redraw() {
            self.request_render();
        }
    }

    /// Tears the list down: cancels a pending frame and detaches the page-scroll listener.
    ///
    /// Every later call is a no-op.
    pub fn unmount<H>(&mut self, host: &mut H)
    where
        H: FrameScheduler + PageScrollEvents,
    {
        if self.unmounted {
            return;
        }
        self.scheduler.cancel(host);
        if let Some(listener) = self.listener.take() {
            host.unlisten_page_scroll(listener);
        }
        self.unmounted = true;
        self.render_requested = false;
        vdebug!("ListView::unmount");
    }

    /// Handles a scroll notification from the active scroll source.
    ///
    /// Schedules at most one frame; notifications before it fires are coalesced.
    pub fn on_scroll(&mut self, frames: &mut impl FrameScheduler) {
        if self.unmounted {
            return;
        }
        vtrace!("ListView::on_scroll");
        self.scheduler.on_scroll(frames);
    }

    /// Handles a fired frame. Re-reads the live viewport and requests a render only if the drawn
    /// range must change.
    ///
    /// Returns `true` when a render was requested.
    pub fn on_frame(&mut self, token: FrameToken, source: &impl ViewportSource) -> bool {
        if self.unmounted || !self.scheduler.on_frame(token) {
            return false;
        }
        if !self.mounted {
            return false;
        }
        if self.recompute_window(source).is_redraw() {
            self.request_render();
            return true;
        }
        false
    }

    /// Requests a render pass without changing the drawn range.
    pub fn force_render(&mut self) {
        if self.unmounted {
            return;
        }
        self.request_render();
    }

    pub fn is_render_requested(&self) -> bool {
        self.render_requested
    }

    /// Returns whether a render was requested since the last call, clearing the request.
    pub fn take_render_request(&mut self) -> bool {
        core::mem::replace(&mut self.render_requested, false)
    }

    /// Instantiates the drawn subset.
    ///
    /// Before mount, draws the first `initial_draw` rows. Afterwards, re-reads the viewport and
    /// applies the buffer rules to decide the drawn range.
    pub fn render(&mut self, source: &impl ViewportSource) -> RenderedList<N> {
        self.render_requested = false;
        let len = self.options.data_length;
        self.positions.resize(len);

        let range = if self.unmounted {
            None
        } else if !self.mounted {
            self.window.initial_range(len)
        } else {
            self.recompute_window(source).range()
        };

        let mut rows = Vec::with_capacity(range.map_or(0, |r| r.len()));
        if let Some(r) = range {
            let mut height_fn = height_getter(&self.options, &self.reconciler);
            self.positions.extend_to(r.end, &mut height_fn);
            for i in r.iter() {
                let pos = self.positions.row_position(i, &mut height_fn);
                let key = (self.options.key_of)(i);
                let style = RowStyle {
                    top: pos.y,
                    height: pos.height,
                };
                let attrs = RowAttrs {
                    item_key: key.clone(),
                };
                rows.push((self.options.render_item)(&key, style, i, attrs));
            }
        }

        self.drawn = range;
        self.render_count = self.render_count.saturating_add(1);
        vtrace!(
            start = range.map(|r| r.start),
            end = range.map(|r| r.end),
            rows = rows.len(),
            "ListView::render"
        );

        RenderedList {
            track_height: self.positions.estimated_total_height(),
            drawn: range,
            rows,
            scroll_mode: self.tracker.mode(),
        }
    }

    /// Reconciles measured heights of the committed rows against the cache.
    ///
    /// Call after every commit, even when nothing is expected to have changed: first-time
    /// measurements happen here. When any height changed, the affected offsets are recomputed
    /// and one more render is requested. Returns `true` in that case.
    pub fn reconcile(&mut self, rows: impl IntoIterator<Item = MeasuredRow<K>>) -> bool {
        if self.unmounted {
            return false;
        }
        let len = self.options.data_length;
        let index_of = Arc::clone(&self.options.index_of);
        let positions = &self.positions;
        let Some(dirty) = self.reconciler.reconcile(
            rows,
            |key| index_of(key).filter(|&i| i < len),
            |i| positions.cached_height(i),
        ) else {
            return false;
        };

        self.positions.invalidate_from(dirty.start);
        let height_fn = height_getter(&self.options, &self.reconciler);
        self.positions.extend_to(dirty.end, height_fn);
        self.visible_stale = true;
        self.request_render();
        true
    }

    pub fn known_height(&self, key: &K) -> Option<u32> {
        self.reconciler.known_height(key)
    }

    pub fn known_heights_len(&self) -> usize {
        self.reconciler.len()
    }

    /// Exports the measured heights (key → height), e.g. to warm a later list instance.
    pub fn export_known_heights(&self) -> Vec<(K, u32)> {
        self.reconciler.export()
    }

    /// Replaces the measured heights and recomputes every offset.
    pub fn import_known_heights(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.reconciler.import(entries);
        vdebug!(entries = self.reconciler.len(), "ListView::import_known_heights");
        self.positions.invalidate_from(0);
        self.visible_stale = true;
        self.request_render();
    }

    /// Forgets every measured height; rows fall back to `height_of` until measured again.
    pub fn reset_known_heights(&mut self) {
        self.reconciler.clear();
        self.positions.invalidate_from(0);
        self.visible_stale = true;
        self.request_render();
    }

    fn request_render(&mut self) {
        self.render_requested = true;
        if let Some(cb) = &self.options.on_render_request {
            cb();
        }
    }

    /// Reads the live viewport, refreshes the visible range when needed and decides the draw
    /// window against the current drawn range. Does not modify the drawn range.
    fn recompute_window(&mut self, source: &impl ViewportSource) -> WindowDecision {
        let len = self.options.data_length;
        self.positions.resize(len);
        let (viewport, changed) = self.tracker.observe(source);
        if changed || self.visible_stale {
            let height_fn = height_getter(&self.options, &self.reconciler);
            self.visible = self
                .window
                .visible_range(&mut self.positions, viewport, height_fn);
            self.visible_stale = false;
        }
        self.window.decide(self.visible, self.drawn, len)
    }

    fn floor_index(&mut self, y: u64) -> usize {
        let height_fn = height_getter(&self.options, &self.reconciler);
        self.positions.floor_index(y, height_fn)
    }
}

impl<K: ItemKey, N> ListViewHandle for ListView<K, N> {
    fn force_render(&mut self) {
        ListView::force_render(self);
    }

    fn viewport_height(&self) -> u32 {
        self.tracker.last().map_or(0, |v| v.height)
    }

    fn top_visible_index(&mut self) -> usize {
        let offset = self.tracker.last().map_or(0, |v| v.offset);
        self.floor_index(offset)
    }

    fn bottom_visible_index(&mut self) -> usize {
        let end = self.tracker.last().map_or(0, |v| v.end());
        self.floor_index(end)
    }

    fn row_position(&mut self, index: usize) -> Option<RowPosition> {
        if index >= self.options.data_length {
            return None;
        }
        self.positions.resize(self.options.data_length);
        let height_fn = height_getter(&self.options, &self.reconciler);
        Some(self.positions.row_position(index, height_fn))
    }
}

impl<K: core::fmt::Debug, N> core::fmt::Debug for ListView<K, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListView")
            .field("options", &self.options)
            .field("positions", &self.positions)
            .field("reconciler", &self.reconciler)
            .field("tracker", &self.tracker)
            .field("scheduler", &self.scheduler)
            .field("drawn", &self.drawn)
            .field("visible", &self.visible)
            .field("mounted", &self.mounted)
            .field("unmounted", &self.unmounted)
            .field("render_requested", &self.render_requested)
            .finish_non_exhaustive()
    }
}
