use alloc::sync::Arc;
use alloc::vec::Vec;

use listview::{Align, ItemKey, ListView, ListViewOptions, MeasuredRow, ScrollMode};

use crate::{Direction, HeadlessHost, ScrollNavigator, Scroller};

/// Reports the measured height of a committed row node.
pub type Measure<K, N> = Arc<dyn Fn(&N) -> MeasuredRow<K> + Send + Sync>;

/// Render passes `pump` runs before giving up on a list that keeps requesting renders.
pub const DEFAULT_MAX_PASSES: usize = 8;

/// A framework-neutral driver that owns a [`ListView`] and a [`HeadlessHost`] and runs the
/// render, commit and reconcile loop for them.
///
/// "Committing" means keeping the rendered nodes in [`Driver::rows`]; their heights are read back
/// through the `measure` callback. Adapters drive it by calling:
/// - `mount` once
/// - `scroll_to` / `scroll_by` (or the navigation helpers) when the user scrolls
/// - `tick` on every display frame
/// - `unmount` on teardown
pub struct Driver<K, N> {
    list: ListView<K, N>,
    host: HeadlessHost,
    rows: Vec<N>,
    measure: Measure<K, N>,
    navigator: ScrollNavigator,
    max_passes: usize,
}

impl<K: ItemKey, N> Driver<K, N> {
    /// Creates a driver and runs the first (pre-mount) render.
    pub fn new(
        options: ListViewOptions<K, N>,
        host: HeadlessHost,
        measure: impl Fn(&N) -> MeasuredRow<K> + Send + Sync + 'static,
    ) -> Self {
        Self::from_list(ListView::new(options), host, measure)
    }

    pub fn from_list(
        list: ListView<K, N>,
        host: HeadlessHost,
        measure: impl Fn(&N) -> MeasuredRow<K> + Send + Sync + 'static,
    ) -> Self {
        let mut driver = Self {
            list,
            host,
            rows: Vec::new(),
            measure: Arc::new(measure),
            navigator: ScrollNavigator::default(),
            max_passes: DEFAULT_MAX_PASSES,
        };
        driver.pump();
        driver
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn with_navigator(mut self, navigator: ScrollNavigator) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn list(&self) -> &ListView<K, N> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<K, N> {
        &mut self.list
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HeadlessHost {
        &mut self.host
    }

    /// The committed row nodes, in index order.
    pub fn rows(&self) -> &[N] {
        &self.rows
    }

    pub fn navigator(&self) -> ScrollNavigator {
        self.navigator
    }

    pub fn into_parts(self) -> (ListView<K, N>, HeadlessHost) {
        (self.list, self.host)
    }

    /// Attaches the list to the host, then renders until settled.
    pub fn mount(&mut self) -> usize {
        self.list.mount(&mut self.host);
        self.pump()
    }

    /// Detaches the list and drops the committed rows.
    pub fn unmount(&mut self) {
        self.list.unmount(&mut self.host);
        self.rows.clear();
    }

    /// Scrolls the active surface to `offset` (list coordinates) and notifies the list.
    ///
    /// Nothing is re-rendered until the next `tick`.
    pub fn scroll_to(&mut self, offset: u64) {
        self.host.scroll_to(offset);
        self.notify_scroll();
    }

    pub fn scroll_by(&mut self, dy: i64) {
        self.host.scroll_by(dy);
        self.notify_scroll();
    }

    pub fn scroll_to_row(&mut self, index: usize, align: Align) -> Option<u64> {
        let target = self
            .navigator
            .scroll_to_row(&mut self.list, &mut self.host, index, align)?;
        self.notify_scroll();
        Some(target)
    }

    pub fn scroll_past(&mut self, row: usize, direction: Direction) -> Option<u64> {
        let target = self
            .navigator
            .scroll_past(&mut self.list, &mut self.host, row, direction)?;
        self.notify_scroll();
        Some(target)
    }

    pub fn page_down(&mut self) {
        self.navigator.page_down(&self.list, &mut self.host);
        self.notify_scroll();
    }

    pub fn page_up(&mut self) {
        self.navigator.page_up(&self.list, &mut self.host);
        self.notify_scroll();
    }

    /// Fires every frame requested since the last tick, then renders until settled.
    ///
    /// Returns the number of render passes run.
    pub fn tick(&mut self) -> usize {
        for token in self.host.take_frames() {
            self.list.on_frame(token, &self.host);
        }
        self.pump()
    }

    /// Renders, commits and reconciles until the list stops requesting renders.
    ///
    /// Runs at most `max_passes` passes and returns how many ran. A list that is still asking for
    /// a render after the cap keeps its request for the next call.
    pub fn pump(&mut self) -> usize {
        let mut passes = 0;
        while self.list.render_count() == 0 || self.list.is_render_requested() {
            if passes == self.max_passes {
                vwarn!(passes, "Driver::pump: list did not settle");
                break;
            }
            let out = self.list.render(&self.host);
            self.host.set_content_height(out.track_height);
            self.rows = out.rows;
            let measure = &self.measure;
            let measured: Vec<MeasuredRow<K>> = self.rows.iter().map(|n| measure(n)).collect();
            self.list.reconcile(measured);
            passes += 1;
        }
        if passes > 0 {
            // Reconciliation may have grown the track past the last rendered estimate.
            self.host
                .set_content_height(self.list.estimated_total_height());
            vtrace!(passes, rows = self.rows.len(), "Driver::pump");
        }
        passes
    }

    fn notify_scroll(&mut self) {
        // Page scroll events only reach the list through a registered listener.
        if self.list.scroll_mode() == ScrollMode::HostScroll && self.host.listener_count() == 0 {
            return;
        }
        self.list.on_scroll(&mut self.host);
    }
}

impl<K, N> core::fmt::Debug for Driver<K, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("host", &self.host)
            .field("rows", &self.rows.len())
            .field("navigator", &self.navigator)
            .field("max_passes", &self.max_passes)
            .finish_non_exhaustive()
    }
}
