use alloc::sync::Arc;

use crate::positions::DEFAULT_LOOKAHEAD;
use crate::window::DEFAULT_INITIAL_DRAW;
use crate::{RowAttrs, RowStyle};

/// Maps an item index to its stable key.
pub type KeyOf<K> = Arc<dyn Fn(usize) -> K + Send + Sync>;

/// Maps a key back to its current index; `None` when the key is no longer in the data set.
pub type IndexOf<K> = Arc<dyn Fn(&K) -> Option<usize> + Send + Sync>;

/// Estimated height for a row that has not been measured yet.
pub type HeightOf<K> = Arc<dyn Fn(usize, &K) -> u32 + Send + Sync>;

/// Produces the content for one row: `render_item(key, style, index, attrs)`.
///
/// The returned node must carry `attrs` so the embedder can report its measured height back.
pub type RenderItem<K, N> = Arc<dyn Fn(&K, RowStyle, usize, RowAttrs<K>) -> N + Send + Sync>;

/// A callback fired whenever the list wants to be rendered again.
pub type OnRenderRequest = Arc<dyn Fn() + Send + Sync>;

/// Configuration for [`crate::ListView`].
///
/// Cheap to clone: closures are stored in `Arc`s so embedders can update a few fields and call
/// `ListView::set_options` without reallocating them.
pub struct ListViewOptions<K, N> {
    pub data_length: usize,
    pub key_of: KeyOf<K>,
    pub index_of: IndexOf<K>,
    /// Consulted only for indexes whose height is not known from a measurement.
    pub height_of: HeightOf<K>,
    pub render_item: RenderItem<K, N>,

    /// Rows drawn on each side of the visible range when the drawn range is recomputed.
    pub buffer: usize,
    /// Rows that must remain drawn on each side of the visible range before a recompute happens.
    pub buffer_min: usize,

    /// When `true`, the host page drives scrolling instead of the list's own element.
    pub host_scroll: bool,

    /// Number of rows drawn before any viewport has been measured.
    pub initial_draw: usize,

    /// Rows computed past the requested one whenever the position cache is extended.
    pub lookahead: usize,

    /// Height assumed for rows never computed when sizing the scroll track.
    ///
    /// `None` extrapolates from the average computed height.
    pub default_height: Option<u32>,

    pub on_render_request: Option<OnRenderRequest>,
}

impl<K, N> Clone for ListViewOptions<K, N> {
    fn clone(&self) -> Self {
        Self {
            data_length: self.data_length,
            key_of: Arc::clone(&self.key_of),
            index_of: Arc::clone(&self.index_of),
            height_of: Arc::clone(&self.height_of),
            render_item: Arc::clone(&self.render_item),
            buffer: self.buffer,
            buffer_min: self.buffer_min,
            host_scroll: self.host_scroll,
            initial_draw: self.initial_draw,
            lookahead: self.lookahead,
            default_height: self.default_height,
            on_render_request: self.on_render_request.clone(),
        }
    }
}

impl<K, N> ListViewOptions<K, N> {
    /// Creates options with the required collaborators and default tuning
    /// (`buffer = 0`, `buffer_min = 0`, self-scroll, `initial_draw = 300`).
    pub fn new(
        data_length: usize,
        key_of: impl Fn(usize) -> K + Send + Sync + 'static,
        index_of: impl Fn(&K) -> Option<usize> + Send + Sync + 'static,
        height_of: impl Fn(usize, &K) -> u32 + Send + Sync + 'static,
        render_item: impl Fn(&K, RowStyle, usize, RowAttrs<K>) -> N + Send + Sync + 'static,
    ) -> Self {
        Self {
            data_length,
            key_of: Arc::new(key_of),
            index_of: Arc::new(index_of),
            height_of: Arc::new(height_of),
            render_item: Arc::new(render_item),
            buffer: 0,
            buffer_min: 0,
            host_scroll: false,
            initial_draw: DEFAULT_INITIAL_DRAW,
            lookahead: DEFAULT_LOOKAHEAD,
            default_height: None,
            on_render_request: None,
        }
    }

    pub fn with_data_length(mut self, data_length: usize) -> Self {
        self.data_length = data_length;
        self
    }

    /// Sets both buffer tiers. `buffer_min` should not exceed `buffer`.
    pub fn with_buffers(mut self, buffer: usize, buffer_min: usize) -> Self {
        self.buffer = buffer;
        self.buffer_min = buffer_min;
        self
    }

    pub fn with_host_scroll(mut self, host_scroll: bool) -> Self {
        self.host_scroll = host_scroll;
        self
    }

    pub fn with_initial_draw(mut self, initial_draw: usize) -> Self {
        self.initial_draw = initial_draw;
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_default_height(mut self, default_height: Option<u32>) -> Self {
        self.default_height = default_height;
        self
    }

    pub fn with_key_mapping(
        mut self,
        key_of: impl Fn(usize) -> K + Send + Sync + 'static,
        index_of: impl Fn(&K) -> Option<usize> + Send + Sync + 'static,
    ) -> Self {
        self.key_of = Arc::new(key_of);
        self.index_of = Arc::new(index_of);
        self
    }

    pub fn with_height_of(
        mut self,
        height_of: impl Fn(usize, &K) -> u32 + Send + Sync + 'static,
    ) -> Self {
        self.height_of = Arc::new(height_of);
        self
    }

    pub fn with_on_render_request(
        mut self,
        on_render_request: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_render_request = on_render_request.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K, N> core::fmt::Debug for ListViewOptions<K, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListViewOptions")
            .field("data_length", &self.data_length)
            .field("buffer", &self.buffer)
            .field("buffer_min", &self.buffer_min)
            .field("host_scroll", &self.host_scroll)
            .field("initial_draw", &self.initial_draw)
            .field("lookahead", &self.lookahead)
            .field("default_height", &self.default_height)
            .finish_non_exhaustive()
    }
}
