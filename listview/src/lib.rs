//! A headless, variable-height virtualized list.
//!
//! For host helpers (a headless host, a render driver, scroll navigation), see the
//! `listview-adapter` crate.
//!
//! This crate holds the parts of a windowed list that are independent of any UI framework: a
//! lazily extended position cache (index → offset, offset → index), viewport tracking over two
//! scroll sources, a two-tier buffered draw window, display-refresh debouncing of scroll events,
//! and post-commit reconciliation of estimated against measured row heights.
//!
//! It is UI-agnostic. An embedder is expected to provide:
//! - the item count and an index ↔ key mapping
//! - a height estimate for rows not measured yet, and a row renderer
//! - live scroll geometry, frame callbacks and page-scroll listeners (see [`Host`])
//! - measured heights of committed rows
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod handle;
mod host;
mod key;
mod list_view;
mod options;
mod positions;
mod reconciler;
mod scheduler;
mod state;
mod types;
mod viewport;
mod window;

#[cfg(test)]
mod tests;

pub use handle::ListViewHandle;
pub use host::{FrameScheduler, FrameToken, Host, ListenerToken, PageScrollEvents, ViewportSource};
pub use key::ItemKey;
pub use list_view::{ListView, RenderedList};
pub use options::{HeightOf, IndexOf, KeyOf, ListViewOptions, OnRenderRequest, RenderItem};
pub use positions::{DEFAULT_LOOKAHEAD, PositionCache};
pub use reconciler::HeightReconciler;
pub use scheduler::RenderScheduler;
pub use state::ListViewState;
pub use types::{
    Align, IndexRange, MeasuredRow, Phase, RowAttrs, RowPosition, RowStyle, ScrollMetrics,
    ScrollMode, Viewport,
};
pub use viewport::ViewportTracker;
pub use window::{DEFAULT_INITIAL_DRAW, WindowCalculator, WindowDecision};
