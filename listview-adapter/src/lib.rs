//! Adapter utilities for the `listview` crate.
//!
//! The `listview` crate is UI-agnostic and leaves scroll geometry, frame callbacks and row
//! measurement to its embedder. This crate provides small, framework-neutral helpers commonly
//! needed by adapters:
//!
//! - An in-memory [`HeadlessHost`] (scroll state, a frame queue, page-scroll listeners)
//! - A [`Driver`] that runs the render, commit and reconcile loop over a host
//! - [`ScrollNavigator`] for programmatic scrolling (to a row, past a row, by pages)
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod driver;
mod host;
mod navigator;


pub use driver::{DEFAULT_MAX_PASSES, Driver, Measure};
pub use host::HeadlessHost;
pub use navigator::{Direction, ScrollNavigator, Scroller};
