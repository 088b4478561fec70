#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Measured row heights, keyed by item key rather than index so they follow an item when it moves.
#[cfg(feature = "std")]
pub(crate) type KeyHeightMap<K> = HashMap<K, u32>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyHeightMap<K> = BTreeMap<K, u32>;

/// Bound for item keys: hashable with `std`, ordered without it.
#[cfg(feature = "std")]
pub trait ItemKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ItemKey for K {}

#[cfg(not(feature = "std"))]
pub trait ItemKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ItemKey for K {}
