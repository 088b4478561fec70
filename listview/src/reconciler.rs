use alloc::vec::Vec;

use crate::key::{ItemKey, KeyHeightMap};
use crate::{IndexRange, MeasuredRow};

/// Post-commit correction of height estimates against measured heights.
///
/// Holds the known (measured) height of every item by key. Measured heights persist by key for
/// the lifetime of the list; only the index-based position cache is ever invalidated.
#[derive(Clone, Debug)]
pub struct HeightReconciler<K> {
    known: KeyHeightMap<K>,
}

impl<K: ItemKey> Default for HeightReconciler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ItemKey> HeightReconciler<K> {
    pub fn new() -> Self {
        Self {
            known: KeyHeightMap::<K>::new(),
        }
    }

    pub fn known_height(&self, key: &K) -> Option<u32> {
        self.known.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Records measured heights for committed rows.
    ///
    /// A row is dirty when its measured height differs from the known one for its key, or from
    /// the height `cached_height` reports for its current index. The second case catches items
    /// that moved into an index whose offsets were computed for a different item.
    ///
    /// Returns the index span `[min, max]` of dirty rows, or `None` when nothing changed. Rows
    /// without a key, or whose key no longer maps to an index, are skipped.
    pub fn reconcile(
        &mut self,
        rows: impl IntoIterator<Item = MeasuredRow<K>>,
        index_of: impl Fn(&K) -> Option<usize>,
        cached_height: impl Fn(usize) -> Option<u32>,
    ) -> Option<IndexRange> {
        let mut dirty: Option<IndexRange> = None;
        for row in rows {
            let Some(key) = row.key else {
                vwarn!("HeightReconciler: committed row has no item key");
                continue;
            };
            let Some(index) = index_of(&key) else {
                vwarn!(
                    height = row.height,
                    "HeightReconciler: measured key does not map to an index"
                );
                continue;
            };
            let known_same = self.known.get(&key) == Some(&row.height);
            let cached_same = cached_height(index).is_none_or(|h| h == row.height);
            if known_same && cached_same {
                continue;
            }
            if !known_same {
                self.known.insert(key, row.height);
            }
            dirty = Some(match dirty {
                None => IndexRange::new(index, index),
                Some(d) => IndexRange::new(d.start.min(index), d.end.max(index)),
            });
        }
        if let Some(d) = dirty {
            vtrace!(min = d.start, max = d.end, "HeightReconciler: heights changed");
        }
        dirty
    }

    pub fn clear(&mut self) {
        self.known.clear();
    }

    pub fn for_each_known(&self, mut f: impl FnMut(&K, u32)) {
        for (k, v) in self.known.iter() {
            f(k, *v);
        }
    }

    pub fn export(&self) -> Vec<(K, u32)> {
        let mut out = Vec::with_capacity(self.known.len());
        self.for_each_known(|k, v| out.push((k.clone(), v)));
        out
    }

    pub fn import(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.known.clear();
        for (k, v) in entries {
            self.known.insert(k, v);
        }
    }
}
