use alloc::vec::Vec;

use crate::key::{ItemKey, KeySet};
use crate::options::WarmHint;

/// Idempotent start/stop control over background cache warming.
///
/// The cache owns the set of identifiers currently requested for warming and is
/// the only writer of that set. Warm/unwarm hints are issued once per batch,
/// only for the identifiers whose membership actually changed, so repeated
/// calls with the same set are no-ops all the way down to the asset pipeline.
pub struct PrefetchCache<I> {
    requested: KeySet<I>,
    warm: Option<WarmHint<I>>,
    unwarm: Option<WarmHint<I>>,
}

impl<I: ItemKey + Clone> PrefetchCache<I> {
    pub fn new() -> Self {
        Self::with_hints(None, None)
    }

    pub fn with_hints(warm: Option<WarmHint<I>>, unwarm: Option<WarmHint<I>>) -> Self {
        Self {
            requested: KeySet::new(),
            warm,
            unwarm,
        }
    }

    pub(crate) fn set_hints(&mut self, warm: Option<WarmHint<I>>, unwarm: Option<WarmHint<I>>) {
        self.warm = warm;
        self.unwarm = unwarm;
    }

    /// Requests warming for every identifier not already requested.
    ///
    /// Already-present identifiers are no-ops; an empty batch issues no hint.
    /// Returns the number of identifiers that actually entered the set.
    pub fn start_caching(&mut self, items: impl IntoIterator<Item = I>) -> usize {
        let mut fresh = Vec::new();
        for item in items {
            if self.requested.insert(item.clone()) {
                fresh.push(item);
            }
        }
        if !fresh.is_empty() {
            if let Some(warm) = &self.warm {
                warm(&fresh);
            }
            pdebug!(started = fresh.len(), "start_caching");
        }
        fresh.len()
    }

    /// Withdraws the warming request for every identifier present.
    ///
    /// Absent identifiers are no-ops; an empty batch issues no hint. The unwarm
    /// hint is advisory: an in-flight request may still complete and deliver.
    /// Returns the number of identifiers that actually left the set.
    pub fn stop_caching(&mut self, items: impl IntoIterator<Item = I>) -> usize {
        let mut dropped = Vec::new();
        for item in items {
            if self.requested.remove(&item) {
                dropped.push(item);
            }
        }
        if !dropped.is_empty() {
            if let Some(unwarm) = &self.unwarm {
                unwarm(&dropped);
            }
            pdebug!(stopped = dropped.len(), "stop_caching");
        }
        dropped.len()
    }

    /// Withdraws every outstanding warming request and clears the set.
    ///
    /// Returns the number of identifiers dropped.
    pub fn reset_all(&mut self) -> usize {
        if self.requested.is_empty() {
            return 0;
        }
        let dropped: Vec<I> = core::mem::take(&mut self.requested).into_iter().collect();
        if let Some(unwarm) = &self.unwarm {
            unwarm(&dropped);
        }
        pdebug!(stopped = dropped.len(), "reset_all");
        dropped.len()
    }

    pub fn is_requested(&self, item: &I) -> bool {
        self.requested.contains(item)
    }

    pub fn len(&self) -> usize {
        self.requested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }

    /// Iterates over the requested identifiers without allocating.
    pub fn for_each_requested(&self, mut f: impl FnMut(&I)) {
        for item in self.requested.iter() {
            f(item);
        }
    }
}

impl<I: ItemKey + Clone> Default for PrefetchCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> core::fmt::Debug for PrefetchCache<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrefetchCache")
            .field("requested", &self.requested.len())
            .field("warm", &self.warm.is_some())
            .field("unwarm", &self.unwarm.is_some())
            .finish()
    }
}
