use alloc::vec::Vec;

use crate::cache::PrefetchCache;
use crate::changes::{ApplyOutcome, ChangeSet, apply_changes};
use crate::key::{ItemKey, KeySet};
use crate::options::SessionOptions;
use crate::region::{Pieces, Region};
use crate::window::{PreheatDecision, PreheatPlanner};

/// What a scroll event did to the preheat pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreheatOutcome {
    /// Preheating is disabled for this session.
    Disabled,
    /// The hysteresis gate held; the window, the cache, and the layout
    /// capability were all left untouched.
    Unchanged,
    /// The window moved. `started`/`stopped` count the identifiers whose cache
    /// membership actually changed.
    Updated { started: usize, stopped: usize },
}

/// A restorable snapshot of the session's preheat geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreheatState {
    pub window: Region,
}

/// One browsing surface's prefetch and collection-sync engine.
///
/// The session is explicitly constructed and owned by the surface it serves;
/// dropping it (or calling [`GridSession::reset_preheat`] on teardown) ends
/// every outstanding warming request. There is no shared process-wide state.
///
/// All methods must be called from the single execution context that owns the
/// session; the exclusive borrow makes concurrent mutation unrepresentable,
/// which is also what serializes change batches: a new batch cannot start
/// until [`GridSession::apply_change_set`] has returned.
pub struct GridSession<I> {
    options: SessionOptions<I>,
    planner: PreheatPlanner,
    cache: PrefetchCache<I>,
    view: Vec<I>,
}

impl<I: ItemKey + Clone> GridSession<I> {
    pub fn new(options: SessionOptions<I>) -> Self {
        let planner = PreheatPlanner::new(options.preheat_factor, options.recompute_fraction);
        let cache = PrefetchCache::with_hints(options.warm.clone(), options.unwarm.clone());
        pdebug!(enabled = options.enabled, "GridSession::new");
        Self {
            options,
            planner,
            cache,
            view: Vec::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions<I> {
        &self.options
    }

    pub fn set_options(&mut self, options: SessionOptions<I>) {
        let was_enabled = self.options.enabled;
        let geometry_changed = options.preheat_factor != self.options.preheat_factor
            || options.recompute_fraction != self.options.recompute_fraction;
        self.options = options;
        self.cache
            .set_hints(self.options.warm.clone(), self.options.unwarm.clone());

        if was_enabled && !self.options.enabled {
            self.reset_preheat();
        } else if geometry_changed {
            // The applied window was computed with the old factors; drop it so
            // the next scroll event recomputes instead of diffing against it.
            self.reset_preheat();
            self.planner =
                PreheatPlanner::new(self.options.preheat_factor, self.options.recompute_fraction);
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut SessionOptions<I>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.update_options(|o| o.enabled = enabled);
    }

    /// Feeds a scroll/layout event into the preheat pipeline.
    ///
    /// When the hysteresis gate passes, the window diff is resolved to item
    /// identifiers through the layout capability (deduplicated per direction),
    /// warming starts for identifiers entering the window, and stops for
    /// identifiers leaving it.
    pub fn handle_scroll(&mut self, visible: Region) -> PreheatOutcome {
        if !self.options.enabled {
            return PreheatOutcome::Disabled;
        }

        match self.planner.plan(visible) {
            PreheatDecision::Unchanged => PreheatOutcome::Unchanged,
            PreheatDecision::Recompute { diff, .. } => {
                let entering = self.resolve_pieces(&diff.added);
                let leaving = self.resolve_pieces(&diff.removed);
                let started = self.cache.start_caching(entering);
                let stopped = self.cache.stop_caching(leaving);
                PreheatOutcome::Updated { started, stopped }
            }
        }
    }

    /// Flattens and deduplicates the identifiers laid out within `pieces`.
    fn resolve_pieces(&self, pieces: &Pieces) -> Vec<I> {
        let mut seen = KeySet::new();
        let mut out = Vec::new();
        for region in pieces.iter() {
            (self.options.resolve_in_region)(region, &mut |item| {
                if seen.insert(item.clone()) {
                    out.push(item);
                }
            });
        }
        out
    }

    /// Applies a change batch to the live view, then resets the preheat state:
    /// whatever geometry the cache was warmed against may no longer correspond
    /// to the same items.
    ///
    /// Collection sync stays active while preheating is disabled; the reset is
    /// then a no-op on an already-empty cache.
    pub fn apply_change_set(&mut self, change: ChangeSet<I>) -> ApplyOutcome {
        let outcome = apply_changes(&mut self.view, &change);
        pdebug!(
            len = self.view.len(),
            incremental = change.incremental,
            "change batch applied"
        );
        self.reset_preheat();
        if let Some(cb) = &self.options.on_view_change {
            cb(self, outcome);
        }
        outcome
    }

    /// Replaces the entire view in one step (the full-reload entry point, also
    /// used to populate the session at start).
    pub fn replace_items(&mut self, items: Vec<I>) -> ApplyOutcome {
        self.apply_change_set(ChangeSet::full(items))
    }

    /// Ends every outstanding warming request and zeroes the preheat window.
    ///
    /// Call on teardown, or whenever cached geometry can no longer be trusted.
    pub fn reset_preheat(&mut self) {
        self.cache.reset_all();
        self.planner.reset();
    }

    pub fn items(&self) -> &[I] {
        &self.view
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn item_at(&self, index: usize) -> Option<&I> {
        self.view.get(index)
    }

    /// The currently applied preheat window ([`Region::ZERO`] before the first
    /// recomputation and after every reset).
    pub fn window(&self) -> Region {
        self.planner.window()
    }

    pub fn cache(&self) -> &PrefetchCache<I> {
        &self.cache
    }

    /// Captures the preheat geometry for later restoration.
    pub fn state(&self) -> PreheatState {
        PreheatState {
            window: self.window(),
        }
    }

    /// Restores previously captured preheat geometry.
    ///
    /// Only the window is restored. No warming is issued, so the cache may
    /// run cooler than the window suggests until the next recompute.
    pub fn restore_state(&mut self, state: PreheatState) {
        self.planner.restore(state.window);
    }
}

impl<I> core::fmt::Debug for GridSession<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridSession")
            .field("len", &self.view.len())
            .field("window", &self.planner.window())
            .field("enabled", &self.options.enabled)
            .finish_non_exhaustive()
    }
}
