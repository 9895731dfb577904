use crate::region::{Pieces, Region};

/// The regions entering and leaving a preheat window as it moves.
///
/// For overlapping old window `P` and new window `N` the pieces decompose both
/// windows exactly: `added ∪ (P∩N) == N` and `removed ∪ (P∩N) == P`, with
/// `added ∩ removed == ∅`. For disjoint windows the whole of `N` is added and
/// the whole of `P` is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowDiff {
    pub added: Pieces,
    pub removed: Pieces,
}

/// Computes the added/removed sub-regions between the previous window and the
/// next one. Either list may be empty; empty input regions contribute nothing.
pub fn diff_windows(previous: Region, next: Region) -> WindowDiff {
    if previous.intersects(next) {
        WindowDiff {
            added: next.subtract(previous),
            removed: previous.subtract(next),
        }
    } else {
        let mut added = Pieces::default();
        added.push(next);
        let mut removed = Pieces::default();
        removed.push(previous);
        WindowDiff { added, removed }
    }
}

/// The outcome of planning against a scroll event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreheatDecision {
    /// The candidate window's center has not moved far enough from the applied
    /// window; the previous window is retained and nothing downstream runs.
    Unchanged,
    /// The candidate window replaced the previous one.
    Recompute { window: Region, diff: WindowDiff },
}

/// Decides when the preheat window should be recomputed.
///
/// The candidate window is the visible region grown by `preheat_factor ×
/// visible.extent` on both ends. Recomputation only proceeds once the candidate
/// center has drifted more than `recompute_fraction × visible.extent` from the
/// applied window's center; the hysteresis keeps per-tick scroll events from
/// turning into recomputation storms.
#[derive(Clone, Debug)]
pub struct PreheatPlanner {
    window: Region,
    preheat_factor: f32,
    recompute_fraction: f32,
}

impl PreheatPlanner {
    pub fn new(preheat_factor: f32, recompute_fraction: f32) -> Self {
        Self {
            window: Region::ZERO,
            preheat_factor: preheat_factor.max(0.0),
            recompute_fraction: recompute_fraction.max(0.0),
        }
    }

    /// The most recently applied window, or [`Region::ZERO`] before the first
    /// recomputation.
    pub fn window(&self) -> Region {
        self.window
    }

    /// Forgets the applied window; the next qualifying scroll event recomputes
    /// from scratch.
    pub fn reset(&mut self) {
        self.window = Region::ZERO;
    }

    pub(crate) fn restore(&mut self, window: Region) {
        self.window = window;
    }

    pub fn plan(&mut self, visible: Region) -> PreheatDecision {
        if visible.is_empty() {
            return PreheatDecision::Unchanged;
        }

        let slack = (visible.extent as f64 * self.preheat_factor as f64) as u64;
        let candidate = visible.expanded_by(slack);

        let threshold = (visible.extent as f64 * self.recompute_fraction as f64) as u64;
        let delta = candidate.center().abs_diff(self.window.center());
        if delta <= threshold {
            return PreheatDecision::Unchanged;
        }

        ptrace!(
            delta,
            threshold,
            origin = candidate.origin,
            extent = candidate.extent,
            "preheat window recompute"
        );
        let diff = diff_windows(self.window, candidate);
        self.window = candidate;
        PreheatDecision::Recompute {
            window: candidate,
            diff,
        }
    }
}
