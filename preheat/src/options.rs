use alloc::sync::Arc;

use crate::changes::ApplyOutcome;
use crate::region::Region;
use crate::session::GridSession;

/// The layout capability: emits the identifiers of every item whose frame
/// intersects `region`, in layout order.
///
/// This is emit-style rather than `Vec`-returning so adapters can resolve
/// straight out of their layout structures without allocating. Duplicate
/// emissions across the regions of one preheat update are deduplicated by the
/// session before they reach the cache.
pub type ResolveInRegion<I> = Arc<dyn Fn(Region, &mut dyn FnMut(I)) + Send + Sync>;

/// A fire-and-forget warm/unwarm hint for a batch of item identifiers.
///
/// Hints carry no delivery guarantee: an unwarm hint may race an in-flight
/// request, which can still complete afterwards. Late deliveries are the slot
/// board's problem, not the cache's.
pub type WarmHint<I> = Arc<dyn Fn(&[I]) + Send + Sync>;

/// A callback fired after a change batch has been applied to the live view.
pub type OnViewChange<I> = Arc<dyn Fn(&GridSession<I>, ApplyOutcome) + Send + Sync>;

/// Configuration for [`GridSession`].
///
/// Cheap to clone: capability closures are stored in `Arc`s so adapters can
/// tweak a field and call `GridSession::set_options` without reallocating.
pub struct SessionOptions<I> {
    /// Layout capability mapping regions to item identifiers.
    pub resolve_in_region: ResolveInRegion<I>,

    /// Warm hint issued for identifiers newly entering the cache set.
    pub warm: Option<WarmHint<I>>,
    /// Best-effort cancellation hint issued for identifiers leaving the set.
    pub unwarm: Option<WarmHint<I>>,

    /// Enables/disables preheating. When disabled, scroll events are inert.
    pub enabled: bool,

    /// Slack added to each end of the visible region when building the
    /// candidate window, as a fraction of the visible extent.
    pub preheat_factor: f32,

    /// How far the candidate window's center must drift (as a fraction of the
    /// visible extent) before the window is recomputed.
    pub recompute_fraction: f32,

    /// Optional callback fired after every committed change batch.
    pub on_view_change: Option<OnViewChange<I>>,
}

impl<I> SessionOptions<I> {
    pub fn new(resolve_in_region: impl Fn(Region, &mut dyn FnMut(I)) + Send + Sync + 'static) -> Self {
        Self {
            resolve_in_region: Arc::new(resolve_in_region),
            warm: None,
            unwarm: None,
            enabled: true,
            preheat_factor: 0.5,
            recompute_fraction: 1.0 / 3.0,
            on_view_change: None,
        }
    }

    pub fn with_warm(mut self, warm: impl Fn(&[I]) + Send + Sync + 'static) -> Self {
        self.warm = Some(Arc::new(warm));
        self
    }

    pub fn with_unwarm(mut self, unwarm: impl Fn(&[I]) + Send + Sync + 'static) -> Self {
        self.unwarm = Some(Arc::new(unwarm));
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_preheat_factor(mut self, preheat_factor: f32) -> Self {
        self.preheat_factor = preheat_factor;
        self
    }

    pub fn with_recompute_fraction(mut self, recompute_fraction: f32) -> Self {
        self.recompute_fraction = recompute_fraction;
        self
    }

    pub fn with_on_view_change(
        mut self,
        on_view_change: Option<impl Fn(&GridSession<I>, ApplyOutcome) + Send + Sync + 'static>,
    ) -> Self {
        self.on_view_change = on_view_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<I> Clone for SessionOptions<I> {
    fn clone(&self) -> Self {
        Self {
            resolve_in_region: Arc::clone(&self.resolve_in_region),
            warm: self.warm.clone(),
            unwarm: self.unwarm.clone(),
            enabled: self.enabled,
            preheat_factor: self.preheat_factor,
            recompute_fraction: self.recompute_fraction,
            on_view_change: self.on_view_change.clone(),
        }
    }
}

impl<I> core::fmt::Debug for SessionOptions<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("enabled", &self.enabled)
            .field("preheat_factor", &self.preheat_factor)
            .field("recompute_fraction", &self.recompute_fraction)
            .field("warm", &self.warm.is_some())
            .field("unwarm", &self.unwarm.is_some())
            .finish_non_exhaustive()
    }
}
