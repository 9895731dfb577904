//! A headless viewport-driven prefetch planner and collection-sync engine.
//!
//! This crate focuses on the core algorithms a scrollable grid browser needs to keep
//! asset caches warm while the user scrolls: region algebra along the scroll axis,
//! hysteresis-gated preheat window planning, added/removed region diffing, idempotent
//! start/stop cache control, stale-delivery guarding for reusable display slots, and
//! ordered application of collection change batches.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the visible region on each scroll/layout event
//! - a layout capability mapping regions to item identifiers
//! - warm/unwarm hints wired to the actual asset pipeline
//!
//! For the worker → UI delivery hop, change-feed subscriptions, and activation
//! guarding, see the `preheat-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod changes;
mod key;
mod options;
mod region;
mod session;
mod slots;
mod window;


pub use cache::PrefetchCache;
pub use changes::{ApplyOutcome, ChangeSet, apply_changes};
pub use options::{OnViewChange, ResolveInRegion, SessionOptions, WarmHint};
pub use region::{Pieces, Region};
pub use session::{GridSession, PreheatOutcome, PreheatState};
pub use slots::{SlotBoard, SlotId, SlotTicket};
pub use window::{PreheatDecision, PreheatPlanner, WindowDiff, diff_windows};

#[doc(hidden)]
pub use key::ItemKey;
