//! Adapter utilities for the `preheat` crate.
//!
//! The `preheat` crate is UI-agnostic and assumes a single owning execution
//! context. This crate provides the small, framework-neutral pieces an adapter
//! needs to uphold that assumption in a real application:
//!
//! - An explicit worker → UI delivery hop (`ui_channel`): completions from the
//!   asset pipeline cross execution contexts through a visible inbox instead of
//!   captured callbacks.
//! - A change-feed subscription handle with deterministic unsubscription.
//! - A single-flight activation guard for item opening.
//! - A `GridController` tying session, slot board, and inboxes together.
//!
//! This crate is intentionally framework-agnostic (no TUI/GUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod activation;
#[cfg(feature = "std")]
mod controller;
#[cfg(feature = "std")]
mod dispatch;

#[cfg(test)]
mod tests;

pub use activation::{Activation, ActivationGuard, ActivationTicket};
#[cfg(feature = "std")]
pub use controller::{AssetDelivery, ChangeFeedHandle, GridController, PumpSummary};
#[cfg(feature = "std")]
pub use dispatch::{RemoteSender, UiInbox, ui_channel};
