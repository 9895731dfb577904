use crate::key::{ItemKey, KeyMap};

/// Identifies a reusable display slot (a recycled grid cell).
pub type SlotId = u64;

/// Captured when a slot is bound to an item, before any async work is issued
/// on its behalf. A delivery tagged with the ticket only commits while the
/// slot is still showing the same item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotTicket<I> {
    slot: SlotId,
    item: I,
}

impl<I> SlotTicket<I> {
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn item(&self) -> &I {
        &self.item
    }
}

#[derive(Clone, Debug)]
struct SlotEntry<I, P> {
    current: Option<I>,
    generation: u64,
    content: Option<P>,
}

impl<I, P> Default for SlotEntry<I, P> {
    fn default() -> Self {
        Self {
            current: None,
            generation: 0,
            content: None,
        }
    }
}

/// Bookkeeping for reusable display slots, with the stale-delivery guard.
///
/// Slots are rebound to different items as cells recycle; asynchronous
/// deliveries for a previous binding can outlive the rebind. [`SlotBoard::commit`]
/// is the sole defense: a payload lands only if the slot still shows the item
/// the request was issued for. The check runs on the single context that owns
/// the board, so no locking is involved.
///
/// Rejected commits are expected, silent, and logged at trace level only:
/// they are a normal consequence of slot reuse, not an error.
pub struct SlotBoard<I, P> {
    slots: KeyMap<SlotId, SlotEntry<I, P>>,
}

impl<I: ItemKey + Clone, P> SlotBoard<I, P> {
    pub fn new() -> Self {
        Self {
            slots: KeyMap::new(),
        }
    }

    /// Binds `slot` to `item` and returns the ticket to tag async requests with.
    ///
    /// Rebinding to a different item bumps the slot's generation and drops any
    /// committed content, so stale pixels never survive a recycle. Rebinding to
    /// the same item is a no-op and keeps the content.
    pub fn bind(&mut self, slot: SlotId, item: I) -> SlotTicket<I> {
        let entry = self.slots.entry(slot).or_default();
        if entry.current.as_ref() != Some(&item) {
            entry.current = Some(item.clone());
            entry.generation = entry.generation.wrapping_add(1);
            entry.content = None;
        }
        SlotTicket { slot, item }
    }

    /// The item the slot currently shows, if any.
    pub fn current(&self, slot: SlotId) -> Option<&I> {
        self.slots.get(&slot).and_then(|e| e.current.as_ref())
    }

    /// How many times the slot has been rebound. Unknown slots report 0.
    pub fn generation(&self, slot: SlotId) -> u64 {
        self.slots.get(&slot).map_or(0, |e| e.generation)
    }

    /// Commits a delivered payload iff the slot still shows the ticket's item.
    ///
    /// Returns `false` (and discards the payload) when the slot has been
    /// rebound or released since the ticket was issued.
    pub fn commit(&mut self, ticket: &SlotTicket<I>, payload: P) -> bool {
        let Some(entry) = self.slots.get_mut(&ticket.slot) else {
            ptrace!(slot = ticket.slot, "commit: slot released, payload dropped");
            return false;
        };
        if entry.current.as_ref() != Some(&ticket.item) {
            ptrace!(slot = ticket.slot, "commit: slot rebound, payload dropped");
            return false;
        }
        entry.content = Some(payload);
        true
    }

    /// The committed content for the slot, if a delivery has landed for its
    /// current binding.
    pub fn content(&self, slot: SlotId) -> Option<&P> {
        self.slots.get(&slot).and_then(|e| e.content.as_ref())
    }

    /// Forgets a slot entirely (the cell went back to the recycle pool).
    ///
    /// Outstanding tickets for the slot will fail their commit.
    pub fn release(&mut self, slot: SlotId) -> bool {
        self.slots.remove(&slot).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<I: ItemKey + Clone, P> Default for SlotBoard<I, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P> core::fmt::Debug for SlotBoard<I, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotBoard")
            .field("slots", &self.slots.len())
            .finish()
    }
}
