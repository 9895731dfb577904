use preheat::{
    ChangeSet, GridSession, ItemKey, PreheatOutcome, Region, SessionOptions, SlotBoard, SlotId,
    SlotTicket,
};

use crate::activation::{Activation, ActivationGuard, ActivationTicket};
use crate::dispatch::{RemoteSender, UiInbox, ui_channel};

/// A completed (or failed) asset resolution, tagged with the slot ticket it
/// was issued for. `None` marks failure/empty: the slot stays unfilled and no
/// retry happens here (retry is the embedding application's policy).
///
/// There is no timeout on outstanding deliveries: a request that never
/// completes leaves its slot unfilled indefinitely. That is a known gap, not a
/// designed contract; callers wanting a bound should race the resolve against
/// their own timer and send `payload: None` when it fires.
#[derive(Clone, Debug)]
pub struct AssetDelivery<I, P> {
    pub ticket: SlotTicket<I>,
    pub payload: Option<P>,
}

/// A subscription handle for feeding change batches into a controller.
///
/// Handles are clonable; whoever holds one may publish. Dropping the last
/// handle is the unsubscription, deterministic and independent of anyone's
/// destructor timing.
pub struct ChangeFeedHandle<I> {
    tx: RemoteSender<ChangeSet<I>>,
}

impl<I> ChangeFeedHandle<I> {
    /// Queues a change batch for the next [`GridController::pump`].
    ///
    /// Returns `false` once the controller is gone.
    pub fn publish(&self, change: ChangeSet<I>) -> bool {
        self.tx.send(change)
    }
}

impl<I> Clone for ChangeFeedHandle<I> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<I> core::fmt::Debug for ChangeFeedHandle<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ChangeFeedHandle(..)")
    }
}

/// What one [`GridController::pump`] call processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Change batches applied (each one serially, in arrival order).
    pub batches: usize,
    /// Deliveries committed into their slot.
    pub committed: usize,
    /// Deliveries discarded by the stale guard (slot rebound or released).
    pub rejected: usize,
    /// Failed/empty deliveries; their slots remain unfilled.
    pub failed: usize,
}

/// A framework-neutral controller pairing a [`GridSession`] with a slot board
/// and the worker → UI inboxes.
///
/// The embedding UI drives it from its single owning context:
/// - `on_scroll` on scroll/layout events
/// - `bind_slot` when a cell is (re)bound, handing the ticket to the resolve
/// - `pump` once per frame/event-loop turn to absorb deliveries and batches
///
/// Change batches and deliveries are *only* absorbed inside `pump`, so the
/// strict batch serialization of the session carries over: a batch is fully
/// applied (including the cache reset) before the next one is looked at.
pub struct GridController<I, P> {
    session: GridSession<I>,
    slots: SlotBoard<I, P>,
    assets: UiInbox<AssetDelivery<I, P>>,
    assets_tx: RemoteSender<AssetDelivery<I, P>>,
    changes: UiInbox<ChangeSet<I>>,
    changes_tx: RemoteSender<ChangeSet<I>>,
    activation: ActivationGuard,
}

impl<I: ItemKey + Clone, P> GridController<I, P> {
    pub fn new(options: SessionOptions<I>) -> Self {
        let (assets_tx, assets) = ui_channel();
        let (changes_tx, changes) = ui_channel();
        Self {
            session: GridSession::new(options),
            slots: SlotBoard::new(),
            assets,
            assets_tx,
            changes,
            changes_tx,
            activation: ActivationGuard::new(),
        }
    }

    pub fn session(&self) -> &GridSession<I> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GridSession<I> {
        &mut self.session
    }

    pub fn slots(&self) -> &SlotBoard<I, P> {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut SlotBoard<I, P> {
        &mut self.slots
    }

    /// Forwards a scroll/layout event to the preheat pipeline.
    pub fn on_scroll(&mut self, visible: Region) -> PreheatOutcome {
        self.session.handle_scroll(visible)
    }

    /// Binds a display slot to an item; tag the async resolve with the ticket.
    pub fn bind_slot(&mut self, slot: SlotId, item: I) -> SlotTicket<I> {
        self.slots.bind(slot, item)
    }

    pub fn release_slot(&mut self, slot: SlotId) -> bool {
        self.slots.release(slot)
    }

    /// The sender worker-pool callbacks use to hand deliveries back.
    pub fn asset_sender(&self) -> RemoteSender<AssetDelivery<I, P>> {
        self.assets_tx.clone()
    }

    /// Subscribes the external change feed to this controller.
    pub fn subscribe_changes(&self) -> ChangeFeedHandle<I> {
        ChangeFeedHandle {
            tx: self.changes_tx.clone(),
        }
    }

    /// Admits an item activation, or returns `None` while one is in flight.
    pub fn begin_activation(&mut self, item: I) -> Option<ActivationTicket<I>> {
        self.activation.begin(item)
    }

    /// Settles an activation with its resolve result.
    pub fn settle_activation(
        &mut self,
        ticket: ActivationTicket<I>,
        success: bool,
    ) -> Activation<I> {
        self.activation.settle(ticket, success)
    }

    /// Absorbs everything queued since the last pump.
    ///
    /// Change batches go first (collection identity outranks pixels), each
    /// applied atomically with its cache reset. Asset deliveries follow, every
    /// one through the stale guard.
    pub fn pump(&mut self) -> PumpSummary {
        let mut summary = PumpSummary::default();

        while let Some(change) = self.changes.try_next() {
            self.session.apply_change_set(change);
            summary.batches += 1;
        }

        while let Some(delivery) = self.assets.try_next() {
            match delivery.payload {
                Some(payload) => {
                    if self.slots.commit(&delivery.ticket, payload) {
                        summary.committed += 1;
                    } else {
                        summary.rejected += 1;
                    }
                }
                None => summary.failed += 1,
            }
        }

        if summary != PumpSummary::default() {
            pdebug!(
                batches = summary.batches,
                committed = summary.committed,
                rejected = summary.rejected,
                failed = summary.failed,
                "pump"
            );
        }
        summary
    }

    /// Deterministic teardown: ends every outstanding warming request, zeroes
    /// the preheat window, and abandons any in-flight activation. Deliveries
    /// still in the air settle harmlessly against the guards.
    pub fn teardown(&mut self) {
        self.activation.cancel();
        self.session.reset_preheat();
    }
}

impl<I: ItemKey + Clone, P> core::fmt::Debug for GridController<I, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridController")
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}
