use crate::*;

use preheat::{ChangeSet, Region, SessionOptions};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting_options(resolves: &Arc<AtomicUsize>) -> SessionOptions<u64> {
    // Fixed 50-unit rows over 100 items.
    SessionOptions::new({
        let resolves = Arc::clone(resolves);
        move |region: Region, emit: &mut dyn FnMut(u64)| {
            resolves.fetch_add(1, Ordering::Relaxed);
            for i in 0..100u64 {
                let top = (i * 50) as i64;
                if top < region.max() && top + 50 > region.min() {
                    emit(i);
                }
            }
        }
    })
}

// --- dispatch ---

#[test]
fn ui_channel_preserves_arrival_order() {
    let (tx, mut inbox) = ui_channel::<u32>();
    assert!(tx.send(1));
    assert!(tx.send(2));
    assert!(tx.send(3));

    let mut seen = Vec::new();
    assert_eq!(inbox.drain(|v| seen.push(v)), 3);
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(inbox.try_next(), None);
}

#[test]
fn senders_survive_cloning_across_threads() {
    let (tx, mut inbox) = ui_channel::<u32>();
    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let tx = tx.clone();
            std::thread::spawn(move || tx.send(i))
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }

    let mut seen = Vec::new();
    inbox.drain(|v| seen.push(v));
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[test]
fn send_after_inbox_teardown_reports_disconnect() {
    let (tx, inbox) = ui_channel::<u32>();
    drop(inbox);
    assert!(!tx.send(7));
}

// --- activation guard ---

#[test]
fn second_activation_is_refused_while_one_is_in_flight() {
    let mut guard = ActivationGuard::new();
    let first = guard.begin(10u64).expect("first activation admitted");
    assert!(guard.begin(11u64).is_none());
    assert!(guard.is_in_flight());

    assert_eq!(guard.settle(first, true), Activation::Present(10));
    assert!(!guard.is_in_flight());

    // The slot is free again.
    assert!(guard.begin(11u64).is_some());
}

#[test]
fn failed_resolve_dismisses_without_presenting() {
    let mut guard = ActivationGuard::new();
    let ticket = guard.begin("item").unwrap();
    assert_eq!(guard.settle(ticket, false), Activation::Dismissed);
    assert!(!guard.is_in_flight());
}

#[test]
fn cancelled_activation_settles_stale() {
    let mut guard = ActivationGuard::new();
    let ticket = guard.begin(1u64).unwrap();
    guard.cancel();
    assert_eq!(guard.settle(ticket, true), Activation::Stale);

    // A ticket from a previous flight cannot settle the next one.
    let old = guard.begin(2u64).unwrap();
    let outcome = guard.settle(old.clone(), true);
    assert_eq!(outcome, Activation::Present(2));
    assert_eq!(guard.settle(old, true), Activation::Stale);
}

// --- controller ---

#[test]
fn stale_delivery_is_rejected_and_fresh_one_commits() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, &'static str> =
        GridController::new(counting_options(&resolves));
    let sender = controller.asset_sender();

    let stale = controller.bind_slot(1, 100);
    let fresh = controller.bind_slot(1, 200);

    assert!(sender.send(AssetDelivery {
        ticket: stale,
        payload: Some("old pixels"),
    }));
    assert!(sender.send(AssetDelivery {
        ticket: fresh,
        payload: Some("new pixels"),
    }));

    let summary = controller.pump();
    assert_eq!(summary.committed, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(controller.slots().content(1), Some(&"new pixels"));
}

#[test]
fn failed_deliveries_leave_the_slot_unfilled() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, &'static str> =
        GridController::new(counting_options(&resolves));
    let sender = controller.asset_sender();

    let ticket = controller.bind_slot(2, 5);
    sender.send(AssetDelivery {
        ticket,
        payload: None,
    });

    let summary = controller.pump();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.committed, 0);
    assert_eq!(controller.slots().content(2), None);
}

#[test]
fn published_batches_apply_serially_and_reset_the_cache() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, ()> =
        GridController::new(counting_options(&resolves));
    let feed = controller.subscribe_changes();

    controller.session_mut().replace_items((0..100u64).collect());
    controller.on_scroll(Region::new(0, 300));
    assert!(!controller.session().cache().is_empty());

    feed.publish(ChangeSet::full((0..50u64).collect()));
    feed.publish(
        ChangeSet::incremental((1..50u64).collect()).with_removed(vec![0]),
    );

    let summary = controller.pump();
    assert_eq!(summary.batches, 2);
    assert_eq!(controller.session().len(), 49);
    assert_eq!(controller.session().item_at(0), Some(&1));
    assert!(controller.session().cache().is_empty());
    assert_eq!(controller.session().window(), Region::ZERO);
}

#[test]
fn one_pump_absorbs_batches_before_deliveries() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, &'static str> =
        GridController::new(counting_options(&resolves));
    let feed = controller.subscribe_changes();
    let sender = controller.asset_sender();

    let ticket = controller.bind_slot(1, 3);
    sender.send(AssetDelivery {
        ticket,
        payload: Some("pixels"),
    });
    feed.publish(ChangeSet::full(vec![3u64, 4]));

    let summary = controller.pump();
    assert_eq!(
        summary,
        PumpSummary {
            batches: 1,
            committed: 1,
            rejected: 0,
            failed: 0,
        }
    );
    assert_eq!(controller.session().items(), &[3, 4]);
    assert_eq!(controller.slots().content(1), Some(&"pixels"));
}

#[test]
fn teardown_unwarms_and_cancels_activation() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, ()> =
        GridController::new(counting_options(&resolves));

    controller.on_scroll(Region::new(0, 300));
    assert!(!controller.session().cache().is_empty());
    let ticket = controller.begin_activation(1).unwrap();

    controller.teardown();
    assert!(controller.session().cache().is_empty());
    assert_eq!(controller.session().window(), Region::ZERO);
    assert_eq!(controller.settle_activation(ticket, true), Activation::Stale);
}

#[test]
fn activation_via_controller_is_single_flight() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, ()> =
        GridController::new(counting_options(&resolves));

    let ticket = controller.begin_activation(7).unwrap();
    assert!(controller.begin_activation(8).is_none());
    assert_eq!(
        controller.settle_activation(ticket, true),
        Activation::Present(7)
    );
}

#[test]
fn rejected_batch_still_lands_on_the_snapshot_through_the_controller() {
    let resolves = Arc::new(AtomicUsize::new(0));
    let mut controller: GridController<u64, ()> =
        GridController::new(counting_options(&resolves));
    let feed = controller.subscribe_changes();

    controller.session_mut().replace_items(vec![1, 2]);
    feed.publish(ChangeSet::incremental(vec![9u64]).with_removed(vec![5]));
    controller.pump();

    assert_eq!(controller.session().items(), &[9]);
}
