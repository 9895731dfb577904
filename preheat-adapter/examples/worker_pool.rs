//! Controller walkthrough: deliveries produced on a worker thread cross back
//! into the owning context through the inbox, where the stale guard decides
//! which ones still matter.

use std::thread;
use std::time::Duration;

use preheat::{Region, SessionOptions};
use preheat_adapter::{AssetDelivery, GridController};

fn main() {
    let options = SessionOptions::new(|region: Region, emit: &mut dyn FnMut(u64)| {
        for row in 0..100u64 {
            let top = (row * 50) as i64;
            if top < region.max() && top + 50 > region.min() {
                emit(row);
            }
        }
    });

    let mut controller: GridController<u64, String> = GridController::new(options);
    controller.session_mut().replace_items((0..100).collect());
    controller.on_scroll(Region::new(0, 300));

    // Cell 1 asks for item 10, then recycles to item 11 before the first
    // resolve lands: the guard drops the first delivery.
    let stale = controller.bind_slot(1, 10);
    let fresh = controller.bind_slot(1, 11);

    let sender = controller.asset_sender();
    let worker = thread::spawn(move || {
        for ticket in [stale, fresh] {
            thread::sleep(Duration::from_millis(10));
            let payload = format!("pixels for item {}", ticket.item());
            sender.send(AssetDelivery {
                ticket,
                payload: Some(payload),
            });
        }
    });
    worker.join().expect("worker finished");

    let summary = controller.pump();
    println!(
        "pump: {} committed, {} rejected as stale",
        summary.committed, summary.rejected
    );
    println!("slot 1 shows: {:?}", controller.slots().content(1));

    controller.teardown();
}
