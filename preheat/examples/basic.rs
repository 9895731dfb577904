//! Minimal session walkthrough: a fixed-row layout, a few scroll events, and
//! the warm/unwarm traffic they generate.

use preheat::{PreheatOutcome, Region, SessionOptions};

const ROW_HEIGHT: u64 = 50;
const ROW_COUNT: u64 = 1_000;

fn main() {
    let options = SessionOptions::new(|region: Region, emit: &mut dyn FnMut(u64)| {
        for row in 0..ROW_COUNT {
            let top = (row * ROW_HEIGHT) as i64;
            let bottom = ((row + 1) * ROW_HEIGHT) as i64;
            if top < region.max() && bottom > region.min() {
                emit(row);
            }
        }
    })
    .with_warm(|rows: &[u64]| println!("  warm   {rows:?}"))
    .with_unwarm(|rows: &[u64]| println!("  unwarm {rows:?}"));

    let mut session = preheat::GridSession::new(options);
    session.replace_items((0..ROW_COUNT).collect());

    for y in [0i64, 40, 120, 400, 410, 2_000] {
        let visible = Region::new(y, 300);
        print!("scroll to y={y}: ");
        match session.handle_scroll(visible) {
            PreheatOutcome::Updated { started, stopped } => {
                println!("window moved to {:?} (+{started} / -{stopped})", session.window());
            }
            PreheatOutcome::Unchanged => println!("gated, window stays {:?}", session.window()),
            PreheatOutcome::Disabled => println!("disabled"),
        }
    }

    println!("{} rows warm at exit", session.cache().len());
    session.reset_preheat();
}
