/// Replay demo: event rolls with late joiners and stream packs
///
/// Shows the two catch-up mechanisms: an event roll replaying its latest
/// value to a late subscriber, and a stream pack replaying its whole history
/// into newly spawned streams.
use std::cell::RefCell;
use std::rc::Rc;

use event_rolls::{EventRoll, StreamPack};

fn scenario_1_late_joiner() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 1: Event roll catches a late joiner up");
    println!("{}\n", "=".repeat(70));

    let mut updates = EventRoll::new("updates");
    updates.listen(|v: &u32| println!("  early listener: {v}"));

    updates.emit(1);
    updates.emit(2);

    // Joins after two emissions, immediately sees the latest one.
    updates.after(|v: &u32| println!("  late listener caught up with: {v}"));
    updates.emit(3);

    assert_eq!(updates.last(), Some(&3));
}

fn scenario_2_snapshot_subscription() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 2: Weak subscription is a snapshot");
    println!("{}\n", "=".repeat(70));

    let mut pack = StreamPack::new();
    pack.send("a");
    pack.send("b");

    let mut snapshot = pack.weak_subscribe(false, true);
    pack.send("c");

    let replayed = snapshot.collect();
    println!("  snapshot saw {replayed:?}");
    assert_eq!(replayed, vec!["a", "b"]);
}

fn scenario_3_live_subscription() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 3: Live subscription replays then follows");
    println!("{}\n", "=".repeat(70));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut pack = StreamPack::new();
    pack.send(1);
    pack.send(2);

    let live = pack.subscribe(false, false);
    let sink = Rc::clone(&seen);
    live.borrow_mut()
        .receive(move |v: &i32| sink.borrow_mut().push(*v));

    // History was buffered before the callback existed; drain it now.
    while !live.borrow().is_empty() {
        live.borrow_mut().pump();
    }
    pack.send(3);

    println!("  live stream saw {:?}", seen.borrow());
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
}

fn scenario_4_flush() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 4: Flushing history without losing subscribers");
    println!("{}\n", "=".repeat(70));

    let mut pack = StreamPack::new();
    pack.send(1);
    pack.flush();
    pack.send(2);

    let history = pack.weak_subscribe(false, true).collect();
    println!("  history after flush: {history:?}");
    assert_eq!(history, vec![2]);
}

fn main() {
    scenario_1_late_joiner();
    scenario_2_snapshot_subscription();
    scenario_3_live_subscription();
    scenario_4_flush();

    println!("\nAll scenarios passed.");
}
