/// Pipeline demo: rollers, steering, and stream delivery modes
///
/// Walks through the delivery behaviors one scenario at a time and asserts
/// the expected outcomes along the way.
use std::cell::RefCell;
use std::rc::Rc;

use event_rolls::{Roller, Step, Stream};

fn scenario_1_steering() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 1: Chain steering - swap and halt");
    println!("{}\n", "=".repeat(70));

    let mut roller = Roller::new();
    roller.decide(|n: &i32| {
        println!("  doubling {n}");
        Step::Swap(n * 2)
    });
    roller.decide(|n: &i32| {
        if *n > 100 {
            println!("  {n} too large, halting pass");
            Step::Halt
        } else {
            Step::Next
        }
    });
    roller.receive(|n: &i32| println!("  delivered {n}"));
    roller.receive_done(|n: &i32| println!("  chain finished with {n}"));

    roller.munch(21); // doubles, delivers, finishes
    roller.munch(60); // doubles to 120, halts before delivery
}

fn scenario_2_one_shot() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 2: One-shot callbacks self-prune");
    println!("{}\n", "=".repeat(70));

    let fired = Rc::new(RefCell::new(0));
    let mut roller = Roller::new();

    let counter = Rc::clone(&fired);
    roller.receive_once(move |n: &i32| {
        *counter.borrow_mut() += 1;
        println!("  one-shot saw {n}");
    });
    roller.receive(|n: &i32| println!("  persistent saw {n}"));

    roller.munch(1);
    roller.munch(2);
    roller.munch(3);

    assert_eq!(*fired.borrow(), 1);
    println!("\n  one-shot ran {} time", fired.borrow());
}

fn scenario_3_automatic_stream() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 3: Automatic stream delivers as values arrive");
    println!("{}\n", "=".repeat(70));

    let mut stream = Stream::default();
    stream.receive(|msg: &&str| println!("  delivered: {msg}"));
    stream.drain().listen(|msg: &&str| println!("  buffer drained after: {msg}"));

    stream.send("hello");
    stream.send("world");

    assert!(stream.is_empty());
}

fn scenario_4_manual_stream() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 4: Manual stream waits for pump");
    println!("{}\n", "=".repeat(70));

    let mut stream = Stream::new(false, true);
    stream.receive(|msg: &&str| println!("  delivered: {msg}"));

    stream.send("queued-1");
    stream.send("queued-2");
    println!("  buffered {} values, nothing delivered yet", stream.len());
    assert_eq!(stream.len(), 2);

    stream.pump();
    stream.pump();
    assert!(stream.is_empty());
}

fn scenario_5_collect() {
    println!("\n{}", "=".repeat(70));
    println!("SCENARIO 5: Collecting a backlog");
    println!("{}\n", "=".repeat(70));

    let mut stream: Stream<i32> = Stream::default();
    stream.send(1);
    stream.send(2);
    stream.send(3);

    stream.collect_to(|backlog| println!("  collected {backlog:?}"));
    assert!(stream.is_empty());
}

fn main() {
    scenario_1_steering();
    scenario_2_one_shot();
    scenario_3_automatic_stream();
    scenario_4_manual_stream();
    scenario_5_collect();

    println!("\nAll scenarios passed.");
}
