/// Tapped pipeline demo: logging, timing, and counting a stream
///
/// Requires the `middleware` feature bundle:
///
/// ```text
/// cargo run --example tapped_pipeline --features middleware
/// ```
use std::time::Duration;

use event_rolls::middleware::logging::LogTap;
use event_rolls::middleware::metrics::PayloadCounter;
use event_rolls::middleware::timing::Stopwatch;
use event_rolls::{Step, Stream};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let counter = PayloadCounter::new();
    let watch = Stopwatch::new().with_threshold(Duration::from_millis(50));

    let mut stream = Stream::default();
    stream.decide(watch.entry());
    stream.decide(LogTap::new("ingest").chained());
    stream.decide(counter.tap("ingested"));
    stream.decide(|n: &i32| {
        if n % 2 == 0 {
            Step::Next
        } else {
            // Odd values are swallowed; the pass stops here.
            Step::Halt
        }
    });
    stream.decide(counter.tap("kept"));
    stream.decide(watch.exit());

    stream.drain().listen(counter.listener("drained"));

    for n in 1..=10 {
        stream.send(n);
    }

    assert_eq!(counter.count("ingested"), 10);
    assert_eq!(counter.count("kept"), 5);

    println!(
        "timed {} full passes, average {:?}",
        watch.laps(),
        watch.average()
    );
    counter.print_summary();
}
