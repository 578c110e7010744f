use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::core::roller::Step;

/// Probe pair that measures chain traversal time
///
/// Taps cannot wrap the callbacks that run after them, so timing works as a
/// pair of probes: place [`entry`](Self::entry) where measurement should
/// start and [`exit`](Self::exit) where it should stop - typically the first
/// and last slots of a chain, or around a segment of interest. Every
/// traversal that crosses both probes records one lap.
///
/// The stopwatch handle is cheap to clone and all clones share the same
/// readings.
///
/// # Example
///
/// ```ignore
/// use event_rolls::Roller;
/// use event_rolls::middleware::timing::Stopwatch;
/// use std::time::Duration;
///
/// let watch = Stopwatch::new().with_threshold(Duration::from_millis(100));
/// let mut roller = Roller::new();
///
/// roller.decide(watch.entry());
/// roller.receive(|n: &i32| { /* measured work */ });
/// roller.decide(watch.exit());
///
/// roller.munch(7);
/// println!("pass took {:?}", watch.last());
/// ```
#[derive(Clone, Default)]
pub struct Stopwatch {
    readings: Rc<RefCell<Readings>>,
    threshold: Option<Duration>,
}

#[derive(Default)]
struct Readings {
    started: Option<Instant>,
    last: Option<Duration>,
    total: Duration,
    laps: u64,
}

impl Stopwatch {
    /// Create a stopwatch with no readings
    pub fn new() -> Self {
        Self::default()
    }

    /// Report laps slower than `threshold` through `tracing`
    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// The probe that starts a lap; always advances
    pub fn entry<T>(&self) -> impl FnMut(&T) -> Step<T> + use<T> {
        let readings = Rc::clone(&self.readings);
        move |_: &T| {
            readings.borrow_mut().started = Some(Instant::now());
            Step::Next
        }
    }

    /// The probe that stops a lap; always advances
    ///
    /// A traversal that reaches this probe without having crossed the entry
    /// probe records nothing.
    pub fn exit<T>(&self) -> impl FnMut(&T) -> Step<T> + use<T> {
        let readings = Rc::clone(&self.readings);
        let threshold = self.threshold;
        move |_: &T| {
            let mut readings = readings.borrow_mut();
            if let Some(started) = readings.started.take() {
                let lap = started.elapsed();
                readings.last = Some(lap);
                readings.total += lap;
                readings.laps += 1;

                if let Some(threshold) = threshold {
                    if lap >= threshold {
                        warn!("slow pass: {}", format_duration(lap));
                    }
                }
            }
            Step::Next
        }
    }

    /// Number of completed laps
    pub fn laps(&self) -> u64 {
        self.readings.borrow().laps
    }

    /// Duration of the most recent lap
    pub fn last(&self) -> Option<Duration> {
        self.readings.borrow().last
    }

    /// Total time across all laps
    pub fn total(&self) -> Duration {
        self.readings.borrow().total
    }

    /// Mean lap duration, if any lap completed
    pub fn average(&self) -> Option<Duration> {
        let readings = self.readings.borrow();
        if readings.laps == 0 {
            None
        } else {
            Some(readings.total / readings.laps as u32)
        }
    }

    /// Drop all readings
    pub fn reset(&self) {
        *self.readings.borrow_mut() = Readings::default();
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
