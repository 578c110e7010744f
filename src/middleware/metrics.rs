use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::core::roller::Step;

/// Counts payloads passing labelled points of a pipeline
///
/// A `PayloadCounter` hands out taps - callbacks that bump a per-label
/// counter and advance. The handle is cheap to clone and all clones share
/// the same counts, so one counter can watch several chains, streams, and
/// rolls at once.
///
/// # Example
///
/// ```ignore
/// use event_rolls::Stream;
/// use event_rolls::middleware::metrics::PayloadCounter;
///
/// let counter = PayloadCounter::new();
/// let mut stream = Stream::default();
///
/// stream.decide(counter.tap("delivered"));
/// stream.drain().listen(counter.listener("drained"));
///
/// stream.send(1);
/// assert_eq!(counter.count("delivered"), 1);
/// ```
#[derive(Clone, Default)]
pub struct PayloadCounter {
    counts: Rc<RefCell<HashMap<String, u64>>>,
}

impl PayloadCounter {
    /// Create a counter with no readings
    pub fn new() -> Self {
        Self::default()
    }

    /// A steering callback that counts under `label`, then advances
    pub fn tap<T>(&self, label: &str) -> impl FnMut(&T) -> Step<T> + use<T> {
        let counts = Rc::clone(&self.counts);
        let label = label.to_string();
        move |_: &T| {
            *counts.borrow_mut().entry(label.clone()).or_insert(0) += 1;
            Step::Next
        }
    }

    /// A plain listener that counts under `label`
    pub fn listener<T>(&self, label: &str) -> impl FnMut(&T) + use<T> {
        let counts = Rc::clone(&self.counts);
        let label = label.to_string();
        move |_: &T| {
            *counts.borrow_mut().entry(label.clone()).or_insert(0) += 1;
        }
    }

    /// Current count for a label; zero when the label never counted
    pub fn count(&self, label: &str) -> u64 {
        self.counts.borrow().get(label).copied().unwrap_or(0)
    }

    /// All counts, sorted by label
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self
            .counts
            .borrow()
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Drop all counts
    pub fn reset(&self) {
        self.counts.borrow_mut().clear();
    }

    /// Print a summary table of all counts to stdout
    pub fn print_summary(&self) {
        println!("\n=== Payload Counts ===");
        println!("{:<30} {:>10}", "Label", "Count");
        println!("{}", "-".repeat(41));
        for (label, count) in self.snapshot() {
            println!("{label:<30} {count:>10}");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_roll::EventRoll;
    use crate::core::stream::Stream;

    #[test]
    fn taps_count_per_label() {
        let counter = PayloadCounter::new();
        let mut stream = Stream::default();
        stream.decide(counter.tap("in"));

        stream.send(1);
        stream.send(2);

        assert_eq!(counter.count("in"), 2);
        assert_eq!(counter.count("missing"), 0);
    }

    #[test]
    fn listeners_count_event_roll_emissions() {
        let counter = PayloadCounter::new();
        let mut roll = EventRoll::new("counted");
        roll.listen(counter.listener("emitted"));

        roll.emit(1);
        roll.emit(2);
        roll.emit(3);

        assert_eq!(counter.count("emitted"), 3);
    }

    #[test]
    fn snapshot_is_sorted_and_reset_clears() {
        let counter = PayloadCounter::new();
        let mut stream = Stream::default();
        stream.decide(counter.tap("b"));
        stream.decide(counter.tap("a"));

        stream.send(1);

        assert_eq!(
            counter.snapshot(),
            vec![("a".to_string(), 1), ("b".to_string(), 1)]
        );

        counter.reset();
        assert!(counter.snapshot().is_empty());
    }

    #[test]
    fn clones_share_counts() {
        let counter = PayloadCounter::new();
        let handle = counter.clone();
        let mut stream = Stream::default();
        stream.decide(counter.tap("shared"));

        stream.send(1);

        assert_eq!(handle.count("shared"), 1);
    }
}
