use std::fmt;

use tracing::{Level, debug, error, info, trace, warn};

use crate::core::roller::Step;

/// A chain tap that logs every payload passing it, then advances
///
/// `LogTap` produces callbacks for the two registration surfaces: a steering
/// callback for roller chains ([`chained`](Self::chained)) and a plain
/// listener for event rolls ([`listener`](Self::listener)). Payloads are
/// rendered with their `Debug` representation and reported through
/// [`tracing`]; the tap never swaps a payload and never halts a pass.
///
/// # Example
///
/// ```ignore
/// use event_rolls::Roller;
/// use event_rolls::middleware::logging::LogTap;
///
/// let mut roller = Roller::new();
/// roller.decide(LogTap::new("ingest").chained());
/// roller.receive(|n: &i32| { /* actual work */ });
///
/// roller.munch(7); // logs: ingest 7
/// ```
pub struct LogTap {
    label: String,
    level: Level,
}

impl LogTap {
    /// Create a tap that logs at debug level under the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            level: Level::DEBUG,
        }
    }

    /// Create a tap that logs at info level
    pub fn info(label: impl Into<String>) -> Self {
        Self::new(label).with_level(Level::INFO)
    }

    /// Create a tap that logs at trace level
    pub fn verbose(label: impl Into<String>) -> Self {
        Self::new(label).with_level(Level::TRACE)
    }

    /// Set the level the tap logs at
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Turn the tap into a steering callback for a roller chain
    pub fn chained<T: fmt::Debug>(self) -> impl FnMut(&T) -> Step<T> {
        move |value: &T| {
            self.log(value);
            Step::Next
        }
    }

    /// Turn the tap into a plain listener for an event roll
    pub fn listener<T: fmt::Debug>(self) -> impl FnMut(&T) {
        move |value: &T| self.log(value)
    }

    fn log<T: fmt::Debug>(&self, value: &T) {
        // The event macros want a const level, hence the dispatch.
        if self.level == Level::TRACE {
            trace!(tap = %self.label, "{value:?}");
        } else if self.level == Level::DEBUG {
            debug!(tap = %self.label, "{value:?}");
        } else if self.level == Level::INFO {
            info!(tap = %self.label, "{value:?}");
        } else if self.level == Level::WARN {
            warn!(tap = %self.label, "{value:?}");
        } else {
            error!(tap = %self.label, "{value:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roller::Roller;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn chained_tap_always_advances() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut roller = Roller::new();

        roller.decide(LogTap::new("tap").chained());
        let sink = Rc::clone(&seen);
        roller.receive(move |value: &i32| sink.borrow_mut().push(*value));

        roller.munch(5);

        assert_eq!(*seen.borrow(), vec![5]);
    }

    #[test]
    fn listener_tap_observes_without_steering() {
        let mut roll = crate::core::event_roll::EventRoll::new("tapped");
        roll.listen(LogTap::info("events").listener());

        roll.emit("payload");

        assert!(roll.fired());
    }
}
