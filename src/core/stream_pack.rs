use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::event_roll::EventRoll;
use crate::core::stream::Stream;

/// Persistent, ever-growing value history from which streams can be spawned
///
/// Every value sent to a `StreamPack` is broadcast on its "adds" roll and
/// recorded in an append-only buffer. New [`Stream`]s spawned from the pack
/// are seeded with the recorded history: [`weak_subscribe`](Self::weak_subscribe)
/// hands out a one-time snapshot, [`subscribe`](Self::subscribe) a live
/// subscription that also receives everything sent later.
///
/// Spawned streams are independent; the pack keeps no ownership over them and
/// dropping the pack leaves live streams with whatever they already received.
///
/// # Example
///
/// ```ignore
/// use event_rolls::StreamPack;
///
/// let mut pack = StreamPack::new();
/// pack.send("first");
///
/// let live = pack.subscribe(false, true);
/// pack.send("second");
///
/// // The live stream buffered both values.
/// assert_eq!(live.borrow_mut().collect().len(), 2);
/// ```
pub struct StreamPack<T> {
    buffer: Rc<RefCell<Vec<T>>>,
    adds: EventRoll<T>,
}

impl<T: Clone + 'static> StreamPack<T> {
    /// Create an empty pack
    ///
    /// The pack's own recorder is the first listener on the "adds" roll, so
    /// every emission lands in the buffer before external subscribers see it.
    pub fn new() -> Self {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let mut adds = EventRoll::new("adds");

        let recorder = Rc::clone(&buffer);
        adds.listen(move |value: &T| recorder.borrow_mut().push(value.clone()));

        Self { buffer, adds }
    }

    /// Broadcast a value and record it in the history
    ///
    /// External listeners on the "adds" roll are notified in this same call,
    /// after the value is recorded.
    pub fn send(&mut self, value: T) {
        self.adds.emit(value);
    }

    /// Drop the recorded history
    ///
    /// Listeners on the "adds" roll are untouched; future sends broadcast and
    /// record as before.
    pub fn flush(&mut self) {
        self.buffer.borrow_mut().clear();
    }

    /// Number of recorded values
    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    /// True when no value has been recorded since creation or the last flush
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    /// The "adds" roll, for subscribing to raw emissions directly
    pub fn adds(&mut self) -> &mut EventRoll<T> {
        &mut self.adds
    }

    /// Spawn a stream seeded with the current history and nothing more
    ///
    /// Recorded values are replayed into the stream in arrival order. Values
    /// sent to the pack afterwards are not forwarded.
    pub fn weak_subscribe(&self, reverse: bool, manual: bool) -> Stream<T> {
        self.spawn_replayed(reverse, manual)
    }

    /// Spawn a live stream: current history plus everything sent later
    ///
    /// The stream is shared with a forwarding listener on the "adds" roll,
    /// hence the shared handle. The pack does not otherwise own the stream.
    pub fn subscribe(&mut self, reverse: bool, manual: bool) -> Rc<RefCell<Stream<T>>> {
        let stream = Rc::new(RefCell::new(self.spawn_replayed(reverse, manual)));

        let forward = Rc::clone(&stream);
        self.adds
            .listen(move |value: &T| forward.borrow_mut().send(value.clone()));

        stream
    }

    fn spawn_replayed(&self, reverse: bool, manual: bool) -> Stream<T> {
        let mut stream = Stream::new(reverse, manual);
        for value in self.buffer.borrow().iter() {
            stream.send(value.clone());
        }
        stream
    }
}

impl<T: Clone + 'static> Default for StreamPack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StreamPack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamPack")
            .field("recorded", &self.buffer.borrow().len())
            .field("listeners", &self.adds.len())
            .finish()
    }
}
