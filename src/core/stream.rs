use std::collections::VecDeque;
use std::fmt;

use crate::core::event_roll::EventRoll;
use crate::core::roller::{Roller, Step};

/// Buffered, push-or-pull delivery pipeline built on a [`Roller`]
///
/// Values enter through [`send`](Self::send) and leave through the embedded
/// roller's chains. In automatic mode delivery happens as values arrive; in
/// manual mode values accumulate until [`pump`](Self::pump) is called. The
/// buffer is strictly FIFO: values join at the back and only ever leave from
/// the front.
///
/// Whenever a delivery leaves the buffer empty, the stream's "drain" roll
/// fires with the value that emptied it. Discarding values with
/// [`clear`](Self::clear) is not draining and fires nothing.
///
/// # Example
///
/// ```ignore
/// use event_rolls::Stream;
///
/// let mut stream = Stream::default();
/// stream.receive(|n: &i32| println!("delivered {n}"));
/// stream.drain().listen(|n: &i32| println!("buffer empty after {n}"));
///
/// stream.send(1); // delivered immediately, then drains
/// ```
pub struct Stream<T> {
    roller: Roller<T>,
    buffer: VecDeque<T>,
    drains: EventRoll<T>,
    manual: bool,
    reverse: bool,
}

impl<T: Clone> Stream<T> {
    /// Create a stream with explicit consumption order and delivery mode
    ///
    /// `reverse` makes deliveries walk the roller chains backwards;
    /// `manual` disables automatic delivery so values wait for
    /// [`pump`](Self::pump).
    pub fn new(reverse: bool, manual: bool) -> Self {
        Self {
            roller: Roller::new(),
            buffer: VecDeque::new(),
            drains: EventRoll::new("drain"),
            manual,
            reverse,
        }
    }

    /// The embedded roller, for the full registration and removal surface
    pub fn roller(&mut self) -> &mut Roller<T> {
        &mut self.roller
    }

    /// The "drain" roll, fired each time a delivery empties the buffer
    pub fn drain(&mut self) -> &mut EventRoll<T> {
        &mut self.drains
    }

    /// Append a steering callback to the stream's primary chain
    pub fn decide<F>(&mut self, callback: F)
    where
        F: FnMut(&T) -> Step<T> + 'static,
    {
        self.roller.decide(callback);
    }

    /// Append a plain listener to the stream's primary chain
    pub fn receive<F>(&mut self, listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.roller.receive(listener);
    }

    /// Append a plain listener to the stream's completion chain
    pub fn receive_done<F>(&mut self, listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.roller.receive_done(listener);
    }

    /// Number of values waiting in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True when delivery waits for explicit [`pump`](Self::pump) calls
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// True when deliveries walk the chains in reverse
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Feed a value into the stream
    ///
    /// The delivery decision, in order:
    ///
    /// 1. No primary callbacks registered: the value is buffered and the call
    ///    returns. There is nothing to deliver to.
    /// 2. Manual mode: the value is buffered, never delivered here.
    /// 3. Automatic mode with values already pending: the value is buffered
    ///    behind them to preserve arrival order.
    /// 4. Automatic mode with an empty buffer: the value is delivered
    ///    immediately and the drain roll fires with it; the buffer is never
    ///    touched for this value.
    ///
    /// In automatic mode the call finishes with one [`pump`](Self::pump) to
    /// move anything still pending.
    pub fn send(&mut self, value: T) {
        if self.roller.primary_len() == 0 {
            self.buffer.push_back(value);
            return;
        }

        if self.manual || !self.buffer.is_empty() {
            self.buffer.push_back(value);
        } else {
            self.delegate(value.clone());
            self.drains.emit(value);
        }

        if !self.manual {
            self.pump();
        }
    }

    /// Deliver the oldest buffered value, if there is one to deliver
    ///
    /// Does nothing without primary callbacks or without buffered values.
    /// The drain roll fires only when this delivery empties the buffer.
    pub fn pump(&mut self) {
        if self.roller.primary_len() == 0 {
            return;
        }
        let Some(value) = self.buffer.pop_front() else {
            return;
        };

        if self.buffer.is_empty() {
            self.delegate(value.clone());
            self.drains.emit(value);
        } else {
            self.delegate(value);
        }
    }

    /// Hand a value straight to the roller, honoring the reverse flag
    ///
    /// The flag is read here, at delivery time; values buffered before a
    /// [`reverse`](Self::reverse) toggle are delivered with the new order.
    pub fn delegate(&mut self, value: T) {
        if self.roller.primary_len() == 0 {
            return;
        }
        if self.reverse {
            self.roller.rev_munch(value);
        } else {
            self.roller.munch(value);
        }
    }

    /// Snapshot and clear the buffer, returning its contents in order
    pub fn collect(&mut self) -> Vec<T> {
        self.buffer.drain(..).collect()
    }

    /// Collect the buffer and re-send it as one payload
    ///
    /// Turns the whole backlog into a single value; with no callbacks
    /// registered that value simply becomes the only buffered item.
    pub fn collect_and_stream(&mut self)
    where
        T: From<Vec<T>>,
    {
        let collected = self.collect();
        self.send(T::from(collected));
    }

    /// Collect the buffer and hand the contents to `receiver`
    ///
    /// The collected values do not re-enter the stream.
    pub fn collect_to<F>(&mut self, receiver: F)
    where
        F: FnOnce(Vec<T>),
    {
        receiver(self.collect());
    }

    /// Walk the chains backwards on subsequent deliveries
    pub fn reverse(&mut self) {
        self.reverse = true;
    }

    /// Restore forward chain order for subsequent deliveries
    pub fn unreverse(&mut self) {
        self.reverse = false;
    }

    /// Discard all buffered values
    ///
    /// Nothing is delivered and the drain roll does not fire; a discarded
    /// backlog is not a drained one.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<T: Clone> Default for Stream<T> {
    /// A forward, automatic-delivery stream
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("buffered", &self.buffer.len())
            .field("manual", &self.manual)
            .field("reverse", &self.reverse)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Payload for deployments that fold a backlog into one value.
    #[derive(Clone, Debug, PartialEq)]
    enum Value {
        Num(i32),
        List(Vec<Value>),
    }

    impl From<Vec<Value>> for Value {
        fn from(values: Vec<Value>) -> Self {
            Value::List(values)
        }
    }

    fn delivered(stream: &mut Stream<i32>) -> Rc<RefCell<Vec<i32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        stream.receive(move |value: &i32| sink.borrow_mut().push(*value));
        seen
    }

    fn drained(stream: &mut Stream<i32>) -> Rc<RefCell<Vec<i32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        stream
            .drain()
            .listen(move |value: &i32| sink.borrow_mut().push(*value));
        seen
    }

    #[test]
    fn send_without_listeners_only_buffers() {
        let mut stream: Stream<i32> = Stream::default();
        stream.send(1);
        stream.send(2);

        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn automatic_send_delivers_immediately_and_drains() {
        let mut stream = Stream::default();
        let seen = delivered(&mut stream);
        let drains = drained(&mut stream);

        stream.send(7);

        assert_eq!(*seen.borrow(), vec![7]);
        assert_eq!(*drains.borrow(), vec![7]);
        assert!(stream.is_empty());
    }

    #[test]
    fn automatic_send_preserves_fifo_over_a_backlog() {
        let mut stream: Stream<i32> = Stream::default();
        stream.send(1);
        stream.send(2);

        let seen = delivered(&mut stream);

        // Buffer holds [1, 2]; this send queues 3 and pumps exactly one.
        stream.send(3);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(stream.len(), 2);

        stream.pump();
        stream.pump();
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn manual_send_never_delivers() {
        let mut stream = Stream::new(false, true);
        let seen = delivered(&mut stream);

        stream.send(1);
        stream.send(2);

        assert!(seen.borrow().is_empty());
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn manual_pump_delivers_oldest_and_drains_on_last() {
        let mut stream = Stream::new(false, true);
        let seen = delivered(&mut stream);
        let drains = drained(&mut stream);

        stream.send(1);
        stream.send(2);

        stream.pump();
        assert_eq!(*seen.borrow(), vec![1]);
        assert!(drains.borrow().is_empty());

        stream.pump();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(*drains.borrow(), vec![2]);
    }

    #[test]
    fn pump_without_listeners_or_backlog_is_a_no_op() {
        let mut stream: Stream<i32> = Stream::default();
        stream.pump();

        stream.send(1);
        stream.pump();
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn reverse_flag_is_read_at_delivery_time() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut stream = Stream::new(false, true);
        for name in ["a", "b"] {
            let order = Rc::clone(&order);
            stream.receive(move |value: &i32| order.borrow_mut().push(format!("{name}:{value}")));
        }

        stream.send(1);
        stream.reverse();
        stream.pump();

        // Queued forward, delivered reversed.
        assert_eq!(*order.borrow(), vec!["b:1", "a:1"]);

        stream.unreverse();
        stream.send(2);
        stream.pump();
        assert_eq!(
            *order.borrow(),
            vec!["b:1", "a:1", "a:2", "b:2"]
        );
    }

    #[test]
    fn collect_snapshots_and_clears() {
        let mut stream: Stream<i32> = Stream::default();
        stream.send(1);
        stream.send(2);

        assert_eq!(stream.collect(), vec![1, 2]);
        assert!(stream.is_empty());
        assert!(stream.collect().is_empty());
    }

    #[test]
    fn collect_and_stream_folds_backlog_into_one_item() {
        let mut stream: Stream<Value> = Stream::default();
        stream.send(Value::Num(1));
        stream.send(Value::Num(2));

        stream.collect_and_stream();

        assert_eq!(stream.len(), 1);
        assert_eq!(
            stream.collect(),
            vec![Value::List(vec![Value::Num(1), Value::Num(2)])]
        );
    }

    #[test]
    fn collect_to_does_not_reenter_the_stream() {
        let mut stream: Stream<i32> = Stream::default();
        stream.send(1);
        stream.send(2);

        let mut handed = Vec::new();
        stream.collect_to(|values| handed = values);

        assert_eq!(handed, vec![1, 2]);
        assert!(stream.is_empty());
    }

    #[test]
    fn clear_discards_without_draining() {
        let mut stream = Stream::new(false, true);
        let seen = delivered(&mut stream);
        let drains = drained(&mut stream);

        stream.send(1);
        stream.clear();

        assert!(stream.is_empty());
        assert!(seen.borrow().is_empty());
        assert!(drains.borrow().is_empty());
    }

    proptest! {
        #[test]
        fn manual_backlog_drains_in_arrival_order(values in proptest::collection::vec(any::<i32>(), 0..32)) {
            let mut stream = Stream::new(false, true);
            let seen = delivered(&mut stream);

            for value in &values {
                stream.send(*value);
            }
            for _ in 0..values.len() {
                stream.pump();
            }

            prop_assert_eq!(&*seen.borrow(), &values);
            prop_assert!(stream.is_empty());
        }
    }
}
