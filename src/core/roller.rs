use std::fmt;

/// Control value returned by a chained callback.
///
/// Where a plain listener can only observe a payload, a chained callback
/// decides how the pass continues. Returning [`Step::Halt`] stops the pass
/// entirely: later callbacks and the completion chain do not run. This is the
/// chain's short-circuit mechanism, not an error.
#[derive(Debug, Clone)]
pub enum Step<T> {
    /// Stop the current pass. Nothing after this callback runs.
    Halt,
    /// Advance to the next callback with the payload unchanged.
    Next,
    /// Advance to the next callback with a replacement payload. The new value
    /// is what every later callback in this pass sees, completion chain
    /// included.
    Swap(T),
}

/// A callback that participates in a chain and steers the pass.
pub type Callback<T> = Box<dyn FnMut(&T) -> Step<T>>;

/// Ordered callback-chain engine
///
/// A `Roller` holds four independent callback lists: a persistent primary
/// chain, a one-shot primary chain, and a completion chain for each. A
/// dispatch ([`munch`](Self::munch) or [`rev_munch`](Self::rev_munch)) walks
/// the primary chain in order; when a non-empty primary chain runs off its
/// end, the matching completion chain runs under the same stepping rules.
///
/// One-shot lists empty themselves the first time a pass runs past their end,
/// so their callbacks see at most one dispatch.
///
/// # Execution Order
///
/// * Callbacks run in registration order; `rev_munch` runs them in exact
///   reverse registration order.
/// * The persistent pass and the one-shot pass both run on every dispatch.
///   They start from the same input payload but do not share swapped values.
///
/// # Example
///
/// ```ignore
/// use event_rolls::{Roller, Step};
///
/// let mut roller = Roller::new();
/// roller.decide(|n: &i32| Step::Swap(n + 1));
/// roller.receive(|n: &i32| println!("saw {n}"));
/// roller.receive_done(|n: &i32| println!("chain finished with {n}"));
///
/// roller.munch(41); // prints "saw 42", then "chain finished with 42"
/// ```
pub struct Roller<T> {
    enders: Vec<Callback<T>>,
    once_enders: Vec<Callback<T>>,
    doners: Vec<Callback<T>>,
    once_doners: Vec<Callback<T>>,
}

impl<T> Roller<T> {
    /// Create a roller with all four chains empty
    pub fn new() -> Self {
        Self {
            enders: Vec::new(),
            once_enders: Vec::new(),
            doners: Vec::new(),
            once_doners: Vec::new(),
        }
    }

    /// Append a steering callback to the persistent primary chain
    ///
    /// Callbacks are append-only: no reordering, no deduplication. The same
    /// closure appended twice runs twice per pass.
    pub fn decide<F>(&mut self, callback: F)
    where
        F: FnMut(&T) -> Step<T> + 'static,
    {
        self.enders.push(Box::new(callback));
    }

    /// Append a steering callback that runs in at most one pass
    ///
    /// The one-shot primary chain is cleared the first time a pass runs past
    /// its end. A pass that halts midway does not clear it.
    pub fn decide_once<F>(&mut self, callback: F)
    where
        F: FnMut(&T) -> Step<T> + 'static,
    {
        self.once_enders.push(Box::new(callback));
    }

    /// Append a plain listener to the persistent primary chain
    ///
    /// Sugar over [`decide`](Self::decide): the listener observes the payload
    /// and the pass always advances with it unchanged.
    pub fn receive<F>(&mut self, mut listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.enders.push(Box::new(move |value: &T| {
            listener(value);
            Step::Next
        }));
    }

    /// Append a plain listener to the one-shot primary chain
    pub fn receive_once<F>(&mut self, mut listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.once_enders.push(Box::new(move |value: &T| {
            listener(value);
            Step::Next
        }));
    }

    /// Append a steering callback to the persistent completion chain
    ///
    /// Completion callbacks run only after the persistent primary chain was
    /// walked off its end. They receive the payload as the primary chain left
    /// it, swaps included. If the primary chain is empty, the completion
    /// chain never runs.
    pub fn decided_done<F>(&mut self, callback: F)
    where
        F: FnMut(&T) -> Step<T> + 'static,
    {
        self.doners.push(Box::new(callback));
    }

    /// Append a steering callback to the one-shot completion chain
    ///
    /// Unlike the persistent completion chain, the one-shot completion chain
    /// runs even when the one-shot primary chain is empty; an empty chain
    /// counts as already exhausted.
    pub fn decided_done_once<F>(&mut self, callback: F)
    where
        F: FnMut(&T) -> Step<T> + 'static,
    {
        self.once_doners.push(Box::new(callback));
    }

    /// Append a plain listener to the persistent completion chain
    pub fn receive_done<F>(&mut self, mut listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.doners.push(Box::new(move |value: &T| {
            listener(value);
            Step::Next
        }));
    }

    /// Append a plain listener to the one-shot completion chain
    pub fn receive_done_once<F>(&mut self, mut listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.once_doners.push(Box::new(move |value: &T| {
            listener(value);
            Step::Next
        }));
    }

    /// Remove the persistent primary callback at `index`
    ///
    /// Returns `false` without mutating when `index` is out of range.
    pub fn remove_callback(&mut self, index: usize) -> bool {
        remove_at(&mut self.enders, index)
    }

    /// Remove the persistent completion callback at `index`
    pub fn remove_done_callback(&mut self, index: usize) -> bool {
        remove_at(&mut self.doners, index)
    }

    /// Remove the one-shot primary callback at `index`
    pub fn remove_once_callback(&mut self, index: usize) -> bool {
        remove_at(&mut self.once_enders, index)
    }

    /// Remove the one-shot completion callback at `index`
    pub fn remove_once_done_callback(&mut self, index: usize) -> bool {
        remove_at(&mut self.once_doners, index)
    }

    /// Number of callbacks waiting on the primary chains, one-shot included
    pub fn primary_len(&self) -> usize {
        self.enders.len() + self.once_enders.len()
    }

    /// Number of callbacks waiting on the completion chains, one-shot included
    pub fn completion_len(&self) -> usize {
        self.doners.len() + self.once_doners.len()
    }

    /// True when no callback is registered on any chain
    pub fn is_empty(&self) -> bool {
        self.primary_len() == 0 && self.completion_len() == 0
    }

    /// Dispatch a payload forward through the chains
    ///
    /// Two independent passes run, both fed the same input payload:
    ///
    /// 1. The persistent primary chain from index 0 upward. Only a non-empty
    ///    chain that runs off its end falls through to the persistent
    ///    completion chain.
    /// 2. The one-shot primary chain the same way, falling through to the
    ///    one-shot completion chain; here an empty primary chain still falls
    ///    through. Each one-shot chain is cleared once its own pass
    ///    completes, so a halted pass leaves it intact for the next dispatch.
    pub fn munch(&mut self, payload: T)
    where
        T: Clone,
    {
        self.roll(payload, false);
    }

    /// Dispatch a payload through the chains in reverse registration order
    ///
    /// Identical fall-through and one-shot rules as [`munch`](Self::munch);
    /// every chain, completion chains included, is walked from its last
    /// callback down to its first.
    pub fn rev_munch(&mut self, payload: T)
    where
        T: Clone,
    {
        self.roll(payload, true);
    }

    fn roll(&mut self, payload: T, reverse: bool)
    where
        T: Clone,
    {
        let once_seed = payload.clone();

        if !self.enders.is_empty() {
            if let Some(carried) = run_chain(&mut self.enders, payload, reverse) {
                run_chain(&mut self.doners, carried, reverse);
            }
        }

        if let Some(carried) = run_chain(&mut self.once_enders, once_seed, reverse) {
            self.once_enders.clear();
            if run_chain(&mut self.once_doners, carried, reverse).is_some() {
                self.once_doners.clear();
            }
        }
    }
}

impl<T> Default for Roller<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Roller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roller")
            .field("enders", &self.enders.len())
            .field("once_enders", &self.once_enders.len())
            .field("doners", &self.doners.len())
            .field("once_doners", &self.once_doners.len())
            .finish()
    }
}

/// Walk one chain with an index-driven loop, threading the payload through
/// each step. Returns the payload as the chain left it, or `None` when a
/// callback halted the pass.
fn run_chain<T>(chain: &mut [Callback<T>], seed: T, reverse: bool) -> Option<T> {
    let mut value = seed;
    let len = chain.len();

    for step in 0..len {
        let index = if reverse { len - 1 - step } else { step };
        match (chain[index])(&value) {
            Step::Halt => return None,
            Step::Next => {}
            Step::Swap(replacement) => value = replacement,
        }
    }

    Some(value)
}

fn remove_at<T>(chain: &mut Vec<Callback<T>>, index: usize) -> bool {
    if index >= chain.len() {
        return false;
    }
    chain.remove(index);
    true
}
