//! Event Rolls - buffered, replayable event streams on rolling callback chains
//!
//! This library provides a synchronous, in-process eventing toolkit built
//! around one engine: the [`Roller`], an ordered chain of callbacks where
//! each callback steers the pass with an explicit [`Step`] - advance, swap
//! the payload, or halt everything after it. On top of the roller sit an
//! [`EventRoll`] (multicast with last-value replay for late joiners), a
//! [`Stream`] (FIFO-buffered push or pull delivery with drain notification),
//! and a [`StreamPack`] (a growing history from which snapshot or live
//! streams are spawned).
//!
//! Everything is single-threaded and synchronous by design: delivery is a
//! plain call chain, ordering is strict arrival order, and the only way to
//! cancel anything is for a callback to halt its pass.
//!
//! # Quick Start
//!
//! ```ignore
//! use event_rolls::{Step, Stream};
//!
//! let mut stream = Stream::default();
//! stream.decide(|n: &i32| Step::Swap(n * 2));
//! stream.receive(|n: &i32| println!("delivered {n}"));
//! stream.drain().listen(|n: &i32| println!("drained after {n}"));
//!
//! stream.send(21); // delivered 42, drained after 21
//! ```

pub mod core;
pub mod middleware;

// Convenience re-exports
pub use crate::core::event_roll::{EventRoll, Listener};
pub use crate::core::roller::{Callback, Roller, Step};
pub use crate::core::stream::Stream;
pub use crate::core::stream_pack::StreamPack;
