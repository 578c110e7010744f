/// Ordered callback-chain engine with persistent/one-shot and
/// primary/completion chains
pub mod roller;

/// Multicast broadcaster with last-value replay for late subscribers
pub mod event_roll;

/// Buffered, push-or-pull delivery pipeline built on a roller
pub mod stream;

/// Persistent value history from which streams can be spawned
pub mod stream_pack;
