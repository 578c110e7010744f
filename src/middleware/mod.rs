/// Logging tap for payloads moving through a chain
pub mod logging;

/// Timing probes for measuring chain traversals
pub mod timing;

/// Payload counting metrics
pub mod metrics;
