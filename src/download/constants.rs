//! Constants for the download module.

/// HTTP connect timeout (30 seconds).
///
/// Only connection setup is bounded; a stalled body read holds its worker
/// until the server closes the connection.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Upper bound for the worker pool size.
pub const MAX_CONCURRENCY: usize = 100;
