//! HTTP handlers, grouped by resource.

pub mod progress;
pub mod watch;
