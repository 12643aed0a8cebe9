//! Watch-progress engine: interval ingestion and course aggregation.

pub mod watch;
