//! Ingestion event fan-out.
//!
//! [`EventBus`] republishes ingested events to live subscribers with
//! at-most-best-effort delivery: no persistence, no replay, no subscriber
//! acknowledgment. If stronger guarantees are ever needed, this is the seam
//! to insert a durable event log.

pub mod bus;

pub use bus::{EventBus, FoundLinksEvent};
