//! Inbound ingest server.
//!
//! External workers call back here, unprompted, to deliver discovered links
//! or finished variant pairs. The server shares no correlation with the
//! original job creation beyond the question id carried in each payload.
//!
//! Every inbound call is gated by a shared-secret bearer credential before
//! any handler logic runs; the body limit is raised well above framework
//! defaults to fit full-resolution image bytes in a single call.

pub mod auth;
pub mod handlers;
pub mod payload;
pub mod server;
pub mod service;

pub use payload::{Ack, CompressedImageDelivery, FoundLinksDelivery, VariantPayload};
pub use server::{router, serve, IngestState};
pub use service::{ingest_found_links, store_compressed_pair, LinkInsertOutcome};
