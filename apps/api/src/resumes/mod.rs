//! Resume uploads: text extraction, field extraction via the orchestrator,
//! object storage for the original file, and per-user listing.

pub mod extract;
pub mod handlers;
pub mod store;
