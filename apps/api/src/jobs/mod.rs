//! Job descriptions stored per user.

pub mod handlers;
pub mod store;
