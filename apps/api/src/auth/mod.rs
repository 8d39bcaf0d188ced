//! Identity and sessions: sign-up, login, logout, password reset, and the
//! extractors that guard the HR endpoints.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod store;
pub mod tokens;

pub use extractor::{AuthUser, HrUser};
