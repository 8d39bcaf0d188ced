//! Resume analysis: the model-facing orchestrator, its response decoding and
//! the HTTP surface that persists results.

pub mod decode;
pub mod fitment;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod store;

pub use orchestrator::AnalysisOrchestrator;
