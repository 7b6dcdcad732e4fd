//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates the LLM provider.

mod assist_service;

pub use assist_service::{AskOutcome, AssistService};
