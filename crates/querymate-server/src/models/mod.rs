//! QueryMate API Models
//!
//! - Ask: question in, rendered answer out
//! - Prompt: local prompt preview

mod ask;

pub use ask::*;
