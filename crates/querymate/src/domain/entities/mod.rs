//! Domain Entities

mod answer;
mod prompt;
mod question;

pub use answer::*;
pub use prompt::*;
pub use question::*;
