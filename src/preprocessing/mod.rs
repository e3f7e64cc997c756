//! Everything that happens before the model is called.

pub mod prompt;
pub mod router;

pub use prompt::PromptBuilder;
pub use router::{RouteError, SectionRouter};
