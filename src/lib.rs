//! AI edit reconciliation for the site builder.
//!
//! A chat message and the UI's section snapshot go in; the model is asked
//! for an edit, its answer is recovered and validated, and the active section
//! comes back patched together with a list of what changed.
//!
//! ```no_run
//! use sitebuilder_ai::{ConversationHistory, Engine, EngineConfig, MultiSectionConfig};
//!
//! # async fn demo(snapshot: MultiSectionConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::from_env()?;
//! let engine = Engine::from_config(&config)?;
//! let mut history = ConversationHistory::new();
//!
//! let reply = engine
//!     .process_user_request("make the button red", &snapshot, &mut history)
//!     .await;
//! println!("{}", reply.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod llm;
pub mod postprocessing;
pub mod preprocessing;
pub mod section;

pub use config::{ConfigError, EngineConfig};
pub use engine::{
    ChangeRecord, ConversationHistory, ConversationTurn, Engine, EngineError, EngineReply,
    ErrorKind, Role,
};
pub use llm::{GenerationClient, ModelClient, ModelError};
pub use section::{Item, MultiSectionConfig, Position, Section, SectionConfig, StyleMap, StyleValue};
