//! Reconciliation: matching, normalization, merge and the request entry point.

pub mod changelog;
pub mod fallback;
pub mod history;
pub mod matcher;
pub mod merger;
pub mod normalizer;
pub mod orchestrator;

pub use changelog::{ChangeLog, ChangeRecord, Scope, NO_CHANGES_MESSAGE};
pub use history::{ConversationHistory, ConversationTurn, Role};
pub use matcher::{ItemMatcher, MatchRule, MatchedPair};
pub use merger::{ConfigMerger, MergeError, MergeOptions, MergeOutcome};
pub use normalizer::StyleNormalizer;
pub use orchestrator::{Engine, EngineReply};

use crate::llm::ModelError;
use crate::postprocessing::{ExtractError, ParseError};
use crate::preprocessing::RouteError;
use crate::section::Section;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No section is selected for editing")]
    NoActiveSection,
    #[error("Model call failed: {0}")]
    ModelCallFailed(#[source] ModelError),
    #[error("No JSON found in the model answer: {0}")]
    NoJsonFound(String),
    #[error(transparent)]
    MalformedJson(#[from] ParseError),
    #[error("Nothing to merge into the {0} section")]
    NothingToMerge(Section),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoActiveSection,
    ModelCallFailed,
    NoJsonFound,
    MalformedJson,
    NothingToMerge,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NoActiveSection => ErrorKind::NoActiveSection,
            EngineError::ModelCallFailed(_) => ErrorKind::ModelCallFailed,
            EngineError::NoJsonFound(_) => ErrorKind::NoJsonFound,
            EngineError::MalformedJson(_) => ErrorKind::MalformedJson,
            EngineError::NothingToMerge(_) => ErrorKind::NothingToMerge,
        }
    }

    /// Assistant reply shown in the chat when the request could not be applied.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::NoActiveSection => {
                "Select a section to edit before asking for changes.".to_string()
            }
            EngineError::ModelCallFailed(_) => {
                "I couldn't reach the design assistant, so nothing was changed. Please try again."
                    .to_string()
            }
            EngineError::NoJsonFound(_) => {
                "I couldn't find any changes in the assistant's answer, so nothing was changed."
                    .to_string()
            }
            EngineError::MalformedJson(_) => {
                "The assistant's answer could not be read, so nothing was changed.".to_string()
            }
            EngineError::NothingToMerge(section) => format!(
                "The assistant's answer had no changes for the {section} section, so nothing was changed."
            ),
        }
    }
}

impl From<RouteError> for EngineError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::NoActiveSection => EngineError::NoActiveSection,
        }
    }
}

/// A reply without the expected envelope is an extraction failure, not a
/// transport one.
impl From<ModelError> for EngineError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::UnexpectedShape(detail) => EngineError::NoJsonFound(detail),
            other => EngineError::ModelCallFailed(other),
        }
    }
}

impl From<ExtractError> for EngineError {
    fn from(e: ExtractError) -> Self {
        EngineError::NoJsonFound(e.to_string())
    }
}

impl From<MergeError> for EngineError {
    fn from(e: MergeError) -> Self {
        match e {
            MergeError::NothingToMerge(section) => EngineError::NothingToMerge(section),
        }
    }
}

#[cfg(test)]
mod tests;
