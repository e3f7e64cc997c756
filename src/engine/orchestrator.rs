//! Request coordinator: route → prompt → model → extract → parse → merge.
//!
//! ```text
//! Idle → PromptBuilt → AwaitingModel → ResponseReceived → Extracted → Parsed → Merged → Idle
//!                          └─ ModelCallFailed   └─ NoJsonFound  └─ MalformedJson └─ NothingToMerge
//! ```
//!
//! Every exit returns to `Idle` with either the merged section or the
//! untouched original plus an explanation.

use super::changelog::ChangeRecord;
use super::history::ConversationHistory;
use super::merger::{ConfigMerger, MergeOptions, MergeOutcome};
use super::{EngineError, ErrorKind};
use crate::config::EngineConfig;
use crate::llm::{GenerationClient, ModelClient, ModelError};
use crate::postprocessing::{ModelAnswer, ResponseExtractor, ResponseParser};
use crate::preprocessing::{PromptBuilder, SectionRouter};
use crate::section::{MultiSectionConfig, Section, SectionConfig};
use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

const LOG_PREVIEW_CHARS: usize = 500;

/// What the UI receives back for one request. At most one section config is
/// set: the active one, merged on success or unchanged on failure.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navbar_config: Option<SectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_config: Option<SectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_config: Option<SectionConfig>,
    #[serde(skip)]
    pub changes: Vec<ChangeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl EngineReply {
    fn new(message: String, section: Option<(Section, SectionConfig)>) -> Self {
        let mut reply = Self {
            message,
            navbar_config: None,
            hero_config: None,
            collection_config: None,
            changes: Vec::new(),
            error: None,
        };
        if let Some((section, config)) = section {
            *reply.slot_mut(section) = Some(config);
        }
        reply
    }

    fn merged(section: Section, outcome: MergeOutcome) -> Self {
        let message = outcome.changes.message();
        let mut reply = Self::new(message, Some((section, outcome.config)));
        reply.changes = outcome.changes.into_records();
        reply
    }

    fn failed(error: &EngineError, original: Option<(Section, SectionConfig)>) -> Self {
        let mut reply = Self::new(error.user_message(), original);
        reply.error = Some(error.kind());
        reply
    }

    fn slot_mut(&mut self, section: Section) -> &mut Option<SectionConfig> {
        match section {
            Section::Navbar => &mut self.navbar_config,
            Section::Hero => &mut self.hero_config,
            Section::Collection => &mut self.collection_config,
        }
    }

    pub fn section_config(&self, section: Section) -> Option<&SectionConfig> {
        match section {
            Section::Navbar => self.navbar_config.as_ref(),
            Section::Hero => self.hero_config.as_ref(),
            Section::Collection => self.collection_config.as_ref(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct Engine<C> {
    client: C,
    merger: ConfigMerger,
}

impl Engine<GenerationClient> {
    /// Engine talking to the configured HTTP endpoint.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ModelError> {
        let client = GenerationClient::new(config)?;
        Ok(Self::with_options(client, MergeOptions::from(config)))
    }
}

impl<C: ModelClient> Engine<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, MergeOptions::default())
    }

    pub fn with_options(client: C, options: MergeOptions) -> Self {
        Self {
            client,
            merger: ConfigMerger::new(options),
        }
    }

    /// Handles one chat message end to end. Never fails: errors become an
    /// explanatory reply carrying the original section config.
    ///
    /// Exactly one user turn and one assistant turn are appended to `history`.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn process_user_request(
        &self,
        message: &str,
        current: &MultiSectionConfig,
        history: &mut ConversationHistory,
    ) -> EngineReply {
        history.push_user(message);

        let reply = match SectionRouter::route(current) {
            Err(e) => {
                let error = EngineError::from(e);
                warn!(error = %error, "Request rejected");
                EngineReply::failed(&error, None)
            }
            Ok((section, config)) => match self.reconcile(section, config, message).await {
                Ok(outcome) => {
                    info!(section = %section, changes = outcome.changes.len(), "Request applied");
                    EngineReply::merged(section, outcome)
                }
                Err(error) => {
                    warn!(section = %section, kind = ?error.kind(), error = %error, "Request not applied");
                    EngineReply::failed(&error, Some((section, config.clone())))
                }
            },
        };

        history.push_assistant(reply.message.clone());
        reply
    }

    /// Runs the pipeline for one section. `config` is only read.
    pub async fn reconcile(
        &self,
        section: Section,
        config: &SectionConfig,
        request: &str,
    ) -> Result<MergeOutcome, EngineError> {
        let prompt = PromptBuilder::build(section, config, request);
        debug!(state = "prompt_built", prompt_len = prompt.len());
        trace!(prompt = %preview(&prompt));

        debug!(state = "awaiting_model");
        let raw = self.client.generate(&prompt).await?;
        debug!(state = "response_received", answer_len = raw.len());
        trace!(answer = %preview(&raw));

        let candidate = ResponseExtractor::extract(&raw)?;
        debug!(state = "extracted", candidate_len = candidate.len());

        let value = ResponseParser::parse(candidate)?;
        debug!(state = "parsed");

        let answer = ModelAnswer::resolve(&value, section, config);
        let outcome = self.merger.merge(config, &answer, request)?;
        debug!(state = "merged", changes = outcome.changes.len());
        Ok(outcome)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
