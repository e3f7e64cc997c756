//! Applies a resolved model answer onto a copy of the active section.
//!
//! The merge is a patch: only keys present in the answer are considered, and
//! a key is written only when its normalized value differs from what is
//! stored. Every write is recorded in the change log with the stored value as
//! `old` and the written value as `new`.

use super::changelog::{ChangeLog, Scope};
use super::fallback::FallbackEdit;
use super::matcher::ItemMatcher;
use super::normalizer::StyleNormalizer;
use crate::config::EngineConfig;
use crate::postprocessing::answer::{get_ci, value_as_text};
use crate::postprocessing::ModelAnswer;
use crate::section::{Item, ItemField, Position, Section, SectionConfig, StyleMap, StyleValue};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Prefix of what a JavaScript object looks like after string coercion.
const OBJECT_PLACEHOLDER: &str = "[object ";

const ITEM_STYLE_KEYS: &[&str] = &["styles", "style"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("The answer contained nothing that applies to the {0} section")]
    NothingToMerge(Section),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub keyword_fallback: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            keyword_fallback: true,
        }
    }
}

impl From<&EngineConfig> for MergeOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            keyword_fallback: config.keyword_fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub config: SectionConfig,
    pub changes: ChangeLog,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMerger {
    options: MergeOptions,
}

impl ConfigMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merges `answer` into a copy of `current`. `current` is never modified.
    #[instrument(skip_all, fields(section = %answer.section()))]
    pub fn merge(
        &self,
        current: &SectionConfig,
        answer: &ModelAnswer<'_>,
        request: &str,
    ) -> Result<MergeOutcome, MergeError> {
        let section = answer.section();
        if let Some(other) = answer.foreign_section() {
            warn!(addressed = %other, "Answer addresses another section, ignoring it");
            return Err(MergeError::NothingToMerge(section));
        }
        if answer.is_hollow() && !self.options.keyword_fallback {
            debug!("Answer carries neither items nor section styles");
            return Err(MergeError::NothingToMerge(section));
        }

        let (config, (changes, applied)) = current.patched(|draft| {
            let mut log = ChangeLog::new();
            let mut applied = false;

            if let Some(entries) = answer.items() {
                applied = true;
                for pair in ItemMatcher::pair(section, &draft.items, entries) {
                    apply_item(section, &mut draft.items[pair.index], pair.entry, &mut log);
                }
            }

            if let Some(styles) = answer.global_styles() {
                applied = true;
                merge_styles(&mut draft.styles, styles, &Scope::section(section), &mut log);
            }

            if self.options.keyword_fallback && answer.items().is_none() && log.is_empty() {
                if let Some(edit) = FallbackEdit::detect(section, request) {
                    let fired = edit.apply(draft, &mut log);
                    debug!(fired, "Keyword fallback evaluated");
                    applied |= fired;
                }
            }

            (log, applied)
        });

        if !applied {
            return Err(MergeError::NothingToMerge(section));
        }
        debug!(changes = changes.len(), "Merge complete");
        Ok(MergeOutcome { config, changes })
    }
}

/// Applies one matched answer entry onto its existing item.
pub fn apply_item(section: Section, item: &mut Item, entry: &Map<String, Value>, log: &mut ChangeLog) {
    let scope = Scope::item(item);

    for field in ItemField::ALL {
        let Some(incoming) = get_ci(entry, field.answer_keys()).and_then(value_as_text) else {
            continue;
        };
        if is_alias_echo(section, field, &incoming, item) {
            continue;
        }
        let slot = item.field_mut(field);
        if slot.as_deref() != Some(incoming.as_str()) {
            log.record(&scope, field.name(), slot.as_deref(), &incoming);
            *slot = Some(incoming);
        }
    }

    match get_ci(entry, &["position"]) {
        Some(Value::Object(raw)) => match patched_position(item.position.as_ref(), raw) {
            Ok(position) if item.position.as_ref() != Some(&position) => {
                log.record(&scope, "position", item.position.as_ref(), &position);
                item.position = Some(position);
            }
            Ok(_) => {}
            Err(e) => debug!(item_id = %item.id, error = %e, "Ignoring unreadable position"),
        },
        Some(other) => debug!(item_id = %item.id, position = %other, "Ignoring non-object position"),
        None => {}
    }

    if let Some(Value::Object(styles)) = get_ci(entry, ITEM_STYLE_KEYS) {
        merge_styles(&mut item.styles, styles, &scope, log);
    }
}

/// Overlays the answer's position keys on the stored position, so subfields
/// the answer leaves out are kept.
fn patched_position(stored: Option<&Position>, raw: &Map<String, Value>) -> Result<Position, serde_json::Error> {
    let mut merged = match stored.map(serde_json::to_value).transpose()? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in raw.iter().filter(|(_, value)| !value.is_null()) {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
}

/// A navbar `link` that merely repeats the label identified the item; it is
/// not a new href.
fn is_alias_echo(section: Section, field: ItemField, incoming: &str, item: &Item) -> bool {
    section == Section::Navbar
        && field == ItemField::Link
        && item
            .label
            .as_deref()
            .map_or(false, |label| label.trim().eq_ignore_ascii_case(incoming.trim()))
}

/// Patches `target` with the style entries of an answer.
pub fn merge_styles(target: &mut StyleMap, incoming: &Map<String, Value>, scope: &Scope, log: &mut ChangeLog) {
    merge_into(target, incoming, scope, "", log);
}

fn merge_into(
    target: &mut StyleMap,
    incoming: &Map<String, Value>,
    scope: &Scope,
    prefix: &str,
    log: &mut ChangeLog,
) {
    for (raw_key, raw_value) in incoming {
        let Some(value) = StyleValue::from_json(raw_value) else {
            continue;
        };
        let key = StyleNormalizer::canonical_key(raw_key, target);
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if is_placeholder(&value) {
            debug!(field = %path, "Discarding stringified object placeholder");
            continue;
        }

        if let Some(StyleValue::Nested(existing)) = target.get_mut(&key) {
            match nested_patch(raw_value) {
                Some(patch) => merge_into(existing, &patch, scope, &path, log),
                None => debug!(field = %path, "Discarding scalar sent to a nested style"),
            }
            continue;
        }

        let current = target.get(&key).cloned();
        let normalized = StyleNormalizer::normalize_value(&key, value, current.as_ref());
        if current.as_ref() != Some(&normalized) {
            log.record(scope, path, current.as_ref(), &normalized);
            target.insert(key, normalized);
        }
    }
}

fn is_placeholder(value: &StyleValue) -> bool {
    value
        .as_text()
        .map_or(false, |text| text.trim_start().starts_with(OBJECT_PLACEHOLDER))
}

/// Entries to merge into a stored nested map: an object as-is, or a string
/// that holds a JSON object. Anything else yields `None`.
fn nested_patch(raw: &Value) -> Option<Map<String, Value>> {
    match raw {
        Value::Object(map) => Some(map.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}
