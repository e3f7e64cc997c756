//! Keyword fallback for hollow answers.
//!
//! When the model's answer carries no item list and its section styles change
//! nothing, one narrow edit is still inferred from the user's own words: a
//! hero request naming a button and a color recolors the first hero button.
//! Nothing else is inferred.

use super::changelog::{ChangeLog, Scope};
use super::normalizer::StyleNormalizer;
use crate::section::{Section, SectionConfig, StyleValue};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const TARGET_KIND: &str = "button";
const TARGET_STYLE: &str = "backgroundColor";

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("hex color pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEdit {
    pub color: String,
}

impl FallbackEdit {
    /// Looks for the single supported intent in `request`.
    pub fn detect(section: Section, request: &str) -> Option<Self> {
        if section != Section::Hero {
            return None;
        }
        let lowered = request.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        if !words.iter().any(|word| *word == TARGET_KIND || *word == "buttons") {
            return None;
        }

        let color = hex_color_regex()
            .find(&lowered)
            .map(|found| found.as_str().to_string())
            .or_else(|| {
                words
                    .iter()
                    .find_map(|word| StyleNormalizer::named_color_hex(word))
                    .map(str::to_string)
            })?;

        debug!(color = %color, "Keyword fallback intent detected");
        Some(Self { color })
    }

    /// Applies the edit to the first button of `draft`. Returns `false` when
    /// the section has no button to recolor.
    pub fn apply(&self, draft: &mut SectionConfig, log: &mut ChangeLog) -> bool {
        let Some(button) = draft
            .items
            .iter_mut()
            .find(|item| item.kind.eq_ignore_ascii_case(TARGET_KIND))
        else {
            return false;
        };

        let key = StyleNormalizer::canonical_key(TARGET_STYLE, &button.styles);
        let value = StyleValue::Text(self.color.clone());
        if button.styles.get(&key) != Some(&value) {
            let scope = Scope::item(button);
            log.record(&scope, key.as_str(), button.styles.get(&key), &value);
            button.styles.insert(key, value);
        }
        true
    }
}
