//! Pairs entries of a model's item list with the items already on the page.
//!
//! The model does not reliably echo ids back, so pairing runs an ordered list
//! of named matchers from strongest to weakest. Each rule gets a full pass
//! over the remaining entries before the next, weaker rule is tried. Several
//! entries may address the same item and are applied in answer order; only
//! the bare type match refuses an item another entry already named. Scans
//! follow list order on both sides so the same inputs always pair the same way.

use crate::postprocessing::answer::{get_ci, value_as_text};
use crate::section::{Item, Section};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Id,
    PrimaryField,
    Alias,
    Kind,
}

impl MatchRule {
    /// A type alone does not single out an item, so it only takes items no
    /// other entry has named.
    fn is_exclusive(self) -> bool {
        matches!(self, MatchRule::Kind)
    }
}

type Matcher = fn(&Map<String, Value>, &Item, Section) -> bool;

/// Strongest first.
const MATCHERS: &[(MatchRule, Matcher)] = &[
    (MatchRule::Id, by_id),
    (MatchRule::PrimaryField, by_primary_field),
    (MatchRule::Alias, by_alias),
    (MatchRule::Kind, by_kind),
];

#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    /// Index into the existing item list.
    pub index: usize,
    pub entry: &'a Map<String, Value>,
    pub rule: MatchRule,
}

pub struct ItemMatcher;

impl ItemMatcher {
    /// Returns one pair per matched entry, in answer order. Entries that match
    /// nothing are dropped; items nobody named are simply absent.
    pub fn pair<'a>(section: Section, existing: &[Item], entries: &'a [Value]) -> Vec<MatchedPair<'a>> {
        let objects: Vec<(usize, &'a Map<String, Value>)> = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| entry.as_object().map(|map| (position, map)))
            .collect();

        let mut claimed = vec![false; existing.len()];
        let mut paired: Vec<Option<MatchedPair<'a>>> = vec![None; objects.len()];

        for (rule, matcher) in MATCHERS {
            for (slot, &(_, entry)) in objects.iter().enumerate() {
                if paired[slot].is_some() {
                    continue;
                }
                let found = existing
                    .iter()
                    .enumerate()
                    .find(|(index, item)| {
                        !(rule.is_exclusive() && claimed[*index]) && matcher(entry, item, section)
                    });
                if let Some((index, item)) = found {
                    claimed[index] = true;
                    debug!(item_id = %item.id, rule = ?rule, "Paired model entry");
                    paired[slot] = Some(MatchedPair {
                        index,
                        entry,
                        rule: *rule,
                    });
                }
            }
        }

        for ((position, _), pair) in objects.iter().zip(&paired) {
            if pair.is_none() {
                debug!(entry = position, "Model entry matched no existing item, dropped");
            }
        }

        paired.into_iter().flatten().collect()
    }
}

pub fn by_id(entry: &Map<String, Value>, item: &Item, _section: Section) -> bool {
    get_ci(entry, &["id"])
        .and_then(value_as_text)
        .map_or(false, |id| id.trim() == item.id)
}

pub fn by_primary_field(entry: &Map<String, Value>, item: &Item, section: Section) -> bool {
    let field = section.primary_field();
    match (get_ci(entry, &[field.answer_keys()[0]]), item.field(field)) {
        (Some(value), Some(current)) => text_matches(value, current),
        _ => false,
    }
}

/// Fields models commonly substitute for the primary one.
pub fn by_alias(entry: &Map<String, Value>, item: &Item, section: Section) -> bool {
    let aliases: &[&str] = match section {
        Section::Navbar => &["link", "text", "name"],
        Section::Hero => &["text", "heading"],
        Section::Collection => &["collection", "name"],
    };
    let Some(current) = item.field(section.primary_field()) else {
        return false;
    };
    aliases.iter().any(|alias| {
        get_ci(entry, &[*alias]).map_or(false, |value| text_matches(value, current))
    })
}

/// Hero items are often returned by type alone ("the button").
pub fn by_kind(entry: &Map<String, Value>, item: &Item, section: Section) -> bool {
    section == Section::Hero
        && get_ci(entry, &["type"]).map_or(false, |kind| text_matches(kind, &item.kind))
}

fn text_matches(value: &Value, current: &str) -> bool {
    value_as_text(value).map_or(false, |text| {
        let text = text.trim();
        !text.is_empty() && text.eq_ignore_ascii_case(current.trim())
    })
}
