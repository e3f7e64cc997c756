//! Read-only view over an untrusted model answer.
//!
//! The model is free to wrap the section payload, rename the item list or
//! the style container, and change casing between calls. It may also return
//! a single item at the root. This view resolves all of that for one active
//! section and exposes only what the merger needs.

use crate::section::{Section, SectionConfig};
use serde_json::{Map, Value};
use tracing::debug;

const STYLE_CONTAINER_KEYS: &[&str] = &["styles", "globalstyles", "sectionstyles", "style"];

#[derive(Debug, Clone, Copy)]
enum Payload<'a> {
    Object(&'a Map<String, Value>),
    Items(&'a [Value]),
    Foreign(Section),
    Empty,
}

#[derive(Debug, Clone, Copy)]
pub struct ModelAnswer<'a> {
    section: Section,
    payload: Payload<'a>,
}

impl<'a> ModelAnswer<'a> {
    /// `current` is the stored section, used to recognise an answer that is
    /// one of its items rather than a section payload.
    pub fn resolve(value: &'a Value, section: Section, current: &SectionConfig) -> Self {
        let payload = match value {
            Value::Array(entries) => Payload::Items(entries),
            Value::Object(root) => Self::resolve_object(value, root, section, current),
            _ => Payload::Empty,
        };
        let answer = Self { section, payload };
        debug!(
            section = %section,
            has_items = answer.items().is_some(),
            has_styles = answer.global_styles().is_some(),
            foreign = ?answer.foreign_section(),
            "Model answer resolved"
        );
        answer
    }

    fn resolve_object(
        value: &'a Value,
        root: &'a Map<String, Value>,
        section: Section,
        current: &SectionConfig,
    ) -> Payload<'a> {
        if let Some(wrapped) = get_ci(root, section.wrapper_keys()) {
            return match wrapped {
                Value::Object(inner) => Self::own_object(wrapped, inner, section, current),
                Value::Array(entries) => Payload::Items(entries),
                _ => Payload::Empty,
            };
        }

        let has_own_payload = get_ci(root, section.item_list_keys()).is_some()
            || get_ci(root, STYLE_CONTAINER_KEYS).is_some();
        if !has_own_payload {
            let foreign = Section::ALL
                .into_iter()
                .filter(|other| *other != section)
                .find(|other| get_ci(root, other.wrapper_keys()).is_some());
            if let Some(other) = foreign {
                return Payload::Foreign(other);
            }
        }

        Self::own_object(value, root, section, current)
    }

    fn own_object(
        value: &'a Value,
        map: &'a Map<String, Value>,
        section: Section,
        current: &SectionConfig,
    ) -> Payload<'a> {
        if get_ci(map, section.item_list_keys()).is_none() && names_stored_item(map, section, current) {
            debug!(section = %section, "Answer is a single item, treating it as a one-entry list");
            return Payload::Items(std::slice::from_ref(value));
        }
        Payload::Object(map)
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// The returned item list, if the answer has one under any known name.
    pub fn items(&self) -> Option<&'a [Value]> {
        match self.payload {
            Payload::Items(entries) => Some(entries),
            Payload::Object(map) => match get_ci(map, self.section.item_list_keys()) {
                Some(Value::Array(entries)) => Some(entries.as_slice()),
                _ => None,
            },
            Payload::Foreign(_) | Payload::Empty => None,
        }
    }

    /// The section-wide style container, if any.
    pub fn global_styles(&self) -> Option<&'a Map<String, Value>> {
        match self.payload {
            Payload::Object(map) => match get_ci(map, STYLE_CONTAINER_KEYS) {
                Some(Value::Object(styles)) => Some(styles),
                _ => None,
            },
            _ => None,
        }
    }

    /// Section the payload was addressed to when it was not the active one.
    pub fn foreign_section(&self) -> Option<Section> {
        match self.payload {
            Payload::Foreign(other) => Some(other),
            _ => None,
        }
    }

    /// Neither items nor section styles: nothing the merger could apply.
    pub fn is_hollow(&self) -> bool {
        self.items().is_none() && self.global_styles().is_none()
    }
}

/// Whether `map` carries the id, or the section's primary field, of a stored item.
fn names_stored_item(map: &Map<String, Value>, section: Section, current: &SectionConfig) -> bool {
    let by_id = get_ci(map, &["id"])
        .and_then(value_as_text)
        .map_or(false, |id| current.item(id.trim()).is_some());
    if by_id {
        return true;
    }

    let field = section.primary_field();
    get_ci(map, &[field.answer_keys()[0]])
        .and_then(value_as_text)
        .map_or(false, |text| {
            let text = text.trim();
            !text.is_empty()
                && current
                    .items
                    .iter()
                    .filter_map(|item| item.field(field))
                    .any(|stored| stored.trim().eq_ignore_ascii_case(text))
        })
}

/// Case-insensitive lookup. `keys` are lowercase and tried in order; an exact
/// key beats a differently-cased one. Null values count as absent.
pub fn get_ci<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .or_else(|| {
                map.iter()
                    .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
                    .map(|(_, value)| value)
            })
            .filter(|value| !value.is_null())
    })
}

/// Reads a scalar as text. Numbers are accepted because models often emit ids
/// and labels unquoted.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
