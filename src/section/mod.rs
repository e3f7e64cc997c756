//! Section configuration model shared with the rendering layer.

pub mod item;
pub mod style;

pub use item::{Item, ItemField, Position};
pub use style::{StyleMap, StyleValue};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Navbar,
    Hero,
    Collection,
}

#[derive(Error, Debug)]
#[error("Unknown section: {0}")]
pub struct UnknownSection(pub String);

impl Section {
    /// Routing precedence when a snapshot has more than one populated section.
    pub const ALL: [Section; 3] = [Section::Navbar, Section::Hero, Section::Collection];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Navbar => "navbar",
            Section::Hero => "hero",
            Section::Collection => "collection",
        }
    }

    /// Field the user sees for an item of this section.
    pub fn primary_field(self) -> ItemField {
        match self {
            Section::Navbar => ItemField::Label,
            Section::Hero => ItemField::Content,
            Section::Collection => ItemField::Title,
        }
    }

    /// Lowercase keys a model may wrap this section's payload under.
    pub fn wrapper_keys(self) -> &'static [&'static str] {
        match self {
            Section::Navbar => &["navbar", "navbarconfig", "navbarsection", "nav"],
            Section::Hero => &["hero", "heroconfig", "herosection"],
            Section::Collection => &[
                "collection",
                "collectionconfig",
                "collectionsection",
                "productcollection",
            ],
        }
    }

    /// Lowercase keys a model may put this section's item list under.
    pub fn item_list_keys(self) -> &'static [&'static str] {
        match self {
            Section::Navbar => &["items", "navbaritems", "navitems", "links", "elements"],
            Section::Hero => &["items", "heroitems", "elements"],
            Section::Collection => &["items", "collectionitems", "products", "cards", "elements"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "navbar" => Ok(Section::Navbar),
            "hero" => Ok(Section::Hero),
            "collection" | "product-collection" | "products" => Ok(Section::Collection),
            other => Err(UnknownSection(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SectionConfig {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub styles: StyleMap,
}

impl SectionConfig {
    pub fn new(items: Vec<Item>, styles: StyleMap) -> Self {
        Self { items, styles }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.styles.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Copy-on-write edit: `self` is never touched, `edit` works on a fresh copy.
    pub fn patched<T>(&self, edit: impl FnOnce(&mut SectionConfig) -> T) -> (SectionConfig, T) {
        let mut draft = self.clone();
        let output = edit(&mut draft);
        (draft, output)
    }
}

/// Snapshot of every editable section as the UI holds it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MultiSectionConfig {
    #[serde(rename = "navbarConfig", default, skip_serializing_if = "Option::is_none")]
    pub navbar: Option<SectionConfig>,
    #[serde(rename = "heroConfig", default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<SectionConfig>,
    #[serde(rename = "collectionConfig", default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<SectionConfig>,
}

impl MultiSectionConfig {
    pub fn single(section: Section, config: SectionConfig) -> Self {
        let mut snapshot = Self::default();
        *snapshot.slot_mut(section) = Some(config);
        snapshot
    }

    pub fn get(&self, section: Section) -> Option<&SectionConfig> {
        match section {
            Section::Navbar => self.navbar.as_ref(),
            Section::Hero => self.hero.as_ref(),
            Section::Collection => self.collection.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, section: Section) -> &mut Option<SectionConfig> {
        match section {
            Section::Navbar => &mut self.navbar,
            Section::Hero => &mut self.hero,
            Section::Collection => &mut self.collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_parses_case_insensitively() {
        assert_eq!("Navbar".parse::<Section>().unwrap(), Section::Navbar);
        assert_eq!(" HERO ".parse::<Section>().unwrap(), Section::Hero);
        assert_eq!("products".parse::<Section>().unwrap(), Section::Collection);
        assert!("footer".parse::<Section>().is_err());
    }

    #[test]
    fn patched_leaves_original_untouched() {
        let original = SectionConfig::new(vec![Item::new("a", "link")], StyleMap::new());
        let (edited, ()) = original.patched(|draft| {
            draft.items[0].label = Some("Home".into());
        });
        assert_eq!(original.items[0].label, None);
        assert_eq!(edited.items[0].label.as_deref(), Some("Home"));
    }

    #[test]
    fn multi_section_uses_ui_field_names() {
        let snapshot: MultiSectionConfig = serde_json::from_value(json!({
            "heroConfig": {"items": [], "styles": {"backgroundColor": "#ffffff"}}
        }))
        .unwrap();
        assert!(snapshot.navbar.is_none());
        assert!(snapshot.get(Section::Hero).is_some());
    }
}
