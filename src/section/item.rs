use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::style::StyleMap;

/// One addressable element of a section: a link, a heading, a product card.
///
/// `id` is assigned by the builder when the item is created and is never
/// rewritten by the engine. Fields the engine does not model are kept in
/// `extra` so they survive a merge untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub styles: StyleMap,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canvas placement. Subfields other than `x` and `y` (layering, size) are
/// carried in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            extra: Map::new(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        for (key, value) in &self.extra {
            write!(f, ", {key}: {value}")?;
        }
        write!(f, ")")
    }
}

/// Plain-text item fields the model is allowed to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Label,
    Content,
    Link,
    Title,
    ImageUrl,
}

impl ItemField {
    pub const ALL: [ItemField; 5] = [
        ItemField::Label,
        ItemField::Content,
        ItemField::Link,
        ItemField::Title,
        ItemField::ImageUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ItemField::Label => "label",
            ItemField::Content => "content",
            ItemField::Link => "link",
            ItemField::Title => "title",
            ItemField::ImageUrl => "imageUrl",
        }
    }

    /// Lowercase keys under which a model answer may carry this field.
    pub fn answer_keys(self) -> &'static [&'static str] {
        match self {
            ItemField::Label => &["label"],
            ItemField::Content => &["content"],
            ItemField::Link => &["link", "href", "url"],
            ItemField::Title => &["title"],
            ItemField::ImageUrl => &["imageurl", "image_url", "image", "src"],
        }
    }
}

impl Item {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: None,
            content: None,
            link: None,
            title: None,
            image_url: None,
            position: None,
            styles: StyleMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, field: ItemField, value: impl Into<String>) -> Self {
        *self.field_mut(field) = Some(value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<super::StyleValue>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, field: ItemField) -> Option<&str> {
        match field {
            ItemField::Label => self.label.as_deref(),
            ItemField::Content => self.content.as_deref(),
            ItemField::Link => self.link.as_deref(),
            ItemField::Title => self.title.as_deref(),
            ItemField::ImageUrl => self.image_url.as_deref(),
        }
    }

    pub fn field_mut(&mut self, field: ItemField) -> &mut Option<String> {
        match field {
            ItemField::Label => &mut self.label,
            ItemField::Content => &mut self.content,
            ItemField::Link => &mut self.link,
            ItemField::Title => &mut self.title,
            ItemField::ImageUrl => &mut self.image_url,
        }
    }

    /// Human-facing name used in prompts and change logs.
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.content.as_deref())
            .or(self.title.as_deref())
            .unwrap_or(&self.id)
    }
}
