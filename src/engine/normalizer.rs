//! Canonical style keys and values, whatever casing or color names the model used.

use crate::section::{StyleMap, StyleValue};
use serde_json::Number;

/// Lowercased spellings mapped to the stored camelCase key.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("background-color", "backgroundColor"),
    ("background_color", "backgroundColor"),
    ("backgroundcolor", "backgroundColor"),
    ("background", "backgroundColor"),
    ("bgcolor", "backgroundColor"),
    ("bg-color", "backgroundColor"),
    ("text-color", "color"),
    ("textcolor", "color"),
    ("font-color", "color"),
    ("fontcolor", "color"),
    ("font-family", "fontFamily"),
    ("fontfamily", "fontFamily"),
    ("font-size", "fontSize"),
    ("fontsize", "fontSize"),
    ("font-weight", "fontWeight"),
    ("fontweight", "fontWeight"),
    ("font-style", "fontStyle"),
    ("fontstyle", "fontStyle"),
    ("box-shadow", "boxShadow"),
    ("boxshadow", "boxShadow"),
    ("border-radius", "borderRadius"),
    ("borderradius", "borderRadius"),
    ("border-color", "borderColor"),
    ("bordercolor", "borderColor"),
    ("border-width", "borderWidth"),
    ("borderwidth", "borderWidth"),
    ("text-align", "textAlign"),
    ("textalign", "textAlign"),
    ("text-decoration", "textDecoration"),
    ("textdecoration", "textDecoration"),
    ("text-transform", "textTransform"),
    ("texttransform", "textTransform"),
    ("line-height", "lineHeight"),
    ("lineheight", "lineHeight"),
    ("letter-spacing", "letterSpacing"),
    ("letterspacing", "letterSpacing"),
    ("hover-color", "hoverColor"),
    ("hovercolor", "hoverColor"),
    ("hover-background-color", "hoverBackgroundColor"),
    ("hoverbackgroundcolor", "hoverBackgroundColor"),
    ("z-index", "zIndex"),
    ("zindex", "zIndex"),
    ("grid-columns", "gridColumns"),
    ("gridcolumns", "gridColumns"),
    ("columns", "gridColumns"),
    ("section-title", "sectionTitle"),
    ("section_title", "sectionTitle"),
    ("sectiontitle", "sectionTitle"),
];

/// Keys whose canonical value is a number even when nothing is stored yet.
const NUMERIC_KEYS: &[&str] = &["gridColumns", "zIndex", "opacity", "flexGrow"];

/// CSS named colors the engine rewrites to hex.
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("purple", "#800080"),
    ("orange", "#ffa500"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("lime", "#00ff00"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("olive", "#808000"),
    ("maroon", "#800000"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
];

pub struct StyleNormalizer;

impl StyleNormalizer {
    /// Resolves a model-supplied key against the alias table, then against
    /// keys already stored in `existing`. Unknown keys pass through verbatim.
    pub fn canonical_key(raw: &str, existing: &StyleMap) -> String {
        let trimmed = raw.trim();
        let lowered = trimmed.to_lowercase();

        if let Some((_, canonical)) = KEY_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
            return canonical.to_string();
        }

        if existing.contains_key(trimmed) {
            return trimmed.to_string();
        }

        existing
            .keys()
            .find(|stored| stored.to_lowercase() == lowered)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    pub fn named_color_hex(name: &str) -> Option<&'static str> {
        let lowered = name.trim().to_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(color, _)| *color == lowered)
            .map(|(_, hex)| *hex)
    }

    pub fn is_color_key(key: &str) -> bool {
        key.to_lowercase().contains("color")
    }

    /// Normalizes one value for `key`. `stored` is what the config holds
    /// under that key today and decides numeric coercion and nested keys.
    pub fn normalize_value(key: &str, value: StyleValue, stored: Option<&StyleValue>) -> StyleValue {
        match value {
            StyleValue::Text(text) => {
                if Self::is_color_key(key) {
                    if let Some(hex) = Self::named_color_hex(&text) {
                        return StyleValue::Text(hex.to_string());
                    }
                }
                if Self::expects_number(key, stored) {
                    if let Some(number) = parse_number(&text) {
                        return StyleValue::Number(number);
                    }
                }
                StyleValue::Text(text)
            }
            StyleValue::Number(number) => {
                StyleValue::Number(match stored {
                    Some(StyleValue::Number(current)) if current.is_i64() || current.is_u64() => {
                        integral(&number).unwrap_or(number)
                    }
                    _ => number,
                })
            }
            StyleValue::Nested(map) => {
                let empty = StyleMap::new();
                let stored_map = stored.and_then(StyleValue::as_nested).unwrap_or(&empty);
                StyleValue::Nested(Self::normalize_map(map, stored_map))
            }
            other => other,
        }
    }

    /// Normalizes every entry of an incoming map against a stored one.
    pub fn normalize_map(incoming: StyleMap, existing: &StyleMap) -> StyleMap {
        incoming
            .into_iter()
            .map(|(raw_key, value)| {
                let key = Self::canonical_key(&raw_key, existing);
                let normalized = Self::normalize_value(&key, value, existing.get(&key));
                (key, normalized)
            })
            .collect()
    }

    fn expects_number(key: &str, stored: Option<&StyleValue>) -> bool {
        stored.map_or(false, StyleValue::is_number) || NUMERIC_KEYS.contains(&key)
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(integer.into());
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// `3.0` becomes `3` so it compares equal to a stored integer.
fn integral(number: &Number) -> Option<Number> {
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some((float as i64).into())
    } else {
        None
    }
}
