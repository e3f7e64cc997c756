use crate::section::{Item, ItemField, Section, SectionConfig, StyleMap};
use std::fmt::Write;

pub struct PromptBuilder;

impl PromptBuilder {
    const RESPONSE_RULES: &'static str = r#"Rules:
1. Change only what the request asks for. Leave every other field out of your answer.
2. Refer to existing items by their "id". Never invent new items or new ids.
3. Use lowercase field names consistent with the structure shown above ("label", "content", "link", "title", "imageUrl", "position", "styles").
4. Use camelCase style keys such as "backgroundColor", "fontFamily", "boxShadow".
5. Return nested style objects (for example "sectionTitle") as JSON objects, never as stringified values.
6. Colors may be hex (#rrggbb), rgb(), rgba(), hsl() or a color name.
7. Respond with ONLY a JSON object inside a ```json code block, shaped like:
{"items": [{"id": "<existing id>", "styles": {"<styleKey>": "<value>"}}], "styles": {"<styleKey>": "<value>"}}"#;

    /// Serializes the section state, the request and the answer format.
    pub fn build(section: Section, config: &SectionConfig, request: &str) -> String {
        let mut prompt = format!(
            "You are a website design assistant editing the {section} section of a page.\n\n"
        );

        let _ = writeln!(prompt, "Current {section} items:");
        if config.items.is_empty() {
            prompt.push_str("(none)\n");
        }
        for (index, item) in config.items.iter().enumerate() {
            Self::describe_item(&mut prompt, index + 1, item);
        }

        let _ = writeln!(prompt, "\nCurrent {section} section styles:");
        Self::describe_styles(&mut prompt, &config.styles, "- ");

        let _ = write!(
            prompt,
            "\nUser request: \"{}\"\n\n{}\n",
            request.trim(),
            Self::RESPONSE_RULES
        );

        prompt
    }

    fn describe_item(prompt: &mut String, number: usize, item: &Item) {
        let _ = write!(prompt, "{number}. id: \"{}\" | type: {}", item.id, item.kind);
        for field in ItemField::ALL {
            if let Some(value) = item.field(field) {
                let _ = write!(prompt, " | {}: \"{}\"", field.name(), value);
            }
        }
        if let Some(position) = &item.position {
            let _ = write!(prompt, " | position: {position}");
        }
        for (key, value) in &item.extra {
            let _ = write!(prompt, " | {key}: {value}");
        }
        prompt.push('\n');

        if !item.styles.is_empty() {
            prompt.push_str("   styles:\n");
            Self::describe_styles(prompt, &item.styles, "   - ");
        }
    }

    fn describe_styles(prompt: &mut String, styles: &StyleMap, bullet: &str) {
        if styles.is_empty() {
            let _ = writeln!(prompt, "{bullet}(none)");
            return;
        }
        for (key, value) in styles {
            let _ = writeln!(prompt, "{bullet}{key}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Position, StyleValue};

    fn hero() -> SectionConfig {
        let mut button = Item::new("hero-btn", "button")
            .with_field(ItemField::Content, "Shop Now")
            .with_style("backgroundColor", "#2563eb")
            .with_style("borderRadius", "8px");
        button.position = Some(Position::new(40.0, 320.0));

        let mut title = StyleMap::new();
        title.insert("color".into(), "#111827".into());
        let mut styles = StyleMap::new();
        styles.insert("backgroundColor".into(), "#f9fafb".into());
        styles.insert("sectionTitle".into(), StyleValue::Nested(title));

        SectionConfig::new(vec![button], styles)
    }

    #[test]
    fn enumerates_every_item_field_and_style() {
        let prompt = PromptBuilder::build(Section::Hero, &hero(), "make the button red");
        assert!(prompt.contains("hero section"));
        assert!(prompt.contains("id: \"hero-btn\" | type: button | content: \"Shop Now\""));
        assert!(prompt.contains("position: (40, 320)"));
        assert!(prompt.contains("backgroundColor: #2563eb"));
        assert!(prompt.contains("borderRadius: 8px"));
        assert!(prompt.contains("backgroundColor: #f9fafb"));
        assert!(prompt.contains(r##"sectionTitle: {"color":"#111827"}"##));
    }

    #[test]
    fn embeds_request_and_formatting_rules() {
        let prompt = PromptBuilder::build(Section::Hero, &hero(), "  make the button red ");
        assert!(prompt.contains("User request: \"make the button red\""));
        assert!(prompt.contains("never as stringified values"));
        assert!(prompt.contains("```json"));
    }

    #[test]
    fn empty_sections_are_marked() {
        let prompt = PromptBuilder::build(Section::Navbar, &SectionConfig::default(), "hi");
        assert!(prompt.contains("Current navbar items:\n(none)"));
        assert!(prompt.contains("Current navbar section styles:\n- (none)"));
    }
}
