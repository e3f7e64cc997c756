//! Extraction → parse → answer resolution, end to end.

use super::*;
use crate::section::{Item, ItemField, Section, SectionConfig, StyleMap};
use serde_json::json;

fn resolve_raw(raw: &str) -> serde_json::Value {
    let candidate = ResponseExtractor::extract(raw).unwrap();
    ResponseParser::parse(candidate).unwrap()
}

#[test]
fn fenced_and_bare_answers_parse_identically() {
    let payload = r##"{"items": [{"id": "hero-btn", "styles": {"backgroundColor": "red"}}]}"##;
    let fenced = format!("Here is the update:\n```json\n{payload}\n```\nLet me know!");
    let bare = format!("Here is the update: {payload}");

    assert_eq!(resolve_raw(&fenced), resolve_raw(&bare));
}

#[test]
fn items_and_styles_resolve_under_alias_names() {
    let value = json!({
        "NavbarItems": [{"id": "nav-1"}],
        "globalStyles": {"backgroundColor": "#000000"}
    });
    let answer = ModelAnswer::resolve(&value, Section::Navbar, &SectionConfig::default());
    assert_eq!(answer.items().unwrap().len(), 1);
    assert!(answer.global_styles().unwrap().contains_key("backgroundColor"));
    assert!(!answer.is_hollow());
}

#[test]
fn wrapped_payload_for_active_section_is_unwrapped() {
    let value = json!({"heroConfig": {"items": [{"id": "a"}, {"id": "b"}], "styles": {}}});
    let answer = ModelAnswer::resolve(&value, Section::Hero, &SectionConfig::default());
    assert_eq!(answer.items().unwrap().len(), 2);
    assert!(answer.global_styles().is_some());
}

#[test]
fn collection_products_key_is_an_item_list() {
    let value = json!({"products": [{"title": "Summer"}]});
    let answer = ModelAnswer::resolve(&value, Section::Collection, &SectionConfig::default());
    assert_eq!(answer.items().unwrap().len(), 1);

    let navbar = ModelAnswer::resolve(&value, Section::Navbar, &SectionConfig::default());
    assert!(navbar.items().is_none());
}

#[test]
fn bare_array_is_treated_as_item_list() {
    let value = json!([{"id": "nav-1", "label": "Start"}]);
    let answer = ModelAnswer::resolve(&value, Section::Navbar, &SectionConfig::default());
    assert_eq!(answer.items().unwrap().len(), 1);
    assert!(answer.global_styles().is_none());
}

#[test]
fn payload_for_another_section_is_ignored() {
    let value = json!({"hero": {"styles": {"backgroundColor": "#ffffff"}}});
    let answer = ModelAnswer::resolve(&value, Section::Navbar, &SectionConfig::default());
    assert_eq!(answer.foreign_section(), Some(Section::Hero));
    assert!(answer.is_hollow());
}

#[test]
fn own_payload_wins_over_foreign_extras() {
    let value = json!({
        "styles": {"color": "#ffffff"},
        "hero": {"styles": {"color": "#000000"}}
    });
    let answer = ModelAnswer::resolve(&value, Section::Navbar, &SectionConfig::default());
    assert!(answer.foreign_section().is_none());
    assert_eq!(answer.global_styles().unwrap()["color"], json!("#ffffff"));
}

fn hero() -> SectionConfig {
    let button = Item::new("hero-btn", "button").with_field(ItemField::Content, "Shop Now");
    SectionConfig::new(vec![button], StyleMap::new())
}

#[test]
fn root_item_with_stored_id_is_an_item_list() {
    let value = json!({"id": "hero-btn", "styles": {"backgroundColor": "red"}});
    let answer = ModelAnswer::resolve(&value, Section::Hero, &hero());

    let items = answer.items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!("hero-btn"));
    assert!(answer.global_styles().is_none());
}

#[test]
fn root_item_found_by_primary_field_is_an_item_list() {
    let value = json!({"heroConfig": {"content": " shop now ", "link": "/sale"}});
    let answer = ModelAnswer::resolve(&value, Section::Hero, &hero());
    assert_eq!(answer.items().unwrap().len(), 1);
}

#[test]
fn root_styles_without_a_stored_item_stay_section_styles() {
    let value = json!({"id": "hero-missing", "styles": {"backgroundColor": "red"}});
    let answer = ModelAnswer::resolve(&value, Section::Hero, &hero());
    assert!(answer.items().is_none());
    assert!(answer.global_styles().unwrap().contains_key("backgroundColor"));
}

#[test]
fn scalar_answers_are_hollow() {
    let value = json!("just text");
    assert!(ModelAnswer::resolve(&value, Section::Hero, &SectionConfig::default()).is_hollow());
}

#[test]
fn lookups_ignore_case_and_nulls() {
    let value = json!({"LABEL": "Shop", "link": null, "Href": "/shop"});
    let map = value.as_object().unwrap();
    assert_eq!(answer::get_ci(map, &["label"]), Some(&json!("Shop")));
    assert_eq!(answer::get_ci(map, &["link", "href"]), Some(&json!("/shop")));
    assert_eq!(answer::value_as_text(&json!(42)).as_deref(), Some("42"));
}
