use crate::section::{Item, Section};
use serde::Serialize;
use std::fmt;

pub const NO_CHANGES_MESSAGE: &str =
    "No changes were necessary; the section already matches your request.";

const UNSET: &str = "(unset)";

/// What a change applies to: one item, or the section as a whole.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Scope {
    Item { kind: String, display: String },
    Section { section: Section },
}

impl Scope {
    pub fn item(item: &Item) -> Self {
        Scope::Item {
            kind: item.kind.clone(),
            display: item.display_name().to_string(),
        }
    }

    pub fn section(section: Section) -> Self {
        Scope::Section { section }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Item { kind, display } => write!(f, "{kind} \"{display}\""),
            Scope::Section { section } => write!(f, "{section} section"),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub scope: Scope,
    pub field: String,
    pub old: Option<String>,
    pub new: String,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- Changed {} {} from {} to {}",
            self.scope,
            self.field,
            self.old.as_deref().unwrap_or(UNSET),
            self.new
        )
    }
}

/// Ordered record of every field the merger actually overwrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        scope: &Scope,
        field: impl Into<String>,
        old: Option<impl fmt::Display>,
        new: impl fmt::Display,
    ) {
        self.records.push(ChangeRecord {
            scope: scope.clone(),
            field: field.into(),
            old: old.map(|value| value.to_string()),
            new: new.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ChangeRecord> {
        self.records
    }

    /// The assistant reply: one line per change, or the fixed sentence.
    pub fn message(&self) -> String {
        if self.records.is_empty() {
            return NO_CHANGES_MESSAGE.to_string();
        }
        self.records
            .iter()
            .map(ChangeRecord::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::ItemField;

    #[test]
    fn formats_item_and_section_scopes() {
        let button = Item::new("hero-btn", "button").with_field(ItemField::Content, "Shop Now");
        let mut log = ChangeLog::new();
        log.record(&Scope::item(&button), "backgroundColor", Some("#2563eb"), "#ff0000");
        log.record(&Scope::section(Section::Collection), "gridColumns", Some(4), 3);

        assert_eq!(
            log.message(),
            "- Changed button \"Shop Now\" backgroundColor from #2563eb to #ff0000\n\
             - Changed collection section gridColumns from 4 to 3"
        );
    }

    #[test]
    fn absent_old_value_reads_unset() {
        let mut log = ChangeLog::new();
        log.record(&Scope::section(Section::Hero), "sectionTitle.color", None::<&str>, "#ffffff");
        assert_eq!(
            log.records()[0].to_string(),
            "- Changed hero section sectionTitle.color from (unset) to #ffffff"
        );
    }

    #[test]
    fn item_without_text_is_named_by_id() {
        let logo = Item::new("nav-logo", "image");
        assert_eq!(Scope::item(&logo).to_string(), "image \"nav-logo\"");
    }

    #[test]
    fn empty_log_uses_fixed_sentence() {
        let log = ChangeLog::new();
        assert!(log.is_empty());
        assert_eq!(log.message(), NO_CHANGES_MESSAGE);
    }
}
