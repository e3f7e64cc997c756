use crate::section::{MultiSectionConfig, Section, SectionConfig};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("No section is selected for editing")]
    NoActiveSection,
}

pub struct SectionRouter;

impl SectionRouter {
    /// Picks the one section the UI currently has open.
    ///
    /// By UI convention only one slot is populated. If several are, the first
    /// in `Section::ALL` order wins.
    pub fn route(snapshot: &MultiSectionConfig) -> Result<(Section, &SectionConfig), RouteError> {
        let mut populated = Section::ALL.into_iter().filter_map(|section| {
            snapshot
                .get(section)
                .filter(|config| !config.is_empty())
                .map(|config| (section, config))
        });

        let (section, config) = populated.next().ok_or(RouteError::NoActiveSection)?;

        let others: Vec<Section> = populated.map(|(other, _)| other).collect();
        if !others.is_empty() {
            warn!(active = %section, ignored = ?others, "More than one section populated");
        }

        debug!(section = %section, items = config.items.len(), "Active section resolved");
        Ok((section, config))
    }
}
