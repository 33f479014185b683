//! Explicit registration of console sections, handed to the router at startup.

use std::collections::BTreeMap;

use anyhow::{bail, Error};

use crate::section::SectionDescriptor;

#[derive(Default)]
pub struct SectionRegistry {
    sections: BTreeMap<&'static str, SectionDescriptor>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section. Ids have to be unique.
    pub fn register(&mut self, section: SectionDescriptor) -> Result<(), Error> {
        if self.sections.contains_key(section.id) {
            bail!("section '{}' is already registered", section.id);
        }
        log::debug!("registering section '{}'", section.id);
        self.sections.insert(section.id, section);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections.values()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
