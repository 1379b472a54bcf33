use std::collections::HashMap;

use crate::models::{Control, Mapping};

/// Natural-key index over controls.
///
/// Iteration follows the order in which each `(framework, id)` key was first
/// seen. A later record with the same key replaces the earlier one in place.
#[derive(Clone, Debug, Default)]
pub struct ControlIndex {
    controls: Vec<Control>,
    slots: HashMap<String, HashMap<String, usize>>,
    replaced: usize,
}

impl ControlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<I>(controls: I) -> Self
    where
        I: IntoIterator<Item = Control>,
    {
        let mut index = Self::new();
        for control in controls {
            index.insert(control);
        }
        index
    }

    /// Insert a control, replacing any existing record with the same key
    fn insert(&mut self, control: Control) {
        let ids = self.slots.entry(control.framework.clone()).or_default();
        match ids.get(&control.id) {
            Some(&slot) => {
                self.controls[slot] = control;
                self.replaced += 1;
            }
            None => {
                ids.insert(control.id.clone(), self.controls.len());
                self.controls.push(control);
            }
        }
    }

    pub fn get(&self, framework: &str, id: &str) -> Option<&Control> {
        let slot = *self.slots.get(framework)?.get(id)?;
        self.controls.get(slot)
    }

    pub fn contains(&self, framework: &str, id: &str) -> bool {
        self.get(framework, id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    /// Controls of one framework, in index order
    pub fn in_framework<'a, 'f>(
        &'a self,
        framework: &'f str,
    ) -> impl Iterator<Item = &'a Control> + 'f
    where
        'a: 'f,
    {
        self.controls
            .iter()
            .filter(move |control| control.framework == framework)
    }

    pub fn framework_len(&self, framework: &str) -> usize {
        self.slots.get(framework).map_or(0, HashMap::len)
    }

    /// Distinct frameworks in first-seen order
    pub fn frameworks(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.slots.len());
        for control in &self.controls {
            if !seen.contains(&control.framework.as_str()) {
                seen.push(&control.framework);
            }
        }
        seen
    }

    /// Number of input records that were overwritten by a later duplicate
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

/// Mappings grouped by source key, keeping input order within each group
#[derive(Clone, Debug, Default)]
pub struct MappingIndex {
    groups: HashMap<String, HashMap<String, Vec<Mapping>>>,
    total: usize,
}

impl MappingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<I>(mappings: I) -> Self
    where
        I: IntoIterator<Item = Mapping>,
    {
        let mut index = Self::new();
        for mapping in mappings {
            index
                .groups
                .entry(mapping.source_framework.clone())
                .or_default()
                .entry(mapping.source_id.clone())
                .or_default()
                .push(mapping);
            index.total += 1;
        }
        index
    }

    /// Mappings sharing a source key; empty for unknown keys
    pub fn from_source(&self, framework: &str, id: &str) -> &[Mapping] {
        self.groups
            .get(framework)
            .and_then(|ids| ids.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.groups.values().flat_map(|ids| ids.values().flatten())
    }

    /// Number of distinct source keys
    pub fn source_keys(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
