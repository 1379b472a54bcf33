use serde::Serialize;
use tracing::debug;

use super::index::{ControlIndex, MappingIndex};
use crate::models::{Control, CoverageMode, CoverageReport, Mapping};

/// A mapping paired with the control its target key resolved to
pub type ResolvedMapping<'a> = (&'a Mapping, &'a Control);

/// A source control with its resolved mappings into one target framework
pub type FrameworkMapping<'a> = (&'a Control, Vec<ResolvedMapping<'a>>);

/// Summary of what an engine was built from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapperStats {
    pub controls: usize,
    pub frameworks: usize,
    pub replaced_controls: usize,
    pub mappings: usize,
    pub source_keys: usize,
    pub unresolved_mappings: usize,
}

/// Query engine over indexed controls and mappings.
///
/// Queries never fail: unknown frameworks, unknown control ids and mappings
/// whose target was never loaded all produce empty or zero results.
#[derive(Clone, Debug)]
pub struct ControlMapper {
    controls: ControlIndex,
    mappings: MappingIndex,
    coverage_mode: CoverageMode,
}

impl ControlMapper {
    pub fn new<C, M>(controls: C, mappings: M) -> Self
    where
        C: IntoIterator<Item = Control>,
        M: IntoIterator<Item = Mapping>,
    {
        let mapper = Self {
            controls: ControlIndex::build(controls),
            mappings: MappingIndex::build(mappings),
            coverage_mode: CoverageMode::default(),
        };

        let stats = mapper.stats();
        debug!(
            controls = stats.controls,
            frameworks = stats.frameworks,
            replaced = stats.replaced_controls,
            mappings = stats.mappings,
            unresolved = stats.unresolved_mappings,
            "control mapper indexed"
        );

        mapper
    }

    /// Select how `get_coverage` decides that a control is mapped
    pub fn with_coverage_mode(mut self, mode: CoverageMode) -> Self {
        self.coverage_mode = mode;
        self
    }

    pub fn coverage_mode(&self) -> CoverageMode {
        self.coverage_mode
    }

    pub fn controls(&self) -> &ControlIndex {
        &self.controls
    }

    pub fn mappings(&self) -> &MappingIndex {
        &self.mappings
    }

    /// Resolve every mapping out of one control, in input order.
    ///
    /// Mappings whose target control is not loaded are skipped.
    pub fn map_control(&self, source_framework: &str, source_id: &str) -> Vec<ResolvedMapping<'_>> {
        self.mappings
            .from_source(source_framework, source_id)
            .iter()
            .filter_map(|mapping| {
                self.controls
                    .get(&mapping.target_framework, &mapping.target_id)
                    .map(|target| (mapping, target))
            })
            .collect()
    }

    /// Resolve every control of `source_framework` into `target_framework`.
    ///
    /// Controls come out in index order; those without a resolved mapping into
    /// the target framework are left out.
    pub fn map_framework(
        &self,
        source_framework: &str,
        target_framework: &str,
    ) -> Vec<FrameworkMapping<'_>> {
        self.controls
            .in_framework(source_framework)
            .filter_map(|control| {
                let mapped: Vec<ResolvedMapping<'_>> = self
                    .map_control(source_framework, &control.id)
                    .into_iter()
                    .filter(|(mapping, _)| mapping.targets_framework(target_framework))
                    .collect();

                if mapped.is_empty() {
                    None
                } else {
                    Some((control, mapped))
                }
            })
            .collect()
    }

    /// Coverage of `source_framework` by `target_framework` using the
    /// configured [`CoverageMode`]
    pub fn get_coverage(&self, source_framework: &str, target_framework: &str) -> CoverageReport {
        self.coverage_with(source_framework, target_framework, self.coverage_mode)
    }

    pub fn coverage_with(
        &self,
        source_framework: &str,
        target_framework: &str,
        mode: CoverageMode,
    ) -> CoverageReport {
        let mut total = 0;
        let mut mapped = 0;

        for control in self.controls.in_framework(source_framework) {
            total += 1;
            if self.is_mapped(control, target_framework, mode) {
                mapped += 1;
            }
        }

        CoverageReport::new(source_framework, target_framework, total, mapped)
    }

    fn is_mapped(&self, control: &Control, target_framework: &str, mode: CoverageMode) -> bool {
        let outbound = self.mappings.from_source(&control.framework, &control.id);
        match mode {
            CoverageMode::RawMappings => outbound
                .iter()
                .any(|mapping| mapping.targets_framework(target_framework)),
            CoverageMode::ResolvedTargets => outbound.iter().any(|mapping| {
                mapping.targets_framework(target_framework)
                    && self
                        .controls
                        .contains(&mapping.target_framework, &mapping.target_id)
            }),
        }
    }

    pub fn stats(&self) -> MapperStats {
        let unresolved_mappings = self
            .mappings
            .iter()
            .filter(|m| !self.controls.contains(&m.target_framework, &m.target_id))
            .count();

        MapperStats {
            controls: self.controls.len(),
            frameworks: self.controls.frameworks().len(),
            replaced_controls: self.controls.replaced(),
            mappings: self.mappings.len(),
            source_keys: self.mappings.source_keys(),
            unresolved_mappings,
        }
    }
}
