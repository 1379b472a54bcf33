//! Invariant checking framework for mapper correctness
//!
//! Each invariant runs a set of probe queries against a built
//! [`ControlMapper`] and reports the first probe that breaks it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::engine::ControlMapper;
use crate::models::ControlKey;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub context: HashMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, description: String) -> Self {
        Self {
            invariant: invariant.to_string(),
            description,
            context: HashMap::new(),
        }
    }

    fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Queries to run against a mapper while checking invariants
#[derive(Clone, Debug, Default)]
pub struct ProbeSet {
    pub controls: Vec<ControlKey>,
    pub framework_pairs: Vec<(String, String)>,
}

impl ProbeSet {
    /// Every loaded control and mapping source, every ordered framework pair,
    /// plus one framework and one control id that are never loaded
    pub fn exhaustive(mapper: &ControlMapper) -> Self {
        let mut controls: Vec<ControlKey> = mapper.controls().iter().map(|c| c.key()).collect();
        controls.extend(mapper.mappings().iter().map(|m| m.source_key()));
        controls.push(ControlKey::new("__unknown__", "__unknown__"));
        controls.sort();
        controls.dedup();

        let mut frameworks: Vec<String> = mapper
            .controls()
            .frameworks()
            .into_iter()
            .map(str::to_string)
            .collect();
        for mapping in mapper.mappings().iter() {
            for fw in [&mapping.source_framework, &mapping.target_framework] {
                if !frameworks.contains(fw) {
                    frameworks.push(fw.clone());
                }
            }
        }
        frameworks.push("__unknown__".to_string());

        let mut framework_pairs = Vec::with_capacity(frameworks.len() * frameworks.len());
        for source in &frameworks {
            for target in &frameworks {
                framework_pairs.push((source.clone(), target.clone()));
            }
        }

        Self {
            controls,
            framework_pairs,
        }
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    /// Name of the invariant
    fn name(&self) -> &str;

    /// Check the invariant against a mapper
    fn check(&self, mapper: &ControlMapper, probes: &ProbeSet) -> Result<(), Violation>;

    /// Human-readable description
    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    mapper: &ControlMapper,
    probes: &ProbeSet,
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(mapper, probes).err())
        .collect()
}

pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(NoDanglingTargets),
        Box::new(CoverageBounded),
        Box::new(FrameworkMatchesControl),
        Box::new(QueriesIdempotent),
    ]
}

/// Invariant: every pair from `map_control` points at a loaded control
pub struct NoDanglingTargets;

impl Invariant for NoDanglingTargets {
    fn name(&self) -> &str {
        "NoDanglingTargets"
    }

    fn description(&self) -> &str {
        "map_control only returns targets present in the control index"
    }

    fn check(&self, mapper: &ControlMapper, probes: &ProbeSet) -> Result<(), Violation> {
        for key in &probes.controls {
            for (mapping, target) in mapper.map_control(&key.framework, &key.id) {
                let indexed = mapper.controls().get(&mapping.target_framework, &mapping.target_id);
                if indexed != Some(target) {
                    return Err(Violation::new(
                        self.name(),
                        format!("{} resolved to a control outside the index", key),
                    )
                    .with_context("target", mapping.target_key()));
                }
            }
        }
        Ok(())
    }
}

/// Invariant: coverage is a percentage, and zero for empty frameworks
pub struct CoverageBounded;

impl Invariant for CoverageBounded {
    fn name(&self) -> &str {
        "CoverageBounded"
    }

    fn description(&self) -> &str {
        "coverage_percent lies in [0, 100] and is 0 when there are no source controls"
    }

    fn check(&self, mapper: &ControlMapper, probes: &ProbeSet) -> Result<(), Violation> {
        for (source, target) in &probes.framework_pairs {
            let report = mapper.get_coverage(source, target);
            let in_range = (0.0..=100.0).contains(&report.coverage_percent);
            let empty_is_zero = report.total_controls > 0 || report.coverage_percent == 0.0;
            let counts_ok = report.mapped_controls <= report.total_controls;

            if !(in_range && empty_is_zero && counts_ok) {
                return Err(Violation::new(
                    self.name(),
                    format!("coverage of {} by {} is out of bounds", source, target),
                )
                .with_context("total", report.total_controls)
                .with_context("mapped", report.mapped_controls)
                .with_context("percent", report.coverage_percent));
            }
        }
        Ok(())
    }
}

/// Invariant: `map_framework` is exactly `map_control` filtered by target framework
pub struct FrameworkMatchesControl;

impl Invariant for FrameworkMatchesControl {
    fn name(&self) -> &str {
        "FrameworkMatchesControl"
    }

    fn description(&self) -> &str {
        "map_framework lists a control iff map_control yields a pair into the target framework"
    }

    fn check(&self, mapper: &ControlMapper, probes: &ProbeSet) -> Result<(), Violation> {
        for (source, target) in &probes.framework_pairs {
            let translated = mapper.map_framework(source, target);

            let expected: Vec<(ControlKey, Vec<ControlKey>)> = mapper
                .controls()
                .in_framework(source)
                .filter_map(|control| {
                    let targets: Vec<ControlKey> = mapper
                        .map_control(source, &control.id)
                        .into_iter()
                        .filter(|(m, _)| m.target_framework == *target)
                        .map(|(_, t)| t.key())
                        .collect();
                    (!targets.is_empty()).then(|| (control.key(), targets))
                })
                .collect();

            let actual: Vec<(ControlKey, Vec<ControlKey>)> = translated
                .iter()
                .map(|(control, mapped)| {
                    (control.key(), mapped.iter().map(|(_, t)| t.key()).collect())
                })
                .collect();

            if actual != expected {
                return Err(Violation::new(
                    self.name(),
                    format!("map_framework({}, {}) disagrees with map_control", source, target),
                )
                .with_context("expected_controls", expected.len())
                .with_context("actual_controls", actual.len()));
            }
        }
        Ok(())
    }
}

/// Invariant: repeating a query gives the same answer
pub struct QueriesIdempotent;

impl Invariant for QueriesIdempotent {
    fn name(&self) -> &str {
        "QueriesIdempotent"
    }

    fn description(&self) -> &str {
        "Identical queries on the same mapper return identical results"
    }

    fn check(&self, mapper: &ControlMapper, probes: &ProbeSet) -> Result<(), Violation> {
        for key in &probes.controls {
            if mapper.map_control(&key.framework, &key.id)
                != mapper.map_control(&key.framework, &key.id)
            {
                return Err(Violation::new(
                    self.name(),
                    format!("map_control({}) changed between calls", key),
                ));
            }
        }

        for (source, target) in &probes.framework_pairs {
            if mapper.map_framework(source, target) != mapper.map_framework(source, target)
                || mapper.get_coverage(source, target) != mapper.get_coverage(source, target)
            {
                return Err(Violation::new(
                    self.name(),
                    format!("framework queries for {} -> {} changed between calls", source, target),
                ));
            }
        }
        Ok(())
    }
}
