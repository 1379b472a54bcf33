use serde::{Deserialize, Serialize};

/// Criterion deciding whether a source control counts as mapped
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Any outbound mapping to the target framework counts, resolvable or not
    #[default]
    RawMappings,
    /// Only mappings whose target control exists count
    ResolvedTargets,
}

/// Coverage statistics of one framework against another
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub source_framework: String,
    pub target_framework: String,
    pub total_controls: usize,
    pub mapped_controls: usize,
    pub coverage_percent: f64,
}

impl CoverageReport {
    pub fn new(
        source_framework: impl Into<String>,
        target_framework: impl Into<String>,
        total_controls: usize,
        mapped_controls: usize,
    ) -> Self {
        let coverage_percent = if total_controls > 0 {
            round_percent(mapped_controls as f64 / total_controls as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            source_framework: source_framework.into(),
            target_framework: target_framework.into(),
            total_controls,
            mapped_controls,
            coverage_percent,
        }
    }

    pub fn unmapped_controls(&self) -> usize {
        self.total_controls.saturating_sub(self.mapped_controls)
    }
}

/// Round to two decimal places, ties to even
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_has_zero_coverage() {
        let report = CoverageReport::new("SOC2", "ISO27001", 0, 0);
        assert_eq!(report.coverage_percent, 0.0);
        assert_eq!(report.unmapped_controls(), 0);
    }

    #[test]
    fn test_coverage_rounding() {
        let report = CoverageReport::new("NIST800-53", "ISO27001", 3, 1);
        assert_eq!(report.coverage_percent, 33.33);

        let report = CoverageReport::new("NIST800-53", "ISO27001", 3, 2);
        assert_eq!(report.coverage_percent, 66.67);
        assert_eq!(report.unmapped_controls(), 1);
    }

    #[test]
    fn test_coverage_rounds_ties_to_even() {
        // 3.125 and 9.375 are exact halves at the second decimal
        assert_eq!(CoverageReport::new("NIST800-53", "ISO27001", 32, 1).coverage_percent, 3.12);
        assert_eq!(CoverageReport::new("NIST800-53", "ISO27001", 32, 3).coverage_percent, 9.38);
        assert_eq!(round_percent(0.125), 0.12);
    }

    #[test]
    fn test_coverage_mode_default() {
        assert_eq!(CoverageMode::default(), CoverageMode::RawMappings);
        let mode: CoverageMode = serde_json::from_str("\"resolved_targets\"").unwrap();
        assert_eq!(mode, CoverageMode::ResolvedTargets);
    }
}
