use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MapperError;
use crate::models::CoverageMode;
use crate::Result;

/// One control dataset and the framework label stamped onto its records
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub framework: String,
    pub path: PathBuf,
}

impl DatasetConfig {
    pub fn new(framework: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            framework: framework.into(),
            path: path.into(),
        }
    }

    /// Parse a `FRAMEWORK=PATH` pair as given on the command line
    pub fn parse_pair(pair: &str) -> Result<Self> {
        match pair.split_once('=') {
            Some((framework, path)) if !framework.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(framework.trim(), path.trim()))
            }
            _ => Err(MapperError::Config(format!(
                "expected FRAMEWORK=PATH, got '{}'",
                pair
            ))),
        }
    }
}

/// Where the mapper loads its controls and mappings from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub datasets: Vec<DatasetConfig>,
    pub mappings_path: PathBuf,
    pub coverage_mode: CoverageMode,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::with_data_dir("data")
    }
}

impl MapperConfig {
    pub fn new(datasets: Vec<DatasetConfig>, mappings_path: impl Into<PathBuf>) -> Self {
        Self {
            datasets,
            mappings_path: mappings_path.into(),
            coverage_mode: CoverageMode::default(),
        }
    }

    /// Standard NIST 800-53 / ISO 27001 / SOC 2 layout rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self::new(
            vec![
                DatasetConfig::new("NIST800-53", dir.join("nist80053_controls.csv")),
                DatasetConfig::new("ISO27001", dir.join("iso27001_controls.csv")),
                DatasetConfig::new("SOC2", dir.join("soc2_controls.csv")),
            ],
            dir.join("mappings.csv"),
        )
    }

    /// Load a JSON config file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MapperError::SourceNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Add a dataset, replacing any existing one for the same framework
    pub fn with_dataset(mut self, dataset: DatasetConfig) -> Self {
        self.datasets.retain(|d| d.framework != dataset.framework);
        self.datasets.push(dataset);
        self
    }

    pub fn with_mappings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mappings_path = path.into();
        self
    }

    pub fn with_coverage_mode(mut self, mode: CoverageMode) -> Self {
        self.coverage_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        let frameworks: Vec<&str> = config.datasets.iter().map(|d| d.framework.as_str()).collect();
        assert_eq!(frameworks, vec!["NIST800-53", "ISO27001", "SOC2"]);
        assert_eq!(
            config.datasets[0].path,
            PathBuf::from("data/nist80053_controls.csv")
        );
        assert_eq!(config.mappings_path, PathBuf::from("data/mappings.csv"));
        assert_eq!(config.coverage_mode, CoverageMode::RawMappings);
    }

    #[test]
    fn test_config_builder() {
        let config = MapperConfig::with_data_dir("/srv/controls")
            .with_dataset(DatasetConfig::new("SOC2", "/tmp/soc2.csv"))
            .with_dataset(DatasetConfig::new("PCI-DSS", "/tmp/pci.csv"))
            .with_mappings_path("/tmp/m.csv")
            .with_coverage_mode(CoverageMode::ResolvedTargets);

        assert_eq!(config.datasets.len(), 4);
        let soc2 = config.datasets.iter().find(|d| d.framework == "SOC2").unwrap();
        assert_eq!(soc2.path, PathBuf::from("/tmp/soc2.csv"));
        assert_eq!(config.mappings_path, PathBuf::from("/tmp/m.csv"));
        assert_eq!(config.coverage_mode, CoverageMode::ResolvedTargets);
    }

    #[test]
    fn test_parse_dataset_pair() {
        let dataset = DatasetConfig::parse_pair("PCI-DSS=data/pci.csv").unwrap();
        assert_eq!(dataset, DatasetConfig::new("PCI-DSS", "data/pci.csv"));

        assert!(DatasetConfig::parse_pair("data/pci.csv").is_err());
        assert!(DatasetConfig::parse_pair("=data/pci.csv").is_err());
    }

    #[test]
    fn test_json_config_partial_fields() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"mappings_path": "x/mappings.csv"}"#).unwrap();
        assert_eq!(config.mappings_path, PathBuf::from("x/mappings.csv"));
        assert_eq!(config.datasets.len(), 3);
    }
}
