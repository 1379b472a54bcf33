//! Assembles a [`ControlMapper`] from the datasets named in a [`MapperConfig`]

use tracing::{error, info, warn};

use crate::config::MapperConfig;
use crate::engine::ControlMapper;
use crate::loader::{load_controls, load_mappings};
use crate::models::Control;
use crate::Result;

/// Load every configured dataset and build the mapper.
///
/// A control dataset whose file is missing is skipped with a warning, and a
/// missing mappings file leaves the mapper with no mappings. Malformed files
/// are still errors.
pub fn build_mapper(config: &MapperConfig) -> Result<ControlMapper> {
    let mut controls: Vec<Control> = Vec::new();

    for dataset in &config.datasets {
        match load_controls(&dataset.path, &dataset.framework) {
            Ok(loaded) => {
                info!(
                    "Loaded {} {} controls from {}",
                    loaded.len(),
                    dataset.framework,
                    dataset.path.display()
                );
                controls.extend(loaded);
            }
            Err(e) if e.is_source_unavailable() => {
                warn!(
                    "{} controls file not found: {}",
                    dataset.framework,
                    dataset.path.display()
                );
            }
            Err(e) => return Err(e),
        }
    }

    let mappings = match load_mappings(&config.mappings_path) {
        Ok(mappings) => mappings,
        Err(e) if e.is_source_unavailable() => {
            error!("Mappings file not found: {}", config.mappings_path.display());
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    info!("Loaded {} mappings", mappings.len());

    Ok(ControlMapper::new(controls, mappings).with_coverage_mode(config.coverage_mode))
}
