//! CSV loaders for control catalogues and mapping tables
//!
//! Control files need `id` and `name` columns, with an optional
//! `description`. Mapping files need `source_framework`, `source_id`,
//! `target_framework` and `target_id`, with an optional `relationship`.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::MapperError;
use crate::models::{Control, Mapping, Relationship};
use crate::Result;

const CONTROL_COLUMNS: &[&str] = &["id", "name"];
const MAPPING_COLUMNS: &[&str] = &["source_framework", "source_id", "target_framework", "target_id"];

#[derive(Debug, Deserialize)]
struct ControlRow {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MappingRow {
    source_framework: String,
    source_id: String,
    target_framework: String,
    target_id: String,
    #[serde(default)]
    relationship: Option<String>,
}

/// Load every control in a CSV file, stamping each with `framework`
pub fn load_controls(path: impl AsRef<Path>, framework: &str) -> Result<Vec<Control>> {
    let path = path.as_ref();
    let rows: Vec<ControlRow> = read_rows(path, CONTROL_COLUMNS)?;

    let controls: Vec<Control> = rows
        .into_iter()
        .map(|row| Control {
            framework: framework.to_string(),
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
        })
        .collect();

    debug!(path = %path.display(), framework, count = controls.len(), "loaded controls");
    Ok(controls)
}

/// Load every mapping in a CSV file
pub fn load_mappings(path: impl AsRef<Path>) -> Result<Vec<Mapping>> {
    let path = path.as_ref();
    let rows: Vec<MappingRow> = read_rows(path, MAPPING_COLUMNS)?;

    let mappings: Vec<Mapping> = rows
        .into_iter()
        .map(|row| Mapping {
            source_framework: row.source_framework,
            source_id: row.source_id,
            target_framework: row.target_framework,
            target_id: row.target_id,
            relationship: Relationship::from_field(row.relationship.as_deref()),
        })
        .collect();

    let unconventional = mappings
        .iter()
        .filter(|m| !m.relationship.is_conventional())
        .count();
    debug!(
        path = %path.display(),
        count = mappings.len(),
        unconventional,
        "loaded mappings"
    );
    Ok(mappings)
}

fn open_reader(path: &Path) -> Result<Reader<File>> {
    if !path.is_file() {
        return Err(MapperError::SourceNotFound(path.to_path_buf()));
    }

    ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| MapperError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = open_reader(path)?;

    let headers = reader.headers().map_err(|source| MapperError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(missing) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(MapperError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|source| MapperError::Csv {
            path: path.to_path_buf(),
            source,
        })
}
