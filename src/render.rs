//! Text and JSON rendering of query results for the command line

use serde::Serialize;
use std::fmt;

use crate::engine::{FrameworkMapping, ResolvedMapping};
use crate::models::{Control, CoverageReport, Mapping};

/// GitHub-flavoured markdown table
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    write!(f, "|")?;
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        write!(f, " {:<width$} |", cell, width = width)?;
    }
    writeln!(f)
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, &self.headers, &widths)?;

        write!(f, "|")?;
        for width in &widths {
            write!(f, "{}|", "-".repeat(width + 2))?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

/// Rows of a single-control lookup
pub fn control_table(results: &[ResolvedMapping<'_>]) -> Table {
    let mut table = Table::new(["Source", "Target", "Target Name", "Relationship"]);
    for (mapping, target) in results {
        table.push_row([
            format!("{} {}", mapping.source_framework, mapping.source_id),
            format!("{} {}", mapping.target_framework, mapping.target_id),
            target.name.clone(),
            mapping.relationship.to_string(),
        ]);
    }
    table
}

/// Rows of a framework-wide translation, one per resolved mapping
pub fn framework_table(results: &[FrameworkMapping<'_>]) -> Table {
    let mut table = Table::new(["Source", "Source Name", "Target", "Target Name", "Rel"]);
    for (control, mapped) in results {
        for (mapping, target) in mapped {
            table.push_row([
                format!("{} {}", control.framework, control.id),
                control.name.clone(),
                format!("{} {}", target.framework, target.id),
                target.name.clone(),
                mapping.relationship.to_string(),
            ]);
        }
    }
    table
}

pub fn coverage_block(report: &CoverageReport) -> String {
    format!(
        "\n=== Mapping Coverage ===\n\
         Source Framework: {}\n\
         Target Framework: {}\n\
         Total Controls: {}\n\
         Mapped Controls: {}\n\
         Coverage: {:?}%\n",
        report.source_framework,
        report.target_framework,
        report.total_controls,
        report.mapped_controls,
        report.coverage_percent
    )
}

#[derive(Debug, Serialize)]
pub struct MappedTarget<'a> {
    pub mapping: &'a Mapping,
    pub target: &'a Control,
}

#[derive(Debug, Serialize)]
pub struct MappedControl<'a> {
    pub control: &'a Control,
    pub mappings: Vec<MappedTarget<'a>>,
}

fn mapped_targets<'a>(results: &[ResolvedMapping<'a>]) -> Vec<MappedTarget<'a>> {
    results
        .iter()
        .map(|&(mapping, target)| MappedTarget { mapping, target })
        .collect()
}

pub fn control_json(results: &[ResolvedMapping<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&mapped_targets(results))
}

pub fn framework_json(results: &[FrameworkMapping<'_>]) -> serde_json::Result<String> {
    let entries: Vec<MappedControl<'_>> = results
        .iter()
        .map(|(control, mapped)| MappedControl {
            control: *control,
            mappings: mapped_targets(mapped),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

pub fn coverage_json(report: &CoverageReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ControlMapper;

    fn mapper() -> ControlMapper {
        ControlMapper::new(
            vec![
                Control::new("NIST800-53", "AC-2", "Account Mgmt", ""),
                Control::new("ISO27001", "A.9.2.1", "User access mgmt", ""),
            ],
            vec![Mapping::new("NIST800-53", "AC-2", "ISO27001", "A.9.2.1", "equivalent")],
        )
    }

    #[test]
    fn test_table_layout() {
        let mut table = Table::new(["A", "Long header"]);
        table.push_row(["value", "x"]);

        let expected = "\
| A     | Long header |
|-------|-------------|
| value | x           |
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_control_table_rows() {
        let mapper = mapper();
        let table = control_table(&mapper.map_control("NIST800-53", "AC-2"));
        assert_eq!(table.len(), 1);

        let text = table.to_string();
        assert!(text.contains("| NIST800-53 AC-2 | ISO27001 A.9.2.1 | User access mgmt | equivalent   |"));
    }

    #[test]
    fn test_framework_table_rows() {
        let mapper = mapper();
        let table = framework_table(&mapper.map_framework("NIST800-53", "ISO27001"));
        assert_eq!(table.len(), 1);
        assert!(table.to_string().contains("Account Mgmt"));

        assert!(framework_table(&mapper.map_framework("NIST800-53", "SOC2")).is_empty());
    }

    #[test]
    fn test_coverage_block() {
        let report = mapper().get_coverage("NIST800-53", "ISO27001");
        let text = coverage_block(&report);
        assert!(text.contains("Source Framework: NIST800-53"));
        assert!(text.contains("Mapped Controls: 1"));
        assert!(text.contains("Coverage: 100.0%"));

        let third = CoverageReport::new("ISO27001", "NIST800-53", 3, 1);
        assert!(coverage_block(&third).contains("Coverage: 33.33%"));
    }

    #[test]
    fn test_framework_json_shape() {
        let mapper = mapper();
        let json = framework_json(&mapper.map_framework("NIST800-53", "ISO27001")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["control"]["id"], "AC-2");
        assert_eq!(value[0]["mappings"][0]["target"]["id"], "A.9.2.1");
        assert_eq!(value[0]["mappings"][0]["mapping"]["relationship"], "equivalent");
    }
}
