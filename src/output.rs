//! Writers for the schema document and the unresolved-duplicates report

use crate::error::{Result, SchemaError};
use crate::schema::SchemaModel;
use crate::term::{TermColumn, TermRow};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(SchemaError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

pub fn render_schema(schema: &SchemaModel, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(schema)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(schema)?),
    }
}

pub fn write_schema(schema: &SchemaModel, format: OutputFormat, path: &Path) -> Result<()> {
    let rendered = render_schema(schema, format)?;
    std::fs::write(path, rendered)?;
    info!("Wrote schema to {}", path.display());
    Ok(())
}

/// Tab-delimited table with the term table's own column headers.
pub fn write_unresolved_report<W: Write>(rows: &[TermRow], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(TermColumn::ALL.iter().map(TermColumn::header))?;
    for row in rows {
        wtr.write_record(TermColumn::ALL.iter().map(|c| row.get(*c).unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_unresolved_report_file(rows: &[TermRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_unresolved_report(rows, file)?;
    info!("Wrote {} unresolved duplicate rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mirrors_input_columns() {
        let rows = vec![
            TermRow {
                display_name: Some("pH".to_string()),
                package_membership_raw: Some("soil; water".to_string()),
                ..TermRow::new("ph")
            },
            TermRow::new("ph"),
        ];
        let mut buf = Vec::new();
        write_unresolved_report(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Column Header\tname\tmixs_6_slot_name"));
        assert!(lines[0].ends_with("Associated Packages"));
        assert!(lines[1].starts_with("pH\tph\t"));
        assert!(lines[1].ends_with("soil; water"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
    }
}
