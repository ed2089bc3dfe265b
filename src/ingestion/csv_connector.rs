//! Delimited-text sources for the term and controlled-vocabulary tables

use super::connector::{TermSource, VocabularySource};
use super::ControlledVocabulary;
use crate::error::{Result, SchemaError};
use crate::term::{TermColumn, TermRow};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// `.tsv` and `.tab` files are tab-delimited, anything else is CSV.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => {
                Delimiter::Tab
            }
            _ => Delimiter::Comma,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| SchemaError::Input(format!("Failed to read {}: {}", path.display(), e)))
}

fn reader(text: &str, delimiter: Delimiter) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes())
}

/// Term table exported as delimited text.
pub struct CsvTermSource {
    source_id: String,
    text: String,
    delimiter: Delimiter,
}

impl CsvTermSource {
    pub fn new(source_id: String, text: String, delimiter: Delimiter) -> Self {
        Self {
            source_id,
            text,
            delimiter,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self::new(
            path.display().to_string(),
            read_source(path)?,
            Delimiter::for_path(path),
        ))
    }

    fn parse(&self) -> Result<Vec<TermRow>> {
        let mut rdr = reader(&self.text, self.delimiter);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| {
                SchemaError::Input(format!(
                    "Failed to read headers of {}: {}",
                    self.source_id, e
                ))
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut positions: HashMap<TermColumn, usize> = HashMap::new();
        for column in TermColumn::ALL {
            match headers.iter().position(|h| h == column.header()) {
                Some(idx) => {
                    positions.insert(column, idx);
                }
                None if column.is_required() => {
                    return Err(SchemaError::MissingColumn {
                        column: column.header().to_string(),
                        source_name: self.source_id.clone(),
                    });
                }
                None => warn!(
                    "{} has no '{}' column; treating it as missing on every row",
                    self.source_id,
                    column.header()
                ),
            }
        }

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                SchemaError::Input(format!(
                    "Failed to read record {} of {}: {}",
                    line + 1,
                    self.source_id,
                    e
                ))
            })?;

            let mut row = TermRow::default();
            for (column, idx) in &positions {
                let cell = record.get(*idx).map(|c| c.trim().to_string());
                row.set(*column, cell);
            }

            if row.local_name.is_empty() {
                if record.iter().any(|c| !c.trim().is_empty()) {
                    warn!("Skipping record {} of {}: no field name", line + 1, self.source_id);
                }
                continue;
            }
            rows.push(row);
        }

        info!("Loaded {} term rows from {}", rows.len(), self.source_id);
        Ok(rows)
    }
}

impl TermSource for CsvTermSource {
    fn load_terms(&self) -> Result<Vec<TermRow>> {
        self.parse()
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}

/// Controlled-vocabulary table in wide form: one column per field, the
/// permissible values listed down the column. Blank cells are ignored.
pub struct CsvVocabularySource {
    source_id: String,
    text: String,
    delimiter: Delimiter,
}

impl CsvVocabularySource {
    pub fn new(source_id: String, text: String, delimiter: Delimiter) -> Self {
        Self {
            source_id,
            text,
            delimiter,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self::new(
            path.display().to_string(),
            read_source(path)?,
            Delimiter::for_path(path),
        ))
    }

    fn parse(&self) -> Result<ControlledVocabulary> {
        let mut rdr = reader(&self.text, self.delimiter);

        let fields: Vec<String> = rdr
            .headers()
            .map_err(|e| {
                SchemaError::Input(format!(
                    "Failed to read headers of {}: {}",
                    self.source_id, e
                ))
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut vocabulary = ControlledVocabulary::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                SchemaError::Input(format!(
                    "Failed to read record {} of {}: {}",
                    line + 1,
                    self.source_id,
                    e
                ))
            })?;
            for (field, cell) in fields.iter().zip(record.iter()) {
                let value = cell.trim();
                if field.is_empty() || value.is_empty() {
                    continue;
                }
                vocabulary.push(field.as_str(), value);
            }
        }

        info!(
            "Loaded controlled vocabulary for {} fields from {}",
            vocabulary.len(),
            self.source_id
        );
        Ok(vocabulary)
    }
}

impl VocabularySource for CsvVocabularySource {
    fn load_vocabulary(&self) -> Result<ControlledVocabulary> {
        self.parse()
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}
