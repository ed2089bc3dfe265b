//! Ingestion of the term table and the controlled-vocabulary table.
//!
//! Remote spreadsheet retrieval is not handled here; sources read exported
//! delimited text and hand back fully materialized tables.

pub mod connector;
pub mod csv_connector;

pub use connector::{TermSource, VocabularySource};
pub use csv_connector::{CsvTermSource, CsvVocabularySource, Delimiter};

use std::collections::BTreeMap;

/// Field name -> permissible values as observed, repeats included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlledVocabulary {
    values: BTreeMap<String, Vec<String>>,
}

impl ControlledVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.entry(field.into()).or_default().push(value.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.values.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<F, V> FromIterator<(F, V)> for ControlledVocabulary
where
    F: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for (field, value) in iter {
            vocabulary.push(field, value);
        }
        vocabulary
    }
}
