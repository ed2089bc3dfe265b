//! Source traits for the two input tables

use super::ControlledVocabulary;
use crate::error::Result;
use crate::term::TermRow;

/// Supplies the term table. A source that cannot be read, or lacks a
/// required column, is a fatal input error.
pub trait TermSource {
    fn load_terms(&self) -> Result<Vec<TermRow>>;

    /// Human-readable identifier used in log lines and errors.
    fn source_id(&self) -> &str;
}

pub trait VocabularySource {
    fn load_vocabulary(&self) -> Result<ControlledVocabulary>;

    fn source_id(&self) -> &str;
}
