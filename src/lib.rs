pub mod canonical;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod schema;
pub mod synthesis;
pub mod term;

pub use canonical::{CanonicalSchema, CanonicalSlot, YamlSchemaView};
pub use config::SynthesisConfig;
pub use error::{Result, SchemaError};
pub use ingestion::ControlledVocabulary;
pub use schema::SchemaModel;
pub use synthesis::{SchemaSynthesizer, SynthesisOutput};
pub use term::TermRow;
