//! Schema synthesis
//!
//! Pure batch transformation from a term table, a controlled vocabulary and
//! a canonical schema to a schema model. Stages run in a fixed order:
//! normalize packages, resolve duplicates, assemble classes, merge slots,
//! synthesize enums, reconcile ranges.

pub mod classes;
pub mod diagnostics;
pub mod duplicates;
pub mod enums;
pub mod packages;
pub mod slots;

pub use diagnostics::{
    Diagnostic, Diagnostics, KeepRule, RangeDecision, Resolution, UnresolvedReason,
};
pub use duplicates::ResolvedFieldSet;
pub use packages::{NormalizedRow, PackageMembership, PackageUniverse};
pub use slots::SlotMerger;

use crate::canonical::CanonicalSchema;
use crate::config::SynthesisConfig;
use crate::ingestion::ControlledVocabulary;
use crate::schema::SchemaModel;
use crate::term::TermRow;
use indexmap::IndexMap;
use tracing::info;

const LINKML_PREFIX: (&str, &str) = ("linkml", "https://w3id.org/linkml/");
const LINKML_TYPES_IMPORT: &str = "linkml:types";

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub schema: SchemaModel,
    /// Rows of every unresolved duplicate group, for manual curation.
    pub unresolved: Vec<TermRow>,
    pub package_universe: PackageUniverse,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct SchemaSynthesizer {
    config: SynthesisConfig,
}

impl SchemaSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        rows: &[TermRow],
        vocabulary: &ControlledVocabulary,
        canonical: &dyn CanonicalSchema,
    ) -> SynthesisOutput {
        let mut diagnostics = Diagnostics::new();

        let (normalized, universe) = packages::normalize(rows, &self.config.all_packages_token);
        info!("Package universe: {} packages", universe.len());

        let resolved = duplicates::resolve_duplicates(normalized, &mut diagnostics);
        info!(
            "{} fields after duplicate resolution, {} rows unresolved",
            resolved.rows.len(),
            resolved.unresolved.len()
        );

        let mut classes = classes::assemble_classes(&resolved, &universe);
        let mut slots = SlotMerger::new(&self.config, canonical).merge(&classes, &resolved);
        let mut enums = enums::synthesize_enums(vocabulary, &mut slots, &mut diagnostics);
        enums::reconcile_ranges(&slots, &mut enums, &mut classes, canonical, &mut diagnostics);

        if self.config.emit_parent_slots {
            slots::add_parent_slots(&mut slots, rows, &mut diagnostics);
        }

        info!(
            "Synthesized {} classes, {} slots, {} enums",
            classes.len(),
            slots.len(),
            enums.len()
        );

        let unresolved = resolved.unresolved.iter().map(|r| r.row.clone()).collect();
        SynthesisOutput {
            schema: SchemaModel {
                id: self.config.schema_id.clone(),
                name: self.config.schema_name.clone(),
                prefixes: self.prefixes(),
                default_prefix: self.config.local_prefix.tag.clone(),
                default_range: self.config.default_range.clone(),
                imports: vec![LINKML_TYPES_IMPORT.to_string()],
                classes,
                slots,
                enums,
            },
            unresolved,
            package_universe: universe,
            diagnostics: diagnostics.into_entries(),
        }
    }

    fn prefixes(&self) -> IndexMap<String, String> {
        let mut prefixes = IndexMap::new();
        prefixes.insert(LINKML_PREFIX.0.to_string(), LINKML_PREFIX.1.to_string());
        for prefix in [&self.config.canonical_prefix, &self.config.local_prefix] {
            info!("Expanding prefix {} as {}", prefix.tag, prefix.uri);
            prefixes.insert(prefix.tag.clone(), prefix.uri.clone());
        }
        prefixes
    }
}
