//! Slot metadata merging
//!
//! Canonical metadata seeds a slot when the canonical schema knows the
//! field; otherwise the local row does. Local display name and guidance then
//! override, and any canonical value they replace is kept as an annotation.

use super::diagnostics::{Diagnostic, Diagnostics};
use super::duplicates::ResolvedFieldSet;
use super::packages::NormalizedRow;
use crate::canonical::{CanonicalExample, CanonicalSchema, CanonicalSlot};
use crate::config::SynthesisConfig;
use crate::schema::{
    Annotation, ClassDefinition, ClassModel, Example, RequirementLevel, SlotDefinition, SlotModel,
};
use crate::term::{TermColumn, TermRow};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

const COMMENT_SEPARATOR: &str = "|";

pub struct SlotMerger<'c> {
    config: &'c SynthesisConfig,
    canonical: &'c dyn CanonicalSchema,
}

impl<'c> SlotMerger<'c> {
    pub fn new(config: &'c SynthesisConfig, canonical: &'c dyn CanonicalSchema) -> Self {
        Self { config, canonical }
    }

    /// One slot per field referenced by any package, in sorted field order.
    pub fn merge(&self, classes: &ClassModel, resolved: &ResolvedFieldSet<'_>) -> SlotModel {
        let by_name: HashMap<&str, &NormalizedRow<'_>> =
            resolved.rows.iter().map(|r| (r.name(), r)).collect();

        let referenced: BTreeSet<&str> = classes
            .values()
            .filter_map(ClassDefinition::package_slots)
            .flatten()
            .map(String::as_str)
            .collect();

        referenced
            .into_iter()
            .filter_map(|field| by_name.get(field).map(|r| (field, r.row)))
            .map(|(field, row)| (field.to_string(), self.merge_field(field, row)))
            .collect()
    }

    pub fn merge_field(&self, field: &str, row: &TermRow) -> SlotDefinition {
        let mut slot = match self.canonical.get_slot(field) {
            Some(canonical) => {
                debug!("{} found in canonical schema", field);
                self.seed_canonical(canonical, row)
            }
            None => self.seed_local(field, row),
        };
        self.apply_local_overrides(&mut slot, row);
        slot
    }

    fn seed_canonical(&self, canonical: &CanonicalSlot, row: &TermRow) -> SlotDefinition {
        let local_level = self.config.category_mapping.classify(row.category_text());
        let required =
            canonical.required == Some(true) || local_level == RequirementLevel::Required;
        let recommended =
            canonical.recommended == Some(true) || local_level == RequirementLevel::Recommended;

        let mut slot = SlotDefinition {
            title: canonical.title.clone(),
            description: canonical.description.clone(),
            is_a: row.category_text().map(str::to_string),
            comments: canonical.comments.clone(),
            examples: canonical
                .examples
                .iter()
                .filter_map(CanonicalExample::value_text)
                .map(|value| Example { value })
                .collect(),
            notes: canonical.notes.clone(),
            conforms_to: Some(self.config.canonical_prefix.uri.clone()),
            slot_uri: canonical.slot_uri.clone(),
            see_also: canonical.see_also.clone(),
            pattern: canonical.pattern.clone(),
            multivalued: canonical.multivalued,
            range: canonical.range.clone(),
            ..Default::default()
        };
        if required {
            slot.required = Some(true);
        } else if recommended {
            slot.recommended = Some(true);
        }
        slot
    }

    fn seed_local(&self, field: &str, row: &TermRow) -> SlotDefinition {
        let mut slot = SlotDefinition {
            description: row.text(TermColumn::Definition).map(str::to_string),
            is_a: row.category_text().map(str::to_string),
            slot_uri: Some(format!("{}:{}", self.config.local_prefix.tag, field)),
            pattern: row.text(TermColumn::SyntaxPattern).map(str::to_string),
            ..Default::default()
        };
        slot.set_requirement(self.config.category_mapping.classify(row.category_text()));

        if let Some(notes) = row.text(TermColumn::Notes) {
            slot.notes = vec![notes.to_string()];
        }
        if row.text(TermColumn::Origin) == Some(self.config.local_origin_tag.as_str()) {
            slot.conforms_to = Some(self.config.local_prefix.uri.clone());
        }
        slot
    }

    fn apply_local_overrides(&self, slot: &mut SlotDefinition, row: &TermRow) {
        if let Some(display) = row.display_text() {
            if let Some(previous) = slot.title.take().filter(|prev| prev != display) {
                slot.annotations.push(Annotation::OverwrittenTitle(previous));
            }
            slot.title = Some(display.to_string());

            if display == self.config.identifier_column {
                slot.identifier = Some(true);
            }
        }

        if let Some(guidance) = row.guidance_text() {
            if !slot.comments.is_empty() {
                slot.annotations.push(Annotation::OverwrittenComments(
                    slot.comments.join(COMMENT_SEPARATOR),
                ));
            }
            slot.comments = vec![guidance.to_string()];
        }

        if let Some(ticket) = row.ticket_text() {
            slot.annotations.push(Annotation::Ticket(ticket.to_string()));
        }

        if let Some(alias) = row.alias() {
            slot.aliases = vec![alias.to_string()];
        }
    }
}

/// Add one empty slot per distinct category in the whole term table, after
/// the field slots, so `is_a` references resolve.
pub fn add_parent_slots(slots: &mut SlotModel, rows: &[TermRow], diagnostics: &mut Diagnostics) {
    let categories: BTreeSet<&str> = rows.iter().filter_map(TermRow::category_text).collect();
    for category in categories {
        if slots.contains_key(category) {
            diagnostics.record(Diagnostic::ParentSlotShadowed {
                category: category.to_string(),
            });
            continue;
        }
        slots.insert(category.to_string(), SlotDefinition::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::YamlSchemaView;
    use crate::config::CategoryMapping;

    const CANONICAL: &str = r#"
slots:
  samp_name:
    title: Sample Name
    description: A local identifier for the sample
    comments:
      - keep it unique
      - no spaces
    examples:
      - value: ISDsoil1
    slot_uri: MIXS:0001107
    required: false
    range: string
  depth:
    title: depth
    recommended: true
    multivalued: false
    pattern: "^\\d+ m$"
    range: quantity_value
"#;

    fn canonical() -> YamlSchemaView {
        YamlSchemaView::from_yaml_str(CANONICAL).unwrap()
    }

    fn row(name: &str) -> TermRow {
        TermRow {
            category: Some(String::new()),
            ..TermRow::new(name)
        }
    }

    #[test]
    fn test_canonical_title_overwritten_with_annotation() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            display_name: Some("sample_id".to_string()),
            ..row("samp_name")
        };

        let slot = merger.merge_field("samp_name", &row);
        assert_eq!(slot.title.as_deref(), Some("sample_id"));
        assert_eq!(
            slot.annotations,
            vec![Annotation::OverwrittenTitle("Sample Name".to_string())]
        );
        assert_eq!(slot.conforms_to.as_deref(), Some("https://gensc.org/mixs/"));
        assert_eq!(slot.slot_uri.as_deref(), Some("MIXS:0001107"));
        assert_eq!(slot.examples[0].value, "ISDsoil1");
    }

    #[test]
    fn test_same_title_is_not_annotated() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            display_name: Some("depth".to_string()),
            ..row("depth")
        };

        let slot = merger.merge_field("depth", &row);
        assert!(slot.annotations.is_empty());
        assert_eq!(slot.requirement(), RequirementLevel::Recommended);
        assert_eq!(slot.pattern.as_deref(), Some("^\\d+ m$"));
        assert_eq!(slot.multivalued, Some(false));
    }

    #[test]
    fn test_guidance_replaces_canonical_comments() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            guidance: Some("use the lab barcode".to_string()),
            ticket_ref: Some("#42".to_string()),
            ..row("samp_name")
        };

        let slot = merger.merge_field("samp_name", &row);
        assert_eq!(slot.comments, vec!["use the lab barcode".to_string()]);
        assert_eq!(
            slot.annotations,
            vec![
                Annotation::OverwrittenComments("keep it unique|no spaces".to_string()),
                Annotation::Ticket("#42".to_string()),
            ]
        );
    }

    #[test]
    fn test_local_category_promotes_canonical_slot_to_required() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            category: Some("required".to_string()),
            ..row("depth")
        };

        let slot = merger.merge_field("depth", &row);
        assert_eq!(slot.required, Some(true));
        assert_eq!(slot.recommended, None);
        assert_eq!(slot.is_a.as_deref(), Some("required"));
    }

    #[test]
    fn test_recommended_category_lifts_canonical_slot() {
        let config = SynthesisConfig {
            category_mapping: CategoryMapping {
                required: vec!["required".to_string()],
                recommended: vec!["environment".to_string()],
            },
            ..SynthesisConfig::default()
        };
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            category: Some("environment".to_string()),
            ..row("samp_name")
        };

        let slot = merger.merge_field("samp_name", &row);
        assert_eq!(slot.required, None);
        assert_eq!(slot.recommended, Some(true));
        assert_eq!(slot.requirement(), RequirementLevel::Recommended);
    }

    #[test]
    fn test_canonical_examples_without_value_are_dropped() {
        let config = SynthesisConfig::default();
        let view = YamlSchemaView::from_yaml_str(
            "slots:\n  depth:\n    examples:\n      - description: no literal value\n      - value: 5 m\n",
        )
        .unwrap();
        let merger = SlotMerger::new(&config, &view);

        let slot = merger.merge_field("depth", &row("depth"));
        assert_eq!(slot.examples.len(), 1);
        assert_eq!(slot.examples[0].value, "5 m");
    }

    #[test]
    fn test_local_only_field() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            display_name: Some("Globally Unique ID".to_string()),
            definition: Some("Identifier minted by the lab".to_string()),
            category: Some("sample identification".to_string()),
            origin: Some("EMSL".to_string()),
            notes: Some("minted at intake".to_string()),
            syntax_pattern: Some(String::new()),
            ..TermRow::new("guid")
        };

        let slot = merger.merge_field("guid", &row);
        assert_eq!(slot.description.as_deref(), Some("Identifier minted by the lab"));
        assert_eq!(slot.slot_uri.as_deref(), Some("IoT:guid"));
        assert_eq!(slot.conforms_to.as_deref(), Some("https://www.emsl.pnnl.gov/"));
        assert_eq!(slot.required, Some(true));
        assert_eq!(slot.identifier, Some(true));
        assert_eq!(slot.notes, vec!["minted at intake".to_string()]);
        assert_eq!(slot.pattern, None);
        assert!(slot.annotations.is_empty());
    }

    #[test]
    fn test_alias_recorded_when_canonical_name_differs() {
        let config = SynthesisConfig::default();
        let view = canonical();
        let merger = SlotMerger::new(&config, &view);
        let row = TermRow {
            canonical_name: Some("sample_name".to_string()),
            ..row("samp_name")
        };
        let slot = merger.merge_field("samp_name", &row);
        assert_eq!(slot.aliases, vec!["sample_name".to_string()]);
    }

    #[test]
    fn test_parent_slots_follow_field_slots() {
        let rows = vec![
            TermRow {
                category: Some("required".to_string()),
                ..TermRow::new("a")
            },
            TermRow {
                category: Some("optional".to_string()),
                ..TermRow::new("b")
            },
            TermRow {
                category: Some("a".to_string()),
                ..TermRow::new("c")
            },
        ];
        let mut slots = SlotModel::new();
        slots.insert("a".to_string(), SlotDefinition::default());
        let mut diagnostics = Diagnostics::new();
        add_parent_slots(&mut slots, &rows, &mut diagnostics);

        let names: Vec<&String> = slots.keys().collect();
        assert_eq!(names, vec!["a", "optional", "required"]);
        assert_eq!(diagnostics.entries().len(), 1);
    }
}
