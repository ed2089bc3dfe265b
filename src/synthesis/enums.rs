//! Enumeration synthesis and canonical range reconciliation

use super::diagnostics::{Diagnostic, Diagnostics, RangeDecision};
use crate::canonical::CanonicalSchema;
use crate::ingestion::ControlledVocabulary;
use crate::schema::{ClassDefinition, ClassModel, EnumDefinition, EnumModel, SlotModel};
use itertools::Itertools;
use std::collections::BTreeSet;

pub fn enum_name(field: &str) -> String {
    format!("{}_enum", field)
}

/// Values occurring more than once, sorted.
pub fn repeated_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value.clone())
        .sorted()
        .collect()
}

/// Build `<field>_enum` for every slot with controlled vocabulary and point
/// the slot's range at it. Repeated values are reported, then dropped.
pub fn synthesize_enums(
    vocabulary: &ControlledVocabulary,
    slots: &mut SlotModel,
    diagnostics: &mut Diagnostics,
) -> EnumModel {
    let mut enums = EnumModel::new();

    for field in vocabulary.fields() {
        let Some(slot) = slots.get_mut(field) else {
            diagnostics.record(Diagnostic::UnusedVocabulary {
                field: field.to_string(),
            });
            continue;
        };
        let values: Vec<String> = vocabulary
            .get(field)
            .unwrap_or_default()
            .iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .sorted()
            .collect();
        if values.is_empty() {
            continue;
        }

        let repeated = repeated_values(&values);
        if !repeated.is_empty() {
            diagnostics.record(Diagnostic::DuplicatedPermissibleValues {
                field: field.to_string(),
                values: repeated,
            });
        }

        let name = enum_name(field);
        slot.range = Some(name.clone());
        let permissible_values: BTreeSet<String> = values.into_iter().collect();
        enums.insert(name, EnumDefinition::Local { permissible_values });
    }

    enums
}

/// Decide what each distinct slot range refers to and import canonical
/// enums or classes that nothing local defines.
pub fn reconcile_ranges(
    slots: &SlotModel,
    enums: &mut EnumModel,
    classes: &mut ClassModel,
    canonical: &dyn CanonicalSchema,
    diagnostics: &mut Diagnostics,
) {
    let ranges: BTreeSet<&str> = slots
        .values()
        .filter_map(|s| s.range.as_deref())
        .filter(|r| !slots.contains_key(*r))
        .collect();

    for range in ranges {
        let decision = if enums.contains_key(range) {
            RangeDecision::LocalEnum
        } else if let Some(definition) = canonical.get_enum(range) {
            enums.insert(range.to_string(), EnumDefinition::Canonical(definition.clone()));
            RangeDecision::ImportedEnum
        } else if let Some(definition) = canonical.get_class(range) {
            if classes.contains_key(range) {
                RangeDecision::ClassNameConflict
            } else {
                classes.insert(range.to_string(), ClassDefinition::Canonical(definition.clone()));
                RangeDecision::ImportedClass
            }
        } else if canonical.has_type(range) {
            RangeDecision::PrimitiveType
        } else {
            RangeDecision::Unresolved
        };

        diagnostics.record(Diagnostic::Range {
            range: range.to_string(),
            decision,
        });
    }
}
