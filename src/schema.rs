//! Synthesized schema model
//!
//! Maps keep insertion order so the serialized document follows the order
//! the synthesis pass produced (sorted packages, sorted fields, sorted enums).

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeSet;

pub type ClassModel = IndexMap<String, ClassDefinition>;
pub type SlotModel = IndexMap<String, SlotDefinition>;
pub type EnumModel = IndexMap<String, EnumDefinition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementLevel {
    Required,
    Recommended,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaModel {
    pub id: String,
    pub name: String,
    pub prefixes: IndexMap<String, String>,
    pub default_prefix: String,
    pub default_range: String,
    pub imports: Vec<String>,
    pub classes: ClassModel,
    pub slots: SlotModel,
    pub enums: EnumModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassDefinition {
    /// A package assembled from the term table.
    Package { slots: Vec<String> },
    /// A class imported verbatim from the canonical schema.
    Canonical(serde_yaml::Value),
}

impl ClassDefinition {
    pub fn package_slots(&self) -> Option<&[String]> {
        match self {
            ClassDefinition::Package { slots } => Some(slots),
            ClassDefinition::Canonical(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumDefinition {
    Local {
        permissible_values: BTreeSet<String>,
    },
    Canonical(serde_yaml::Value),
}

impl EnumDefinition {
    pub fn local_values(&self) -> Option<&BTreeSet<String>> {
        match self {
            EnumDefinition::Local { permissible_values } => Some(permissible_values),
            EnumDefinition::Canonical(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub value: String,
}

/// A fact that could not be merged into the slot without losing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    OverwrittenTitle(String),
    OverwrittenComments(String),
    Ticket(String),
}

impl Annotation {
    pub fn key(&self) -> &'static str {
        match self {
            Annotation::OverwrittenTitle(_) => "overwritten_title",
            Annotation::OverwrittenComments(_) => "overwritten_comments",
            Annotation::Ticket(_) => "ticket",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Annotation::OverwrittenTitle(v)
            | Annotation::OverwrittenComments(v)
            | Annotation::Ticket(v) => v,
        }
    }
}

// Serialized as a single-key mapping, e.g. `{overwritten_title: Sample Name}`.
impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key(), self.value())?;
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conforms_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_uri: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl SlotDefinition {
    pub fn set_requirement(&mut self, level: RequirementLevel) {
        match level {
            RequirementLevel::Required => self.required = Some(true),
            RequirementLevel::Recommended => self.recommended = Some(true),
            RequirementLevel::Optional => {}
        }
    }

    pub fn requirement(&self) -> RequirementLevel {
        if self.required == Some(true) {
            RequirementLevel::Required
        } else if self.recommended == Some(true) {
            RequirementLevel::Recommended
        } else {
            RequirementLevel::Optional
        }
    }
}

impl SchemaModel {
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        self.classes
            .values()
            .filter_map(ClassDefinition::package_slots)
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_serializes_as_single_key_map() {
        let yaml = serde_yaml::to_string(&Annotation::OverwrittenTitle("Sample Name".to_string()))
            .unwrap();
        assert_eq!(yaml.trim(), "overwritten_title: Sample Name");
    }

    #[test]
    fn test_empty_slot_serializes_as_empty_map() {
        let json = serde_json::to_string(&SlotDefinition::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
