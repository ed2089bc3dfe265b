//! LinkML-style YAML schema loaded into memory for lookups.

use super::{CanonicalSchema, CanonicalSlot};
use crate::error::{Result, SchemaError};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LINKML_TYPES_IMPORT: &str = "linkml:types";

/// Built-in types contributed by `linkml:types`.
const LINKML_TYPES: &[&str] = &[
    "string",
    "integer",
    "boolean",
    "float",
    "double",
    "decimal",
    "time",
    "date",
    "datetime",
    "date_or_datetime",
    "uriorcurie",
    "curie",
    "uri",
    "ncname",
    "objectidentifier",
    "nodeidentifier",
    "jsonpointer",
    "jsonpath",
    "sparqlpath",
];

#[derive(Debug, Default, Deserialize)]
struct RawSchema {
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    slots: Option<IndexMap<String, Value>>,
    #[serde(default)]
    enums: Option<IndexMap<String, Value>>,
    #[serde(default)]
    classes: Option<IndexMap<String, Value>>,
    #[serde(default)]
    types: Option<IndexMap<String, Value>>,
}

/// In-memory view over a canonical schema and its local imports.
///
/// When the same element is defined more than once, the first document
/// loaded (the root, then imports depth-first) wins.
#[derive(Debug, Clone, Default)]
pub struct YamlSchemaView {
    slots: IndexMap<String, CanonicalSlot>,
    enums: IndexMap<String, Value>,
    classes: IndexMap<String, Value>,
    types: BTreeSet<String>,
}

impl YamlSchemaView {
    /// Load a schema file, following imports that name sibling `.yaml` files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut view = Self::default();
        let mut visited = HashSet::new();
        view.load_document(path.as_ref(), &mut visited)?;
        info!(
            "Loaded canonical schema: {} slots, {} enums, {} classes, {} types",
            view.slots.len(),
            view.enums.len(),
            view.classes.len(),
            view.types.len()
        );
        Ok(view)
    }

    /// Parse a single document. Local imports are not followed.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw = Self::parse(content, "<inline>")?;
        let mut view = Self::default();
        for import in &raw.imports {
            if import != LINKML_TYPES_IMPORT {
                debug!("Ignoring import {} of inline schema", import);
            }
        }
        view.merge(raw)?;
        Ok(view)
    }

    fn load_document(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Result<()> {
        let resolved = path.canonicalize().map_err(|e| {
            SchemaError::CanonicalSchema(format!("Failed to resolve {}: {}", path.display(), e))
        })?;
        if !visited.insert(resolved.clone()) {
            return Ok(());
        }

        let content = std::fs::read_to_string(&resolved).map_err(|e| {
            SchemaError::CanonicalSchema(format!("Failed to read {}: {}", resolved.display(), e))
        })?;
        let raw = Self::parse(&content, &resolved.display().to_string())?;
        let imports = raw.imports.clone();
        self.merge(raw)?;

        let base = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        for import in imports {
            if import.contains(':') {
                debug!("Skipping non-local import {}", import);
                continue;
            }
            let import_path = base.join(format!("{}.yaml", import));
            debug!("Following import {} -> {}", import, import_path.display());
            self.load_document(&import_path, visited)?;
        }
        Ok(())
    }

    fn parse(content: &str, source_name: &str) -> Result<RawSchema> {
        serde_yaml::from_str(content).map_err(|e| {
            SchemaError::CanonicalSchema(format!("Failed to parse {}: {}", source_name, e))
        })
    }

    fn merge(&mut self, raw: RawSchema) -> Result<()> {
        if raw.imports.iter().any(|i| i == LINKML_TYPES_IMPORT) {
            self.types.extend(LINKML_TYPES.iter().map(|t| t.to_string()));
        }

        for (name, body) in raw.slots.unwrap_or_default() {
            if self.slots.contains_key(&name) {
                continue;
            }
            let slot = if body.is_null() {
                CanonicalSlot::default()
            } else {
                serde_yaml::from_value(body).map_err(|e| {
                    SchemaError::CanonicalSchema(format!("Invalid slot '{}': {}", name, e))
                })?
            };
            self.slots.insert(name, slot);
        }
        for (name, body) in raw.enums.unwrap_or_default() {
            self.enums.entry(name).or_insert(body);
        }
        for (name, body) in raw.classes.unwrap_or_default() {
            self.classes.entry(name).or_insert(body);
        }
        self.types.extend(raw.types.unwrap_or_default().into_keys());
        Ok(())
    }
}

impl CanonicalSchema for YamlSchemaView {
    fn get_slot(&self, name: &str) -> Option<&CanonicalSlot> {
        self.slots.get(name)
    }

    fn get_enum(&self, name: &str) -> Option<&Value> {
        self.enums.get(name)
    }

    fn get_class(&self, name: &str) -> Option<&Value> {
        self.classes.get(name)
    }

    fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    fn all_slot_names(&self) -> BTreeSet<String> {
        self.slots.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
id: https://example.org/mixs
name: mixs
imports:
  - linkml:types
slots:
  samp_name:
    title: Sample Name
    description: A local identifier for the sample
    comments: keep it unique
    examples:
      - value: ISDsoil1
    required: true
    range: string
  depth:
    title: depth
    comments:
      - first
      - second
    examples:
      - value: 10
    range: quantity_value
  bare_slot:
enums:
  oxy_stat_samp_enum:
    permissible_values:
      aerobic: {}
      anaerobic: {}
classes:
  quantity_value:
    description: A simple quantity
    attributes:
      has_unit: {}
"#;

    #[test]
    fn test_slot_metadata_is_parsed() {
        let view = YamlSchemaView::from_yaml_str(SCHEMA).unwrap();
        let samp = view.get_slot("samp_name").unwrap();
        assert_eq!(samp.title.as_deref(), Some("Sample Name"));
        assert_eq!(samp.comments, vec!["keep it unique".to_string()]);
        assert_eq!(samp.required, Some(true));
        assert_eq!(samp.examples[0].value_text().as_deref(), Some("ISDsoil1"));

        let depth = view.get_slot("depth").unwrap();
        assert_eq!(depth.comments.len(), 2);
        assert_eq!(depth.examples[0].value_text().as_deref(), Some("10"));
        assert!(view.has_slot("bare_slot"));
    }

    #[test]
    fn test_example_with_only_description_is_accepted() {
        let view = YamlSchemaView::from_yaml_str(
            "slots:\n  depth:\n    examples:\n      - description: a depth with no literal value\n    range: string\n",
        )
        .unwrap();
        let depth = view.get_slot("depth").unwrap();
        assert_eq!(depth.examples.len(), 1);
        assert_eq!(depth.examples[0].value_text(), None);
        assert_eq!(
            depth.examples[0].description.as_deref(),
            Some("a depth with no literal value")
        );
        assert_eq!(depth.range.as_deref(), Some("string"));
    }

    #[test]
    fn test_enum_class_and_type_lookup() {
        let view = YamlSchemaView::from_yaml_str(SCHEMA).unwrap();
        assert!(view.has_enum("oxy_stat_samp_enum"));
        assert!(view.has_class("quantity_value"));
        assert!(!view.has_enum("quantity_value"));
        assert!(view.has_type("string"));
        assert!(!view.has_type("quantity_value"));
        assert_eq!(view.all_slot_names().len(), 3);
    }

    #[test]
    fn test_invalid_document_is_error() {
        let err = YamlSchemaView::from_yaml_str("slots: [not, a, map]").unwrap_err();
        assert!(matches!(err, SchemaError::CanonicalSchema(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = YamlSchemaView::load("/nonexistent/mixs.yaml").unwrap_err();
        assert!(matches!(err, SchemaError::CanonicalSchema(_)));
    }
}
