//! Synthesis configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! reproduces the stock behaviour.

use crate::error::{Result, SchemaError};
use crate::schema::RequirementLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub category_mapping: CategoryMapping,

    /// Display name of the column that identifies a record in the dataset.
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,

    /// Membership value meaning "every known package".
    #[serde(default = "default_all_packages_token")]
    pub all_packages_token: String,

    #[serde(default = "default_canonical_prefix")]
    pub canonical_prefix: PrefixConfig,

    #[serde(default = "default_local_prefix")]
    pub local_prefix: PrefixConfig,

    /// Origin tag marking a row as defined by the local authority.
    #[serde(default = "default_local_origin_tag")]
    pub local_origin_tag: String,

    #[serde(default = "default_schema_id")]
    pub schema_id: String,

    #[serde(default = "default_schema_name")]
    pub schema_name: String,

    #[serde(default = "default_range")]
    pub default_range: String,

    /// Emit one empty slot per distinct category so `is_a` references resolve.
    #[serde(default = "default_true")]
    pub emit_parent_slots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixConfig {
    pub tag: String,
    pub uri: String,
}

/// Fixed mapping from free-text category to requirement level.
///
/// A category listed in both tables classifies as required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    #[serde(default = "default_required_categories")]
    pub required: Vec<String>,

    #[serde(default)]
    pub recommended: Vec<String>,
}

impl CategoryMapping {
    pub fn classify(&self, category: Option<&str>) -> RequirementLevel {
        let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return RequirementLevel::Optional;
        };
        if self.required.iter().any(|c| c == category) {
            RequirementLevel::Required
        } else if self.recommended.iter().any(|c| c == category) {
            RequirementLevel::Recommended
        } else {
            RequirementLevel::Optional
        }
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        Self {
            required: default_required_categories(),
            recommended: Vec::new(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            category_mapping: CategoryMapping::default(),
            identifier_column: default_identifier_column(),
            all_packages_token: default_all_packages_token(),
            canonical_prefix: default_canonical_prefix(),
            local_prefix: default_local_prefix(),
            local_origin_tag: default_local_origin_tag(),
            schema_id: default_schema_id(),
            schema_name: default_schema_name(),
            default_range: default_range(),
            emit_parent_slots: true,
        }
    }
}

impl SynthesisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SchemaError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

fn default_required_categories() -> Vec<String> {
    vec![
        "sample identification".to_string(),
        "required".to_string(),
        "required where applicable".to_string(),
    ]
}

fn default_identifier_column() -> String {
    "Globally Unique ID".to_string()
}

fn default_all_packages_token() -> String {
    "all".to_string()
}

fn default_canonical_prefix() -> PrefixConfig {
    PrefixConfig {
        tag: "MIXS".to_string(),
        uri: "https://gensc.org/mixs/".to_string(),
    }
}

fn default_local_prefix() -> PrefixConfig {
    PrefixConfig {
        tag: "IoT".to_string(),
        uri: "https://www.emsl.pnnl.gov/".to_string(),
    }
}

fn default_local_origin_tag() -> String {
    "EMSL".to_string()
}

fn default_schema_id() -> String {
    "https://www.emsl.pnnl.gov/iot".to_string()
}

fn default_schema_name() -> String {
    "iot".to_string()
}

fn default_range() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: SynthesisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.identifier_column, "Globally Unique ID");
        assert_eq!(config.local_prefix.tag, "IoT");
        assert!(config.emit_parent_slots);
    }

    #[test]
    fn test_classify_categories() {
        let mapping = CategoryMapping {
            required: vec!["required".to_string()],
            recommended: vec!["required where applicable".to_string()],
        };
        assert_eq!(mapping.classify(Some("required")), RequirementLevel::Required);
        assert_eq!(
            mapping.classify(Some("required where applicable")),
            RequirementLevel::Recommended
        );
        assert_eq!(mapping.classify(Some("optional")), RequirementLevel::Optional);
        assert_eq!(mapping.classify(None), RequirementLevel::Optional);
    }

    #[test]
    fn test_default_mapping_treats_where_applicable_as_required() {
        let mapping = CategoryMapping::default();
        assert_eq!(
            mapping.classify(Some("required where applicable")),
            RequirementLevel::Required
        );
    }
}
