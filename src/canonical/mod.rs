//! Canonical schema lookup
//!
//! The synthesis pass only needs a narrow view of the external schema:
//! "is this slot/enum/class/type defined, and what does it say".

pub mod yaml_view;

pub use yaml_view::YamlSchemaView;

use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// Slot metadata as the canonical schema declares it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CanonicalSlot {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub comments: Vec<String>,
    #[serde(default)]
    pub examples: Vec<CanonicalExample>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub notes: Vec<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub recommended: Option<bool>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub multivalued: Option<bool>,
    #[serde(default)]
    pub slot_uri: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CanonicalExample {
    #[serde(default)]
    pub value: Option<serde_yaml::Value>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CanonicalExample {
    /// `None` for examples that only carry a description.
    pub fn value_text(&self) -> Option<String> {
        self.value.as_ref().map(scalar_text)
    }
}

pub trait CanonicalSchema {
    fn get_slot(&self, name: &str) -> Option<&CanonicalSlot>;

    /// Enum definition exactly as written in the canonical source.
    fn get_enum(&self, name: &str) -> Option<&serde_yaml::Value>;

    /// Class definition exactly as written in the canonical source.
    fn get_class(&self, name: &str) -> Option<&serde_yaml::Value>;

    fn has_type(&self, name: &str) -> bool;

    fn all_slot_names(&self) -> BTreeSet<String>;

    fn has_slot(&self, name: &str) -> bool {
        self.get_slot(name).is_some()
    }

    fn has_enum(&self, name: &str) -> bool {
        self.get_enum(name).is_some()
    }

    fn has_class(&self, name: &str) -> bool {
        self.get_class(name).is_some()
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

// LinkML lets list-valued metaslots be written as a bare scalar.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<serde_yaml::Value>),
        One(serde_yaml::Value),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(values)) => values.iter().map(scalar_text).collect(),
        Some(OneOrMany::One(serde_yaml::Value::Null)) => Vec::new(),
        Some(OneOrMany::One(value)) => vec![scalar_text(&value)],
    })
}
