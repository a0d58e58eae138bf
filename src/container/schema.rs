use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::SchemaError;

pub type Properties = IndexMap<String, SchemaNode>;

#[derive(Debug, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Metadata {
    pub output: Option<String>,
    pub intro: Option<String>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Schema {
    pub metadata: Metadata,
    pub properties: Properties,
}

/// One entry of the property tree.
///
/// Built leniently: malformed nodes end up as leaves with blank fields
/// instead of failing the whole schema.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct SchemaNode {
    pub kind: Option<String>,
    pub description: Option<String>,
    pub properties: Properties,
}

impl Schema {
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(mut root) = value else {
            return Err(SchemaError::NotAnObject);
        };

        let metadata = match root.remove("metadata") {
            Some(Value::Object(metadata)) => Metadata {
                output: non_empty_string(metadata.get("output")),
                intro: non_empty_string(metadata.get("intro")),
            },
            _ => Metadata::default(),
        };

        Ok(Self {
            metadata,
            properties: properties(root.remove("properties")),
        })
    }
}

impl SchemaNode {
    fn from_value(value: Value) -> Self {
        let Value::Object(mut node) = value else {
            return Self::default();
        };

        Self {
            kind: node.remove("type").map(into_text),
            description: node.remove("description").map(into_text),
            properties: properties(node.remove("properties")),
        }
    }

    /// Only `"type": "object"` nodes with at least one child are walked into.
    pub fn is_composite(&self) -> bool {
        self.kind.as_deref() == Some("object") && !self.properties.is_empty()
    }
}

fn properties(value: Option<Value>) -> Properties {
    match value {
        Some(Value::Object(map)) => from_map(map),
        _ => Properties::new(),
    }
}

fn from_map(map: Map<String, Value>) -> Properties {
    map.into_iter()
        .map(|(key, value)| (key, SchemaNode::from_value(value)))
        .collect()
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}
