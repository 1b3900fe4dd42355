//! Data source schema declaration and configuration validation

use super::diag::Diagnostics;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    List { element: Box<AttributeType> },
    ListNested { attributes: BTreeMap<String, Attribute> },
}

impl AttributeType {
    pub fn list_of(element: AttributeType) -> Self {
        AttributeType::List {
            element: Box::new(element),
        }
    }

    /// Whether a JSON value conforms to this type
    fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int64 => value.is_i64(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::List { element } => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| element.accepts(v))),
            AttributeType::ListNested { .. } => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int64 => "number",
            AttributeType::Bool => "bool",
            AttributeType::List { .. } => "list",
            AttributeType::ListNested { .. } => "list of object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(flatten)]
    pub attr_type: AttributeType,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    fn new(attr_type: AttributeType, mode: Mode) -> Self {
        Self {
            attr_type,
            mode,
            description: None,
        }
    }

    pub fn required(attr_type: AttributeType) -> Self {
        Self::new(attr_type, Mode::Required)
    }

    pub fn optional(attr_type: AttributeType) -> Self {
        Self::new(attr_type, Mode::Optional)
    }

    pub fn computed(attr_type: AttributeType) -> Self {
        Self::new(attr_type, Mode::Computed)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Set-nested configuration block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
    pub blocks: BTreeMap<String, Block>,
}

impl Schema {
    /// Check a configuration object against this schema
    pub fn validate(&self, config: &Value, diags: &mut Diagnostics) {
        let Some(obj) = config.as_object() else {
            diags.add_error(
                "Invalid Configuration",
                format!("expected a JSON object, got {}", json_kind(config)),
            );
            return;
        };

        validate_attributes(&self.attributes, obj, "", diags);

        for (name, value) in obj {
            if let Some(block) = self.blocks.get(name) {
                validate_block(name, block, value, diags);
            } else if !self.attributes.contains_key(name) {
                diags.add_error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", name),
                );
            }
        }
    }
}

fn validate_block(name: &str, block: &Block, value: &Value, diags: &mut Diagnostics) {
    let items = match value {
        Value::Null => return,
        Value::Array(items) => items,
        other => {
            diags.add_error(
                "Invalid block",
                format!("\"{}\" must be a list of blocks, got {}", name, json_kind(other)),
            );
            return;
        }
    };

    for (i, item) in items.iter().enumerate() {
        let path = format!("{}[{}].", name, i);
        let Some(obj) = item.as_object() else {
            diags.add_error(
                "Invalid block",
                format!("{} must be an object, got {}", path.trim_end_matches('.'), json_kind(item)),
            );
            continue;
        };

        validate_attributes(&block.attributes, obj, &path, diags);

        for key in obj.keys().filter(|k| !block.attributes.contains_key(*k)) {
            diags.add_error(
                "Unsupported argument",
                format!("An argument named \"{}{}\" is not expected here.", path, key),
            );
        }
    }
}

fn validate_attributes(
    attributes: &BTreeMap<String, Attribute>,
    obj: &Map<String, Value>,
    path: &str,
    diags: &mut Diagnostics,
) {
    for (name, attr) in attributes {
        let value = obj.get(name).filter(|v| !v.is_null());
        match (attr.mode, value) {
            (Mode::Required, None) => diags.add_error(
                "Missing required argument",
                format!("The argument \"{}{}\" is required, but no definition was found.", path, name),
            ),
            (Mode::Computed, Some(_)) => diags.add_error(
                "Invalid Configuration for Read-Only Attribute",
                format!("Cannot set value for \"{}{}\": it is computed.", path, name),
            ),
            (_, Some(v)) if !attr.attr_type.accepts(v) => diags.add_error(
                "Incorrect attribute value type",
                format!(
                    "Inappropriate value for \"{}{}\": {} required, got {}.",
                    path,
                    name,
                    attr.attr_type.name(),
                    json_kind(v)
                ),
            ),
            _ => {}
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
