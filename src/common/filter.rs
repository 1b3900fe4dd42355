//! Client-side filtering of data source results

use crate::datasource::{Attribute, AttributeType, Block};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One `filter { ... }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceFilter {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub regex: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl DataSourceFilter {
    pub fn new(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values,
            regex: false,
        }
    }

    pub fn regex(name: &str, values: Vec<String>) -> Self {
        Self {
            regex: true,
            ..Self::new(name, values)
        }
    }
}

/// Schema of the `filter` block
pub fn filters_block() -> Block {
    let mut attributes = BTreeMap::new();
    attributes.insert(
        "name".to_string(),
        Attribute::required(AttributeType::String).with_description("Attribute of the listed items to match"),
    );
    attributes.insert(
        "values".to_string(),
        Attribute::required(AttributeType::list_of(AttributeType::String))
            .with_description("Accepted values; an item matches if any value matches"),
    );
    attributes.insert(
        "regex".to_string(),
        Attribute::optional(AttributeType::Bool).with_description("Treat values as regular expressions"),
    );

    Block {
        attributes,
        description: Some("Client-side filters; an item is kept only if it matches every filter".to_string()),
    }
}

enum Matcher {
    Exact(Vec<String>),
    Regex(Vec<Regex>),
}

impl Matcher {
    fn compile(filter: &DataSourceFilter) -> Result<Self> {
        if !filter.regex {
            return Ok(Matcher::Exact(filter.values.clone()));
        }
        filter
            .values
            .iter()
            .map(|v| Regex::new(v).with_context(|| format!("invalid regex {:?} in filter {:?}", v, filter.name)))
            .collect::<Result<Vec<_>>>()
            .map(Matcher::Regex)
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(values) => values.iter().any(|v| v == value),
            Matcher::Regex(patterns) => patterns.iter().any(|re| re.is_match(value)),
        }
    }
}

/// Scalar attribute rendered for matching; unset and composite values never match
fn attribute_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reject filters that name an attribute the listed items do not have
pub fn check_filter_names(filters: &[DataSourceFilter], attributes: &BTreeMap<String, Attribute>) -> Result<()> {
    match filters.iter().find(|f| !attributes.contains_key(&f.name)) {
        Some(f) => Err(anyhow!("filter attribute {:?} does not exist", f.name)),
        None => Ok(()),
    }
}

/// Keep the models that match every filter, preserving order
pub fn filter_models<T: Serialize>(filters: &[DataSourceFilter], models: Vec<T>) -> Result<Vec<T>> {
    if filters.is_empty() {
        return Ok(models);
    }

    let matchers = filters
        .iter()
        .map(|f| Ok((f.name.as_str(), Matcher::compile(f)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut kept = Vec::with_capacity(models.len());
    for model in models {
        let value = serde_json::to_value(&model).context("failed to serialize model for filtering")?;
        let Some(obj) = value.as_object() else {
            return Err(anyhow!("filtered items must be objects"));
        };

        let mut keep = true;
        for (name, matcher) in &matchers {
            let attr = obj
                .get(*name)
                .ok_or_else(|| anyhow!("filter attribute {:?} does not exist", name))?;
            if !attribute_string(attr).is_some_and(|s| matcher.matches(&s)) {
                keep = false;
                break;
            }
        }

        if keep {
            kept.push(model);
        }
    }

    tracing::debug!("filter kept {} items", kept.len());
    Ok(kept)
}
