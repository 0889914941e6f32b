//! Resource schema declarations and configuration validation

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GiteaError, Result};

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "list(string)")]
    StringList,
}

impl AttributeType {
    /// Check whether a JSON value has this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::StringList => write!(f, "list(string)"),
        }
    }
}

/// Extra check on a configured value; returns a message on failure
pub type ValueValidator = fn(&Value) -> std::result::Result<(), String>;

fn is_false(value: &bool) -> bool {
    !*value
}

/// One attribute of a resource schema
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip)]
    pub validator: Option<ValueValidator>,
}

impl Attribute {
    fn base(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            description: String::new(),
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            validator: None,
        }
    }

    /// Attribute that must be set in configuration
    pub fn required(attr_type: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::base(attr_type)
        }
    }

    /// Attribute that may be set in configuration
    pub fn optional(attr_type: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::base(attr_type)
        }
    }

    /// Attribute filled in by the server only
    pub fn computed(attr_type: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::base(attr_type)
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Changing this attribute destroys and recreates the remote object
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate_with(mut self, validator: ValueValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Whether configuration may set this attribute
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

/// Schema of one resource type
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl ResourceSchema {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Names of attributes configuration may set, in schema order
    pub fn configurable_names(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.is_configurable())
            .map(|(name, _)| name.as_str())
    }

    /// True if any of the named attributes forces replacement
    pub fn requires_replace<'a>(&self, changed: impl IntoIterator<Item = &'a str>) -> bool {
        changed
            .into_iter()
            .any(|name| self.get(name).is_some_and(|a| a.force_new))
    }

    /// True if the attribute is marked sensitive
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.get(name).is_some_and(|a| a.sensitive)
    }

    /// Validate a configuration map and fill in defaults.
    ///
    /// Null values count as unset. All problems are reported together.
    pub fn validate_config(&self, config: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut problems = Vec::new();
        let mut validated = Map::new();

        for (name, value) in config {
            let Some(attribute) = self.get(name) else {
                problems.push(format!("unsupported attribute '{}'", name));
                continue;
            };
            if value.is_null() {
                continue;
            }
            if !attribute.is_configurable() {
                problems.push(format!(
                    "attribute '{}' is computed and cannot be set",
                    name
                ));
                continue;
            }
            if !attribute.attr_type.accepts(value) {
                problems.push(format!(
                    "attribute '{}' must be of type {}",
                    name, attribute.attr_type
                ));
                continue;
            }
            if let Some(validator) = attribute.validator {
                if let Err(msg) = validator(value) {
                    problems.push(format!("attribute '{}': {}", name, msg));
                    continue;
                }
            }
            validated.insert(name.clone(), value.clone());
        }

        for (name, attribute) in &self.attributes {
            if validated.contains_key(name) {
                continue;
            }
            if attribute.required && !config.get(name).is_some_and(|v| !v.is_null()) {
                problems.push(format!("missing required attribute '{}'", name));
            } else if let Some(default) = &attribute.default {
                validated.insert(name.clone(), default.clone());
            }
        }

        if problems.is_empty() {
            Ok(validated)
        } else {
            Err(GiteaError::Validation(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_spaces(value: &Value) -> std::result::Result<(), String> {
        match value.as_str() {
            Some(s) if s.contains(' ') => Err("must not contain spaces".to_string()),
            _ => Ok(()),
        }
    }

    fn test_schema() -> ResourceSchema {
        ResourceSchema::new("test resource")
            .attribute(
                "name",
                Attribute::required(AttributeType::String)
                    .force_new()
                    .validate_with(no_spaces),
            )
            .attribute(
                "interval",
                Attribute::optional(AttributeType::String).default_value("8h0m0s"),
            )
            .attribute("enabled", Attribute::optional(AttributeType::Bool))
            .attribute("tags", Attribute::optional(AttributeType::StringList))
            .attribute(
                "secret",
                Attribute::computed(AttributeType::String).sensitive(),
            )
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validate_applies_defaults() {
        let validated = test_schema()
            .validate_config(&as_map(json!({"name": "a"})))
            .unwrap();
        assert_eq!(validated["name"], "a");
        assert_eq!(validated["interval"], "8h0m0s");
        assert!(!validated.contains_key("enabled"));
    }

    #[test]
    fn test_validate_null_counts_as_unset() {
        let validated = test_schema()
            .validate_config(&as_map(json!({"name": "a", "interval": null})))
            .unwrap();
        assert_eq!(validated["interval"], "8h0m0s");

        let err = test_schema()
            .validate_config(&as_map(json!({"name": null})))
            .unwrap_err();
        assert!(err.to_string().contains("missing required attribute 'name'"));
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let err = test_schema()
            .validate_config(&as_map(json!({
                "enabled": "yes",
                "bogus": 1,
                "secret": "x",
                "tags": ["ok", 2]
            })))
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing required attribute 'name'"));
        assert!(err.contains("'enabled' must be of type bool"));
        assert!(err.contains("unsupported attribute 'bogus'"));
        assert!(err.contains("'secret' is computed"));
        assert!(err.contains("'tags' must be of type list(string)"));
    }

    #[test]
    fn test_validate_runs_custom_validator() {
        let err = test_schema()
            .validate_config(&as_map(json!({"name": "has space"})))
            .unwrap_err();
        assert!(err.to_string().contains("must not contain spaces"));
    }

    #[test]
    fn test_requires_replace() {
        let schema = test_schema();
        assert!(schema.requires_replace(["name"]));
        assert!(schema.requires_replace(["interval", "name"]));
        assert!(!schema.requires_replace(["interval", "enabled"]));
        assert!(!schema.requires_replace(["unknown"]));
    }

    #[test]
    fn test_configurable_names_skip_computed() {
        let schema = test_schema();
        let names: Vec<&str> = schema.configurable_names().collect();
        assert_eq!(names, vec!["enabled", "interval", "name", "tags"]);
        assert!(schema.is_sensitive("secret"));
        assert!(!schema.is_sensitive("name"));
    }

    #[test]
    fn test_schema_serializes_flags() {
        let json = serde_json::to_value(test_schema()).unwrap();
        assert_eq!(json["attributes"]["name"]["type"], "string");
        assert_eq!(json["attributes"]["name"]["force_new"], true);
        assert!(json["attributes"]["name"].get("optional").is_none());
        assert_eq!(json["attributes"]["tags"]["type"], "list(string)");
        assert_eq!(json["attributes"]["interval"]["default"], "8h0m0s");
    }
}
