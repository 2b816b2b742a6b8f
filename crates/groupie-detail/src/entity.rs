//! Entity payload and field normalization.

use serde_json::{Map, Value};

/// Error building an [`Entity`].
#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    /// Payload is not valid JSON.
    #[error("invalid entity JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Payload is valid JSON but not an object.
    #[error("entity must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A schema-less record: field names to arbitrary JSON, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    /// Parse an entity from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, DetailError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Wrap an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::NotAnObject`] for anything but an object.
    pub fn from_value(value: Value) -> Result<Self, DetailError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DetailError::NotAnObject(kind_name(&other))),
        }
    }

    /// Field named exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields in payload order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a logical field name regardless of casing convention.
    ///
    /// Tries `name` verbatim, then with its first character upper-cased
    /// (`creationDate` -> `CreationDate`). Null values count as absent.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        let non_null = |v: &&Value| !v.is_null();
        self.fields
            .get(name)
            .filter(non_null)
            .or_else(|| self.fields.get(&capitalize(name)).filter(non_null))
    }

    /// The whole payload as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a value counts as "present" for scanning purposes.
///
/// Null, `false`, zero and the empty string are falsy; lists and objects
/// are always truthy, even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text for any value: strings as-is, structures as compact JSON.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
