use crate::form::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Raw request values: field name to every submitted value, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = FormData::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}

/// Typed value of one validated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanedValue {
    Text(String),
    Integer(i64),
    Choices(Vec<String>),
    /// Optional number with no answer.
    Empty,
}

/// Validated answers keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedData(BTreeMap<String, CleanedValue>);

impl CleanedData {
    pub fn get(&self, name: &str) -> Option<&CleanedValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A form built from the schema with no request data attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<Field>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Attach request values without validating them.
    pub fn bind(self, data: FormData) -> BoundForm {
        BoundForm {
            fields: self.fields,
            data,
        }
    }
}

/// A form with request values attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundForm {
    fields: Vec<Field>,
    data: FormData,
}

impl BoundForm {
    /// Validate every field independently, in field order.
    pub fn validate(self) -> Validated {
        let mut cleaned = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            match field.clean(self.data.values(&field.name)) {
                Ok(value) => {
                    cleaned.insert(field.name.clone(), value);
                }
                Err(message) => {
                    errors.insert(field.name.clone(), message);
                }
            }
        }

        if errors.is_empty() {
            Validated::Valid(CleanedData(cleaned))
        } else {
            debug!("Form rejected with {} field error(s)", errors.len());
            Validated::Invalid(InvalidForm {
                fields: self.fields,
                data: self.data,
                errors,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    Valid(CleanedData),
    Invalid(InvalidForm),
}

/// A bound form that failed validation. Keeps the submitted values so the
/// form can be re-rendered without losing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidForm {
    fields: Vec<Field>,
    data: FormData,
    errors: BTreeMap<String, String>,
}

impl InvalidForm {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Message of the validator that rejected the field, if any.
    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}
