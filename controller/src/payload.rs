use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field carrying the declared request type on the wire
pub const REQUEST_TYPE_FIELD: &str = "cash_request_type";

/// A submitted field value: either a single string or a repeated field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// First scalar view of the value; an empty repeated field reads as ""
    pub fn scalar(&self) -> &str {
        match self {
            ParamValue::Single(s) => s,
            ParamValue::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

/// Ordered mapping of all fields submitted with a request
///
/// Insertion order is preserved so a payload reads back the way the client
/// sent it. Once [`extract_request_type`](Self::extract_request_type) has
/// run, the request-type field is gone; plants never see it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestPayload {
    fields: IndexMap<String, ParamValue>,
}

impl RequestPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Removes the request-type field and returns the declared type,
    /// trimmed and lower-cased.
    ///
    /// Returns `None` when the field is absent. An empty string after
    /// trimming is returned as-is; the dispatcher treats it as "no request".
    pub fn extract_request_type(&mut self) -> Option<String> {
        let value = self.fields.shift_remove(REQUEST_TYPE_FIELD)?;
        Some(value.scalar().trim().to_lowercase())
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RequestPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = RequestPayload::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}
