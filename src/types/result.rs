//! GraphQL results.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One GraphQL result object, kept exactly as the server sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchResult(Map<String, Value>);

impl FetchResult {
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    pub fn errors(&self) -> Option<&Value> {
        self.0.get("errors")
    }

    pub fn extensions(&self) -> Option<&Value> {
        self.0.get("extensions")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when the server reported at least one GraphQL error.
    pub fn has_errors(&self) -> bool {
        match self.errors() {
            Some(Value::Array(errors)) => !errors.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for FetchResult {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(Error::ResultShape {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

impl PartialEq<Value> for FetchResult {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::Object(fields) if *fields == self.0)
    }
}

/// What an invocation resolves with.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Single(FetchResult),
    Batch(Vec<FetchResult>),
}

impl FetchResponse {
    pub fn is_batched(&self) -> bool {
        matches!(self, FetchResponse::Batch(_))
    }

    pub fn into_single(self) -> Option<FetchResult> {
        match self {
            FetchResponse::Single(result) => Some(result),
            FetchResponse::Batch(_) => None,
        }
    }

    pub fn into_batch(self) -> Option<Vec<FetchResult>> {
        match self {
            FetchResponse::Batch(results) => Some(results),
            FetchResponse::Single(_) => None,
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
