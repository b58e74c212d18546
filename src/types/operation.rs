//! GraphQL operations as sent over the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single GraphQL request.
///
/// Serialized as `{query?, variables?, operationName?, ...extra}`. Middleware
/// may add arbitrary top-level body parameters through `extra`; `context` is
/// local data for handlers and never leaves the process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(skip)]
    pub context: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Add an extra top-level body parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Set one variable, creating the variables object when missing.
    ///
    /// Non-object `variables` are replaced by an object.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        let variables = self
            .variables
            .get_or_insert_with(|| Value::Object(Map::new()));
        if !variables.is_object() {
            *variables = Value::Object(Map::new());
        }
        if let Value::Object(map) = variables {
            map.insert(name.into(), value);
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.as_ref().and_then(|v| v.get(name))
    }
}

/// A single request or an ordered batch.
///
/// The two shapes are told apart by structure only (object vs. array on the
/// wire), matching how servers accept batched GraphQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    Single(GraphQLRequest),
    Batch(Vec<GraphQLRequest>),
}

impl Operation {
    pub fn is_batched(&self) -> bool {
        matches!(self, Operation::Batch(_))
    }

    /// Number of GraphQL requests carried.
    pub fn len(&self) -> usize {
        match self {
            Operation::Single(_) => 1,
            Operation::Batch(requests) => requests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn requests(&self) -> &[GraphQLRequest] {
        match self {
            Operation::Single(request) => std::slice::from_ref(request),
            Operation::Batch(requests) => requests,
        }
    }

    pub fn requests_mut(&mut self) -> &mut [GraphQLRequest] {
        match self {
            Operation::Single(request) => std::slice::from_mut(request),
            Operation::Batch(requests) => requests,
        }
    }
}

impl From<GraphQLRequest> for Operation {
    fn from(request: GraphQLRequest) -> Self {
        Operation::Single(request)
    }
}

impl From<Vec<GraphQLRequest>> for Operation {
    fn from(requests: Vec<GraphQLRequest>) -> Self {
        Operation::Batch(requests)
    }
}
