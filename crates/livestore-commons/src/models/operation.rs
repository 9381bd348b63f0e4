//! Operation descriptor for a registered live query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptor for one parsed, validated query operation.
///
/// The surrounding execution engine owns parsing and validation; the store
/// only carries the descriptor so it can hand it back to the executor on
/// every re-execution. Variables are an arbitrary JSON object, matching what
/// query transports ship on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Source text of the operation.
    pub query: String,
    /// Name of the operation to run, when the document contains several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Variable values supplied by the client.
    #[serde(default = "default_variables")]
    pub variables: Value,
}

fn default_variables() -> Value {
    Value::Null
}

impl Operation {
    /// Creates an operation with no name and no variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: Value::Null,
        }
    }

    /// Sets the operation name.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Sets the variable values.
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}
