// Process Variable Domain Model

use serde::{Deserialize, Serialize};

/// Process Variable Instance
///
/// At most one runtime row exists per (process_instance_id, name); setting a
/// variable again replaces its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInstance {
    pub id: String,
    pub name: String,
    pub value: serde_json::Value,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub execution_id: crate::domain::ExecutionId,
}

impl VariableInstance {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: serde_json::Value,
        process_instance_id: impl Into<String>,
        execution_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            process_instance_id: process_instance_id.into(),
            execution_id: execution_id.into(),
        }
    }
}
