// Execution Domain Model

use serde::{Deserialize, Serialize};

/// Execution ID
pub type ExecutionId = String;

/// Execution Entity
///
/// A token/scope within a process instance. The root execution carries the
/// instance's wait state (`activity_id` = where the token currently waits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub parent_id: Option<ExecutionId>,
    pub activity_id: Option<String>,
    pub suspended: bool,
}

impl Execution {
    pub fn new(id: impl Into<String>, process_instance_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            process_instance_id: process_instance_id.into(),
            parent_id: None,
            activity_id: None,
            suspended: false,
        }
    }
}
