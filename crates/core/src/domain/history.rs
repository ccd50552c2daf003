// Historic Record Domain Models
// History mirrors runtime: rows open when the runtime entity starts and
// close (ended/completed timestamp set) when it finishes. Historic rows
// survive the end of their process instance.

use serde::{Deserialize, Serialize};

/// Historic record of a process instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricProcessInstance {
    pub id: crate::domain::ProcessInstanceId,
    pub process_definition_key: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    pub started_at: i64,
    pub ended_at: Option<i64>, // None while the instance is still running
}

/// Historic record of one activity pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricActivityInstance {
    pub id: String,
    pub activity_id: String,
    pub activity_name: Option<String>,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub execution_id: crate::domain::ExecutionId,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

/// Historic record of a user task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricTaskInstance {
    pub id: crate::domain::TaskId,
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub task_definition_key: String,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub execution_id: crate::domain::ExecutionId,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub delete_reason: Option<String>,
}

/// Historic record of a process variable (last written value per name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricVariableInstance {
    pub id: String,
    pub name: String,
    pub value: serde_json::Value,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub created_at: i64,
}
