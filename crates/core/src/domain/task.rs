// User Task Domain Model

use serde::{Deserialize, Serialize};

/// Task ID
pub type TaskId = String;

/// User Task Entity
///
/// Human work item attached to an activity of a running process instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub task_definition_key: String, // activity the task belongs to
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub execution_id: crate::domain::ExecutionId,
    pub due_date: Option<i64>, // epoch ms
    pub priority: i32,
    pub created_at: i64, // epoch ms
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        task_definition_key: impl Into<String>,
        process_instance_id: impl Into<String>,
        execution_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            assignee: None,
            task_definition_key: task_definition_key.into(),
            process_instance_id: process_instance_id.into(),
            execution_id: execution_id.into(),
            due_date: None,
            priority: 50, // engine default
            created_at,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
