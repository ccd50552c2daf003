// SQLite row representations
// Booleans are stored as integers, variable values as JSON text.

use procflow_core::domain::{
    Execution, HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance, Job, ProcessInstance, Task, VariableInstance,
};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    pub id: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub process_definition_id: String,
    pub due_date: Option<i64>,
    pub priority: i64,
    pub suspended: i32, // SQLite boolean as integer
    pub retries: i32,
    pub exception_message: Option<String>,
    pub deployment_id: Option<String>,
    pub created_at: i64,
}

impl JobRow {
    pub(crate) fn into_job(self) -> Job {
        Job {
            id: self.id,
            process_instance_id: self.process_instance_id,
            execution_id: self.execution_id,
            process_definition_id: self.process_definition_id,
            due_date: self.due_date,
            priority: self.priority,
            suspended: self.suspended != 0,
            retries: self.retries,
            exception_message: self.exception_message,
            deployment_id: self.deployment_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TaskRow {
    pub id: String,
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub task_definition_key: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub due_date: Option<i64>,
    pub priority: i32,
    pub created_at: i64,
}

impl TaskRow {
    pub(crate) fn into_task(self) -> Task {
        Task {
            id: self.id,
            name: self.name,
            assignee: self.assignee,
            task_definition_key: self.task_definition_key,
            process_instance_id: self.process_instance_id,
            execution_id: self.execution_id,
            due_date: self.due_date,
            priority: self.priority,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ExecutionRow {
    pub id: String,
    pub process_instance_id: String,
    pub parent_id: Option<String>,
    pub activity_id: Option<String>,
    pub suspended: i32,
}

impl ExecutionRow {
    pub(crate) fn into_execution(self) -> Execution {
        Execution {
            id: self.id,
            process_instance_id: self.process_instance_id,
            parent_id: self.parent_id,
            activity_id: self.activity_id,
            suspended: self.suspended != 0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProcessInstanceRow {
    pub id: String,
    pub process_definition_key: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    pub started_at: i64,
    pub suspended: i32,
}

impl ProcessInstanceRow {
    pub(crate) fn into_process_instance(self) -> ProcessInstance {
        ProcessInstance {
            id: self.id,
            process_definition_key: self.process_definition_key,
            process_definition_id: self.process_definition_id,
            business_key: self.business_key,
            started_at: self.started_at,
            suspended: self.suspended != 0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VariableRow {
    pub id: String,
    pub name: String,
    pub value: String,
    pub process_instance_id: String,
    pub execution_id: String,
}

impl VariableRow {
    pub(crate) fn into_variable(self) -> VariableInstance {
        let value: serde_json::Value =
            serde_json::from_str(&self.value).unwrap_or(serde_json::Value::Null);
        VariableInstance {
            id: self.id,
            name: self.name,
            value,
            process_instance_id: self.process_instance_id,
            execution_id: self.execution_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HistoricProcessInstanceRow {
    pub id: String,
    pub process_definition_key: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

impl HistoricProcessInstanceRow {
    pub(crate) fn into_historic_process_instance(self) -> HistoricProcessInstance {
        HistoricProcessInstance {
            id: self.id,
            process_definition_key: self.process_definition_key,
            process_definition_id: self.process_definition_id,
            business_key: self.business_key,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HistoricActivityRow {
    pub id: String,
    pub activity_id: String,
    pub activity_name: Option<String>,
    pub process_instance_id: String,
    pub execution_id: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

impl HistoricActivityRow {
    pub(crate) fn into_historic_activity(self) -> HistoricActivityInstance {
        HistoricActivityInstance {
            id: self.id,
            activity_id: self.activity_id,
            activity_name: self.activity_name,
            process_instance_id: self.process_instance_id,
            execution_id: self.execution_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HistoricTaskRow {
    pub id: String,
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub task_definition_key: String,
    pub process_instance_id: String,
    pub execution_id: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub delete_reason: Option<String>,
}

impl HistoricTaskRow {
    pub(crate) fn into_historic_task(self) -> HistoricTaskInstance {
        HistoricTaskInstance {
            id: self.id,
            name: self.name,
            assignee: self.assignee,
            task_definition_key: self.task_definition_key,
            process_instance_id: self.process_instance_id,
            execution_id: self.execution_id,
            started_at: self.started_at,
            completed_at: self.completed_at,
            delete_reason: self.delete_reason,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HistoricVariableRow {
    pub id: String,
    pub name: String,
    pub value: String,
    pub process_instance_id: String,
    pub created_at: i64,
}

impl HistoricVariableRow {
    pub(crate) fn into_historic_variable(self) -> HistoricVariableInstance {
        let value: serde_json::Value =
            serde_json::from_str(&self.value).unwrap_or(serde_json::Value::Null);
        HistoricVariableInstance {
            id: self.id,
            name: self.name,
            value,
            process_instance_id: self.process_instance_id,
            created_at: self.created_at,
        }
    }
}
