// Process Store Port (Interface)
// Engine-internal repository: point reads plus the writes the runtime
// service needs. Implementations maintain the history-mirrors-runtime
// invariant (inserting an instance/task opens the matching historic row,
// completing/ending closes it).

use crate::domain::{
    Execution, ExecutionId, HistoricActivityInstance, Job, JobId, ProcessInstance,
    ProcessInstanceId, Task, TaskId, VariableInstance,
};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ProcessStore: Send + Sync {
    // Point reads used by the runtime service

    /// Find a process instance by ID
    async fn find_process_instance(&self, id: &ProcessInstanceId)
        -> Result<Option<ProcessInstance>>;

    /// Find the root execution of a process instance
    async fn find_root_execution(
        &self,
        process_instance_id: &ProcessInstanceId,
    ) -> Result<Option<Execution>>;

    /// Find a job by ID
    async fn find_job(&self, id: &JobId) -> Result<Option<Job>>;

    /// Find a user task by ID
    async fn find_task(&self, id: &TaskId) -> Result<Option<Task>>;

    // Runtime writes

    /// Insert a new process instance (opens the historic instance row)
    async fn insert_process_instance(&self, instance: &ProcessInstance) -> Result<()>;

    /// Insert a new execution
    async fn insert_execution(&self, execution: &Execution) -> Result<()>;

    /// Insert a new job
    async fn insert_job(&self, job: &Job) -> Result<()>;

    /// Insert a new user task (opens the historic task row)
    async fn insert_task(&self, task: &Task) -> Result<()>;

    /// Update a job's mutable fields (due date, retries, exception, suspension)
    async fn update_job(&self, job: &Job) -> Result<()>;

    /// Delete a job (successful execution)
    async fn delete_job(&self, id: &JobId) -> Result<()>;

    /// Upsert a variable by (process_instance_id, name), mirrored to history
    async fn set_variable(&self, variable: &VariableInstance) -> Result<()>;

    /// Move an execution's wait state to the given activity (None = no wait state)
    async fn update_execution_activity(
        &self,
        execution_id: &ExecutionId,
        activity_id: Option<&str>,
    ) -> Result<()>;

    /// Complete a user task: remove the runtime row, close the historic row
    async fn complete_task(&self, id: &TaskId, completed_at: i64) -> Result<()>;

    /// End a process instance: remove all runtime rows, close historic rows.
    /// Open historic tasks keep a delete reason instead of a completion time.
    async fn end_process_instance(&self, id: &ProcessInstanceId, ended_at: i64) -> Result<()>;

    // History writes

    /// Open a historic activity row
    async fn record_activity_start(&self, activity: &HistoricActivityInstance) -> Result<()>;

    /// Close the open historic activity rows for (instance, activity)
    async fn record_activity_end(
        &self,
        process_instance_id: &ProcessInstanceId,
        activity_id: &str,
        ended_at: i64,
    ) -> Result<()>;
}
