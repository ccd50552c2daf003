// Runtime Service - drives engine-side state
// Stands in for the engine proper: validates requests, generates ids and
// timestamps via providers, orchestrates the ProcessStore. Used by test
// suites to bring process state into the shape they want to assert on.

use crate::domain::{
    Execution, HistoricActivityInstance, Job, ProcessInstance, Task, VariableInstance,
};
use crate::error::Result;
use crate::port::{IdProvider, ProcessStore, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Start a new process instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInstanceRequest {
    pub process_definition_key: String,

    #[serde(default)]
    pub business_key: Option<String>,
}

/// Create a job attached to a running instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub process_instance_id: String,

    /// Execution to attach to; None = the instance's root execution
    #[serde(default)]
    pub execution_id: Option<String>,

    #[serde(default)]
    pub due_date: Option<i64>,

    #[serde(default)]
    pub retries: Option<i32>,

    #[serde(default)]
    pub deployment_id: Option<String>,
}

/// Create a user task attached to a running instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub process_instance_id: String,
    pub task_definition_key: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub assignee: Option<String>,

    #[serde(default)]
    pub due_date: Option<i64>,
}

pub struct RuntimeService {
    store: Arc<dyn ProcessStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl RuntimeService {
    pub fn new(
        store: Arc<dyn ProcessStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
        }
    }

    /// Start a process instance: runtime row, root execution, open history
    pub async fn start_instance(&self, req: StartInstanceRequest) -> Result<ProcessInstance> {
        validate_non_empty("process_definition_key", &req.process_definition_key)?;

        let now = self.time_provider.now_millis();
        let definition_id = format!("{}:1", req.process_definition_key);

        let mut instance = ProcessInstance::new(
            self.id_provider.generate_id(),
            now,
            &req.process_definition_key,
            &definition_id,
        );
        if let Some(business_key) = req.business_key {
            instance = instance.with_business_key(business_key);
        }
        self.store.insert_process_instance(&instance).await?;

        let execution = Execution::new(self.id_provider.generate_id(), &instance.id);
        self.store.insert_execution(&execution).await?;

        info!(
            process_instance_id = %instance.id,
            definition_key = %instance.process_definition_key,
            "Started process instance"
        );
        Ok(instance)
    }

    /// Create a job for a running instance
    pub async fn create_job(&self, req: CreateJobRequest) -> Result<Job> {
        let instance = self.require_instance(&req.process_instance_id).await?;
        let execution_id = match req.execution_id {
            Some(id) => id,
            None => self.require_root_execution(&instance.id).await?.id,
        };
        if let Some(retries) = req.retries {
            if retries < 0 {
                return Err(crate::domain::DomainError::InvalidRetries(retries).into());
            }
        }

        let mut job = Job::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            &instance.id,
            &execution_id,
            &instance.process_definition_id,
        );
        job.due_date = req.due_date;
        if let Some(retries) = req.retries {
            job.retries = retries;
        }
        job.deployment_id = req.deployment_id;

        self.store.insert_job(&job).await?;
        debug!(job_id = %job.id, process_instance_id = %job.process_instance_id, "Created job");
        Ok(job)
    }

    /// Create a user task; opens the matching historic activity and moves the
    /// root execution's wait state onto the task's activity
    pub async fn create_user_task(&self, req: CreateTaskRequest) -> Result<Task> {
        validate_non_empty("task_definition_key", &req.task_definition_key)?;
        let instance = self.require_instance(&req.process_instance_id).await?;
        let execution = self.require_root_execution(&instance.id).await?;

        let now = self.time_provider.now_millis();
        let mut task = Task::new(
            self.id_provider.generate_id(),
            now,
            &req.task_definition_key,
            &instance.id,
            &execution.id,
        );
        task.name = req.name;
        task.assignee = req.assignee;
        task.due_date = req.due_date;

        self.store.insert_task(&task).await?;
        self.store
            .update_execution_activity(&execution.id, Some(&req.task_definition_key))
            .await?;
        let activity = HistoricActivityInstance {
            id: self.id_provider.generate_id(),
            activity_id: req.task_definition_key.clone(),
            activity_name: task.name.clone(),
            process_instance_id: instance.id.clone(),
            execution_id: execution.id.clone(),
            started_at: now,
            ended_at: None,
        };
        self.store.record_activity_start(&activity).await?;

        debug!(task_id = %task.id, process_instance_id = %task.process_instance_id, "Created user task");
        Ok(task)
    }

    /// Set a process variable (upsert by name, mirrored to history)
    pub async fn set_variable(
        &self,
        process_instance_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        validate_non_empty("name", name)?;
        let instance = self.require_instance(process_instance_id).await?;
        let execution = self.require_root_execution(&instance.id).await?;

        let variable = VariableInstance::new(
            self.id_provider.generate_id(),
            name,
            value,
            &instance.id,
            &execution.id,
        );
        self.store.set_variable(&variable).await?;
        debug!(process_instance_id = %instance.id, name = %name, "Set variable");
        Ok(())
    }

    /// Move the instance's wait state onto an activity, opening its historic row
    pub async fn enter_activity(
        &self,
        process_instance_id: &str,
        activity_id: &str,
    ) -> Result<HistoricActivityInstance> {
        validate_non_empty("activity_id", activity_id)?;
        let instance = self.require_instance(process_instance_id).await?;
        let execution = self.require_root_execution(&instance.id).await?;

        self.store
            .update_execution_activity(&execution.id, Some(activity_id))
            .await?;
        let activity = HistoricActivityInstance {
            id: self.id_provider.generate_id(),
            activity_id: activity_id.to_string(),
            activity_name: None,
            process_instance_id: instance.id.clone(),
            execution_id: execution.id.clone(),
            started_at: self.time_provider.now_millis(),
            ended_at: None,
        };
        self.store.record_activity_start(&activity).await?;
        Ok(activity)
    }

    /// Leave an activity: clear the wait state, close its historic rows
    pub async fn complete_activity(
        &self,
        process_instance_id: &str,
        activity_id: &str,
    ) -> Result<()> {
        let instance = self.require_instance(process_instance_id).await?;
        let execution = self.require_root_execution(&instance.id).await?;

        self.store
            .update_execution_activity(&execution.id, None)
            .await?;
        self.store
            .record_activity_end(&instance.id, activity_id, self.time_provider.now_millis())
            .await?;
        Ok(())
    }

    /// Complete a user task and close its activity
    pub async fn complete_task(&self, task_id: &str) -> Result<()> {
        let task = self
            .store
            .find_task(&task_id.to_string())
            .await?
            .ok_or_else(|| crate::domain::DomainError::TaskNotFound(task_id.to_string()))?;

        let now = self.time_provider.now_millis();
        self.store.complete_task(&task.id, now).await?;
        self.store
            .update_execution_activity(&task.execution_id, None)
            .await?;
        self.store
            .record_activity_end(&task.process_instance_id, &task.task_definition_key, now)
            .await?;
        debug!(task_id = %task.id, "Completed user task");
        Ok(())
    }

    /// Record a failed job run: one retry spent, exception message kept
    pub async fn report_job_failure(&self, job_id: &str, message: &str) -> Result<Job> {
        let mut job = self
            .store
            .find_job(&job_id.to_string())
            .await?
            .ok_or_else(|| crate::domain::DomainError::JobNotFound(job_id.to_string()))?;

        job.register_failure(message)?;
        self.store.update_job(&job).await?;
        warn!(job_id = %job.id, retries = job.retries, "Job run failed");
        Ok(job)
    }

    /// Record a successful job run: the job is consumed
    pub async fn execute_job(&self, job_id: &str) -> Result<()> {
        let job = self
            .store
            .find_job(&job_id.to_string())
            .await?
            .ok_or_else(|| crate::domain::DomainError::JobNotFound(job_id.to_string()))?;

        self.store.delete_job(&job.id).await?;
        debug!(job_id = %job.id, "Executed job");
        Ok(())
    }

    /// End a process instance: runtime rows removed, history closed
    pub async fn end_instance(&self, process_instance_id: &str) -> Result<()> {
        let instance = self.require_instance(process_instance_id).await?;
        self.store
            .end_process_instance(&instance.id, self.time_provider.now_millis())
            .await?;
        info!(process_instance_id = %instance.id, "Ended process instance");
        Ok(())
    }

    async fn require_instance(&self, id: &str) -> Result<ProcessInstance> {
        self.store
            .find_process_instance(&id.to_string())
            .await?
            .ok_or_else(|| {
                crate::domain::DomainError::ProcessInstanceNotFound(id.to_string()).into()
            })
    }

    async fn require_root_execution(&self, process_instance_id: &str) -> Result<Execution> {
        self.store
            .find_root_execution(&process_instance_id.to_string())
            .await?
            .ok_or_else(|| {
                crate::domain::DomainError::ExecutionNotFound(format!(
                    "root execution of {}",
                    process_instance_id
                ))
                .into()
            })
    }
}

fn validate_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(crate::domain::DomainError::ValidationError(format!(
            "{} must not be empty",
            field
        ))
        .into());
    }
    Ok(())
}
