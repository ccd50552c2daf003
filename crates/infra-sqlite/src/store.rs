// SQLite ProcessStore Implementation
// Writes keep history mirrored to runtime: inserting an instance/task opens
// the matching historic row, completing/ending closes it.

use crate::rows::{ExecutionRow, JobRow, ProcessInstanceRow, TaskRow};
use async_trait::async_trait;
use procflow_core::domain::{
    Execution, ExecutionId, HistoricActivityInstance, Job, JobId, ProcessInstance,
    ProcessInstanceId, Task, TaskId, VariableInstance,
};
use procflow_core::error::{EngineError, Result};
use procflow_core::port::{ProcessStore, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

// Helper to convert sqlx::Error to EngineError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> EngineError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed
                        EngineError::Database(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "787" | "3850" => {
                        // FOREIGN KEY constraint failed
                        EngineError::Database(format!(
                            "Foreign key constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        EngineError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        EngineError::Database(format!("Database full: {}", db_err.message()))
                    }
                    _ => {
                        // Other database errors
                        EngineError::Database(format!(
                            "Database error [{}]: {}",
                            code_str,
                            db_err.message()
                        ))
                    }
                }
            } else {
                EngineError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => EngineError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            EngineError::Database(format!("Column not found: {}", col))
        }
        _ => {
            // Connection, pool, protocol errors
            EngineError::Database(err.to_string())
        }
    }
}

pub struct SqliteProcessStore {
    pub(crate) pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteProcessStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl ProcessStore for SqliteProcessStore {
    async fn find_process_instance(
        &self,
        id: &ProcessInstanceId,
    ) -> Result<Option<ProcessInstance>> {
        let row =
            sqlx::query_as::<_, ProcessInstanceRow>("SELECT * FROM process_instances WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_process_instance()))
    }

    async fn find_root_execution(
        &self,
        process_instance_id: &ProcessInstanceId,
    ) -> Result<Option<Execution>> {
        let row = sqlx::query_as::<_, ExecutionRow>(
            "SELECT * FROM executions WHERE process_instance_id = ? AND parent_id IS NULL LIMIT 1",
        )
        .bind(process_instance_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_execution()))
    }

    async fn find_job(&self, id: &JobId) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_job()))
    }

    async fn find_task(&self, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_task()))
    }

    async fn insert_process_instance(&self, instance: &ProcessInstance) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO process_instances (
                id, process_definition_key, process_definition_id,
                business_key, started_at, suspended
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.process_definition_key)
        .bind(&instance.process_definition_id)
        .bind(&instance.business_key)
        .bind(instance.started_at)
        .bind(if instance.suspended { 1 } else { 0 })
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Open the mirrored historic row
        sqlx::query(
            r#"
            INSERT INTO historic_process_instances (
                id, process_definition_key, process_definition_id,
                business_key, started_at, ended_at
            ) VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.process_definition_key)
        .bind(&instance.process_definition_id)
        .bind(&instance.business_key)
        .bind(instance.started_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(process_instance_id = %instance.id, "Inserted process instance");
        Ok(())
    }

    async fn insert_execution(&self, execution: &Execution) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO executions (id, process_instance_id, parent_id, activity_id, suspended)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&execution.id)
        .bind(&execution.process_instance_id)
        .bind(&execution.parent_id)
        .bind(&execution.activity_id)
        .bind(if execution.suspended { 1 } else { 0 })
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_job(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, process_instance_id, execution_id, process_definition_id,
                due_date, priority, suspended, retries,
                exception_message, deployment_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.process_instance_id)
        .bind(&job.execution_id)
        .bind(&job.process_definition_id)
        .bind(job.due_date)
        .bind(job.priority)
        .bind(if job.suspended { 1 } else { 0 })
        .bind(job.retries)
        .bind(&job.exception_message)
        .bind(&job.deployment_id)
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(job_id = %job.id, "Inserted job");
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, name, assignee, task_definition_key,
                process_instance_id, execution_id, due_date, priority, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.name)
        .bind(&task.assignee)
        .bind(&task.task_definition_key)
        .bind(&task.process_instance_id)
        .bind(&task.execution_id)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Open the mirrored historic row
        sqlx::query(
            r#"
            INSERT INTO historic_tasks (
                id, name, assignee, task_definition_key,
                process_instance_id, execution_id, started_at, completed_at, delete_reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, NULL)
            "#,
        )
        .bind(&task.id)
        .bind(&task.name)
        .bind(&task.assignee)
        .bind(&task.task_definition_key)
        .bind(&task.process_instance_id)
        .bind(&task.execution_id)
        .bind(task.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(task_id = %task.id, "Inserted user task");
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET due_date = ?, priority = ?, suspended = ?, retries = ?,
                exception_message = ?, deployment_id = ?
            WHERE id = ?
            "#,
        )
        .bind(job.due_date)
        .bind(job.priority)
        .bind(if job.suspended { 1 } else { 0 })
        .bind(job.retries)
        .bind(&job.exception_message)
        .bind(&job.deployment_id)
        .bind(&job.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("Job {} not found", job.id)));
        }
        Ok(())
    }

    async fn delete_job(&self, id: &JobId) -> Result<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("Job {} not found", id)));
        }
        debug!(job_id = %id, "Deleted job");
        Ok(())
    }

    async fn set_variable(&self, variable: &VariableInstance) -> Result<()> {
        let value = variable.value.to_string();
        let now = self.time_provider.now_millis();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO variables (id, name, value, process_instance_id, execution_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (process_instance_id, name)
            DO UPDATE SET value = excluded.value, execution_id = excluded.execution_id
            "#,
        )
        .bind(&variable.id)
        .bind(&variable.name)
        .bind(&value)
        .bind(&variable.process_instance_id)
        .bind(&variable.execution_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Mirror the last written value to history
        sqlx::query(
            r#"
            INSERT INTO historic_variables (id, name, value, process_instance_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (process_instance_id, name)
            DO UPDATE SET value = excluded.value, created_at = excluded.created_at
            "#,
        )
        .bind(&variable.id)
        .bind(&variable.name)
        .bind(&value)
        .bind(&variable.process_instance_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(
            process_instance_id = %variable.process_instance_id,
            name = %variable.name,
            "Set variable"
        );
        Ok(())
    }

    async fn update_execution_activity(
        &self,
        execution_id: &ExecutionId,
        activity_id: Option<&str>,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE executions SET activity_id = ? WHERE id = ?")
            .bind(activity_id)
            .bind(execution_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!(
                "Execution {} not found",
                execution_id
            )));
        }
        Ok(())
    }

    async fn complete_task(&self, id: &TaskId, completed_at: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("Task {} not found", id)));
        }

        sqlx::query("UPDATE historic_tasks SET completed_at = ? WHERE id = ?")
            .bind(completed_at)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(task_id = %id, "Completed user task");
        Ok(())
    }

    async fn end_process_instance(&self, id: &ProcessInstanceId, ended_at: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Runtime children (executions, jobs, tasks, variables) cascade away
        let result = sqlx::query("DELETE FROM process_instances WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!(
                "Process instance {} not found",
                id
            )));
        }

        sqlx::query(
            "UPDATE historic_process_instances SET ended_at = ? WHERE id = ? AND ended_at IS NULL",
        )
        .bind(ended_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            "UPDATE historic_activities SET ended_at = ? WHERE process_instance_id = ? AND ended_at IS NULL",
        )
        .bind(ended_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Tasks never completed keep a delete reason instead of a completion time
        sqlx::query(
            "UPDATE historic_tasks SET delete_reason = 'process-instance-ended' WHERE process_instance_id = ? AND completed_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(process_instance_id = %id, "Ended process instance");
        Ok(())
    }

    async fn record_activity_start(&self, activity: &HistoricActivityInstance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO historic_activities (
                id, activity_id, activity_name, process_instance_id,
                execution_id, started_at, ended_at
            ) VALUES (?, ?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(&activity.id)
        .bind(&activity.activity_id)
        .bind(&activity.activity_name)
        .bind(&activity.process_instance_id)
        .bind(&activity.execution_id)
        .bind(activity.started_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn record_activity_end(
        &self,
        process_instance_id: &ProcessInstanceId,
        activity_id: &str,
        ended_at: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE historic_activities
            SET ended_at = ?
            WHERE process_instance_id = ? AND activity_id = ? AND ended_at IS NULL
            "#,
        )
        .bind(ended_at)
        .bind(process_instance_id)
        .bind(activity_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
