// SQLite QueryGateway Implementation
// Translates the core filters field-for-field into bound WHERE clauses.
// Result order is fixed so repeated queries are deterministic.

use crate::rows::{
    ExecutionRow, HistoricActivityRow, HistoricProcessInstanceRow, HistoricTaskRow,
    HistoricVariableRow, JobRow, ProcessInstanceRow, TaskRow, VariableRow,
};
use crate::store::{map_sqlx_error, SqliteProcessStore};
use async_trait::async_trait;
use procflow_core::domain::{
    Execution, HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance, Job, ProcessInstance, Task, VariableInstance,
};
use procflow_core::error::Result;
use procflow_core::port::QueryGateway;
use procflow_core::query::{
    ExecutionFilter, HistoricActivityFilter, HistoricProcessInstanceFilter, HistoricTaskFilter,
    HistoricVariableFilter, JobFilter, ProcessInstanceFilter, TaskFilter, VariableFilter,
};
use sqlx::{QueryBuilder, Sqlite};

fn push_job_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a JobFilter) {
    if let Some(id) = filter.job_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(eid) = filter.execution_id.as_deref() {
        qb.push(" AND execution_id = ").push_bind(eid);
    }
    if let Some(dep) = filter.deployment_id.as_deref() {
        qb.push(" AND deployment_id = ").push_bind(dep);
    }
    if let Some(with_exception) = filter.with_exception {
        if with_exception {
            qb.push(" AND exception_message IS NOT NULL AND exception_message != ''");
        } else {
            qb.push(" AND (exception_message IS NULL OR exception_message = '')");
        }
    }
    if let Some(before) = filter.due_before {
        qb.push(" AND due_date IS NOT NULL AND due_date < ").push_bind(before);
    }
    if let Some(suspended) = filter.suspended {
        qb.push(" AND suspended = ").push_bind(if suspended { 1 } else { 0 });
    }
}

fn push_task_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a TaskFilter) {
    if let Some(id) = filter.task_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(eid) = filter.execution_id.as_deref() {
        qb.push(" AND execution_id = ").push_bind(eid);
    }
    if let Some(key) = filter.task_definition_key.as_deref() {
        qb.push(" AND task_definition_key = ").push_bind(key);
    }
    if let Some(assignee) = filter.assignee.as_deref() {
        qb.push(" AND assignee = ").push_bind(assignee);
    }
    if let Some(unassigned) = filter.unassigned {
        if unassigned {
            qb.push(" AND assignee IS NULL");
        } else {
            qb.push(" AND assignee IS NOT NULL");
        }
    }
    if let Some(name) = filter.name.as_deref() {
        qb.push(" AND name = ").push_bind(name);
    }
}

fn push_execution_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ExecutionFilter) {
    if let Some(id) = filter.execution_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(activity_id) = filter.activity_id.as_deref() {
        qb.push(" AND activity_id = ").push_bind(activity_id);
    }
}

fn push_process_instance_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    filter: &'a ProcessInstanceFilter,
) {
    if let Some(id) = filter.process_instance_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(key) = filter.process_definition_key.as_deref() {
        qb.push(" AND process_definition_key = ").push_bind(key);
    }
    if let Some(business_key) = filter.business_key.as_deref() {
        qb.push(" AND business_key = ").push_bind(business_key);
    }
    if let Some(suspended) = filter.suspended {
        qb.push(" AND suspended = ").push_bind(if suspended { 1 } else { 0 });
    }
}

fn push_variable_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a VariableFilter) {
    if let Some(name) = filter.name.as_deref() {
        qb.push(" AND name = ").push_bind(name);
    }
    if let Some(ids) = &filter.process_instance_ids {
        // An empty id set matches nothing
        if ids.is_empty() {
            qb.push(" AND 0 = 1");
        } else {
            qb.push(" AND process_instance_id IN (");
            let mut separated = qb.separated(", ");
            for id in ids {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");
        }
    }
    if let Some(eid) = filter.execution_id.as_deref() {
        qb.push(" AND execution_id = ").push_bind(eid);
    }
}

fn push_historic_process_instance_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    filter: &'a HistoricProcessInstanceFilter,
) {
    if let Some(id) = filter.process_instance_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(key) = filter.process_definition_key.as_deref() {
        qb.push(" AND process_definition_key = ").push_bind(key);
    }
    if let Some(finished) = filter.finished {
        if finished {
            qb.push(" AND ended_at IS NOT NULL");
        } else {
            qb.push(" AND ended_at IS NULL");
        }
    }
}

fn push_historic_activity_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    filter: &'a HistoricActivityFilter,
) {
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(activity_id) = filter.activity_id.as_deref() {
        qb.push(" AND activity_id = ").push_bind(activity_id);
    }
    if let Some(finished) = filter.finished {
        if finished {
            qb.push(" AND ended_at IS NOT NULL");
        } else {
            qb.push(" AND ended_at IS NULL");
        }
    }
}

fn push_historic_task_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    filter: &'a HistoricTaskFilter,
) {
    if let Some(id) = filter.task_id.as_deref() {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(key) = filter.task_definition_key.as_deref() {
        qb.push(" AND task_definition_key = ").push_bind(key);
    }
    if let Some(assignee) = filter.assignee.as_deref() {
        qb.push(" AND assignee = ").push_bind(assignee);
    }
    if let Some(finished) = filter.finished {
        if finished {
            qb.push(" AND completed_at IS NOT NULL");
        } else {
            qb.push(" AND completed_at IS NULL");
        }
    }
}

fn push_historic_variable_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    filter: &'a HistoricVariableFilter,
) {
    if let Some(pid) = filter.process_instance_id.as_deref() {
        qb.push(" AND process_instance_id = ").push_bind(pid);
    }
    if let Some(name) = filter.name.as_deref() {
        qb.push(" AND name = ").push_bind(name);
    }
}

#[async_trait]
impl QueryGateway for SqliteProcessStore {
    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut qb = QueryBuilder::new("SELECT * FROM jobs WHERE 1 = 1");
        push_job_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC, id ASC");

        let rows: Vec<JobRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_job()).collect())
    }

    async fn count_jobs(&self, filter: &JobFilter) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs WHERE 1 = 1");
        push_job_filters(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut qb = QueryBuilder::new("SELECT * FROM tasks WHERE 1 = 1");
        push_task_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC, id ASC");

        let rows: Vec<TaskRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_task()).collect())
    }

    async fn count_tasks(&self, filter: &TaskFilter) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM tasks WHERE 1 = 1");
        push_task_filters(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn find_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>> {
        let mut qb = QueryBuilder::new("SELECT * FROM executions WHERE 1 = 1");
        push_execution_filters(&mut qb, filter);
        qb.push(" ORDER BY id ASC");

        let rows: Vec<ExecutionRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_execution()).collect())
    }

    async fn find_process_instances(
        &self,
        filter: &ProcessInstanceFilter,
    ) -> Result<Vec<ProcessInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM process_instances WHERE 1 = 1");
        push_process_instance_filters(&mut qb, filter);
        qb.push(" ORDER BY started_at ASC, id ASC");

        let rows: Vec<ProcessInstanceRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_process_instance()).collect())
    }

    async fn find_variables(&self, filter: &VariableFilter) -> Result<Vec<VariableInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM variables WHERE 1 = 1");
        push_variable_filters(&mut qb, filter);
        qb.push(" ORDER BY name ASC, id ASC");

        let rows: Vec<VariableRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_variable()).collect())
    }

    async fn find_historic_process_instances(
        &self,
        filter: &HistoricProcessInstanceFilter,
    ) -> Result<Vec<HistoricProcessInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM historic_process_instances WHERE 1 = 1");
        push_historic_process_instance_filters(&mut qb, filter);
        qb.push(" ORDER BY started_at ASC, id ASC");

        let rows: Vec<HistoricProcessInstanceRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_historic_process_instance())
            .collect())
    }

    async fn find_historic_activities(
        &self,
        filter: &HistoricActivityFilter,
    ) -> Result<Vec<HistoricActivityInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM historic_activities WHERE 1 = 1");
        push_historic_activity_filters(&mut qb, filter);
        qb.push(" ORDER BY started_at ASC, id ASC");

        let rows: Vec<HistoricActivityRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_historic_activity()).collect())
    }

    async fn find_historic_tasks(
        &self,
        filter: &HistoricTaskFilter,
    ) -> Result<Vec<HistoricTaskInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM historic_tasks WHERE 1 = 1");
        push_historic_task_filters(&mut qb, filter);
        qb.push(" ORDER BY started_at ASC, id ASC");

        let rows: Vec<HistoricTaskRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_historic_task()).collect())
    }

    async fn find_historic_variables(
        &self,
        filter: &HistoricVariableFilter,
    ) -> Result<Vec<HistoricVariableInstance>> {
        let mut qb = QueryBuilder::new("SELECT * FROM historic_variables WHERE 1 = 1");
        push_historic_variable_filters(&mut qb, filter);
        qb.push(" ORDER BY name ASC, id ASC");

        let rows: Vec<HistoricVariableRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|r| r.into_historic_variable()).collect())
    }
}
