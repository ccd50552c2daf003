// Runtime Query Builders
// Fluent, consuming builders over the QueryGateway port. Terminal operations
// are async; `single_result` refuses to pick silently among several matches.

use crate::domain::{Execution, Job, ProcessInstance, Task, VariableInstance};
use crate::error::Result;
use crate::port::QueryGateway;
use crate::query::filter::{
    ExecutionFilter, JobFilter, ProcessInstanceFilter, TaskFilter, VariableFilter,
};
use std::sync::Arc;

pub(crate) fn single_from<T>(entity: &'static str, mut items: Vec<T>) -> Result<Option<T>> {
    match items.len() {
        0 => Ok(None),
        1 => Ok(items.pop()),
        count => Err(crate::error::EngineError::NonUnique { entity, count }),
    }
}

/// Query for runtime jobs
pub struct JobQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: JobFilter,
}

impl JobQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: JobFilter::default(),
        }
    }

    pub fn job_id(mut self, id: impl Into<String>) -> Self {
        self.filter.job_id = Some(id.into());
        self
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn execution_id(mut self, id: impl Into<String>) -> Self {
        self.filter.execution_id = Some(id.into());
        self
    }

    pub fn deployment_id(mut self, id: impl Into<String>) -> Self {
        self.filter.deployment_id = Some(id.into());
        self
    }

    /// Only jobs carrying a non-empty exception message
    pub fn with_exception(mut self) -> Self {
        self.filter.with_exception = Some(true);
        self
    }

    /// Only jobs due strictly before the given timestamp (epoch ms)
    pub fn due_before(mut self, millis: i64) -> Self {
        self.filter.due_before = Some(millis);
        self
    }

    pub fn suspended(mut self, suspended: bool) -> Self {
        self.filter.suspended = Some(suspended);
        self
    }

    /// The accumulated filter (inspection, mainly for tests)
    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<Job>> {
        self.gateway.find_jobs(&self.filter).await
    }

    /// Exactly-one semantics: `Ok(None)` when nothing matches, an error when
    /// more than one row does.
    pub async fn single_result(self) -> Result<Option<Job>> {
        let jobs = self.gateway.find_jobs(&self.filter).await?;
        single_from("Job", jobs)
    }

    pub async fn count(self) -> Result<i64> {
        self.gateway.count_jobs(&self.filter).await
    }
}

/// Query for runtime user tasks
pub struct TaskQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: TaskFilter,
}

impl TaskQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: TaskFilter::default(),
        }
    }

    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.filter.task_id = Some(id.into());
        self
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn execution_id(mut self, id: impl Into<String>) -> Self {
        self.filter.execution_id = Some(id.into());
        self
    }

    pub fn task_definition_key(mut self, key: impl Into<String>) -> Self {
        self.filter.task_definition_key = Some(key.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.filter.assignee = Some(assignee.into());
        self
    }

    pub fn unassigned(mut self) -> Self {
        self.filter.unassigned = Some(true);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filter.name = Some(name.into());
        self
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<Task>> {
        self.gateway.find_tasks(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<Task>> {
        let tasks = self.gateway.find_tasks(&self.filter).await?;
        single_from("Task", tasks)
    }

    pub async fn count(self) -> Result<i64> {
        self.gateway.count_tasks(&self.filter).await
    }
}

/// Query for runtime executions
pub struct ExecutionQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: ExecutionFilter,
}

impl ExecutionQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: ExecutionFilter::default(),
        }
    }

    pub fn execution_id(mut self, id: impl Into<String>) -> Self {
        self.filter.execution_id = Some(id.into());
        self
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    /// Only executions currently waiting at the given activity
    pub fn activity_id(mut self, id: impl Into<String>) -> Self {
        self.filter.activity_id = Some(id.into());
        self
    }

    pub fn filter(&self) -> &ExecutionFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<Execution>> {
        self.gateway.find_executions(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<Execution>> {
        let executions = self.gateway.find_executions(&self.filter).await?;
        single_from("Execution", executions)
    }
}

/// Query for runtime process instances
pub struct ProcessInstanceQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: ProcessInstanceFilter,
}

impl ProcessInstanceQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: ProcessInstanceFilter::default(),
        }
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn process_definition_key(mut self, key: impl Into<String>) -> Self {
        self.filter.process_definition_key = Some(key.into());
        self
    }

    pub fn business_key(mut self, key: impl Into<String>) -> Self {
        self.filter.business_key = Some(key.into());
        self
    }

    pub fn suspended(mut self, suspended: bool) -> Self {
        self.filter.suspended = Some(suspended);
        self
    }

    pub fn filter(&self) -> &ProcessInstanceFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<ProcessInstance>> {
        self.gateway.find_process_instances(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<ProcessInstance>> {
        let instances = self.gateway.find_process_instances(&self.filter).await?;
        single_from("ProcessInstance", instances)
    }
}

/// Query for runtime variables
pub struct VariableQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: VariableFilter,
}

impl VariableQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: VariableFilter::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filter.name = Some(name.into());
        self
    }

    /// Only variables owned by one of the given process instances
    pub fn process_instance_id_in<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.process_instance_ids =
            Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn execution_id(mut self, id: impl Into<String>) -> Self {
        self.filter.execution_id = Some(id.into());
        self
    }

    pub fn filter(&self) -> &VariableFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<VariableInstance>> {
        self.gateway.find_variables(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<VariableInstance>> {
        let variables = self.gateway.find_variables(&self.filter).await?;
        single_from("VariableInstance", variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Job;
    use crate::error::EngineError;
    use crate::port::query_gateway::mocks::MockQueryGateway;

    fn gateway_with_jobs(jobs: Vec<Job>) -> Arc<MockQueryGateway> {
        let gateway = Arc::new(MockQueryGateway::new());
        for job in jobs {
            gateway.add_job(job);
        }
        gateway
    }

    #[tokio::test]
    async fn single_result_empty_is_none() {
        let gateway = gateway_with_jobs(vec![]);
        let result = JobQuery::new(gateway).job_id("missing").single_result().await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn single_result_one_match() {
        let job = Job::new_test("pi1", "ex1");
        let id = job.id.clone();
        let gateway = gateway_with_jobs(vec![job]);

        let found = JobQuery::new(gateway)
            .job_id(&id)
            .single_result()
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, id);
    }

    #[tokio::test]
    async fn single_result_rejects_multiple_matches() {
        let gateway = gateway_with_jobs(vec![
            Job::new_test("pi1", "ex1"),
            Job::new_test("pi1", "ex2"),
        ]);

        let result = JobQuery::new(gateway)
            .process_instance_id("pi1")
            .single_result()
            .await;
        match result {
            Err(EngineError::NonUnique { entity, count }) => {
                assert_eq!(entity, "Job");
                assert_eq!(count, 2);
            }
            other => panic!("expected NonUnique, got {:?}", other.map(|j| j.map(|j| j.id))),
        }
    }

    #[tokio::test]
    async fn chained_setters_accumulate() {
        let query = JobQuery::new(Arc::new(MockQueryGateway::new()))
            .process_instance_id("pi1")
            .execution_id("ex1")
            .with_exception();
        assert_eq!(query.filter().process_instance_id.as_deref(), Some("pi1"));
        assert_eq!(query.filter().execution_id.as_deref(), Some("ex1"));
        assert_eq!(query.filter().with_exception, Some(true));
    }

    #[tokio::test]
    async fn count_honors_filter() {
        let mut due = Job::new_test("pi1", "ex1");
        due.due_date = Some(100);
        let gateway = gateway_with_jobs(vec![due, Job::new_test("pi2", "ex2")]);

        let count = JobQuery::new(gateway).due_before(500).count().await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn variable_query_by_instance_id_set() {
        let gateway = Arc::new(MockQueryGateway::new());
        gateway.add_variable(crate::domain::VariableInstance::new(
            "v1",
            "amount",
            serde_json::json!(9),
            "pi1",
            "ex1",
        ));
        gateway.add_variable(crate::domain::VariableInstance::new(
            "v2",
            "amount",
            serde_json::json!(11),
            "pi2",
            "ex2",
        ));

        let found = VariableQuery::new(gateway)
            .name("amount")
            .process_instance_id_in(["pi1"])
            .list()
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].process_instance_id, "pi1");
    }
}
