// User Task Assertions

use crate::describe;
use crate::error::{require_non_empty, AssertionError};
use procflow_core::domain::Task;
use procflow_core::query::{HistoricTaskQuery, QueryService, TaskQuery, VariableQuery};
use tracing::debug;

/// Fluent assertions over a user task snapshot, same contract as
/// [`crate::JobAssert`]: presence first, empty expectations rejected,
/// `&Self` returned for chaining.
pub struct TaskAssert {
    service: QueryService,
    actual: Option<Task>,
}

impl std::fmt::Debug for TaskAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskAssert")
            .field("actual", &self.actual)
            .finish_non_exhaustive()
    }
}

impl TaskAssert {
    pub(crate) fn new(service: QueryService, actual: Option<Task>) -> Self {
        Self { service, actual }
    }

    pub fn actual(&self) -> Option<&Task> {
        self.actual.as_ref()
    }

    fn task(&self) -> Result<&Task, AssertionError> {
        self.actual
            .as_ref()
            .ok_or(AssertionError::NoEntity { entity: "Task" })
    }

    pub fn has_id(&self, expected: &str) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        require_non_empty("id", expected)?;
        if task.id != expected {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::task(task),
                property: "id",
                expected: expected.to_string(),
                actual: task.id.clone(),
            });
        }
        Ok(self)
    }

    pub fn has_name(&self, expected: &str) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        require_non_empty("name", expected)?;
        if task.name.as_deref() != Some(expected) {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::task(task),
                property: "name",
                expected: expected.to_string(),
                actual: describe::opt_str(task.name.as_deref()),
            });
        }
        Ok(self)
    }

    pub fn has_definition_key(&self, expected: &str) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        require_non_empty("task definition key", expected)?;
        if task.task_definition_key != expected {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::task(task),
                property: "task definition key",
                expected: expected.to_string(),
                actual: task.task_definition_key.clone(),
            });
        }
        Ok(self)
    }

    pub fn is_assigned_to(&self, expected: &str) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        require_non_empty("assignee", expected)?;
        if task.assignee.as_deref() != Some(expected) {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::task(task),
                property: "assignee",
                expected: expected.to_string(),
                actual: describe::opt_str(task.assignee.as_deref()),
            });
        }
        Ok(self)
    }

    pub fn is_unassigned(&self) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        if let Some(assignee) = task.assignee.as_deref() {
            return Err(AssertionError::Predicate {
                subject: describe::task(task),
                expectation: "to be unassigned".to_string(),
                actual: format!("found assignee '{}'", assignee),
            });
        }
        Ok(self)
    }

    pub fn has_due_date(&self, expected_millis: i64) -> Result<&Self, AssertionError> {
        let task = self.task()?;
        if task.due_date != Some(expected_millis) {
            return Err(AssertionError::DueDateMismatch {
                subject: describe::task(task),
                expected: describe::timestamp(expected_millis),
                actual: describe::opt_timestamp(task.due_date),
            });
        }
        Ok(self)
    }

    /// Re-read the task by its own id, narrowed to its process instance
    pub async fn refreshed(&self) -> Result<TaskAssert, AssertionError> {
        let task = self.task()?;
        debug!(task_id = %task.id, "refreshing task assertion");
        let current = self
            .service
            .task_query()
            .task_id(&task.id)
            .process_instance_id(&task.process_instance_id)
            .single_result()
            .await?;
        Ok(TaskAssert::new(self.service.clone(), current))
    }

    pub fn task_query(&self) -> Result<TaskQuery, AssertionError> {
        let task = self.task()?;
        Ok(self
            .service
            .task_query()
            .process_instance_id(&task.process_instance_id))
    }

    pub fn variable_query(&self) -> Result<VariableQuery, AssertionError> {
        let task = self.task()?;
        Ok(self
            .service
            .variable_query()
            .process_instance_id_in([task.process_instance_id.as_str()]))
    }

    pub fn historic_task_query(&self) -> Result<HistoricTaskQuery, AssertionError> {
        let task = self.task()?;
        Ok(self
            .service
            .historic_task_query()
            .process_instance_id(&task.process_instance_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procflow_core::port::query_gateway::mocks::MockQueryGateway;
    use procflow_core::port::QueryGateway;
    use std::sync::Arc;

    fn service_over(gateway: &Arc<MockQueryGateway>) -> QueryService {
        QueryService::new(Arc::clone(gateway) as Arc<dyn QueryGateway>)
    }

    fn sample_task() -> Task {
        Task::new("T1", 1000, "approve-order", "P1", "E1")
            .with_name("Approve order")
            .with_assignee("kermit")
            .with_due_date(90_000)
    }

    #[test]
    fn reflexive_checks_chain() -> Result<(), AssertionError> {
        let gateway = Arc::new(MockQueryGateway::new());
        let task_assert = TaskAssert::new(service_over(&gateway), Some(sample_task()));

        task_assert
            .has_id("T1")?
            .has_name("Approve order")?
            .has_definition_key("approve-order")?
            .is_assigned_to("kermit")?
            .has_due_date(90_000)?;
        Ok(())
    }

    #[test]
    fn unassigned_check_names_the_current_assignee() {
        let gateway = Arc::new(MockQueryGateway::new());
        let task_assert = TaskAssert::new(service_over(&gateway), Some(sample_task()));

        let message = task_assert.is_unassigned().unwrap_err().to_string();
        assert!(message.contains("T1"));
        assert!(message.contains("to be unassigned"));
        assert!(message.contains("kermit"));
    }

    #[test]
    fn missing_name_renders_as_none() {
        let gateway = Arc::new(MockQueryGateway::new());
        let mut task = sample_task();
        task.name = None;
        let task_assert = TaskAssert::new(service_over(&gateway), Some(task));

        let message = task_assert.has_name("Approve order").unwrap_err().to_string();
        assert!(message.contains("'Approve order'"));
        assert!(message.contains("'none'"));
    }

    #[test]
    fn absent_task_fails_every_check() {
        let gateway = Arc::new(MockQueryGateway::new());
        let task_assert = TaskAssert::new(service_over(&gateway), None);

        assert!(matches!(
            task_assert.has_id("T1").unwrap_err(),
            AssertionError::NoEntity { entity: "Task" }
        ));
        assert!(task_assert.variable_query().is_err());
    }

    #[tokio::test]
    async fn refreshed_follows_reassignment() {
        let gateway = Arc::new(MockQueryGateway::new());
        let task = sample_task();
        gateway.add_task(task.clone());
        let task_assert = TaskAssert::new(service_over(&gateway), Some(task));

        let refreshed = task_assert.refreshed().await.unwrap();
        refreshed.is_assigned_to("kermit").unwrap();
    }
}
