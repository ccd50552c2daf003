// Assertion Entry Point

use crate::error::AssertionError;
use crate::job::JobAssert;
use crate::process_instance::ProcessInstanceAssert;
use crate::task::TaskAssert;
use procflow_core::domain::{Job, ProcessInstance, Task};
use procflow_core::query::QueryService;

/// Entry handle for fluent engine-state assertions.
///
/// Each entity comes in two flavors: `assert_x(snapshot)` wraps a snapshot
/// the test already holds, `x(id).await` fetches the current state by id and
/// wraps whatever came back (possibly nothing, which every later check
/// reports as an absent entity).
#[derive(Clone)]
pub struct ProcessAssertions {
    service: QueryService,
}

impl ProcessAssertions {
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }

    pub fn assert_job(&self, job: Job) -> JobAssert {
        JobAssert::new(self.service.clone(), Some(job))
    }

    pub async fn job(&self, id: &str) -> Result<JobAssert, AssertionError> {
        let job = self.service.job_query().job_id(id).single_result().await?;
        Ok(JobAssert::new(self.service.clone(), job))
    }

    pub fn assert_task(&self, task: Task) -> TaskAssert {
        TaskAssert::new(self.service.clone(), Some(task))
    }

    pub async fn task(&self, id: &str) -> Result<TaskAssert, AssertionError> {
        let task = self.service.task_query().task_id(id).single_result().await?;
        Ok(TaskAssert::new(self.service.clone(), task))
    }

    pub fn assert_process_instance(&self, instance: ProcessInstance) -> ProcessInstanceAssert {
        ProcessInstanceAssert::new(self.service.clone(), Some(instance))
    }

    pub async fn process_instance(
        &self,
        id: &str,
    ) -> Result<ProcessInstanceAssert, AssertionError> {
        let instance = self
            .service
            .process_instance_query()
            .process_instance_id(id)
            .single_result()
            .await?;
        Ok(ProcessInstanceAssert::new(self.service.clone(), instance))
    }
}
