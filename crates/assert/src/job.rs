// Job Assertions
// The job is the central entity here: a scheduled unit of asynchronous work
// belonging to a process instance.

use crate::describe;
use crate::error::{require_non_empty, AssertionError};
use procflow_core::domain::Job;
use procflow_core::query::{
    ExecutionQuery, HistoricActivityQuery, HistoricProcessInstanceQuery, HistoricTaskQuery,
    HistoricVariableQuery, JobQuery, ProcessInstanceQuery, QueryService, TaskQuery, VariableQuery,
};
use tracing::debug;

/// Fluent assertions over a job snapshot.
///
/// Wraps the job as an `Option`: retrieval by id may come up empty, and in
/// that case every check fails with [`AssertionError::NoEntity`] before any
/// attribute is touched. Checks return `&Self` on success so chains read
/// `assert.has_retries(3)?.has_id("j1")?`. A check never mutates anything;
/// [`JobAssert::refreshed`] is the only way to observe newer engine state.
pub struct JobAssert {
    service: QueryService,
    actual: Option<Job>,
}

impl std::fmt::Debug for JobAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobAssert")
            .field("actual", &self.actual)
            .finish_non_exhaustive()
    }
}

impl JobAssert {
    pub(crate) fn new(service: QueryService, actual: Option<Job>) -> Self {
        Self { service, actual }
    }

    /// The wrapped snapshot, if any
    pub fn actual(&self) -> Option<&Job> {
        self.actual.as_ref()
    }

    fn job(&self) -> Result<&Job, AssertionError> {
        self.actual
            .as_ref()
            .ok_or(AssertionError::NoEntity { entity: "Job" })
    }

    pub fn has_id(&self, expected: &str) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        require_non_empty("id", expected)?;
        if job.id != expected {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::job(job),
                property: "id",
                expected: expected.to_string(),
                actual: job.id.clone(),
            });
        }
        Ok(self)
    }

    pub fn has_process_instance_id(&self, expected: &str) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        require_non_empty("process instance id", expected)?;
        if job.process_instance_id != expected {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::job(job),
                property: "process instance id",
                expected: expected.to_string(),
                actual: job.process_instance_id.clone(),
            });
        }
        Ok(self)
    }

    pub fn has_execution_id(&self, expected: &str) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        require_non_empty("execution id", expected)?;
        if job.execution_id != expected {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::job(job),
                property: "execution id",
                expected: expected.to_string(),
                actual: job.execution_id.clone(),
            });
        }
        Ok(self)
    }

    pub fn has_deployment_id(&self, expected: &str) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        require_non_empty("deployment id", expected)?;
        if job.deployment_id.as_deref() != Some(expected) {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::job(job),
                property: "deployment id",
                expected: expected.to_string(),
                actual: describe::opt_str(job.deployment_id.as_deref()),
            });
        }
        Ok(self)
    }

    /// Compare the due timestamp (epoch ms). A job without a due date fails
    /// with both sides rendered.
    pub fn has_due_date(&self, expected_millis: i64) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        if job.due_date != Some(expected_millis) {
            return Err(AssertionError::DueDateMismatch {
                subject: describe::job(job),
                expected: describe::timestamp(expected_millis),
                actual: describe::opt_timestamp(job.due_date),
            });
        }
        Ok(self)
    }

    pub fn has_retries(&self, expected: i32) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        if job.retries != expected {
            return Err(AssertionError::RetriesMismatch {
                subject: describe::job(job),
                expected,
                actual: job.retries,
            });
        }
        Ok(self)
    }

    /// Require a non-empty exception message, i.e. the job has failed at
    /// least once since its retries were last reset.
    pub fn has_exception_message(&self) -> Result<&Self, AssertionError> {
        let job = self.job()?;
        match job.exception_message.as_deref() {
            Some(message) if !message.is_empty() => Ok(self),
            _ => Err(AssertionError::MissingExceptionMessage {
                subject: describe::job(job),
            }),
        }
    }

    /// Re-read the job by its own id, narrowed to its process instance, and
    /// wrap whatever the store currently holds (possibly nothing).
    pub async fn refreshed(&self) -> Result<JobAssert, AssertionError> {
        let job = self.job()?;
        debug!(job_id = %job.id, "refreshing job assertion");
        let current = self
            .service
            .job_query()
            .job_id(&job.id)
            .process_instance_id(&job.process_instance_id)
            .single_result()
            .await?;
        Ok(JobAssert::new(self.service.clone(), current))
    }

    // ------------------------------------------------------------------
    // Narrowed sub-queries, each pre-filtered by the wrapped job's owning
    // process instance so sibling assertions cannot leak across instances.
    // ------------------------------------------------------------------

    pub fn job_query(&self) -> Result<JobQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .job_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn task_query(&self) -> Result<TaskQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .task_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn execution_query(&self) -> Result<ExecutionQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .execution_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn process_instance_query(&self) -> Result<ProcessInstanceQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .process_instance_query()
            .process_instance_id(&job.process_instance_id))
    }

    /// Variable queries filter by an id set; the narrowed form carries a
    /// one-element set.
    pub fn variable_query(&self) -> Result<VariableQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .variable_query()
            .process_instance_id_in([job.process_instance_id.as_str()]))
    }

    pub fn historic_process_instance_query(
        &self,
    ) -> Result<HistoricProcessInstanceQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .historic_process_instance_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn historic_activity_query(&self) -> Result<HistoricActivityQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .historic_activity_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn historic_task_query(&self) -> Result<HistoricTaskQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .historic_task_query()
            .process_instance_id(&job.process_instance_id))
    }

    pub fn historic_variable_query(&self) -> Result<HistoricVariableQuery, AssertionError> {
        let job = self.job()?;
        Ok(self
            .service
            .historic_variable_query()
            .process_instance_id(&job.process_instance_id))
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

    fn sample_job() -> Job {
        let mut job = Job::new("J1", 1000, "P1", "E1", "order-fulfilment:1")
            .with_due_date(120_000)
            .with_deployment_id("deploy-7");
        job.exception_message = Some("no connection to billing".to_string());
        job
    }

    #[test]
    fn reflexive_checks_chain() -> Result<(), AssertionError> {
        let gateway = Arc::new(MockQueryGateway::new());
        let job_assert = JobAssert::new(service_over(&gateway), Some(sample_job()));

        job_assert
            .has_id("J1")?
            .has_process_instance_id("P1")?
            .has_execution_id("E1")?
            .has_deployment_id("deploy-7")?
            .has_due_date(120_000)?
            .has_retries(3)?
            .has_exception_message()?;
        Ok(())
    }

    #[test]
    fn retries_mismatch_names_job_and_both_values() {
        let gateway = Arc::new(MockQueryGateway::new());
        let job_assert = JobAssert::new(service_over(&gateway), Some(sample_job()));

        let message = job_assert.has_retries(2).unwrap_err().to_string();
        assert!(message.contains("J1"));
        assert!(message.contains('2'));
        assert!(message.contains('3'));
    }

    #[test]
    fn empty_expected_fails_before_comparison() {
        let gateway = Arc::new(MockQueryGateway::new());
        let job_assert = JobAssert::new(service_over(&gateway), Some(sample_job()));

        let err = job_assert.has_id("").unwrap_err();
        assert!(matches!(err, AssertionError::EmptyExpectation { argument: "id" }));
    }

    #[test]
    fn absent_job_fails_before_attribute_access() {
        let gateway = Arc::new(MockQueryGateway::new());
        let job_assert = JobAssert::new(service_over(&gateway), None);

        let err = job_assert.has_retries(3).unwrap_err();
        assert!(matches!(err, AssertionError::NoEntity { entity: "Job" }));
        assert!(job_assert.task_query().is_err());
    }

    #[test]
    fn missing_due_date_shows_both_sides() {
        let gateway = Arc::new(MockQueryGateway::new());
        let mut job = sample_job();
        job.due_date = None;
        let job_assert = JobAssert::new(service_over(&gateway), Some(job));

        let message = job_assert.has_due_date(120_000).unwrap_err().to_string();
        assert!(message.contains("1970-01-01T00:02:00.000Z"));
        assert!(message.contains("'none'"));
    }

    #[test]
    fn blank_exception_message_counts_as_missing() {
        let gateway = Arc::new(MockQueryGateway::new());
        let mut job = sample_job();
        job.exception_message = Some(String::new());
        let job_assert = JobAssert::new(service_over(&gateway), Some(job));

        let err = job_assert.has_exception_message().unwrap_err();
        assert!(matches!(err, AssertionError::MissingExceptionMessage { .. }));
    }

    #[test]
    fn narrowed_queries_carry_the_instance_filter() -> Result<(), AssertionError> {
        let gateway = Arc::new(MockQueryGateway::new());
        let job_assert = JobAssert::new(service_over(&gateway), Some(sample_job()));

        assert_eq!(
            job_assert.job_query()?.filter().process_instance_id.as_deref(),
            Some("P1")
        );
        assert_eq!(
            job_assert.task_query()?.filter().process_instance_id.as_deref(),
            Some("P1")
        );
        assert_eq!(
            job_assert.variable_query()?.filter().process_instance_ids,
            Some(vec!["P1".to_string()])
        );
        assert_eq!(
            job_assert
                .historic_activity_query()?
                .filter()
                .process_instance_id
                .as_deref(),
            Some("P1")
        );
        Ok(())
    }

    #[tokio::test]
    async fn refreshed_sees_current_store_state() {
        let gateway = Arc::new(MockQueryGateway::new());
        let job = sample_job();
        gateway.add_job(job.clone());
        let job_assert = JobAssert::new(service_over(&gateway), Some(job.clone()));
        job_assert.has_retries(3).unwrap();

        let mut progressed = job;
        progressed.retries = 2;
        gateway.replace_job(progressed);

        let refreshed = job_assert.refreshed().await.unwrap();
        refreshed.has_retries(2).unwrap();
        assert!(refreshed.has_retries(3).is_err());
    }

    #[tokio::test]
    async fn refreshed_after_job_completion_wraps_nothing() {
        let gateway = Arc::new(MockQueryGateway::new());
        let job = sample_job();
        gateway.add_job(job.clone());
        let job_assert = JobAssert::new(service_over(&gateway), Some(job));

        gateway.remove_job("J1");

        let refreshed = job_assert.refreshed().await.unwrap();
        assert!(refreshed.actual().is_none());
        let err = refreshed.has_id("J1").unwrap_err();
        assert!(matches!(err, AssertionError::NoEntity { .. }));
    }
}
