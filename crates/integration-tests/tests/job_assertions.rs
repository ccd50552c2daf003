//! Job assertion flow over the SQLite-backed engine state.
//!
//! Seeds state through the runtime service, then verifies the fluent job
//! checks: reflexivity, mismatch messages, empty expectations, absent
//! entities, refresh.

use std::sync::Arc;

use anyhow::Result;
use procflow_assert::{AssertionError, ProcessAssertions};
use procflow_core::application::{CreateJobRequest, RuntimeService, StartInstanceRequest};
use procflow_core::port::{QueryGateway, SystemTimeProvider, UuidProvider};
use procflow_core::query::QueryService;
use procflow_infra_sqlite::{create_pool, run_migrations, SqliteProcessStore};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("procflow=info"))
        .expect("env filter");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

struct Fixture {
    runtime: RuntimeService,
    assertions: ProcessAssertions,
}

async fn fixture() -> Fixture {
    init_tracing();
    let pool: sqlx::SqlitePool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let store = Arc::new(SqliteProcessStore::new(pool, Arc::new(SystemTimeProvider)));
    let runtime = RuntimeService::new(
        store.clone(),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    );
    let assertions = ProcessAssertions::new(QueryService::new(store));
    Fixture {
        runtime,
        assertions,
    }
}

#[tokio::test]
async fn job_checks_accept_live_values() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: Some("order-42".to_string()),
        })
        .await?;

    let due = chrono::Utc::now().timestamp_millis() + 60_000;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: Some(due),
            retries: Some(3),
            deployment_id: Some("deployment-1".to_string()),
        })
        .await?;

    let job_assert = f.assertions.job(&job.id).await?;
    job_assert
        .has_id(&job.id)?
        .has_process_instance_id(&instance.id)?
        .has_execution_id(&job.execution_id)?
        .has_deployment_id("deployment-1")?
        .has_due_date(due)?
        .has_retries(3)?;
    Ok(())
}

#[tokio::test]
async fn retries_mismatch_message_names_job_and_both_values() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: None,
        })
        .await?;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: None,
            retries: Some(3),
            deployment_id: None,
        })
        .await?;

    let job_assert = f.assertions.job(&job.id).await?;
    let message = job_assert.has_retries(2).unwrap_err().to_string();
    assert!(message.contains(&job.id), "message should name the job: {}", message);
    assert!(message.contains('2'), "message should show the expectation: {}", message);
    assert!(message.contains('3'), "message should show the actual value: {}", message);
    Ok(())
}

#[tokio::test]
async fn attribute_mismatch_embeds_the_entity_descriptor() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: None,
        })
        .await?;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: None,
            retries: None,
            deployment_id: Some("deployment-1".to_string()),
        })
        .await?;

    let job_assert = f.assertions.job(&job.id).await?;
    let message = job_assert
        .has_deployment_id("deployment-2")
        .unwrap_err()
        .to_string();
    assert!(message.contains("Job {id:"));
    assert!(message.contains(&instance.id));
    assert!(message.contains("'deployment-2'"));
    assert!(message.contains("'deployment-1'"));
    Ok(())
}

#[tokio::test]
async fn empty_expectations_fail_before_any_comparison() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: None,
        })
        .await?;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: None,
            retries: None,
            deployment_id: None,
        })
        .await?;

    let job_assert = f.assertions.job(&job.id).await?;
    assert!(matches!(
        job_assert.has_id("").unwrap_err(),
        AssertionError::EmptyExpectation { argument: "id" }
    ));
    assert!(matches!(
        job_assert.has_execution_id("").unwrap_err(),
        AssertionError::EmptyExpectation { .. }
    ));
    // the job has no deployment id either; the empty expectation still wins
    assert!(matches!(
        job_assert.has_deployment_id("").unwrap_err(),
        AssertionError::EmptyExpectation { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn absent_job_fails_before_attribute_access() -> Result<()> {
    let f = fixture().await;

    let missing = f.assertions.job("no-such-job").await?;
    assert!(missing.actual().is_none());
    assert!(matches!(
        missing.has_retries(3).unwrap_err(),
        AssertionError::NoEntity { entity: "Job" }
    ));
    assert!(missing.job_query().is_err());
    Ok(())
}

#[tokio::test]
async fn refresh_follows_failure_and_execution() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: None,
        })
        .await?;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: None,
            retries: Some(3),
            deployment_id: None,
        })
        .await?;

    let job_assert = f.assertions.assert_job(job.clone());
    job_assert.has_retries(3)?;
    assert!(job_assert.has_exception_message().is_err());

    f.runtime
        .report_job_failure(&job.id, "no connection to billing")
        .await?;
    let failed = job_assert.refreshed().await?;
    failed.has_retries(2)?.has_exception_message()?;

    f.runtime.execute_job(&job.id).await?;
    let gone = failed.refreshed().await?;
    assert!(gone.actual().is_none());
    Ok(())
}

#[tokio::test]
async fn failure_reporting_stops_at_zero_retries() -> Result<()> {
    let f = fixture().await;
    let instance = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: None,
        })
        .await?;
    let job = f
        .runtime
        .create_job(CreateJobRequest {
            process_instance_id: instance.id.clone(),
            execution_id: None,
            due_date: None,
            retries: Some(1),
            deployment_id: None,
        })
        .await?;

    f.runtime.report_job_failure(&job.id, "boom").await?;
    let exhausted = f.runtime.report_job_failure(&job.id, "boom again").await;
    assert!(exhausted.is_err(), "no retries left to spend");

    f.assertions
        .job(&job.id)
        .await?
        .has_retries(0)?
        .has_exception_message()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Query failures must surface through the assertion error type, not panic.
// ---------------------------------------------------------------------------

struct FailingGateway;

fn lost() -> procflow_core::EngineError {
    procflow_core::EngineError::Database("connection lost".to_string())
}

#[async_trait::async_trait]
impl QueryGateway for FailingGateway {
    async fn find_jobs(
        &self,
        _: &procflow_core::query::JobFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::Job>> {
        Err(lost())
    }

    async fn count_jobs(&self, _: &procflow_core::query::JobFilter) -> procflow_core::Result<i64> {
        Err(lost())
    }

    async fn find_tasks(
        &self,
        _: &procflow_core::query::TaskFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::Task>> {
        Err(lost())
    }

    async fn count_tasks(
        &self,
        _: &procflow_core::query::TaskFilter,
    ) -> procflow_core::Result<i64> {
        Err(lost())
    }

    async fn find_executions(
        &self,
        _: &procflow_core::query::ExecutionFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::Execution>> {
        Err(lost())
    }

    async fn find_process_instances(
        &self,
        _: &procflow_core::query::ProcessInstanceFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::ProcessInstance>> {
        Err(lost())
    }

    async fn find_variables(
        &self,
        _: &procflow_core::query::VariableFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::VariableInstance>> {
        Err(lost())
    }

    async fn find_historic_process_instances(
        &self,
        _: &procflow_core::query::HistoricProcessInstanceFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::HistoricProcessInstance>> {
        Err(lost())
    }

    async fn find_historic_activities(
        &self,
        _: &procflow_core::query::HistoricActivityFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::HistoricActivityInstance>> {
        Err(lost())
    }

    async fn find_historic_tasks(
        &self,
        _: &procflow_core::query::HistoricTaskFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::HistoricTaskInstance>> {
        Err(lost())
    }

    async fn find_historic_variables(
        &self,
        _: &procflow_core::query::HistoricVariableFilter,
    ) -> procflow_core::Result<Vec<procflow_core::domain::HistoricVariableInstance>> {
        Err(lost())
    }
}

#[tokio::test]
async fn query_failures_surface_as_assertion_errors() {
    let assertions = ProcessAssertions::new(QueryService::new(Arc::new(FailingGateway)));

    let err = assertions.job("j1").await.unwrap_err();
    assert!(matches!(err, AssertionError::Query(_)));
    assert!(err.to_string().contains("connection lost"));
}
