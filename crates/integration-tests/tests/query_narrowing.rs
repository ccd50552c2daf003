//! Narrowed sub-queries carry the owning process instance's id and must
//! never leak entities of unrelated instances.

use std::sync::Arc;

use anyhow::Result;
use procflow_assert::ProcessAssertions;
use procflow_core::application::{
    CreateJobRequest, CreateTaskRequest, RuntimeService, StartInstanceRequest,
};
use procflow_core::domain::{Job, ProcessInstance};
use procflow_core::port::{SystemTimeProvider, UuidProvider};
use procflow_core::query::QueryService;
use procflow_core::EngineError;
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
    queries: QueryService,
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
    let queries = QueryService::new(store);
    let assertions = ProcessAssertions::new(queries.clone());
    Fixture {
        runtime,
        queries,
        assertions,
    }
}

/// Two instances of the same definition, each with its own jobs, task and
/// variable. Returns the instances plus one job of the first.
async fn seed_two_instances(f: &Fixture) -> Result<(ProcessInstance, ProcessInstance, Job)> {
    let first = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: Some("order-1".to_string()),
        })
        .await?;
    let second = f
        .runtime
        .start_instance(StartInstanceRequest {
            process_definition_key: "order-fulfilment".to_string(),
            business_key: Some("order-2".to_string()),
        })
        .await?;

    let mut first_job = None;
    for instance in [&first, &second] {
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
        if instance.id == first.id {
            first_job = Some(job);
        }
        f.runtime
            .create_user_task(CreateTaskRequest {
                process_instance_id: instance.id.clone(),
                task_definition_key: "approve-order".to_string(),
                name: None,
                assignee: None,
                due_date: None,
            })
            .await?;
        f.runtime
            .set_variable(&instance.id, "amount", serde_json::json!(instance.id.clone()))
            .await?;
    }
    let job = first_job.expect("job of the first instance");
    Ok((first, second, job))
}

#[tokio::test]
async fn narrowed_queries_stay_within_the_owning_instance() -> Result<()> {
    let f = fixture().await;
    let (first, _, job) = seed_two_instances(&f).await?;

    let job_assert = f.assertions.assert_job(job);

    let jobs = job_assert.job_query()?.list().await?;
    assert_eq!(jobs.len(), 1);
    assert!(jobs.iter().all(|j| j.process_instance_id == first.id));

    let tasks = job_assert.task_query()?.list().await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].process_instance_id, first.id);

    let executions = job_assert.execution_query()?.list().await?;
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].process_instance_id, first.id);

    let owner = job_assert
        .process_instance_query()?
        .single_result()
        .await?
        .expect("owning instance");
    assert_eq!(owner.id, first.id);

    let variables = job_assert.variable_query()?.list().await?;
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].value, serde_json::json!(first.id.clone()));

    let historic_activities = job_assert.historic_activity_query()?.list().await?;
    assert!(historic_activities
        .iter()
        .all(|a| a.process_instance_id == first.id));

    let historic_tasks = job_assert.historic_task_query()?.list().await?;
    assert_eq!(historic_tasks.len(), 1);
    assert_eq!(historic_tasks[0].process_instance_id, first.id);

    let historic_variables = job_assert.historic_variable_query()?.list().await?;
    assert_eq!(historic_variables.len(), 1);
    assert_eq!(historic_variables[0].process_instance_id, first.id);

    let historic_instances = job_assert.historic_process_instance_query()?.list().await?;
    assert_eq!(historic_instances.len(), 1);
    assert_eq!(historic_instances[0].id, first.id);
    Ok(())
}

#[tokio::test]
async fn narrowed_counts_ignore_other_instances() -> Result<()> {
    let f = fixture().await;
    let (first, _, job) = seed_two_instances(&f).await?;

    // a second job for the first instance only
    f.runtime
        .create_job(CreateJobRequest {
            process_instance_id: first.id.clone(),
            execution_id: None,
            due_date: None,
            retries: None,
            deployment_id: None,
        })
        .await?;

    let job_assert = f.assertions.assert_job(job);
    assert_eq!(job_assert.job_query()?.count().await?, 2);
    assert_eq!(job_assert.task_query()?.count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn single_result_refuses_ambiguity() -> Result<()> {
    let f = fixture().await;
    let (_, _, job) = seed_two_instances(&f).await?;
    f.runtime
        .create_job(CreateJobRequest {
            process_instance_id: job.process_instance_id.clone(),
            execution_id: None,
            due_date: None,
            retries: None,
            deployment_id: None,
        })
        .await?;

    let job_assert = f.assertions.assert_job(job);
    let outcome = job_assert.job_query()?.single_result().await;
    match outcome {
        Err(EngineError::NonUnique { entity, count }) => {
            assert_eq!(entity, "Job");
            assert_eq!(count, 2);
        }
        other => panic!("expected NonUnique, got {:?}", other.map(|j| j.map(|j| j.id))),
    }
    Ok(())
}

#[tokio::test]
async fn unnarrowed_service_queries_see_both_instances() -> Result<()> {
    let f = fixture().await;
    let (first, second, _) = seed_two_instances(&f).await?;

    // sanity check on the fixture: only narrowing hides the other instance
    let all_jobs = f.queries.job_query().list().await?;
    assert_eq!(all_jobs.len(), 2);
    let owners: Vec<_> = all_jobs.iter().map(|j| j.process_instance_id.clone()).collect();
    assert!(owners.contains(&first.id));
    assert!(owners.contains(&second.id));

    let all_amounts = f.queries.variable_query().name("amount").list().await?;
    assert_eq!(all_amounts.len(), 2);
    Ok(())
}
