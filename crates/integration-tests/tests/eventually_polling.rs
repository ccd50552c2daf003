//! Eventually-style assertions polling a store that another task mutates.
//!
//! Uses a file-backed database: with `sqlite::memory:` every pooled
//! connection would get its own private database, and the concurrent writer
//! here can force a second connection open.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use procflow_assert::{eventually, AssertionError, PollConfig, ProcessAssertions};
use procflow_core::application::{CreateJobRequest, RuntimeService, StartInstanceRequest};
use procflow_core::port::{SystemTimeProvider, UuidProvider};
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
    runtime: Arc<RuntimeService>,
    assertions: ProcessAssertions,
    db_path: String,
}

async fn fixture(tag: &str) -> Fixture {
    init_tracing();
    let db_path = format!("/tmp/procflow_test_{}_{}.db", tag, std::process::id());
    let _ = std::fs::remove_file(&db_path);

    let pool: sqlx::SqlitePool = create_pool(&db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let store = Arc::new(SqliteProcessStore::new(pool, Arc::new(SystemTimeProvider)));
    let runtime = Arc::new(RuntimeService::new(
        store.clone(),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    ));
    let assertions = ProcessAssertions::new(QueryService::new(store));
    Fixture {
        runtime,
        assertions,
        db_path,
    }
}

impl Fixture {
    fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.db_path);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_path));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_path));
    }
}

#[tokio::test]
async fn eventually_observes_delayed_engine_progress() -> Result<()> {
    let f = fixture("progress").await;
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

    let writer_runtime = f.runtime.clone();
    let failing_job_id = job.id.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        writer_runtime
            .report_job_failure(&failing_job_id, "no connection to billing")
            .await
    });

    let config = PollConfig {
        timeout_ms: 2_000,
        interval_ms: 20,
    };
    let assertions = f.assertions.clone();
    let job_id = job.id.clone();
    eventually(config, move || {
        let assertions = assertions.clone();
        let job_id = job_id.clone();
        async move {
            assertions
                .job(&job_id)
                .await?
                .has_retries(2)?
                .has_exception_message()?;
            Ok(())
        }
    })
    .await?;

    writer.await.expect("writer task")?;
    f.cleanup();
    Ok(())
}

#[tokio::test]
async fn eventually_times_out_with_the_last_failure() -> Result<()> {
    let f = fixture("timeout").await;
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

    let config = PollConfig {
        timeout_ms: 150,
        interval_ms: 30,
    };
    let assertions = f.assertions.clone();
    let job_id = job.id.clone();
    let outcome: std::result::Result<(), AssertionError> = eventually(config, move || {
        let assertions = assertions.clone();
        let job_id = job_id.clone();
        async move {
            assertions.job(&job_id).await?.has_retries(0)?;
            Ok(())
        }
    })
    .await;

    let err = outcome.unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, AssertionError::Timeout { .. }));
    assert!(message.contains("150 ms"));
    assert!(message.contains("retries"), "timeout should carry the last mismatch: {}", message);

    f.cleanup();
    Ok(())
}
