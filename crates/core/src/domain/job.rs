// Job Domain Model

use serde::{Deserialize, Serialize};

/// Job ID (UUID v4 in production, counter-based in tests)
pub type JobId = String;

/// Job Entity
///
/// A scheduled unit of asynchronous work belonging to a process instance
/// (timer firing, async continuation, retryable service call). Jobs are
/// created and mutated by the engine side; the assertion layer only reads
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // Identity
    pub id: JobId,
    pub process_instance_id: crate::domain::ProcessInstanceId,
    pub execution_id: crate::domain::ExecutionId,
    pub process_definition_id: String,

    // Scheduling
    pub due_date: Option<i64>, // epoch ms; None = run as soon as possible
    pub priority: i64,
    pub suspended: bool,

    // Failure handling
    pub retries: i32,
    pub exception_message: Option<String>,

    // Provenance
    pub deployment_id: Option<String>,
    pub created_at: i64, // epoch ms
}

impl Job {
    /// Create a new job with default values
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `process_instance_id` - Owning process instance
    /// * `execution_id` - Execution the job is attached to
    /// * `process_definition_id` - Definition the instance was started from
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        process_instance_id: impl Into<String>,
        execution_id: impl Into<String>,
        process_definition_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            process_instance_id: process_instance_id.into(),
            execution_id: execution_id.into(),
            process_definition_id: process_definition_id.into(),
            due_date: None,
            priority: 0,
            suspended: false,
            retries: 3, // default retry budget
            exception_message: None,
            deployment_id: None,
            created_at,
        }
    }

    /// Create a test job with deterministic ID and timestamp.
    ///
    /// Uses a simple counter for deterministic test IDs (job-1, job-2, ...).
    /// Timestamps start at 1000 and increment by 1000.
    ///
    /// **Note**: This method should only be used in tests. For production code,
    /// always inject ID and time via providers.
    pub fn new_test(
        process_instance_id: impl Into<String>,
        execution_id: impl Into<String>,
    ) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let id = format!("job-{}", counter);
        let created_at = (counter * 1000) as i64;

        Self::new(
            id,
            created_at,
            process_instance_id,
            execution_id,
            "test-definition:1",
        )
    }

    /// Set the due timestamp (epoch ms)
    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the remaining retry budget
    pub fn with_retries(mut self, retries: i32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the deployment the job definition came from
    pub fn with_deployment_id(mut self, deployment_id: impl Into<String>) -> Self {
        self.deployment_id = Some(deployment_id.into());
        self
    }

    /// Record a failure: decrement retries and keep the exception message
    pub fn register_failure(&mut self, message: impl Into<String>) -> crate::domain::error::Result<()> {
        if self.retries <= 0 {
            return Err(crate::domain::error::DomainError::InvalidRetries(
                self.retries,
            ));
        }
        self.retries -= 1;
        self.exception_message = Some(message.into());
        Ok(())
    }
}
