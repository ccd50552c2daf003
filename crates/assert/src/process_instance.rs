// Process Instance Assertions
// State checks (active, suspended, ended, waiting) re-query the engine; the
// wrapped snapshot only contributes the instance's identity, so a stale
// snapshot taken at start time stays usable for the whole test.

use crate::describe;
use crate::error::{require_non_empty, AssertionError};
use procflow_core::domain::ProcessInstance;
use procflow_core::query::{
    ExecutionQuery, HistoricActivityQuery, JobQuery, QueryService, TaskQuery, VariableQuery,
};
use tracing::debug;

/// Fluent assertions over a process instance.
pub struct ProcessInstanceAssert {
    service: QueryService,
    actual: Option<ProcessInstance>,
}

impl std::fmt::Debug for ProcessInstanceAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessInstanceAssert")
            .field("actual", &self.actual)
            .finish_non_exhaustive()
    }
}

impl ProcessInstanceAssert {
    pub(crate) fn new(service: QueryService, actual: Option<ProcessInstance>) -> Self {
        Self { service, actual }
    }

    pub fn actual(&self) -> Option<&ProcessInstance> {
        self.actual.as_ref()
    }

    fn instance(&self) -> Result<&ProcessInstance, AssertionError> {
        self.actual.as_ref().ok_or(AssertionError::NoEntity {
            entity: "ProcessInstance",
        })
    }

    /// The current runtime row for the wrapped instance, if it still runs
    async fn current(&self) -> Result<Option<ProcessInstance>, AssertionError> {
        let instance = self.instance()?;
        Ok(self
            .service
            .process_instance_query()
            .process_instance_id(&instance.id)
            .single_result()
            .await?)
    }

    pub fn has_business_key(&self, expected: &str) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        require_non_empty("business key", expected)?;
        if instance.business_key.as_deref() != Some(expected) {
            return Err(AssertionError::PropertyMismatch {
                subject: describe::process_instance(instance),
                property: "business key",
                expected: expected.to_string(),
                actual: describe::opt_str(instance.business_key.as_deref()),
            });
        }
        Ok(self)
    }

    /// A runtime row exists and is not suspended
    pub async fn is_active(&self) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        match self.current().await? {
            Some(current) if !current.suspended => Ok(self),
            Some(_) => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: "to be active".to_string(),
                actual: "found a suspended instance".to_string(),
            }),
            None => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: "to be active".to_string(),
                actual: "found no running instance".to_string(),
            }),
        }
    }

    pub async fn is_suspended(&self) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        match self.current().await? {
            Some(current) if current.suspended => Ok(self),
            Some(_) => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: "to be suspended".to_string(),
                actual: "found an active instance".to_string(),
            }),
            None => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: "to be suspended".to_string(),
                actual: "found no running instance".to_string(),
            }),
        }
    }

    /// No runtime row remains and the historic record is closed
    pub async fn is_ended(&self) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        let subject = describe::process_instance(instance);
        if self.current().await?.is_some() {
            return Err(AssertionError::Predicate {
                subject,
                expectation: "to be ended".to_string(),
                actual: "found a running instance".to_string(),
            });
        }
        let historic = self
            .service
            .historic_process_instance_query()
            .process_instance_id(&instance.id)
            .single_result()
            .await?;
        match historic {
            Some(record) if record.ended_at.is_some() => Ok(self),
            Some(_) => Err(AssertionError::Predicate {
                subject,
                expectation: "to be ended".to_string(),
                actual: "found an open historic record".to_string(),
            }),
            None => Err(AssertionError::Predicate {
                subject,
                expectation: "to be ended".to_string(),
                actual: "found no historic record".to_string(),
            }),
        }
    }

    /// An execution of this instance currently waits at the given activity
    pub async fn is_waiting_at(&self, activity_id: &str) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        require_non_empty("activity id", activity_id)?;
        let waiting = self
            .service
            .execution_query()
            .process_instance_id(&instance.id)
            .activity_id(activity_id)
            .list()
            .await?;
        if waiting.is_empty() {
            return Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: format!("to be waiting at '{}'", activity_id),
                actual: "found no execution waiting there".to_string(),
            });
        }
        Ok(self)
    }

    /// A finished historic occurrence of the given activity exists
    pub async fn has_passed(&self, activity_id: &str) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        require_non_empty("activity id", activity_id)?;
        let passed = self
            .service
            .historic_activity_query()
            .process_instance_id(&instance.id)
            .activity_id(activity_id)
            .finished()
            .list()
            .await?;
        if passed.is_empty() {
            return Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: format!("to have passed '{}'", activity_id),
                actual: "found no finished occurrence of that activity".to_string(),
            });
        }
        Ok(self)
    }

    pub async fn has_variable(&self, name: &str) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        require_non_empty("variable name", name)?;
        let variable = self
            .service
            .variable_query()
            .process_instance_id_in([instance.id.as_str()])
            .name(name)
            .single_result()
            .await?;
        if variable.is_none() {
            return Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: format!("to have a variable '{}'", name),
                actual: "found none".to_string(),
            });
        }
        Ok(self)
    }

    pub async fn has_variable_value(
        &self,
        name: &str,
        expected: impl Into<serde_json::Value>,
    ) -> Result<&Self, AssertionError> {
        let instance = self.instance()?;
        require_non_empty("variable name", name)?;
        let expected = expected.into();
        let variable = self
            .service
            .variable_query()
            .process_instance_id_in([instance.id.as_str()])
            .name(name)
            .single_result()
            .await?;
        match variable {
            Some(variable) if variable.value == expected => Ok(self),
            Some(variable) => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: format!("to have variable '{}' with value '{}'", name, expected),
                actual: format!("found value '{}'", variable.value),
            }),
            None => Err(AssertionError::Predicate {
                subject: describe::process_instance(instance),
                expectation: format!("to have variable '{}' with value '{}'", name, expected),
                actual: "found no such variable".to_string(),
            }),
        }
    }

    /// Re-read the runtime row by id; after the instance ends this wraps
    /// nothing and only [`Self::is_ended`]-style history checks remain useful.
    pub async fn refreshed(&self) -> Result<ProcessInstanceAssert, AssertionError> {
        let instance = self.instance()?;
        debug!(process_instance_id = %instance.id, "refreshing process instance assertion");
        let current = self.current().await?;
        Ok(ProcessInstanceAssert::new(self.service.clone(), current))
    }

    pub fn job_query(&self) -> Result<JobQuery, AssertionError> {
        let instance = self.instance()?;
        Ok(self.service.job_query().process_instance_id(&instance.id))
    }

    pub fn task_query(&self) -> Result<TaskQuery, AssertionError> {
        let instance = self.instance()?;
        Ok(self.service.task_query().process_instance_id(&instance.id))
    }

    pub fn execution_query(&self) -> Result<ExecutionQuery, AssertionError> {
        let instance = self.instance()?;
        Ok(self
            .service
            .execution_query()
            .process_instance_id(&instance.id))
    }

    pub fn variable_query(&self) -> Result<VariableQuery, AssertionError> {
        let instance = self.instance()?;
        Ok(self
            .service
            .variable_query()
            .process_instance_id_in([instance.id.as_str()]))
    }

    pub fn historic_activity_query(&self) -> Result<HistoricActivityQuery, AssertionError> {
        let instance = self.instance()?;
        Ok(self
            .service
            .historic_activity_query()
            .process_instance_id(&instance.id))
    }
}
