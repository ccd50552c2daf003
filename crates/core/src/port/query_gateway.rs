// Query Gateway Port (Interface)
// Read-only view over engine state. Adapters must honor the reference
// semantics of the filters' `matches` methods.

use crate::domain::{
    Execution, HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance, Job, ProcessInstance, Task, VariableInstance,
};
use crate::error::Result;
use crate::query::{
    ExecutionFilter, HistoricActivityFilter, HistoricProcessInstanceFilter, HistoricTaskFilter,
    HistoricVariableFilter, JobFilter, ProcessInstanceFilter, TaskFilter, VariableFilter,
};
use async_trait::async_trait;

/// Query interface over engine state
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Find jobs matching the filter
    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;

    /// Count jobs matching the filter
    async fn count_jobs(&self, filter: &JobFilter) -> Result<i64>;

    /// Find user tasks matching the filter
    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Count user tasks matching the filter
    async fn count_tasks(&self, filter: &TaskFilter) -> Result<i64>;

    /// Find executions matching the filter
    async fn find_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>>;

    /// Find process instances matching the filter
    async fn find_process_instances(
        &self,
        filter: &ProcessInstanceFilter,
    ) -> Result<Vec<ProcessInstance>>;

    /// Find variables matching the filter
    async fn find_variables(&self, filter: &VariableFilter) -> Result<Vec<VariableInstance>>;

    /// Find historic process instances matching the filter
    async fn find_historic_process_instances(
        &self,
        filter: &HistoricProcessInstanceFilter,
    ) -> Result<Vec<HistoricProcessInstance>>;

    /// Find historic activity instances matching the filter
    async fn find_historic_activities(
        &self,
        filter: &HistoricActivityFilter,
    ) -> Result<Vec<HistoricActivityInstance>>;

    /// Find historic task instances matching the filter
    async fn find_historic_tasks(
        &self,
        filter: &HistoricTaskFilter,
    ) -> Result<Vec<HistoricTaskInstance>>;

    /// Find historic variables matching the filter
    async fn find_historic_variables(
        &self,
        filter: &HistoricVariableFilter,
    ) -> Result<Vec<HistoricVariableInstance>>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory Query Gateway for testing
    ///
    /// Holds seeded entities and answers queries by applying the filters'
    /// `matches` semantics directly.
    #[derive(Default)]
    pub struct MockQueryGateway {
        jobs: Mutex<Vec<Job>>,
        tasks: Mutex<Vec<Task>>,
        executions: Mutex<Vec<Execution>>,
        process_instances: Mutex<Vec<ProcessInstance>>,
        variables: Mutex<Vec<VariableInstance>>,
        historic_process_instances: Mutex<Vec<HistoricProcessInstance>>,
        historic_activities: Mutex<Vec<HistoricActivityInstance>>,
        historic_tasks: Mutex<Vec<HistoricTaskInstance>>,
        historic_variables: Mutex<Vec<HistoricVariableInstance>>,
        call_count: Mutex<usize>,
    }

    impl MockQueryGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_job(&self, job: Job) {
            self.jobs.lock().unwrap().push(job);
        }

        pub fn add_task(&self, task: Task) {
            self.tasks.lock().unwrap().push(task);
        }

        pub fn add_execution(&self, execution: Execution) {
            self.executions.lock().unwrap().push(execution);
        }

        pub fn add_process_instance(&self, instance: ProcessInstance) {
            self.process_instances.lock().unwrap().push(instance);
        }

        pub fn add_variable(&self, variable: VariableInstance) {
            self.variables.lock().unwrap().push(variable);
        }

        pub fn add_historic_process_instance(&self, instance: HistoricProcessInstance) {
            self.historic_process_instances.lock().unwrap().push(instance);
        }

        pub fn add_historic_activity(&self, activity: HistoricActivityInstance) {
            self.historic_activities.lock().unwrap().push(activity);
        }

        pub fn add_historic_task(&self, task: HistoricTaskInstance) {
            self.historic_tasks.lock().unwrap().push(task);
        }

        pub fn add_historic_variable(&self, variable: HistoricVariableInstance) {
            self.historic_variables.lock().unwrap().push(variable);
        }

        /// Replace a seeded job by id (simulates engine-side progress)
        pub fn replace_job(&self, job: Job) {
            let mut jobs = self.jobs.lock().unwrap();
            jobs.retain(|j| j.id != job.id);
            jobs.push(job);
        }

        /// Remove a seeded job by id
        pub fn remove_job(&self, id: &str) {
            self.jobs.lock().unwrap().retain(|j| j.id != id);
        }

        /// Total number of find/count calls answered
        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        fn record_call(&self) {
            *self.call_count.lock().unwrap() += 1;
        }
    }

    #[async_trait]
    impl QueryGateway for MockQueryGateway {
        async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
            self.record_call();
            let jobs = self.jobs.lock().unwrap();
            Ok(jobs.iter().filter(|j| filter.matches(j)).cloned().collect())
        }

        async fn count_jobs(&self, filter: &JobFilter) -> Result<i64> {
            self.record_call();
            let jobs = self.jobs.lock().unwrap();
            Ok(jobs.iter().filter(|j| filter.matches(j)).count() as i64)
        }

        async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
            self.record_call();
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
        }

        async fn count_tasks(&self, filter: &TaskFilter) -> Result<i64> {
            self.record_call();
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks.iter().filter(|t| filter.matches(t)).count() as i64)
        }

        async fn find_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>> {
            self.record_call();
            let executions = self.executions.lock().unwrap();
            Ok(executions
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect())
        }

        async fn find_process_instances(
            &self,
            filter: &ProcessInstanceFilter,
        ) -> Result<Vec<ProcessInstance>> {
            self.record_call();
            let instances = self.process_instances.lock().unwrap();
            Ok(instances
                .iter()
                .filter(|i| filter.matches(i))
                .cloned()
                .collect())
        }

        async fn find_variables(&self, filter: &VariableFilter) -> Result<Vec<VariableInstance>> {
            self.record_call();
            let variables = self.variables.lock().unwrap();
            Ok(variables
                .iter()
                .filter(|v| filter.matches(v))
                .cloned()
                .collect())
        }

        async fn find_historic_process_instances(
            &self,
            filter: &HistoricProcessInstanceFilter,
        ) -> Result<Vec<HistoricProcessInstance>> {
            self.record_call();
            let instances = self.historic_process_instances.lock().unwrap();
            Ok(instances
                .iter()
                .filter(|i| filter.matches(i))
                .cloned()
                .collect())
        }

        async fn find_historic_activities(
            &self,
            filter: &HistoricActivityFilter,
        ) -> Result<Vec<HistoricActivityInstance>> {
            self.record_call();
            let activities = self.historic_activities.lock().unwrap();
            Ok(activities
                .iter()
                .filter(|a| filter.matches(a))
                .cloned()
                .collect())
        }

        async fn find_historic_tasks(
            &self,
            filter: &HistoricTaskFilter,
        ) -> Result<Vec<HistoricTaskInstance>> {
            self.record_call();
            let tasks = self.historic_tasks.lock().unwrap();
            Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
        }

        async fn find_historic_variables(
            &self,
            filter: &HistoricVariableFilter,
        ) -> Result<Vec<HistoricVariableInstance>> {
            self.record_call();
            let variables = self.historic_variables.lock().unwrap();
            Ok(variables
                .iter()
                .filter(|v| filter.matches(v))
                .cloned()
                .collect())
        }
    }
}
