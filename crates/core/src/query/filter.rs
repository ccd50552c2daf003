// Query Filters
// Plain data carried from the fluent builders to a QueryGateway. Every field
// is optional; an unset field does not constrain the result. `matches` gives
// the reference semantics; SQL adapters must translate field-for-field.

use crate::domain::{
    Execution, HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance, Job, ProcessInstance, Task, VariableInstance,
};

/// Filter for runtime jobs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub job_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub deployment_id: Option<String>,
    /// true = only jobs with a non-empty exception message, false = only without
    pub with_exception: Option<bool>,
    /// only jobs due strictly before this timestamp (epoch ms)
    pub due_before: Option<i64>,
    pub suspended: Option<bool>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(id) = &self.job_id {
            if &job.id != id {
                return false;
            }
        }
        if let Some(pid) = &self.process_instance_id {
            if &job.process_instance_id != pid {
                return false;
            }
        }
        if let Some(eid) = &self.execution_id {
            if &job.execution_id != eid {
                return false;
            }
        }
        if let Some(dep) = &self.deployment_id {
            if job.deployment_id.as_deref() != Some(dep.as_str()) {
                return false;
            }
        }
        if let Some(with_exception) = self.with_exception {
            let has_exception = job
                .exception_message
                .as_deref()
                .map(|m| !m.is_empty())
                .unwrap_or(false);
            if has_exception != with_exception {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            match job.due_date {
                Some(due) if due < before => {}
                _ => return false,
            }
        }
        if let Some(suspended) = self.suspended {
            if job.suspended != suspended {
                return false;
            }
        }
        true
    }
}

/// Filter for runtime user tasks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub task_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub task_definition_key: Option<String>,
    pub assignee: Option<String>,
    pub unassigned: Option<bool>,
    pub name: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(id) = &self.task_id {
            if &task.id != id {
                return false;
            }
        }
        if let Some(pid) = &self.process_instance_id {
            if &task.process_instance_id != pid {
                return false;
            }
        }
        if let Some(eid) = &self.execution_id {
            if &task.execution_id != eid {
                return false;
            }
        }
        if let Some(key) = &self.task_definition_key {
            if &task.task_definition_key != key {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(unassigned) = self.unassigned {
            if task.assignee.is_none() != unassigned {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if task.name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Filter for runtime executions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionFilter {
    pub execution_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub activity_id: Option<String>,
}

impl ExecutionFilter {
    pub fn matches(&self, execution: &Execution) -> bool {
        if let Some(id) = &self.execution_id {
            if &execution.id != id {
                return false;
            }
        }
        if let Some(pid) = &self.process_instance_id {
            if &execution.process_instance_id != pid {
                return false;
            }
        }
        if let Some(activity_id) = &self.activity_id {
            if execution.activity_id.as_deref() != Some(activity_id.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Filter for runtime process instances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessInstanceFilter {
    pub process_instance_id: Option<String>,
    pub process_definition_key: Option<String>,
    pub business_key: Option<String>,
    pub suspended: Option<bool>,
}

impl ProcessInstanceFilter {
    pub fn matches(&self, instance: &ProcessInstance) -> bool {
        if let Some(id) = &self.process_instance_id {
            if &instance.id != id {
                return false;
            }
        }
        if let Some(key) = &self.process_definition_key {
            if &instance.process_definition_key != key {
                return false;
            }
        }
        if let Some(business_key) = &self.business_key {
            if instance.business_key.as_deref() != Some(business_key.as_str()) {
                return false;
            }
        }
        if let Some(suspended) = self.suspended {
            if instance.suspended != suspended {
                return false;
            }
        }
        true
    }
}

/// Filter for runtime variables
///
/// Narrowing by owning instance uses an id *set* here: an empty set matches
/// nothing, an unset field does not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableFilter {
    pub name: Option<String>,
    pub process_instance_ids: Option<Vec<String>>,
    pub execution_id: Option<String>,
}

impl VariableFilter {
    pub fn matches(&self, variable: &VariableInstance) -> bool {
        if let Some(name) = &self.name {
            if &variable.name != name {
                return false;
            }
        }
        if let Some(ids) = &self.process_instance_ids {
            if !ids.contains(&variable.process_instance_id) {
                return false;
            }
        }
        if let Some(eid) = &self.execution_id {
            if &variable.execution_id != eid {
                return false;
            }
        }
        true
    }
}

/// Filter for historic process instances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricProcessInstanceFilter {
    pub process_instance_id: Option<String>,
    pub process_definition_key: Option<String>,
    /// true = only ended instances, false = only still-running ones
    pub finished: Option<bool>,
}

impl HistoricProcessInstanceFilter {
    pub fn matches(&self, instance: &HistoricProcessInstance) -> bool {
        if let Some(id) = &self.process_instance_id {
            if &instance.id != id {
                return false;
            }
        }
        if let Some(key) = &self.process_definition_key {
            if &instance.process_definition_key != key {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if instance.ended_at.is_some() != finished {
                return false;
            }
        }
        true
    }
}

/// Filter for historic activity instances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricActivityFilter {
    pub process_instance_id: Option<String>,
    pub activity_id: Option<String>,
    pub finished: Option<bool>,
}

impl HistoricActivityFilter {
    pub fn matches(&self, activity: &HistoricActivityInstance) -> bool {
        if let Some(pid) = &self.process_instance_id {
            if &activity.process_instance_id != pid {
                return false;
            }
        }
        if let Some(activity_id) = &self.activity_id {
            if &activity.activity_id != activity_id {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if activity.ended_at.is_some() != finished {
                return false;
            }
        }
        true
    }
}

/// Filter for historic task instances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricTaskFilter {
    pub task_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub task_definition_key: Option<String>,
    pub assignee: Option<String>,
    pub finished: Option<bool>,
}

impl HistoricTaskFilter {
    pub fn matches(&self, task: &HistoricTaskInstance) -> bool {
        if let Some(id) = &self.task_id {
            if &task.id != id {
                return false;
            }
        }
        if let Some(pid) = &self.process_instance_id {
            if &task.process_instance_id != pid {
                return false;
            }
        }
        if let Some(key) = &self.task_definition_key {
            if &task.task_definition_key != key {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if task.completed_at.is_some() != finished {
                return false;
            }
        }
        true
    }
}

/// Filter for historic variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricVariableFilter {
    pub process_instance_id: Option<String>,
    pub name: Option<String>,
}

impl HistoricVariableFilter {
    pub fn matches(&self, variable: &HistoricVariableInstance) -> bool {
        if let Some(pid) = &self.process_instance_id {
            if &variable.process_instance_id != pid {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if &variable.name != name {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Job;

    #[test]
    fn default_filter_matches_everything() {
        let job = Job::new_test("pi1", "ex1");
        assert!(JobFilter::default().matches(&job));
    }

    #[test]
    fn with_exception_distinguishes_empty_messages() {
        let clean = Job::new_test("pi1", "ex1");
        let mut failed = Job::new_test("pi1", "ex1");
        failed.exception_message = Some("out of cheese".to_string());
        let mut blank = Job::new_test("pi1", "ex1");
        blank.exception_message = Some(String::new());

        let filter = JobFilter {
            with_exception: Some(true),
            ..Default::default()
        };
        assert!(!filter.matches(&clean));
        assert!(filter.matches(&failed));
        assert!(!filter.matches(&blank));
    }

    #[test]
    fn due_before_excludes_jobs_without_due_date() {
        let without = Job::new_test("pi1", "ex1");
        let due = Job::new_test("pi1", "ex1").with_due_date(500);

        let filter = JobFilter {
            due_before: Some(1000),
            ..Default::default()
        };
        assert!(!filter.matches(&without));
        assert!(filter.matches(&due));
    }

    #[test]
    fn variable_filter_instance_id_set() {
        let var = VariableInstance::new("v1", "amount", serde_json::json!(42), "pi1", "ex1");

        let hit = VariableFilter {
            process_instance_ids: Some(vec!["pi0".to_string(), "pi1".to_string()]),
            ..Default::default()
        };
        let miss = VariableFilter {
            process_instance_ids: Some(vec!["pi2".to_string()]),
            ..Default::default()
        };
        let empty = VariableFilter {
            process_instance_ids: Some(vec![]),
            ..Default::default()
        };
        assert!(hit.matches(&var));
        assert!(!miss.matches(&var));
        assert!(!empty.matches(&var));
    }
}
