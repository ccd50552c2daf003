// Failure Message Rendering
// Compact entity descriptors and timestamp rendering for assertion messages.

use chrono::{DateTime, SecondsFormat};
use procflow_core::domain::{Job, ProcessInstance, Task};

pub(crate) fn job(job: &Job) -> String {
    format!(
        "Job {{id: '{}', process_instance_id: '{}', execution_id: '{}'}}",
        job.id, job.process_instance_id, job.execution_id
    )
}

pub(crate) fn task(task: &Task) -> String {
    format!(
        "Task {{id: '{}', task_definition_key: '{}', process_instance_id: '{}'}}",
        task.id, task.task_definition_key, task.process_instance_id
    )
}

pub(crate) fn process_instance(instance: &ProcessInstance) -> String {
    format!(
        "ProcessInstance {{id: '{}', process_definition_key: '{}'}}",
        instance.id, instance.process_definition_key
    )
}

/// Epoch-ms timestamp as a UTC datetime; falls back to the raw number for
/// values chrono cannot represent.
pub(crate) fn timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(datetime) => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}

pub(crate) fn opt_timestamp(millis: Option<i64>) -> String {
    match millis {
        Some(millis) => timestamp(millis),
        None => "none".to_string(),
    }
}

pub(crate) fn opt_str(value: Option<&str>) -> String {
    value.unwrap_or("none").to_string()
}
