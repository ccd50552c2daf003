// Domain Layer - Pure entity model

pub mod error;
pub mod execution;
pub mod history;
pub mod job;
pub mod process_instance;
pub mod task;
pub mod variable;

// Re-exports
pub use error::DomainError;
pub use execution::{Execution, ExecutionId};
pub use history::{
    HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance,
};
pub use job::{Job, JobId};
pub use process_instance::{ProcessInstance, ProcessInstanceId};
pub use task::{Task, TaskId};
pub use variable::VariableInstance;
