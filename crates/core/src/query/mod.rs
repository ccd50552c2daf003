// Query Layer - Filters and fluent query builders over the QueryGateway port

pub mod filter;
pub mod history;
pub mod runtime;
pub mod service;

// Re-exports
pub use filter::{
    ExecutionFilter, HistoricActivityFilter, HistoricProcessInstanceFilter, HistoricTaskFilter,
    HistoricVariableFilter, JobFilter, ProcessInstanceFilter, TaskFilter, VariableFilter,
};
pub use history::{
    HistoricActivityQuery, HistoricProcessInstanceQuery, HistoricTaskQuery, HistoricVariableQuery,
};
pub use runtime::{ExecutionQuery, JobQuery, ProcessInstanceQuery, TaskQuery, VariableQuery};
pub use service::QueryService;
