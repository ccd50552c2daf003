// Query Service - entry point handing out fluent query builders

use crate::port::QueryGateway;
use crate::query::history::{
    HistoricActivityQuery, HistoricProcessInstanceQuery, HistoricTaskQuery, HistoricVariableQuery,
};
use crate::query::runtime::{
    ExecutionQuery, JobQuery, ProcessInstanceQuery, TaskQuery, VariableQuery,
};
use std::sync::Arc;

/// Cloneable handle over a QueryGateway, one constructor per builder
#[derive(Clone)]
pub struct QueryService {
    gateway: Arc<dyn QueryGateway>,
}

impl QueryService {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }

    pub fn job_query(&self) -> JobQuery {
        JobQuery::new(Arc::clone(&self.gateway))
    }

    pub fn task_query(&self) -> TaskQuery {
        TaskQuery::new(Arc::clone(&self.gateway))
    }

    pub fn execution_query(&self) -> ExecutionQuery {
        ExecutionQuery::new(Arc::clone(&self.gateway))
    }

    pub fn process_instance_query(&self) -> ProcessInstanceQuery {
        ProcessInstanceQuery::new(Arc::clone(&self.gateway))
    }

    pub fn variable_query(&self) -> VariableQuery {
        VariableQuery::new(Arc::clone(&self.gateway))
    }

    pub fn historic_process_instance_query(&self) -> HistoricProcessInstanceQuery {
        HistoricProcessInstanceQuery::new(Arc::clone(&self.gateway))
    }

    pub fn historic_activity_query(&self) -> HistoricActivityQuery {
        HistoricActivityQuery::new(Arc::clone(&self.gateway))
    }

    pub fn historic_task_query(&self) -> HistoricTaskQuery {
        HistoricTaskQuery::new(Arc::clone(&self.gateway))
    }

    pub fn historic_variable_query(&self) -> HistoricVariableQuery {
        HistoricVariableQuery::new(Arc::clone(&self.gateway))
    }
}
