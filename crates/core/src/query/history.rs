// Historic Query Builders

use crate::domain::{
    HistoricActivityInstance, HistoricProcessInstance, HistoricTaskInstance,
    HistoricVariableInstance,
};
use crate::error::Result;
use crate::port::QueryGateway;
use crate::query::filter::{
    HistoricActivityFilter, HistoricProcessInstanceFilter, HistoricTaskFilter,
    HistoricVariableFilter,
};
use crate::query::runtime::single_from;
use std::sync::Arc;

/// Query for historic process instances
pub struct HistoricProcessInstanceQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: HistoricProcessInstanceFilter,
}

impl HistoricProcessInstanceQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: HistoricProcessInstanceFilter::default(),
        }
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn process_definition_key(mut self, key: impl Into<String>) -> Self {
        self.filter.process_definition_key = Some(key.into());
        self
    }

    /// Only ended instances
    pub fn finished(mut self) -> Self {
        self.filter.finished = Some(true);
        self
    }

    /// Only still-running instances
    pub fn unfinished(mut self) -> Self {
        self.filter.finished = Some(false);
        self
    }

    pub fn filter(&self) -> &HistoricProcessInstanceFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<HistoricProcessInstance>> {
        self.gateway
            .find_historic_process_instances(&self.filter)
            .await
    }

    pub async fn single_result(self) -> Result<Option<HistoricProcessInstance>> {
        let instances = self
            .gateway
            .find_historic_process_instances(&self.filter)
            .await?;
        single_from("HistoricProcessInstance", instances)
    }
}

/// Query for historic activity instances
pub struct HistoricActivityQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: HistoricActivityFilter,
}

impl HistoricActivityQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: HistoricActivityFilter::default(),
        }
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn activity_id(mut self, id: impl Into<String>) -> Self {
        self.filter.activity_id = Some(id.into());
        self
    }

    pub fn finished(mut self) -> Self {
        self.filter.finished = Some(true);
        self
    }

    pub fn unfinished(mut self) -> Self {
        self.filter.finished = Some(false);
        self
    }

    pub fn filter(&self) -> &HistoricActivityFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<HistoricActivityInstance>> {
        self.gateway.find_historic_activities(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<HistoricActivityInstance>> {
        let activities = self.gateway.find_historic_activities(&self.filter).await?;
        single_from("HistoricActivityInstance", activities)
    }
}

/// Query for historic task instances
pub struct HistoricTaskQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: HistoricTaskFilter,
}

impl HistoricTaskQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: HistoricTaskFilter::default(),
        }
    }

    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.filter.task_id = Some(id.into());
        self
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn task_definition_key(mut self, key: impl Into<String>) -> Self {
        self.filter.task_definition_key = Some(key.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.filter.assignee = Some(assignee.into());
        self
    }

    pub fn finished(mut self) -> Self {
        self.filter.finished = Some(true);
        self
    }

    pub fn filter(&self) -> &HistoricTaskFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<HistoricTaskInstance>> {
        self.gateway.find_historic_tasks(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<HistoricTaskInstance>> {
        let tasks = self.gateway.find_historic_tasks(&self.filter).await?;
        single_from("HistoricTaskInstance", tasks)
    }
}

/// Query for historic variables
pub struct HistoricVariableQuery {
    gateway: Arc<dyn QueryGateway>,
    filter: HistoricVariableFilter,
}

impl HistoricVariableQuery {
    pub(crate) fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            filter: HistoricVariableFilter::default(),
        }
    }

    pub fn process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.filter.process_instance_id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filter.name = Some(name.into());
        self
    }

    pub fn filter(&self) -> &HistoricVariableFilter {
        &self.filter
    }

    pub async fn list(self) -> Result<Vec<HistoricVariableInstance>> {
        self.gateway.find_historic_variables(&self.filter).await
    }

    pub async fn single_result(self) -> Result<Option<HistoricVariableInstance>> {
        let variables = self.gateway.find_historic_variables(&self.filter).await?;
        single_from("HistoricVariableInstance", variables)
    }
}
