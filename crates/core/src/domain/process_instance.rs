// Process Instance Domain Model

use serde::{Deserialize, Serialize};

/// Process Instance ID
pub type ProcessInstanceId = String;

/// Process Instance Entity
///
/// One running execution of a process definition. A runtime row exists only
/// while the instance runs; ending an instance removes the runtime state and
/// closes the matching historic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub id: ProcessInstanceId,
    pub process_definition_key: String,
    pub process_definition_id: String,
    pub business_key: Option<String>,
    pub started_at: i64, // epoch ms
    pub suspended: bool,
}

impl ProcessInstance {
    pub fn new(
        id: impl Into<String>,
        started_at: i64,
        process_definition_key: impl Into<String>,
        process_definition_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            process_definition_key: process_definition_key.into(),
            process_definition_id: process_definition_id.into(),
            business_key: None,
            started_at,
            suspended: false,
        }
    }

    pub fn with_business_key(mut self, business_key: impl Into<String>) -> Self {
        self.business_key = Some(business_key.into());
        self
    }
}
