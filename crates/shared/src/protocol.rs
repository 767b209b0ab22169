use serde::{Deserialize, Serialize};

use crate::domain::{LogicalClock, ProcessId};

/// Path prefix shared by every endpoint of the clock service.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProcessRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub destination_id: ProcessId,
    pub message: String,
}

/// Summary returned by `POST /process/{id}/event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreated {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<ProcessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_clock: Option<LogicalClock>,
}

/// Delivery confirmation returned by `POST /process/{id}/message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDelivered {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<ProcessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<ProcessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_clock: Option<LogicalClock>,
}
