use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Response of `POST /api/process/init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitThreadResponse {
    pub thread_id: String,
}

/// Response of `POST /api/process`; the backend only guarantees the first two fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub operation_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timeline: HashMap<String, String>,
    #[serde(default)]
    pub stats: Option<Value>,
    #[serde(default)]
    pub response: Value,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response of `GET /api/config/index-id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexIdConfigResponse {
    #[serde(default)]
    pub index_id: Option<String>,
}
