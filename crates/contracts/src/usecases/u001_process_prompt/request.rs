use serde::{Deserialize, Serialize};

/// Body of `POST /api/process/init`; the backend takes no parameters yet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitThreadRequest {}

/// Body of `POST /api/process`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Trimmed prompt text
    pub text: String,
    /// Thread returned by the init call, passed through unchanged
    pub thread_id: String,
    /// Video index to search in
    pub index_id: String,
}

impl ProcessRequest {
    pub fn new(text: &str, thread_id: &str, index_id: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            thread_id: thread_id.to_string(),
            index_id: index_id.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_request_trims_inputs() {
        let req = ProcessRequest::new("  puppies on a beach \n", "t-1", " idx ");
        assert_eq!(req.text, "puppies on a beach");
        assert_eq!(req.thread_id, "t-1");
        assert_eq!(req.index_id, "idx");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"text": "puppies on a beach", "thread_id": "t-1", "index_id": "idx"})
        );
    }

    #[test]
    fn test_init_request_is_empty_object() {
        assert_eq!(serde_json::to_string(&InitThreadRequest::default()).unwrap(), "{}");
    }
}
