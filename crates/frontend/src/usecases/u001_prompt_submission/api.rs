//! HTTP client for the Jockey processing endpoints.

use crate::shared::api_utils::api_url;
use crate::shared::config::AppConfig;
use async_trait::async_trait;
use contracts::usecases::u001_process_prompt::{
    ErrorDetail, IndexIdConfigResponse, InitThreadRequest, InitThreadResponse, ProcessRequest,
    ProcessResponse,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

/// Backend calls made by one submission
#[async_trait(?Send)]
pub trait JockeyApi {
    /// `POST /api/process/init`
    async fn init_thread(&self) -> Result<InitThreadResponse, ApiError>;
    /// `POST /api/process`; resolves once the backend finished the run
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, ApiError>;
}

pub struct HttpJockeyApi {
    config: AppConfig,
}

impl HttpJockeyApi {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let detail = resp
            .json::<ErrorDetail>()
            .await
            .ok()
            .and_then(|body| body.detail);
        return Err(ApiError::Status { status, detail });
    }
    resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl JockeyApi for HttpJockeyApi {
    async fn init_thread(&self) -> Result<InitThreadResponse, ApiError> {
        let resp = Request::post(&api_url(&self.config, "/api/process/init"))
            .json(&InitThreadRequest::default())
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, ApiError> {
        let resp = Request::post(&api_url(&self.config, "/api/process"))
            .json(request)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }
}

/// Default index id configured on the backend, used when none was compiled in
pub async fn fetch_default_index_id(config: &AppConfig) -> Result<Option<String>, ApiError> {
    let resp = Request::get(&api_url(config, "/api/config/index-id"))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let body: IndexIdConfigResponse = read_json(resp).await?;
    Ok(body.index_id.filter(|id| !id.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_messages() {
        let with_detail = ApiError::Status {
            status: 422,
            detail: Some("index not found".into()),
        };
        assert_eq!(with_detail.to_string(), "HTTP 422: index not found");

        let bare = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "HTTP 500");
        assert_eq!(
            ApiError::Network("offline".into()).to_string(),
            "Network error: offline"
        );
    }
}
