use async_trait::async_trait;
use tracing::debug;

use super::{BackendError, QueryBackend};
use crate::api::{QueryRequest, QueryResponse};
use crate::utils::url::{construct_api_url, normalize_base_url};

const QUERY_ENDPOINT: &str = "query";

/// Posts queries as JSON to `<base_url>/query`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(&base_url.into()),
        }
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(&self.base_url, QUERY_ENDPOINT)
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn ask(&self, request: QueryRequest) -> Result<QueryResponse, BackendError> {
        let url = self.endpoint();
        debug!(url = %url, "Sending legal query");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        parse_query_response(&body)
    }
}

pub(crate) fn parse_query_response(body: &str) -> Result<QueryResponse, BackendError> {
    serde_json::from_str(body).map_err(|err| BackendError::Decode(err.to_string()))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce an error body to a single displayable line.
pub(crate) fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty response>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            return summary;
        }
        return json_value.to_string();
    }

    collapse_whitespace(trimmed)
}
