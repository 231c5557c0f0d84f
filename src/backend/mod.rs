//! The question-answering service the session talks to.
//!
//! The session never knows how an answer is produced: it only awaits a
//! [`QueryBackend`]. [`http::HttpBackend`] talks to a real service, while
//! [`sample::SampleBackend`] serves a canned answer for demos and offline use.

pub mod http;
pub mod sample;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{QueryRequest, QueryResponse};
use crate::core::config::data::Config;

pub use http::HttpBackend;
pub use sample::SampleBackend;

/// Why a backend call produced no answer. The `Display` form is what the
/// user sees in the failed session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Could not reach the legal assistant: {0}")]
    Transport(String),
    #[error("The legal assistant returned an error ({status}): {summary}")]
    Status { status: u16, summary: String },
    #[error("The legal assistant sent an unreadable response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Short label used in titles and logs.
    fn name(&self) -> &str;

    async fn ask(&self, request: QueryRequest) -> Result<QueryResponse, BackendError>;
}

pub type SharedBackend = Arc<dyn QueryBackend>;

/// A remote service when a base URL is given, otherwise the built-in
/// sample answer.
pub fn select_backend(
    base_url: Option<String>,
    sample_latency: Duration,
    client: reqwest::Client,
) -> SharedBackend {
    match base_url {
        Some(base_url) => Arc::new(HttpBackend::new(client, base_url)),
        None => Arc::new(SampleBackend::new(sample_latency)),
    }
}

pub fn backend_from_config(config: &Config, client: reqwest::Client) -> SharedBackend {
    select_backend(
        config.effective_backend_url(),
        Duration::from_millis(config.sample_latency_ms()),
        client,
    )
}
