use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{BackendError, QueryBackend};
use crate::api::{QueryCitation, QueryRequest, QueryResponse};
use crate::core::constants::{
    SAMPLE_ANSWER, SAMPLE_CITATION_LINK, SAMPLE_CITATION_PARAGRAPH, SAMPLE_CITATION_SOURCE,
    SAMPLE_CITATION_TEXT,
};

/// Answers every query with the bundled motor-accident sample after a
/// fixed delay standing in for retrieval and generation time.
#[derive(Debug, Clone)]
pub struct SampleBackend {
    latency: Duration,
}

impl SampleBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

pub fn sample_response() -> QueryResponse {
    QueryResponse {
        answer: SAMPLE_ANSWER.to_string(),
        citations: vec![QueryCitation {
            text: SAMPLE_CITATION_TEXT.to_string(),
            source: SAMPLE_CITATION_SOURCE.to_string(),
            paragraph: SAMPLE_CITATION_PARAGRAPH.to_string(),
            link: SAMPLE_CITATION_LINK.to_string(),
        }],
    }
}

#[async_trait]
impl QueryBackend for SampleBackend {
    fn name(&self) -> &str {
        "sample"
    }

    async fn ask(&self, request: QueryRequest) -> Result<QueryResponse, BackendError> {
        debug!(
            chars = request.query.chars().count(),
            latency_ms = self.latency.as_millis() as u64,
            "Serving sample answer"
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(sample_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::answer::Answer;
    use crate::core::markup::{format_answer, RunKind};

    #[tokio::test(start_paused = true)]
    async fn sample_backend_waits_for_configured_latency() {
        let backend = SampleBackend::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();

        let response = backend
            .ask(QueryRequest {
                query: "anything".to_string(),
            })
            .await
            .expect("sample answer");

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].source, "Dani_Devi_v_Pritam_Singh.pdf");
    }

    #[test]
    fn sample_answer_has_case_name_and_holding_markup() {
        let answer = Answer::from(sample_response());
        let runs = format_answer(answer.narrative_markup());

        assert!(runs
            .iter()
            .any(|run| run.kind == RunKind::Emphasis && run.text == "Dani Devi v. Pritam Singh"));
        assert!(runs.iter().any(|run| run.kind == RunKind::Strong
            && run.text == "10% of the deceased's annual income"));
    }
}
