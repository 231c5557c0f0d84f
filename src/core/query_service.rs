use tokio::sync::mpsc;
use tracing::debug;

use crate::api::QueryRequest;
use crate::backend::SharedBackend;
use crate::core::answer::Answer;
use crate::core::session::{QueryParams, SessionAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered(Answer),
    Failed(String),
}

impl QueryOutcome {
    pub fn into_action(self, submission_id: u64) -> SessionAction {
        match self {
            QueryOutcome::Answered(answer) => SessionAction::Resolve {
                submission_id,
                answer,
            },
            QueryOutcome::Failed(reason) => SessionAction::Fail {
                submission_id,
                reason,
            },
        }
    }
}

/// Runs backend calls as tasks on the current runtime and reports each
/// outcome, tagged with its submission id, on a channel.
#[derive(Clone)]
pub struct QueryService {
    backend: SharedBackend,
    tx: mpsc::UnboundedSender<(QueryOutcome, u64)>,
}

impl QueryService {
    pub fn new(backend: SharedBackend) -> (Self, mpsc::UnboundedReceiver<(QueryOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn spawn_query(&self, params: QueryParams) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let QueryParams {
                submission_id,
                request,
            } = params;
            let outcome = run_query(backend, request).await;
            if tx.send((outcome, submission_id)).is_err() {
                debug!(submission_id, "Query outcome dropped; receiver closed");
            }
        });
    }
}

pub async fn run_query(backend: SharedBackend, request: QueryRequest) -> QueryOutcome {
    match backend.ask(request).await {
        Ok(response) => QueryOutcome::Answered(Answer::from(response)),
        Err(err) => QueryOutcome::Failed(err.to_string()),
    }
}
