//! Query session lifecycle.
//!
//! A [`QuerySession`] owns the single [`SessionState`] of the client and is
//! the only place that decides whether a query may be sent. Input arrives
//! as [`SessionAction`]s; when a transition needs the backend, the session
//! hands back a [`SessionCommand`] for the event loop to execute. Backend
//! outcomes come back as actions tagged with the submission id they belong
//! to, so the state machine never needs a lock: at most one submission is
//! in flight and anything else is ignored.

use std::mem;

use tracing::{debug, info, warn};

use crate::api::QueryRequest;
use crate::core::answer::{Answer, CitationRegistry};
use crate::core::markup::{format_answer, StyledRun};


/// An answer whose narrative has already been turned into styled runs.
///
/// Formatting happens once, when the answer arrives; the runs are never
/// recomputed or changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAnswer {
    answer: Answer,
    runs: Vec<StyledRun>,
}

impl RenderedAnswer {
    pub fn new(answer: Answer) -> Self {
        let runs = format_answer(answer.narrative_markup());
        Self { answer, runs }
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn citations(&self) -> CitationRegistry<'_> {
        self.answer.citations()
    }
}

/// The last finished outcome, kept on screen while a new query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Answered(RenderedAnswer),
    Failed(String),
}

/// The submission currently waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    pub query: String,
    pub previous: Option<Settled>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting(Submission),
    Answered(RenderedAnswer),
    Failed(String),
}

impl SessionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SessionState::Submitting(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting(_) => "submitting",
            SessionState::Answered(_) => "answered",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// What the presentation layer should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displayed<'a> {
    Nothing,
    Answer(&'a RenderedAnswer),
    Failure(&'a str),
}

impl<'a> From<&'a Settled> for Displayed<'a> {
    fn from(settled: &'a Settled) -> Self {
        match settled {
            Settled::Answered(answer) => Displayed::Answer(answer),
            Settled::Failed(reason) => Displayed::Failure(reason),
        }
    }
}

/// Everything that can change a [`QuerySession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Submit { query: String },
    Resolve { submission_id: u64, answer: Answer },
    Fail { submission_id: u64, reason: String },
}

/// Parameters for one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub submission_id: u64,
    pub request: QueryRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Dispatch(QueryParams),
}

#[derive(Debug, Default)]
pub struct QuerySession {
    state: SessionState,
    last_submission_id: u64,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_submitting()
    }

    /// Whether the submit control should be enabled for `query`.
    pub fn can_submit(&self, query: &str) -> bool {
        !self.is_busy() && !query.trim().is_empty()
    }

    /// Id of the submission waiting on the backend, if any.
    pub fn in_flight(&self) -> Option<u64> {
        match &self.state {
            SessionState::Submitting(submission) => Some(submission.id),
            _ => None,
        }
    }

    pub fn displayed(&self) -> Displayed<'_> {
        match &self.state {
            SessionState::Idle => Displayed::Nothing,
            SessionState::Submitting(submission) => submission
                .previous
                .as_ref()
                .map_or(Displayed::Nothing, Displayed::from),
            SessionState::Answered(answer) => Displayed::Answer(answer),
            SessionState::Failed(reason) => Displayed::Failure(reason),
        }
    }

    /// Start a submission for `query`.
    ///
    /// Blank queries and submissions while another one is in flight leave
    /// the state untouched and return `None`. Otherwise the state moves to
    /// `Submitting` and exactly one dispatch command is returned.
    pub fn submit(&mut self, query: &str) -> Option<SessionCommand> {
        if query.trim().is_empty() {
            debug!("Ignoring blank query");
            return None;
        }
        if let Some(id) = self.in_flight() {
            debug!(in_flight = id, "Ignoring submit while a query is in flight");
            return None;
        }

        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        let previous = match mem::take(&mut self.state) {
            SessionState::Answered(answer) => Some(Settled::Answered(answer)),
            SessionState::Failed(reason) => Some(Settled::Failed(reason)),
            SessionState::Idle | SessionState::Submitting(_) => None,
        };

        info!(
            submission_id,
            chars = query.chars().count(),
            "Submitting legal query"
        );
        self.state = SessionState::Submitting(Submission {
            id: submission_id,
            query: query.to_string(),
            previous,
        });

        Some(SessionCommand::Dispatch(QueryParams {
            submission_id,
            request: QueryRequest {
                query: query.to_string(),
            },
        }))
    }

    /// Apply a backend answer. Returns `false` when it does not belong to
    /// the submission in flight.
    pub fn resolve(&mut self, submission_id: u64, answer: Answer) -> bool {
        if !self.accepts(submission_id) {
            return false;
        }
        info!(
            submission_id,
            citations = answer.citations().len(),
            "Query answered"
        );
        self.state = SessionState::Answered(RenderedAnswer::new(answer));
        true
    }

    /// Apply a backend failure. Returns `false` when it does not belong to
    /// the submission in flight.
    pub fn fail(&mut self, submission_id: u64, reason: impl Into<String>) -> bool {
        if !self.accepts(submission_id) {
            return false;
        }
        let reason = reason.into();
        warn!(submission_id, reason = %reason, "Query failed");
        self.state = SessionState::Failed(reason);
        true
    }

    fn accepts(&self, submission_id: u64) -> bool {
        match self.in_flight() {
            Some(id) if id == submission_id => true,
            in_flight => {
                debug!(
                    submission_id,
                    in_flight = ?in_flight,
                    state = self.state.label(),
                    "Ignoring stale backend outcome"
                );
                false
            }
        }
    }
}

/// Apply one action, returning the backend work it requires.
pub fn apply_action(session: &mut QuerySession, action: SessionAction) -> Option<SessionCommand> {
    match action {
        SessionAction::Submit { query } => session.submit(&query),
        SessionAction::Resolve {
            submission_id,
            answer,
        } => {
            session.resolve(submission_id, answer);
            None
        }
        SessionAction::Fail {
            submission_id,
            reason,
        } => {
            session.fail(submission_id, reason);
            None
        }
    }
}
