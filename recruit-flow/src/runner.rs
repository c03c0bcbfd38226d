//! FlowRunner – loads a session, runs exactly **one** dialogue turn, and saves the session back.
//!
//! Hosts that serve one turn per request (HTTP handlers, chat bots) share a single runner and
//! call [`FlowRunner::submit`] with the session id they got from [`FlowRunner::open`]. Hosts that
//! drive a whole dialogue in memory can use [`Dialogue`] directly and skip storage.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    dialogue::{Dialogue, ExpectedInput, SubmitOutcome},
    error::{FlowError, Result},
    filter::{Filter, materialize},
    input::UserInput,
    storage::{Session, SessionStorage},
    transition::TransitionTable,
};

/// What a host needs to render after a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub session_id: String,
    pub outcome: Option<SubmitOutcome>,
    pub prompt: String,
    pub expected_input: ExpectedInput,
    pub complete: bool,
    /// Present once the dialogue is complete
    pub filter: Option<Filter>,
}

impl Turn {
    fn from_dialogue(session_id: &str, dialogue: &Dialogue, outcome: Option<SubmitOutcome>) -> Self {
        let complete = dialogue.is_complete();
        Self {
            session_id: session_id.to_string(),
            outcome,
            prompt: dialogue.prompt().to_string(),
            expected_input: dialogue.expected_input(),
            complete,
            filter: complete.then(|| dialogue.materialize()),
        }
    }
}

/// High-level helper for the _load → submit → save_ pattern.
#[derive(Clone)]
pub struct FlowRunner {
    table: Arc<TransitionTable>,
    storage: Arc<dyn SessionStorage>,
}

impl FlowRunner {
    pub fn new(table: Arc<TransitionTable>, storage: Arc<dyn SessionStorage>) -> Self {
        Self { table, storage }
    }

    /// Starts a new dialogue and stores it
    pub async fn open(&self) -> Result<Turn> {
        let dialogue = Dialogue::with_table(self.table.clone());
        let session = Session::new(dialogue.state().clone());
        let turn = Turn::from_dialogue(&session.id, &dialogue, None);

        info!(session_id = %session.id, table = %self.table.id, "opened dialogue");
        self.storage.save(session).await?;
        Ok(turn)
    }

    /// Runs **exactly one** `submit` for the given session and persists the result.
    ///
    /// Sessions are not locked between load and save: two concurrent turns on the same
    /// session both succeed and the last save wins.
    pub async fn submit(&self, session_id: &str, input: UserInput) -> Result<Turn> {
        let mut session = self.load(session_id).await?;

        let mut dialogue = Dialogue::from_state(self.table.clone(), session.state);
        let outcome = dialogue.submit(input);
        let turn = Turn::from_dialogue(session_id, &dialogue, Some(outcome));

        info!(
            session_id = %session_id,
            outcome = ?outcome,
            step = %dialogue.current_step(),
            "dialogue turn"
        );

        session.state = dialogue.into_state();
        session.touch();
        self.storage.save(session).await?;

        Ok(turn)
    }

    /// Filter for the answers collected so far in a session
    pub async fn filter(&self, session_id: &str) -> Result<Filter> {
        let session = self.load(session_id).await?;
        Ok(materialize(&session.state.answers))
    }

    pub async fn session(&self, session_id: &str) -> Result<Session> {
        self.load(session_id).await
    }

    /// Discards a session
    pub async fn cancel(&self, session_id: &str) -> Result<()> {
        self.load(session_id).await?;
        info!(session_id = %session_id, "dialogue cancelled");
        self.storage.delete(session_id).await
    }

    /// Drops sessions idle for longer than `max_idle`.
    ///
    /// Completed dialogues stay fetchable until then so the caller can pick up the filter.
    pub async fn evict_idle(&self, max_idle: Duration) -> Result<usize> {
        let evicted = self.storage.evict_idle(max_idle).await?;
        if evicted > 0 {
            info!(evicted, max_idle_secs = max_idle.num_seconds(), "evicted idle dialogues");
        }
        Ok(evicted)
    }

    async fn load(&self, session_id: &str) -> Result<Session> {
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.to_string()))
    }
}
