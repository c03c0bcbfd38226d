use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    answers::{AnswerPatch, PartialAnswers},
    error::{FlowError, Result},
    input::UserInput,
    step::StepId,
};

/// What a step produces for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Step that becomes current
    pub next: StepId,
    /// Bot prompt appended to the transcript
    pub prompt: String,
    /// Fields to merge into the accumulator
    pub patch: AnswerPatch,
}

impl Transition {
    pub fn new(next: StepId, prompt: impl Into<String>, patch: AnswerPatch) -> Self {
        Self {
            next,
            prompt: prompt.into(),
            patch,
        }
    }

    /// Moves on without recording anything
    pub fn goto(next: StepId, prompt: impl Into<String>) -> Self {
        Self::new(next, prompt, AnswerPatch::default())
    }
}

/// Type alias for a step's transition function
pub type TransitionFn = Arc<dyn Fn(&UserInput, &PartialAnswers) -> Transition + Send + Sync>;

/// Maps each step to its transition function
#[derive(Clone)]
pub struct TransitionTable {
    pub id: String,
    transitions: HashMap<StepId, TransitionFn>,
    // Candidate onward steps per step, used for reachability checks
    successors: HashMap<StepId, Vec<StepId>>,
}

impl TransitionTable {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transitions: HashMap::new(),
            successors: HashMap::new(),
        }
    }

    /// Runs the transition registered for `step`. `None` if the table has no entry.
    pub fn apply(
        &self,
        step: StepId,
        input: &UserInput,
        answers: &PartialAnswers,
    ) -> Option<Transition> {
        self.transitions
            .get(&step)
            .map(|transition| transition(input, answers))
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.transitions.contains_key(&step)
    }

    /// Non-terminal steps without an entry
    pub fn missing_steps(&self) -> Vec<StepId> {
        StepId::ALL
            .into_iter()
            .filter(|step| !step.is_terminal() && !self.contains(*step))
            .collect()
    }

    /// Steps that declared successors may lead to, starting from the initial step
    pub fn reachable_steps(&self) -> BTreeSet<StepId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([StepId::initial()]);

        while let Some(step) = queue.pop_front() {
            if !seen.insert(step) {
                continue;
            }
            if let Some(next_steps) = self.successors.get(&step) {
                queue.extend(next_steps.iter().copied());
            }
        }
        seen
    }

    /// Declared onward steps for `step`
    pub fn successors(&self, step: StepId) -> &[StepId] {
        self.successors
            .get(&step)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Builder for transition tables
pub struct TransitionTableBuilder {
    table: TransitionTable,
}

impl TransitionTableBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            table: TransitionTable::new(id),
        }
    }

    /// Registers the transition for `step`. `successors` lists every step the
    /// function can return. Registering a step twice replaces the earlier entry.
    pub fn add_step<F>(mut self, step: StepId, successors: &[StepId], transition: F) -> Self
    where
        F: Fn(&UserInput, &PartialAnswers) -> Transition + Send + Sync + 'static,
    {
        self.table.transitions.insert(step, Arc::new(transition));
        self.table.successors.insert(step, successors.to_vec());
        self
    }

    pub fn build(self) -> TransitionTable {
        self.table
    }

    /// Builds the table, failing if any non-terminal step has no entry
    pub fn build_checked(self) -> Result<TransitionTable> {
        let missing = self.table.missing_steps();
        if missing.is_empty() {
            Ok(self.table)
        } else {
            Err(FlowError::IncompleteTable(missing))
        }
    }
}
