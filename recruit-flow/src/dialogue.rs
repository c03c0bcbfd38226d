use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    answers::PartialAnswers,
    conversation::{ConversationState, Message},
    filter::{Filter, materialize},
    input::UserInput,
    recruiter::{FALLBACK, GREETING, recruiter_table},
    step::{InputClass, StepId},
    transition::TransitionTable,
};

/// Result of one `submit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Moved to a non-terminal step
    Advanced { step: StepId },
    /// Reached the terminal step
    Completed,
    /// The current step had no transition; the dialogue restarted
    Fallback,
    /// The dialogue was already complete; nothing changed
    Rejected,
}

/// Control a caller should present for the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedInput {
    pub step: StepId,
    pub class: Option<InputClass>,
    pub options: Vec<String>,
}

/// Drives one filter-collection conversation
#[derive(Clone)]
pub struct Dialogue {
    table: Arc<TransitionTable>,
    state: ConversationState,
}

impl Dialogue {
    /// A started dialogue over the recruiter table
    pub fn new() -> Self {
        Self::with_table(Arc::new(recruiter_table()))
    }

    /// A started dialogue over a custom table
    pub fn with_table(table: Arc<TransitionTable>) -> Self {
        Self {
            table,
            state: ConversationState::new(GREETING),
        }
    }

    /// Resumes a dialogue from stored state. `is_terminal` is re-derived from the current step.
    pub fn from_state(table: Arc<TransitionTable>, mut state: ConversationState) -> Self {
        state.is_terminal = state.current_step.is_terminal();
        Self { table, state }
    }

    /// Resets to the initial step with the greeting prompt
    pub fn start(&mut self) {
        debug!(table = %self.table.id, "starting dialogue");
        self.state = ConversationState::new(GREETING);
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Feeds one input to the current step.
    ///
    /// The current step decides how `input` is read. Free text is accepted
    /// verbatim and never produces an error.
    pub fn submit(&mut self, input: impl Into<UserInput>) -> SubmitOutcome {
        let input = input.into();
        let step = self.state.current_step;

        if step.is_terminal() {
            warn!(step = %step, "input received after dialogue completed");
            return SubmitOutcome::Rejected;
        }

        self.state.transcript.push(Message::user(input.display()));

        let Some(transition) = self.table.apply(step, &input, &self.state.answers) else {
            warn!(
                table = %self.table.id,
                step = %step,
                "no transition for current step, restarting dialogue"
            );
            self.state.transcript.push(Message::bot(FALLBACK));
            self.state.current_step = StepId::initial();
            self.state.answers = PartialAnswers::default();
            return SubmitOutcome::Fallback;
        };

        info!(step = %step, next_step = %transition.next, "advancing dialogue");

        self.state.answers.merge(transition.patch);
        self.state.transcript.push(Message::bot(transition.prompt));
        self.state.current_step = transition.next;
        self.state.is_terminal = transition.next.is_terminal();

        if self.state.is_terminal {
            info!(table = %self.table.id, "dialogue complete");
            SubmitOutcome::Completed
        } else {
            SubmitOutcome::Advanced {
                step: transition.next,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_step.is_terminal()
    }

    /// Filter for the answers collected so far
    pub fn materialize(&self) -> Filter {
        materialize(&self.state.answers)
    }

    pub fn expected_input(&self) -> ExpectedInput {
        let step = self.state.current_step;
        ExpectedInput {
            step,
            class: step.input_class(),
            options: step.options(),
        }
    }

    pub fn current_step(&self) -> StepId {
        self.state.current_step
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn into_state(self) -> ConversationState {
        self.state
    }

    pub fn transcript(&self) -> &[Message] {
        &self.state.transcript
    }

    pub fn answers(&self) -> &PartialAnswers {
        &self.state.answers
    }

    /// Latest bot prompt
    pub fn prompt(&self) -> &str {
        self.state
            .last_bot_message()
            .map(|message| message.text.as_str())
            .unwrap_or_default()
    }
}

impl Default for Dialogue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conversation::Sender,
        recruiter::{ASK_EXPERIENCE, ASK_INSTITUTES_REQUIRED, COMPLETED},
        transition::{Transition, TransitionTableBuilder},
    };

    #[test]
    fn test_submit_appends_user_then_bot_message() {
        let mut dialogue = Dialogue::new();
        let outcome = dialogue.submit("Backend Engineer");

        assert_eq!(outcome, SubmitOutcome::Advanced { step: StepId::Experience });
        let transcript = dialogue.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0], Message::bot(GREETING));
        assert_eq!(transcript[1], Message::user("Backend Engineer"));
        assert_eq!(transcript[2], Message::bot(ASK_EXPERIENCE));
        assert_eq!(dialogue.answers().role.as_deref(), Some("Backend Engineer"));
    }

    #[test]
    fn test_expected_input_tracks_current_step() {
        let mut dialogue = Dialogue::new();
        assert_eq!(dialogue.expected_input().class, Some(InputClass::FreeText));
        dialogue.submit("SRE");
        dialogue.submit("3");
        let expected = dialogue.expected_input();
        assert_eq!(expected.step, StepId::Skills);
        assert_eq!(expected.class, Some(InputClass::MultiSelect));
        assert!(!expected.options.is_empty());
        dialogue.submit(vec!["Go"]);
        assert_eq!(dialogue.expected_input().options, vec!["Yes", "No"]);
    }

    #[test]
    fn test_empty_text_is_accepted() {
        let mut dialogue = Dialogue::new();
        assert_eq!(
            dialogue.submit(""),
            SubmitOutcome::Advanced { step: StepId::Experience }
        );
        assert_eq!(dialogue.answers().role.as_deref(), Some(""));
    }

    #[test]
    fn test_no_to_employers_skips_employer_list() {
        let mut dialogue = Dialogue::new();
        for input in [UserInput::text("SRE"), UserInput::text("4"), UserInput::selection(["Go"])] {
            dialogue.submit(input);
        }
        dialogue.submit(UserInput::choice("No"));
        assert_eq!(dialogue.current_step(), StepId::EmployersRequired);

        let outcome = dialogue.submit(UserInput::choice("No"));
        assert_eq!(
            outcome,
            SubmitOutcome::Advanced { step: StepId::InstitutesRequired }
        );
        assert_eq!(dialogue.prompt(), ASK_INSTITUTES_REQUIRED);
        assert!(dialogue.answers().companies_worked_at.is_none());
    }

    #[test]
    fn test_missing_step_falls_back_to_start() {
        let table = TransitionTableBuilder::new("partial")
            .add_step(StepId::Role, &[StepId::Experience], |input, _| {
                Transition::new(
                    StepId::Experience,
                    ASK_EXPERIENCE,
                    PartialAnswers::with_role(input.as_text()),
                )
            })
            .build();
        let mut dialogue = Dialogue::with_table(Arc::new(table));

        assert_eq!(
            dialogue.submit("SRE"),
            SubmitOutcome::Advanced { step: StepId::Experience }
        );
        assert_eq!(dialogue.submit("5"), SubmitOutcome::Fallback);
        assert_eq!(dialogue.current_step(), StepId::Role);
        assert!(dialogue.answers().is_empty());
        assert_eq!(dialogue.prompt(), FALLBACK);
        assert!(!dialogue.is_complete());
        // greeting, SRE, experience question, 5, fallback
        assert_eq!(dialogue.transcript().len(), 5);
    }

    #[test]
    fn test_complete_dialogue_rejects_input() {
        let table = TransitionTableBuilder::new("short")
            .add_step(StepId::Role, &[StepId::Complete], |_, _| {
                Transition::goto(StepId::Complete, COMPLETED)
            })
            .build();
        let mut dialogue = Dialogue::with_table(Arc::new(table));

        assert_eq!(dialogue.submit("SRE"), SubmitOutcome::Completed);
        assert!(dialogue.is_complete());
        let transcript_len = dialogue.transcript().len();

        assert_eq!(dialogue.submit("more"), SubmitOutcome::Rejected);
        assert_eq!(dialogue.transcript().len(), transcript_len);
        assert_eq!(dialogue.transcript().last().unwrap().sender, Sender::Bot);
    }

    #[test]
    fn test_completion_follows_current_step_on_resume() {
        let mut stale_flag = ConversationState::new(GREETING);
        stale_flag.is_terminal = true;
        let mut resumed = Dialogue::from_state(Arc::new(recruiter_table()), stale_flag);
        assert!(!resumed.is_complete());
        assert_eq!(
            resumed.submit("SRE"),
            SubmitOutcome::Advanced { step: StepId::Experience }
        );

        let mut missing_flag = ConversationState::new(GREETING);
        missing_flag.current_step = StepId::Complete;
        let mut finished = Dialogue::from_state(Arc::new(recruiter_table()), missing_flag);
        assert!(finished.is_complete());
        assert!(finished.state().is_terminal);
        assert_eq!(finished.submit("more"), SubmitOutcome::Rejected);
    }

    #[test]
    fn test_start_resets_state() {
        let mut dialogue = Dialogue::new();
        dialogue.submit("SRE");
        dialogue.submit("2");
        dialogue.start();

        assert_eq!(dialogue.current_step(), StepId::Role);
        assert_eq!(dialogue.transcript(), &[Message::bot(GREETING)]);
        assert!(dialogue.answers().is_empty());
    }
}
