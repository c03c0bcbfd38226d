pub mod answers;
pub mod conversation;
pub mod dialogue;
pub mod error;
pub mod filter;
pub mod input;
pub mod recruiter;
pub mod runner;
pub mod step;
pub mod storage;
pub mod transition;

// Re-export commonly used types
pub use answers::{AnswerPatch, PartialAnswers};
pub use conversation::{ConversationState, Message, Sender};
pub use dialogue::{Dialogue, ExpectedInput, SubmitOutcome};
pub use error::{FlowError, Result};
pub use filter::{Filter, materialize};
pub use input::UserInput;
pub use recruiter::recruiter_table;
pub use runner::{FlowRunner, Turn};
pub use step::{InputClass, StepId};
pub use storage::{InMemorySessionStorage, Session, SessionStorage};
pub use transition::{Transition, TransitionFn, TransitionTable, TransitionTableBuilder};
