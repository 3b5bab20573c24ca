//! Dialogue phase state machine.
//!
//! Tracks where the clarification dialogue sits in its ask/wait/record/
//! evaluate loop. `Ended` is absorbing; `Escalating` always moves on to
//! `Ended` once scheduling has been attempted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The current phase of a clarification dialogue.
///
/// The loop runs `GeneratingQuestion` → `AwaitingAnswer` → `Evaluating`,
/// then either back to `GeneratingQuestion` or out through `Escalating`
/// to `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// A question is being produced (also the phase of a conversation
    /// that has not asked anything yet).
    #[default]
    GeneratingQuestion,

    /// A question is pending; control is with the respondent.
    AwaitingAnswer,

    /// An answer has just been recorded; the termination policy runs next.
    Evaluating,

    /// Terminal outcome decided; scheduling is being attempted.
    Escalating,

    /// Absorbing final state. Submitted answers are ignored from here on.
    Ended,
}

impl DialoguePhase {
    /// Returns true if an answer submission is meaningful in this phase.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::AwaitingAnswer)
    }

    /// Short label for logs and views.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeneratingQuestion => "generating_question",
            Self::AwaitingAnswer => "awaiting_answer",
            Self::Evaluating => "evaluating",
            Self::Escalating => "escalating",
            Self::Ended => "ended",
        }
    }
}

impl StateMachine for DialoguePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialoguePhase::*;
        matches!(
            (self, target),
            // Question posed, control handed to the respondent
            (GeneratingQuestion, AwaitingAnswer) |
            // Answer recorded
            (AwaitingAnswer, Evaluating) |
            // Termination policy: continue or escalate
            (Evaluating, GeneratingQuestion) |
            (Evaluating, Escalating) |
            // Frustration short-circuit while a question is still pending
            (AwaitingAnswer, Escalating) |
            // Scheduling attempted, dialogue closed
            (Escalating, Ended)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialoguePhase::*;
        match self {
            GeneratingQuestion => vec![AwaitingAnswer],
            AwaitingAnswer => vec![Evaluating, Escalating],
            Evaluating => vec![GeneratingQuestion, Escalating],
            Escalating => vec![Ended],
            Ended => vec![],
        }
    }
}
