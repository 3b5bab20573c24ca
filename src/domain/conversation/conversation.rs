//! Conversation aggregate entity.
//!
//! A Conversation is the unit of orchestration state for one triage
//! dialogue. It owns its turns and enforces the dialogue invariants:
//!
//! - at most one turn is pending at any time;
//! - answers and sentiments are written at most once per turn;
//! - `frustration_flag` and `terminal` only ever flip false→true;
//! - the escalation handle is written at most once;
//! - the turn count never exceeds `turn_budget + 1` (the +1 covers the
//!   opening question, which is asked before any budget check runs).
//!
//! Mutations go through the outcome-returning methods below. Out-of-order
//! calls (answering an ended conversation, asking while a question is
//! pending) are rejected as no-ops with a typed outcome, never a panic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, StateMachine, ValidationError};
use crate::domain::triage::Sentiment;

use super::phase::DialoguePhase;
use super::turn::Turn;

/// Maximum question/answer exchanges before forced escalation.
pub const DEFAULT_TURN_BUDGET: usize = 10;

/// The stateful record of one triage dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, doubles as the session key.
    id: ConversationId,

    /// Original client email text. Immutable after creation.
    subject_email: String,

    /// Contact handle used on the escalation artifact.
    client_identifier: String,

    /// Issue summary produced by initial triage.
    issue_summary: String,

    /// Seed questions from initial triage. Read-only reference material
    /// for question generation.
    candidate_questions: Vec<String>,

    /// Dialogue history, insertion order significant.
    turns: Vec<Turn>,

    /// Maximum turns allowed.
    turn_budget: usize,

    /// Set permanently once any answer classifies as angry or frustrated.
    frustration_flag: bool,

    /// Set once the machine has decided to stop asking questions.
    terminal: bool,

    /// Handle produced by a successful escalation, absent if scheduling
    /// was skipped or failed.
    escalation_handle: Option<String>,

    /// Where the dialogue sits in its ask/wait/record/evaluate loop.
    phase: DialoguePhase,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Result of posing a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// A new pending turn was appended.
    Asked,
    /// The conversation has already ended.
    AlreadyEnded,
    /// An unanswered question is still outstanding.
    PendingTurnExists,
    /// The question text exactly duplicates an earlier question.
    DuplicateQuestion,
    /// The turn list is already at its hard bound.
    BudgetExhausted,
}

/// Result of recording an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Answer and sentiment written to the pending turn.
    Recorded {
        /// True when this answer tripped the frustration short-circuit.
        frustration: bool,
    },
    /// Empty or whitespace-only submission; nothing written.
    IgnoredEmpty,
    /// No turn is waiting for an answer; nothing written.
    NoPendingTurn,
    /// The conversation has already ended; nothing written.
    AlreadyEnded,
}

impl Conversation {
    /// Creates a conversation fresh out of initial triage, before the
    /// opening question has been asked.
    pub fn new(
        subject_email: impl Into<String>,
        client_identifier: impl Into<String>,
        issue_summary: impl Into<String>,
        candidate_questions: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let subject_email = subject_email.into();
        let client_identifier = client_identifier.into();

        if subject_email.trim().is_empty() {
            return Err(ValidationError::empty_field("subject_email"));
        }
        if client_identifier.trim().is_empty() {
            return Err(ValidationError::empty_field("client_identifier"));
        }

        let now = Utc::now();
        Ok(Self {
            id: ConversationId::new(),
            subject_email,
            client_identifier,
            issue_summary: issue_summary.into(),
            candidate_questions,
            turns: Vec::new(),
            turn_budget: DEFAULT_TURN_BUDGET,
            frustration_flag: false,
            terminal: false,
            escalation_handle: None,
            phase: DialoguePhase::GeneratingQuestion,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overrides the turn budget. Intended for tests and configuration.
    pub fn with_turn_budget(mut self, budget: usize) -> Self {
        self.turn_budget = budget;
        self
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn subject_email(&self) -> &str {
        &self.subject_email
    }

    pub fn client_identifier(&self) -> &str {
        &self.client_identifier
    }

    pub fn issue_summary(&self) -> &str {
        &self.issue_summary
    }

    pub fn candidate_questions(&self) -> &[String] {
        &self.candidate_questions
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn_budget(&self) -> usize {
        self.turn_budget
    }

    pub fn frustration_detected(&self) -> bool {
        self.frustration_flag
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn escalation_handle(&self) -> Option<&str> {
        self.escalation_handle.as_deref()
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The single turn currently waiting for an answer, if any.
    pub fn pending_turn(&self) -> Option<&Turn> {
        self.turns.iter().find(|t| t.is_pending())
    }

    /// The question text currently awaiting an answer, if any.
    pub fn pending_question(&self) -> Option<&str> {
        self.pending_turn().map(|t| t.question())
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Appends a new pending turn for `question`.
    ///
    /// Rejects exact duplicates of earlier questions so the caller can
    /// retry question generation once before giving up.
    pub fn ask(&mut self, question: impl Into<String>) -> AskOutcome {
        self.ask_inner(question.into(), false)
    }

    /// Appends a new pending turn even if the question text repeats an
    /// earlier one. Used after the single duplicate retry.
    pub fn ask_allowing_repeat(&mut self, question: impl Into<String>) -> AskOutcome {
        self.ask_inner(question.into(), true)
    }

    fn ask_inner(&mut self, question: String, allow_repeat: bool) -> AskOutcome {
        if self.terminal {
            return AskOutcome::AlreadyEnded;
        }
        if self.pending_turn().is_some() {
            return AskOutcome::PendingTurnExists;
        }
        if self.turns.len() > self.turn_budget {
            return AskOutcome::BudgetExhausted;
        }
        if !allow_repeat && self.turns.iter().any(|t| t.question() == question) {
            return AskOutcome::DuplicateQuestion;
        }

        self.turns.push(Turn::new(question));
        self.advance_phase(DialoguePhase::AwaitingAnswer);
        self.touch();
        AskOutcome::Asked
    }

    /// Writes `answer` and its classified `sentiment` onto the pending
    /// turn (found by scanning for the first unanswered turn).
    ///
    /// A heated sentiment trips the frustration short-circuit: the flag
    /// and `terminal` are both set, regardless of how many turns have
    /// occurred.
    pub fn record_answer(&mut self, answer: &str, sentiment: Sentiment) -> RecordOutcome {
        if self.terminal {
            return RecordOutcome::AlreadyEnded;
        }
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return RecordOutcome::IgnoredEmpty;
        }

        let Some(pending) = self.turns.iter_mut().find(|t| t.is_pending()) else {
            return RecordOutcome::NoPendingTurn;
        };
        // Turn::record also guards the write-once rule, but the pending
        // scan above means it cannot fail here.
        pending.record(trimmed.to_string(), sentiment);

        let frustration = sentiment.is_heated();
        if frustration {
            self.frustration_flag = true;
            self.terminal = true;
        }
        self.advance_phase(DialoguePhase::Evaluating);
        self.touch();
        RecordOutcome::Recorded { frustration }
    }

    /// Moves the dialogue back into question generation after a
    /// "continue" verdict.
    pub fn resume_questioning(&mut self) {
        if !self.terminal {
            self.advance_phase(DialoguePhase::GeneratingQuestion);
            self.touch();
        }
    }

    /// Marks the dialogue terminal and moves it into `Escalating`.
    pub fn begin_escalation(&mut self) {
        self.terminal = true;
        self.advance_phase(DialoguePhase::Escalating);
        self.touch();
    }

    /// Closes the dialogue after scheduling has been attempted.
    ///
    /// The escalation handle is write-once: a handle recorded earlier is
    /// kept and a later one is ignored.
    pub fn complete_escalation(&mut self, handle: Option<String>) {
        self.terminal = true;
        if self.escalation_handle.is_none() {
            self.escalation_handle = handle;
        }
        self.advance_phase(DialoguePhase::Ended);
        self.touch();
    }

    /// The outcome checks in the public methods keep phase moves on the
    /// `DialoguePhase` diagram; an off-diagram call still lands on the
    /// target so observers see the state the machine is actually in.
    fn advance_phase(&mut self, target: DialoguePhase) {
        self.phase = self.phase.transition_to(target).unwrap_or(target);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::new(
            "My exports have been failing since Tuesday.",
            "client@example.com",
            "CSV export job fails",
            vec![
                "Which export format are you using?".to_string(),
                "When did the failures start?".to_string(),
            ],
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn new_conversation_has_no_turns_and_default_budget() {
            let c = conversation();
            assert!(c.turns().is_empty());
            assert_eq!(c.turn_budget(), DEFAULT_TURN_BUDGET);
            assert!(!c.frustration_detected());
            assert!(!c.is_terminal());
            assert!(c.escalation_handle().is_none());
            assert_eq!(c.phase(), DialoguePhase::GeneratingQuestion);
        }

        #[test]
        fn blank_email_is_rejected() {
            let result = Conversation::new("   ", "client@example.com", "summary", vec![]);
            assert!(result.is_err());
        }

        #[test]
        fn blank_client_identifier_is_rejected() {
            let result = Conversation::new("email body", "", "summary", vec![]);
            assert!(result.is_err());
        }
    }

    mod asking {
        use super::*;

        #[test]
        fn ask_appends_a_pending_turn_and_awaits_answer() {
            let mut c = conversation();
            assert_eq!(c.ask("What error do you see?"), AskOutcome::Asked);

            assert_eq!(c.turns().len(), 1);
            assert_eq!(c.pending_question(), Some("What error do you see?"));
            assert_eq!(c.phase(), DialoguePhase::AwaitingAnswer);
        }

        #[test]
        fn second_ask_while_pending_is_rejected() {
            let mut c = conversation();
            c.ask("What error do you see?");
            assert_eq!(c.ask("Another question?"), AskOutcome::PendingTurnExists);
            assert_eq!(c.turns().len(), 1);
        }

        #[test]
        fn exact_duplicate_question_is_rejected() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.record_answer("A timeout page", Sentiment::Neutral);

            assert_eq!(c.ask("What error do you see?"), AskOutcome::DuplicateQuestion);
            assert_eq!(c.turns().len(), 1);
        }

        #[test]
        fn ask_allowing_repeat_accepts_the_duplicate() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.record_answer("A timeout page", Sentiment::Neutral);

            assert_eq!(
                c.ask_allowing_repeat("What error do you see?"),
                AskOutcome::Asked
            );
            assert_eq!(c.turns().len(), 2);
        }

        #[test]
        fn ask_on_ended_conversation_is_rejected() {
            let mut c = conversation();
            c.begin_escalation();
            c.complete_escalation(None);
            assert_eq!(c.ask("Too late?"), AskOutcome::AlreadyEnded);
        }

        #[test]
        fn turn_count_never_exceeds_budget_plus_one() {
            let mut c = conversation().with_turn_budget(2);
            for i in 0..5 {
                c.ask(format!("Question {}?", i));
                c.record_answer("fine", Sentiment::Neutral);
            }
            assert!(c.turns().len() <= c.turn_budget() + 1);
        }
    }

    mod recording {
        use super::*;

        #[test]
        fn answer_lands_on_the_pending_turn() {
            let mut c = conversation();
            c.ask("What error do you see?");

            let outcome = c.record_answer("A 500 page", Sentiment::Neutral);
            assert_eq!(outcome, RecordOutcome::Recorded { frustration: false });
            assert_eq!(c.turns()[0].answer(), Some("A 500 page"));
            assert_eq!(c.phase(), DialoguePhase::Evaluating);
            assert!(c.pending_turn().is_none());
        }

        #[test]
        fn empty_answer_is_ignored() {
            let mut c = conversation();
            c.ask("What error do you see?");

            assert_eq!(c.record_answer("   \n\t ", Sentiment::Neutral), RecordOutcome::IgnoredEmpty);
            assert!(c.turns()[0].is_pending());
            assert_eq!(c.phase(), DialoguePhase::AwaitingAnswer);
        }

        #[test]
        fn answer_without_pending_turn_is_rejected() {
            let mut c = conversation();
            assert_eq!(
                c.record_answer("unsolicited", Sentiment::Neutral),
                RecordOutcome::NoPendingTurn
            );
        }

        #[test]
        fn answer_after_end_is_rejected() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.begin_escalation();
            c.complete_escalation(None);

            assert_eq!(
                c.record_answer("hello?", Sentiment::Neutral),
                RecordOutcome::AlreadyEnded
            );
            assert!(c.turns()[0].is_pending());
        }

        #[test]
        fn heated_answer_trips_the_frustration_short_circuit() {
            let mut c = conversation();
            c.ask("What error do you see?");

            let outcome = c.record_answer("This is ridiculous!", Sentiment::Angry);
            assert_eq!(outcome, RecordOutcome::Recorded { frustration: true });
            assert!(c.frustration_detected());
            assert!(c.is_terminal());
        }

        #[test]
        fn frustration_flag_never_resets() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.record_answer("Fix it now!", Sentiment::Frustrated);
            assert!(c.frustration_detected());

            // Nothing after this point may clear the flag.
            c.begin_escalation();
            c.complete_escalation(Some("https://meet.example/abc".into()));
            assert!(c.frustration_detected());
            assert!(c.is_terminal());
        }
    }

    mod escalation {
        use super::*;

        #[test]
        fn complete_escalation_sets_handle_once() {
            let mut c = conversation();
            c.begin_escalation();
            c.complete_escalation(Some("https://meet.example/first".into()));
            c.complete_escalation(Some("https://meet.example/second".into()));

            assert_eq!(c.escalation_handle(), Some("https://meet.example/first"));
        }

        #[test]
        fn failed_scheduling_leaves_handle_absent_but_ends() {
            let mut c = conversation();
            c.begin_escalation();
            c.complete_escalation(None);

            assert!(c.escalation_handle().is_none());
            assert!(c.is_terminal());
            assert_eq!(c.phase(), DialoguePhase::Ended);
        }

        #[test]
        fn resume_questioning_is_a_no_op_on_terminal_conversations() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.record_answer("Useless product!", Sentiment::Angry);

            c.resume_questioning();
            assert_ne!(c.phase(), DialoguePhase::GeneratingQuestion);
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn round_trips_through_json() {
            let mut c = conversation();
            c.ask("What error do you see?");
            c.record_answer("A 500 page", Sentiment::Stressed);

            let json = serde_json::to_string(&c).unwrap();
            let restored: Conversation = serde_json::from_str(&json).unwrap();

            assert_eq!(restored.id(), c.id());
            assert_eq!(restored.turns().len(), 1);
            assert_eq!(restored.turns()[0].answer(), Some("A 500 page"));
            assert_eq!(restored.phase(), DialoguePhase::Evaluating);
        }
    }
}
