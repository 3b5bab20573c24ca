//! Dialogue termination policy.
//!
//! After every recorded answer the engine decides whether the dialogue
//! keeps asking questions or escalates to a scheduled call. Decision
//! order is fixed: frustration wins over the question budget, the budget
//! wins over continuing.
//!
//! The engine is pure policy over a [`Conversation`]; it performs no I/O
//! and is testable without oracle stubs.

use crate::domain::escalation::EscalationReason;

use super::conversation::Conversation;

/// Outcome of evaluating a conversation after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the dialogue going: generate one more question.
    AskAnother,
    /// Stop and hand off to scheduling.
    Escalate(EscalationReason),
}

/// Turn-by-turn termination policy for clarification dialogues.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueEngine;

impl DialogueEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates the termination conditions without mutating anything.
    ///
    /// First match wins:
    /// 1. frustration detected, at any turn count;
    /// 2. question budget exhausted;
    /// 3. otherwise continue.
    pub fn evaluate(&self, conversation: &Conversation) -> Verdict {
        if conversation.frustration_detected() {
            return Verdict::Escalate(EscalationReason::FrustrationDetected);
        }
        if conversation.turns().len() >= conversation.turn_budget() {
            return Verdict::Escalate(EscalationReason::BudgetExhausted);
        }
        Verdict::AskAnother
    }

    /// Evaluates and applies the verdict's phase transition: back to
    /// question generation on continue, into `Escalating` (terminal)
    /// on escalate.
    pub fn decide(&self, conversation: &mut Conversation) -> Verdict {
        let verdict = self.evaluate(conversation);
        match verdict {
            Verdict::AskAnother => conversation.resume_questioning(),
            Verdict::Escalate(_) => conversation.begin_escalation(),
        }
        verdict
    }
}
