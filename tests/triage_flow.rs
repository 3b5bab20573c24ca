//! End-to-end triage flows over mock oracles: direct escalation,
//! full dialogues, termination by frustration and by budget, and the
//! degraded paths when scheduling cannot find a slot.

use std::sync::Arc;

use first_tier::adapters::{InMemoryConversationStore, MockSchedulingOracle, MockTextOracle};
use first_tier::application::escalation::EscalationCoordinator;
use first_tier::ports::ConversationStore;
use first_tier::application::handlers::{
    AnswerOutcome, BeginOutcome, BeginTriageCommand, BeginTriageHandler, SubmitAnswerCommand,
    SubmitAnswerHandler,
};
use first_tier::domain::escalation::EscalationReason;
use first_tier::domain::foundation::ConversationId;
use first_tier::domain::triage::{Sentiment, Urgency};

struct Harness {
    begin: BeginTriageHandler,
    submit: SubmitAnswerHandler,
    store: Arc<InMemoryConversationStore>,
    scheduling: MockSchedulingOracle,
}

fn harness(oracle: MockTextOracle, scheduling: MockSchedulingOracle) -> Harness {
    let store = Arc::new(InMemoryConversationStore::new());
    let oracle: Arc<MockTextOracle> = Arc::new(oracle);
    let coordinator = Arc::new(EscalationCoordinator::new(Arc::new(scheduling.clone())));
    Harness {
        begin: BeginTriageHandler::new(oracle.clone(), store.clone(), coordinator.clone()),
        submit: SubmitAnswerHandler::new(oracle, store.clone(), coordinator),
        store,
        scheduling,
    }
}

fn email_command() -> BeginTriageCommand {
    BeginTriageCommand {
        email_text: "Since the last update our exports fail with error 1201.".to_string(),
        client_identifier: "client@example.com".to_string(),
    }
}

async fn submit(h: &Harness, id: ConversationId, text: &str) -> AnswerOutcome {
    h.submit
        .handle(SubmitAnswerCommand {
            conversation_id: id,
            answer: text.to_string(),
        })
        .await
        .unwrap()
}

// Scenario A: an angry email escalates straight to a scheduled call.
#[tokio::test]
async fn angry_email_books_a_call_without_any_dialogue() {
    let h = harness(
        MockTextOracle::new().with_sentiment(Sentiment::Angry),
        MockSchedulingOracle::new().with_handle("https://meet.example.com/now"),
    );

    let outcome = h.begin.handle(email_command()).await.unwrap();

    let BeginOutcome::EscalatedNow {
        escalation_handle, ..
    } = outcome
    else {
        panic!("expected immediate escalation");
    };
    assert_eq!(escalation_handle.as_deref(), Some("https://meet.example.com/now"));

    let events = h.scheduling.created_events();
    assert_eq!(events.len(), 1);
    assert!(events[0].description.contains("No clarification dialogue took place"));
    assert!(h.store.is_empty().await);
}

// Scenario B: a calm low-urgency email opens a dialogue with exactly one
// pending turn.
#[tokio::test]
async fn calm_email_enters_dialogue_with_one_pending_turn() {
    let h = harness(
        MockTextOracle::new()
            .with_sentiment(Sentiment::Neutral)
            .with_urgency(Urgency::Low)
            .with_opening("Thanks for writing in. Which export format fails?"),
        MockSchedulingOracle::new(),
    );

    let outcome = h.begin.handle(email_command()).await.unwrap();

    let BeginOutcome::InDialogue {
        conversation_id,
        question,
        ..
    } = outcome
    else {
        panic!("expected a dialogue");
    };
    assert_eq!(question, "Thanks for writing in. Which export format fails?");

    let saved = h.store.load(conversation_id).await.unwrap();
    assert_eq!(saved.turns().len(), 1);
    assert!(saved.turns()[0].is_pending());
    assert_eq!(h.scheduling.find_call_count(), 0);
}

// Scenario C: ten consecutive neutral answers exhaust the budget.
#[tokio::test]
async fn ten_neutral_answers_end_with_budget_exhausted() {
    let h = harness(MockTextOracle::new(), MockSchedulingOracle::new());

    let BeginOutcome::InDialogue {
        conversation_id, ..
    } = h.begin.handle(email_command()).await.unwrap()
    else {
        panic!("expected a dialogue");
    };

    let mut outcomes = Vec::new();
    for i in 0..10 {
        outcomes.push(submit(&h, conversation_id, &format!("Neutral detail {i}.")).await);
    }

    for outcome in &outcomes[..9] {
        assert!(matches!(outcome, AnswerOutcome::NextQuestion { .. }));
    }
    assert!(matches!(
        outcomes[9],
        AnswerOutcome::Ended {
            reason: EscalationReason::BudgetExhausted,
            ..
        }
    ));

    let saved = h.store.load(conversation_id).await.unwrap();
    assert!(saved.is_terminal());
    assert_eq!(saved.turns().len(), 10);
    assert!(saved.turns().iter().all(|t| !t.is_pending()));
}

// Frustration short-circuit: an angry answer at turn three ends the
// dialogue right there, never reaching the budget.
#[tokio::test]
async fn frustrated_answer_short_circuits_at_turn_three() {
    // First reading classifies the email itself; the rest classify answers.
    let h = harness(
        MockTextOracle::new()
            .with_sentiment(Sentiment::Neutral)
            .with_sentiment(Sentiment::Neutral)
            .with_sentiment(Sentiment::Neutral)
            .with_sentiment(Sentiment::Angry),
        MockSchedulingOracle::new().with_handle("https://meet.example.com/urgent"),
    );

    let BeginOutcome::InDialogue {
        conversation_id, ..
    } = h.begin.handle(email_command()).await.unwrap()
    else {
        panic!("expected a dialogue");
    };

    submit(&h, conversation_id, "It fails for CSV.").await;
    submit(&h, conversation_id, "Started last Tuesday.").await;
    let third = submit(&h, conversation_id, "Why is this still broken?!").await;

    assert_eq!(
        third,
        AnswerOutcome::Ended {
            reason: EscalationReason::FrustrationDetected,
            escalation_handle: Some("https://meet.example.com/urgent".to_string()),
        }
    );

    let saved = h.store.load(conversation_id).await.unwrap();
    assert_eq!(saved.turns().len(), 3);
    assert!(saved.frustration_detected());
    assert!(saved.is_terminal());

    // The escalation event embeds the whole transcript.
    let events = h.scheduling.created_events();
    assert_eq!(events.len(), 1);
    assert!(events[0].summary.starts_with("High - Support Call"));
    assert!(events[0].description.contains("It fails for CSV."));
}

// Scenario D: no free slot leaves the handle absent but the dialogue
// still ends.
#[tokio::test]
async fn full_calendar_still_closes_the_conversation() {
    let h = harness(
        MockTextOracle::new()
            .with_sentiment(Sentiment::Neutral) // the email itself
            .with_sentiment(Sentiment::Frustrated), // the answer
        MockSchedulingOracle::new().with_no_slot(),
    );

    let BeginOutcome::InDialogue {
        conversation_id, ..
    } = h.begin.handle(email_command()).await.unwrap()
    else {
        panic!("expected a dialogue");
    };

    let outcome = submit(&h, conversation_id, "This keeps happening.").await;

    assert_eq!(
        outcome,
        AnswerOutcome::Ended {
            reason: EscalationReason::FrustrationDetected,
            escalation_handle: None,
        }
    );
    let saved = h.store.load(conversation_id).await.unwrap();
    assert!(saved.is_terminal());
    assert!(saved.escalation_handle().is_none());
    assert_eq!(h.scheduling.create_call_count(), 0);
}

// Scenario E: an empty submission mutates nothing.
#[tokio::test]
async fn empty_answer_changes_nothing() {
    let h = harness(
        MockTextOracle::new().with_opening("Which export format fails?"),
        MockSchedulingOracle::new(),
    );

    let BeginOutcome::InDialogue {
        conversation_id, ..
    } = h.begin.handle(email_command()).await.unwrap()
    else {
        panic!("expected a dialogue");
    };
    let before = h.store.load(conversation_id).await.unwrap();

    let outcome = submit(&h, conversation_id, "   ").await;

    assert_eq!(
        outcome,
        AnswerOutcome::IgnoredEmpty {
            pending_question: Some("Which export format fails?".to_string())
        }
    );
    let after = h.store.load(conversation_id).await.unwrap();
    assert_eq!(after.turns().len(), before.turns().len());
    assert!(after.turns()[0].is_pending());
    assert!(!after.is_terminal());
}

// Escalation idempotence: resubmitting after the end never books twice.
#[tokio::test]
async fn late_answers_never_schedule_a_second_call() {
    let h = harness(
        MockTextOracle::new()
            .with_sentiment(Sentiment::Neutral) // the email itself
            .with_sentiment(Sentiment::Angry), // the first answer
        MockSchedulingOracle::new().with_handle("https://meet.example.com/only"),
    );

    let BeginOutcome::InDialogue {
        conversation_id, ..
    } = h.begin.handle(email_command()).await.unwrap()
    else {
        panic!("expected a dialogue");
    };

    submit(&h, conversation_id, "Angry now.").await;
    let late = submit(&h, conversation_id, "Also this!").await;
    let later = submit(&h, conversation_id, "And that!").await;

    for outcome in [late, later] {
        assert_eq!(
            outcome,
            AnswerOutcome::AlreadyEnded {
                escalation_handle: Some("https://meet.example.com/only".to_string())
            }
        );
    }
    assert_eq!(h.scheduling.find_call_count(), 1);
    assert_eq!(h.scheduling.create_call_count(), 1);
}
