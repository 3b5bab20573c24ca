//! Prompt templates for the OpenAI-backed text oracle.
//!
//! Every prompt demands a raw JSON object with a fixed key set so the
//! response can be parsed mechanically. Models still wrap output in
//! markdown fences now and then; extraction strips those (see
//! `openai_oracle`).

use crate::domain::conversation::Turn;

/// Prompt for classifying the sentiment of client text.
pub fn sentiment_prompt(text: &str) -> String {
    format!(
        "You are an empathetic customer service agent.\n\
         Classify the following message's sentiment as Neutral, Angry, Frustrated, or Stressed.\n\
         Return the output as a raw JSON string without markdown formatting or triple backticks, \
         in the following structure:\n\
         {{\n\
           \"reasoning\": \"Step-by-step reasoning for your conclusion\",\n\
           \"sentiment_identified\": \"Neutral\" | \"Angry\" | \"Frustrated\" | \"Stressed\"\n\
         }}\n\n\
         Message to review:\n{text}"
    )
}

/// Prompt for classifying how urgent an email is.
pub fn urgency_prompt(email: &str) -> String {
    format!(
        "You are a technical customer service agent.\n\
         Based on this email, how urgent is the issue? Respond with one of the following levels: \
         Low, Medium, High, Critical.\n\
         Return the output as a raw JSON string without markdown formatting or triple backticks, \
         in the following structure:\n\
         {{\n\
           \"reasoning\": \"Step-by-step reasoning for your conclusion\",\n\
           \"urgency_identified\": \"Low\" | \"Medium\" | \"High\" | \"Critical\"\n\
         }}\n\n\
         Email to review:\n{email}"
    )
}

/// Prompt for summarizing the issue and proposing five candidate
/// clarification questions.
pub fn issue_extraction_prompt(email: &str) -> String {
    format!(
        "You are a technical customer service agent.\n\
         Summarize the following email to help identify the main issue.\n\
         Suggest 5 questions to get more information from the customer, so the issue can be \
         better identified.\n\
         Return the output as a raw JSON string without markdown formatting or triple backticks, \
         in the following structure:\n\
         {{\n\
           \"summary\": \"One-paragraph summary of the issue\",\n\
           \"reasoning\": \"Step-by-step reasoning for your questions\",\n\
           \"questions\": [\"question 1\", \"question 2\", \"question 3\", \"question 4\", \"question 5\"]\n\
         }}\n\n\
         Email to review:\n{email}"
    )
}

/// Prompt for the greeting and opening clarification question of a new
/// dialogue.
pub fn greeting_prompt(email: &str, candidate_questions: &[String]) -> String {
    format!(
        "You are a sympathetic customer support agent contacting a client who has emailed the \
         helpdesk.\n\
         This is the client's email:\n{email}\n\n\
         You have been provided with suggested clarification questions:\n{questions}\n\n\
         Start by informing the client that by proceeding with the chat they accept the privacy \
         policy (available at www.ai-first-tier.com/privacy_policy).\n\
         Then greet the customer, thank them for being our customer, and ask the first \
         clarification question. You may use any of the suggested questions or ask a new one. \
         The objective of this first question is to clarify the issue presented.\n\
         Only ask **one** question. Do not simulate the client's answer.\n\
         Return only this JSON (no markdown formatting or backticks):\n\
         {{\n\
           \"question\": \"<greeting, privacy notice, and the single opening question>\"\n\
         }}",
        questions = bullet_list(candidate_questions),
    )
}

/// Prompt for one new, non-redundant follow-up question.
pub fn next_question_prompt(email: &str, candidate_questions: &[String], turns: &[Turn]) -> String {
    format!(
        "You are a helpful support agent in a live conversation.\n\
         You have received the following customer email:\n{email}\n\n\
         Based on this email, you previously suggested some follow-up questions:\n{suggested}\n\n\
         Here is a summary of your previous interactions with the client:\n{history}\n\n\
         Your task is to ask ONE new, meaningful, non-redundant question that helps the technical \
         team understand and resolve the issue faster. Do not repeat any question already asked.\n\
         Return only this JSON (no markdown formatting or backticks):\n\
         {{\n\
           \"question\": \"...\",\n\
           \"reasoning\": \"Why this new question is useful given the history\"\n\
         }}",
        suggested = bullet_list(candidate_questions),
        history = format_history(turns),
    )
}

/// Renders the turn history the way the next-question prompt expects it.
pub fn format_history(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "(no previous interactions)".to_string();
    }
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            format!(
                "Q{}: {} | A: {} | Sentiment: {}",
                i + 1,
                turn.question(),
                turn.answer().unwrap_or("(awaiting answer)"),
                turn.sentiment()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "(not classified)".to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(none provided)".to_string();
    }
    items
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n")
}
